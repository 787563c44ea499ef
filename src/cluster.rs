use crate::classify::NormalizedError;

pub const SOLANA_EXPLORER_URL: &str = "https://explorer.solana.com";
pub const SOLSCAN_URL: &str = "https://solscan.io";

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    serde::Serialize,
    serde::Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Cluster {
    MainnetBeta,
    #[default]
    Devnet,
    Testnet,
    Localnet,
}

impl Cluster {
    pub fn rpc_endpoint(self) -> &'static str {
        match self {
            Self::MainnetBeta => "https://api.mainnet-beta.solana.com",
            Self::Devnet => "https://api.devnet.solana.com",
            Self::Testnet => "https://api.testnet.solana.com",
            Self::Localnet => "http://localhost:8899",
        }
    }

    pub fn fallback_endpoints(self) -> &'static [&'static str] {
        match self {
            Self::MainnetBeta => &[
                "https://solana-mainnet.g.alchemy.com/v2/demo",
                "https://api.mainnet-beta.solana.com",
                "https://solana-api.projectserum.com",
            ],
            Self::Devnet => &[
                "https://api.devnet.solana.com",
                "https://devnet.genesysgo.net",
            ],
            Self::Testnet => &["https://api.testnet.solana.com"],
            Self::Localnet => &[],
        }
    }

    /// Primary endpoint followed by the fallbacks, in preference order.
    pub fn all_rpc_endpoints(self) -> Vec<&'static str> {
        std::iter::once(self.rpc_endpoint())
            .chain(self.fallback_endpoints().iter().copied())
            .collect()
    }

    /// Query suffix explorers expect for this cluster. Mainnet has none.
    fn explorer_query(self) -> &'static str {
        match self {
            Self::MainnetBeta => "",
            Self::Devnet => "?cluster=devnet",
            Self::Testnet => "?cluster=testnet",
            Self::Localnet => "?cluster=custom",
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    serde::Serialize,
    serde::Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Explorer {
    #[default]
    Solana,
    Solscan,
}

/// Link to a transaction on a block explorer.
pub fn explorer_url(signature: &str, cluster: Cluster, explorer: Explorer) -> String {
    let base = match explorer {
        Explorer::Solana => SOLANA_EXPLORER_URL,
        Explorer::Solscan => SOLSCAN_URL,
    };
    format!("{base}/tx/{signature}{}", cluster.explorer_query())
}

impl NormalizedError {
    /// Where the user can check a transaction that was broadcast but not confirmed.
    pub fn explorer_url(&self, cluster: Cluster) -> Option<String> {
        self.tx_signature()
            .map(|sig| explorer_url(sig, cluster, Explorer::Solana))
    }
}
