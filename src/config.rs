use crate::cluster::Cluster;
use crate::error::Error;

/// Chance of an injected failure when mock mode is on and nothing else is configured.
pub const DEFAULT_FAULT_PROBABILITY: f64 = 0.2;
pub const DEFAULT_CONFIRM_POLL_INTERVAL_MS: u64 = 500;

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
pub enum Commitment {
    Processed,
    #[default]
    Confirmed,
    Finalized,
}

#[cfg(feature = "native")]
impl From<Commitment> for solana_sdk::commitment_config::CommitmentConfig {
    fn from(value: Commitment) -> Self {
        match value {
            Commitment::Processed => Self::processed(),
            Commitment::Confirmed => Self::confirmed(),
            Commitment::Finalized => Self::finalized(),
        }
    }
}

/// Fault injection settings. The embedding application decides `mock_mode`
/// (query flag, env var, demo build); this crate only consumes the value.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InjectorConfig {
    pub mock_mode: bool,
    pub probability: f64,
    /// Seed for the random source. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for InjectorConfig {
    fn default() -> Self {
        Self {
            mock_mode: false,
            probability: DEFAULT_FAULT_PROBABILITY,
            seed: None,
        }
    }
}

impl InjectorConfig {
    pub fn validate(&self) -> Result<(), Error> {
        if !(0.0..=1.0).contains(&self.probability) {
            return Err(Error::Config {
                reason: format!("fault probability {} is outside [0, 1]", self.probability),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SubmitterConfig {
    /// Commitment used for the blockhash fetch and the confirmation wait.
    pub commitment: Commitment,
    /// Cluster the submitter talks to; only used for explorer links in logs.
    pub cluster: Cluster,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub cluster: Cluster,
    pub commitment: Commitment,
    pub confirm_poll_interval_ms: u64,
    pub injector: InjectorConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cluster: Cluster::default(),
            commitment: Commitment::default(),
            confirm_poll_interval_ms: DEFAULT_CONFIRM_POLL_INTERVAL_MS,
            injector: InjectorConfig::default(),
        }
    }
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.confirm_poll_interval_ms == 0 {
            return Err(Error::Config {
                reason: "confirmPollIntervalMs must be greater than zero".into(),
            });
        }
        self.injector.validate()
    }

    pub fn submitter(&self) -> SubmitterConfig {
        SubmitterConfig {
            commitment: self.commitment,
            cluster: self.cluster,
        }
    }
}
