#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::dbg_macro,
        clippy::print_stdout,
        clippy::print_stderr,
        clippy::panic,
    )
)]

pub mod classify;
pub mod cluster;
pub mod config;
pub mod error;
pub mod inject;
#[cfg(feature = "native")]
pub mod submit;
pub mod types;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use classify::{
    ErrorCode, NormalizedError, classify, classify_json, classify_unconfirmed,
    classify_with_fallback, synthetic_error,
};
pub use cluster::{Cluster, Explorer, explorer_url};
pub use config::{Commitment, Config, InjectorConfig, SubmitterConfig};
pub use error::Error;
pub use inject::random::{FixedSource, RandomSource};
pub use inject::{FaultInjector, code_for_operation, simulate_operation_error};
#[cfg(feature = "rpc-client")]
pub use submit::rpc::RpcNetworkClient;
#[cfg(feature = "native")]
pub use submit::{
    SubmitStage, TransactionSubmitter,
    client::{BlockhashInfo, DisconnectedWallet, KeypairWallet, NetworkClient, WalletAccessor},
};
pub use types::RawFailure;
