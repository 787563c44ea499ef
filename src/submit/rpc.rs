use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use solana_client::client_error::{ClientError, ClientErrorKind};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_request::{RpcError, RpcResponseErrorData};
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;

use crate::config::{Commitment, Config};
use crate::submit::client::{BlockhashInfo, NetworkClient};
use crate::types::RawFailure;

pub const BLOCK_HEIGHT_EXCEEDED: &str = "block height exceeded";

/// [`NetworkClient`] over a JSON-RPC node.
pub struct RpcNetworkClient {
    rpc: Arc<RpcClient>,
    poll_interval: Duration,
}

impl RpcNetworkClient {
    pub fn new(rpc: Arc<RpcClient>, poll_interval: Duration) -> Self {
        Self { rpc, poll_interval }
    }

    /// Client for the primary endpoint of the configured cluster.
    pub fn from_config(config: &Config) -> Self {
        let rpc = RpcClient::new_with_commitment(
            config.cluster.rpc_endpoint().to_string(),
            CommitmentConfig::from(config.commitment),
        );
        Self::new(
            Arc::new(rpc),
            Duration::from_millis(config.confirm_poll_interval_ms),
        )
    }

    pub fn url(&self) -> String {
        self.rpc.url()
    }
}

#[async_trait]
impl NetworkClient for RpcNetworkClient {
    async fn latest_blockhash(&self, commitment: Commitment) -> Result<BlockhashInfo, RawFailure> {
        let (blockhash, last_valid_block_height) = self
            .rpc
            .get_latest_blockhash_with_commitment(commitment.into())
            .await
            .map_err(|err| failure_from_client_error(&err))?;
        Ok(BlockhashInfo {
            blockhash,
            last_valid_block_height,
        })
    }

    async fn send_transaction(&self, transaction: &Transaction) -> Result<Signature, RawFailure> {
        self.rpc
            .send_transaction(transaction)
            .await
            .map_err(|err| failure_from_client_error(&err))
    }

    async fn confirm_transaction(
        &self,
        signature: &Signature,
        blockhash: &BlockhashInfo,
        commitment: Commitment,
    ) -> Result<(), RawFailure> {
        let commitment = CommitmentConfig::from(commitment);
        loop {
            let status = self
                .rpc
                .get_signature_status_with_commitment(signature, commitment)
                .await
                .map_err(|err| failure_from_client_error(&err))?;
            match status {
                Some(Ok(())) => return Ok(()),
                Some(Err(err)) => return Err(RawFailure::message(err.to_string())),
                None => {}
            }

            let height = self
                .rpc
                .get_block_height_with_commitment(commitment)
                .await
                .map_err(|err| failure_from_client_error(&err))?;
            if height > blockhash.last_valid_block_height {
                tracing::debug!(
                    %signature,
                    height,
                    last_valid_block_height = blockhash.last_valid_block_height,
                    "blockhash expired before confirmation"
                );
                return Err(RawFailure::message(format!(
                    "Signature {signature} has expired: {BLOCK_HEIGHT_EXCEEDED}"
                )));
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

/// Keep simulation logs from preflight failures so log rules can see them.
pub fn failure_from_client_error(err: &ClientError) -> RawFailure {
    match err.kind() {
        ClientErrorKind::RpcError(RpcError::RpcResponseError {
            message,
            data: RpcResponseErrorData::SendTransactionPreflightFailure(result),
            ..
        }) => preflight_failure(message, result.logs.as_deref()),
        _ => RawFailure::message(err.to_string()),
    }
}

fn preflight_failure(message: &str, logs: Option<&[String]>) -> RawFailure {
    match logs {
        Some(logs) if !logs.is_empty() => RawFailure::send(message, logs.to_vec()),
        _ => RawFailure::message(message),
    }
}
