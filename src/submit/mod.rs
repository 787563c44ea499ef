pub mod client;
#[cfg(feature = "rpc-client")]
pub mod rpc;

use std::sync::Arc;

use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Signature, Signer};
use solana_sdk::transaction::Transaction;

use crate::classify::{ErrorCode, NormalizedError, classify_unconfirmed, classify_with_fallback};
use crate::cluster::{Explorer, explorer_url};
use crate::config::SubmitterConfig;
use crate::inject::FaultInjector;
use crate::submit::client::{NetworkClient, WalletAccessor};
use crate::types::RawFailure;

/// Label under which submissions are reported to the fault injector.
pub const SUBMIT_OPERATION: &str = "transaction";

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display, strum_macros::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum SubmitStage {
    Build,
    Blockhash,
    ExtraSigners,
    WalletSign,
    Broadcast,
    Confirm,
}

impl SubmitStage {
    /// Code used when a failure at this stage matches no classification rule.
    pub fn fallback_code(self) -> ErrorCode {
        match self {
            Self::Build => ErrorCode::WalletNotConnected,
            Self::Blockhash => ErrorCode::NetworkError,
            Self::ExtraSigners => ErrorCode::SignatureVerificationFailed,
            Self::WalletSign | Self::Broadcast | Self::Confirm => ErrorCode::Unknown,
        }
    }
}

/// Everything needed to assemble one transaction. Lives for a single `execute` call.
pub struct TransactionRequest<'a> {
    pub instructions: &'a [Instruction],
    pub fee_payer: Pubkey,
    pub signers: &'a [&'a (dyn Signer + Sync)],
}

impl TransactionRequest<'_> {
    pub fn build(&self) -> Transaction {
        Transaction::new_with_payer(self.instructions, Some(&self.fee_payer))
    }

    pub fn signer_keys(&self) -> Vec<Pubkey> {
        self.signers.iter().map(|s| s.pubkey()).collect()
    }
}

/// Carries one set of instructions through build, blockhash, signing,
/// broadcast and confirmation.
///
/// Every failure leaves as a [`NormalizedError`], classified exactly once at
/// the stage that raised it. There is no internal retry; callers decide using
/// [`NormalizedError::retryable`]. Concurrent calls are not deduplicated.
pub struct TransactionSubmitter {
    network: Arc<dyn NetworkClient>,
    wallet: Arc<dyn WalletAccessor>,
    config: SubmitterConfig,
    injector: Option<FaultInjector>,
}

impl TransactionSubmitter {
    pub fn new(
        network: Arc<dyn NetworkClient>,
        wallet: Arc<dyn WalletAccessor>,
        config: SubmitterConfig,
    ) -> Self {
        Self {
            network,
            wallet,
            config,
            injector: None,
        }
    }

    /// Route every submission through `injector` first.
    pub fn with_fault_injector(mut self, injector: FaultInjector) -> Self {
        self.injector = Some(injector);
        self
    }

    pub fn config(&self) -> &SubmitterConfig {
        &self.config
    }

    /// Submit `instructions` as one transaction paid by the connected wallet.
    ///
    /// `signers` co-sign before the wallet is asked. On success the broadcast
    /// signature is returned unchanged.
    pub async fn execute(
        &self,
        instructions: &[Instruction],
        signers: &[&(dyn Signer + Sync)],
    ) -> Result<Signature, NormalizedError> {
        match &self.injector {
            Some(injector) => {
                injector
                    .run(SUBMIT_OPERATION, || self.submit(instructions, signers))
                    .await
            }
            None => self.submit(instructions, signers).await,
        }
    }

    async fn submit(
        &self,
        instructions: &[Instruction],
        signers: &[&(dyn Signer + Sync)],
    ) -> Result<Signature, NormalizedError> {
        if instructions.is_empty() {
            let err = NormalizedError::new(
                ErrorCode::InvalidArgument,
                "transaction has no instructions",
                None,
                Vec::new(),
            );
            tracing::warn!(
                stage = %SubmitStage::Build,
                code = %err.code(),
                "rejected empty transaction"
            );
            return Err(err);
        }

        let fee_payer = self
            .wallet
            .public_key()
            .map_err(|failure| Self::fail(SubmitStage::Build, &failure))?;

        let request = TransactionRequest {
            instructions,
            fee_payer,
            signers,
        };
        let mut transaction = request.build();
        tracing::debug!(
            stage = %SubmitStage::Build,
            %fee_payer,
            instructions = instructions.len(),
            extra_signers = ?request.signer_keys(),
            "built transaction"
        );

        tracing::debug!(
            stage = %SubmitStage::Blockhash,
            commitment = %self.config.commitment,
            "fetching blockhash"
        );
        let blockhash = self
            .network
            .latest_blockhash(self.config.commitment)
            .await
            .map_err(|failure| Self::fail(SubmitStage::Blockhash, &failure))?;
        transaction.message.recent_blockhash = blockhash.blockhash;

        if !signers.is_empty() {
            tracing::debug!(
                stage = %SubmitStage::ExtraSigners,
                count = signers.len(),
                "co-signing"
            );
            let keys: Vec<&dyn Signer> = signers.iter().map(|s| *s as &dyn Signer).collect();
            transaction
                .try_partial_sign(keys.as_slice(), blockhash.blockhash)
                .map_err(|err| {
                    Self::fail(
                        SubmitStage::ExtraSigners,
                        &RawFailure::message(err.to_string()),
                    )
                })?;
        }

        tracing::debug!(stage = %SubmitStage::WalletSign, "requesting wallet signature");
        let signed = self
            .wallet
            .sign_transaction(transaction)
            .await
            .map_err(|failure| Self::fail(SubmitStage::WalletSign, &failure))?;

        tracing::debug!(stage = %SubmitStage::Broadcast, "broadcasting");
        let signature = self
            .network
            .send_transaction(&signed)
            .await
            .map_err(|failure| Self::fail(SubmitStage::Broadcast, &failure))?;
        tracing::debug!(
            stage = %SubmitStage::Confirm,
            %signature,
            "transaction broadcast, awaiting confirmation"
        );

        if let Err(failure) = self
            .network
            .confirm_transaction(&signature, &blockhash, self.config.commitment)
            .await
        {
            let signature = signature.to_string();
            let err = classify_unconfirmed(&failure, &signature);
            tracing::warn!(
                stage = %SubmitStage::Confirm,
                code = %err.code(),
                %signature,
                last_valid_block_height = blockhash.last_valid_block_height,
                explorer = %explorer_url(&signature, self.config.cluster, Explorer::Solana),
                "transaction broadcast but not confirmed"
            );
            return Err(err);
        }

        tracing::info!(%signature, commitment = %self.config.commitment, "transaction confirmed");
        Ok(signature)
    }

    /// Classify a failure raised before anything was broadcast.
    fn fail(stage: SubmitStage, failure: &RawFailure) -> NormalizedError {
        let err = classify_with_fallback(failure, None, stage.fallback_code());
        tracing::warn!(
            %stage,
            code = %err.code(),
            retryable = err.retryable(),
            raw = %failure,
            "transaction stage failed"
        );
        err
    }
}
