use async_trait::async_trait;
use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature, Signer};
use solana_sdk::transaction::Transaction;

use crate::config::Commitment;
use crate::types::RawFailure;

/// A blockhash together with the last block height at which transactions
/// referencing it are still accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockhashInfo {
    pub blockhash: Hash,
    pub last_valid_block_height: u64,
}

/// What the submitter needs from the network. Implementations own wire
/// serialization and report failures in a shape the classifier can inspect.
#[async_trait]
pub trait NetworkClient: Send + Sync {
    async fn latest_blockhash(&self, commitment: Commitment) -> Result<BlockhashInfo, RawFailure>;

    async fn send_transaction(&self, transaction: &Transaction) -> Result<Signature, RawFailure>;

    /// Wait until `signature` reaches `commitment` or `blockhash` expires.
    async fn confirm_transaction(
        &self,
        signature: &Signature,
        blockhash: &BlockhashInfo,
        commitment: Commitment,
    ) -> Result<(), RawFailure>;
}

/// Read-only view of the connected wallet.
#[async_trait]
pub trait WalletAccessor: Send + Sync {
    /// Fails when no wallet is connected.
    fn public_key(&self) -> Result<Pubkey, RawFailure>;

    async fn sign_transaction(&self, transaction: Transaction) -> Result<Transaction, RawFailure>;

    async fn sign_all_transactions(
        &self,
        transactions: Vec<Transaction>,
    ) -> Result<Vec<Transaction>, RawFailure> {
        let mut signed = Vec::with_capacity(transactions.len());
        for transaction in transactions {
            signed.push(self.sign_transaction(transaction).await?);
        }
        Ok(signed)
    }
}

/// Wallet backed by a local keypair, for scripts and tests.
pub struct KeypairWallet {
    keypair: Keypair,
}

impl KeypairWallet {
    pub fn new(keypair: Keypair) -> Self {
        Self { keypair }
    }
}

#[async_trait]
impl WalletAccessor for KeypairWallet {
    fn public_key(&self) -> Result<Pubkey, RawFailure> {
        Ok(self.keypair.pubkey())
    }

    async fn sign_transaction(
        &self,
        mut transaction: Transaction,
    ) -> Result<Transaction, RawFailure> {
        let blockhash = transaction.message.recent_blockhash;
        transaction
            .try_partial_sign(&[&self.keypair], blockhash)
            .map_err(|err| RawFailure::message(err.to_string()))?;
        Ok(transaction)
    }
}

/// Stand-in for the accessor when the user has not connected a wallet yet.
pub struct DisconnectedWallet;

#[async_trait]
impl WalletAccessor for DisconnectedWallet {
    fn public_key(&self) -> Result<Pubkey, RawFailure> {
        Err(RawFailure::wallet_not_connected())
    }

    async fn sign_transaction(&self, _transaction: Transaction) -> Result<Transaction, RawFailure> {
        Err(RawFailure::wallet_not_connected())
    }
}
