#![cfg(feature = "native")]
#![expect(
    clippy::unwrap_used,
    reason = "test code uses unwrap for concise assertions"
)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dvulndb_tx::{
    BlockhashInfo, Commitment, DisconnectedWallet, ErrorCode, FaultInjector, InjectorConfig,
    KeypairWallet, NetworkClient, RawFailure, SubmitterConfig, TransactionSubmitter,
    WalletAccessor,
};
use solana_sdk::hash::Hash;
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature, Signer};
use solana_sdk::transaction::Transaction;

const LAST_VALID_BLOCK_HEIGHT: u64 = 4_242;

/// Network fake with one optional failure per stage and a record of every call.
#[derive(Default)]
struct FakeNetwork {
    blockhash_failure: Option<RawFailure>,
    send_failure: Option<RawFailure>,
    confirm_failure: Option<RawFailure>,
    blockhash: Mutex<Option<Hash>>,
    sent: Mutex<Vec<Transaction>>,
    confirmed: Mutex<Vec<(Signature, u64)>>,
    blockhash_calls: Mutex<u32>,
}

impl FakeNetwork {
    fn sent(&self) -> Vec<Transaction> {
        self.sent.lock().unwrap().clone()
    }

    fn blockhash_calls(&self) -> u32 {
        *self.blockhash_calls.lock().unwrap()
    }
}

#[async_trait]
impl NetworkClient for FakeNetwork {
    async fn latest_blockhash(&self, _commitment: Commitment) -> Result<BlockhashInfo, RawFailure> {
        *self.blockhash_calls.lock().unwrap() += 1;
        if let Some(failure) = &self.blockhash_failure {
            return Err(failure.clone());
        }
        let blockhash = Hash::new_unique();
        *self.blockhash.lock().unwrap() = Some(blockhash);
        Ok(BlockhashInfo {
            blockhash,
            last_valid_block_height: LAST_VALID_BLOCK_HEIGHT,
        })
    }

    async fn send_transaction(&self, transaction: &Transaction) -> Result<Signature, RawFailure> {
        self.sent.lock().unwrap().push(transaction.clone());
        if let Some(failure) = &self.send_failure {
            return Err(failure.clone());
        }
        Ok(transaction.signatures[0])
    }

    async fn confirm_transaction(
        &self,
        signature: &Signature,
        blockhash: &BlockhashInfo,
        _commitment: Commitment,
    ) -> Result<(), RawFailure> {
        self.confirmed
            .lock()
            .unwrap()
            .push((*signature, blockhash.last_valid_block_height));
        match &self.confirm_failure {
            Some(failure) => Err(failure.clone()),
            None => Ok(()),
        }
    }
}

/// Keypair wallet whose signing step can be made to fail.
struct ScriptedWallet {
    inner: KeypairWallet,
    sign_failure: Option<RawFailure>,
}

#[async_trait]
impl WalletAccessor for ScriptedWallet {
    fn public_key(&self) -> Result<Pubkey, RawFailure> {
        self.inner.public_key()
    }

    async fn sign_transaction(&self, transaction: Transaction) -> Result<Transaction, RawFailure> {
        if let Some(failure) = &self.sign_failure {
            return Err(failure.clone());
        }
        self.inner.sign_transaction(transaction).await
    }
}

fn wallet(sign_failure: Option<RawFailure>) -> Arc<ScriptedWallet> {
    Arc::new(ScriptedWallet {
        inner: KeypairWallet::new(Keypair::new()),
        sign_failure,
    })
}

fn submit_report_ix(extra_signer: Option<Pubkey>) -> Instruction {
    let accounts = extra_signer
        .map(|key| vec![AccountMeta::new(key, true)])
        .unwrap_or_default();
    Instruction::new_with_bytes(Pubkey::new_unique(), b"submit_report", accounts)
}

fn submitter(network: &Arc<FakeNetwork>, wallet: Arc<dyn WalletAccessor>) -> TransactionSubmitter {
    TransactionSubmitter::new(network.clone(), wallet, SubmitterConfig::default())
}

#[tokio::test]
async fn blockhash_timeout_is_a_retryable_network_error() {
    let network = Arc::new(FakeNetwork {
        blockhash_failure: Some(RawFailure::message("timeout")),
        ..FakeNetwork::default()
    });
    let err = submitter(&network, wallet(None))
        .execute(&[submit_report_ix(None)], &[])
        .await
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::NetworkError);
    assert!(err.retryable());
    assert_eq!(err.tx_signature(), None);
    assert!(network.sent().is_empty());
}

#[tokio::test]
async fn wallet_rejection_is_not_retryable() {
    let network = Arc::new(FakeNetwork::default());
    let err = submitter(
        &network,
        wallet(Some(RawFailure::message("User rejected the request"))),
    )
    .execute(&[submit_report_ix(None)], &[])
    .await
    .unwrap_err();

    assert_eq!(err.code(), ErrorCode::SignatureRejected);
    assert!(!err.retryable());
    assert_eq!(err.tx_signature(), None);
    assert!(network.sent().is_empty());
}

#[tokio::test]
async fn broadcast_logs_with_insufficient_balance() {
    let network = Arc::new(FakeNetwork {
        send_failure: Some(RawFailure::send(
            "Transaction simulation failed",
            vec![
                "Program 3aiStNroDenw7KpSKXvFWVFox35gCk4FcUx8nzXRF2HH invoke [1]".to_string(),
                "Program log: Error: insufficient balance".to_string(),
            ],
        )),
        ..FakeNetwork::default()
    });
    let err = submitter(&network, wallet(None))
        .execute(&[submit_report_ix(None)], &[])
        .await
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::InsufficientFeeFunds);
    assert!(!err.retryable());
    assert_eq!(err.logs().len(), 2);
    assert_eq!(network.sent().len(), 1);
}

#[tokio::test]
async fn successful_submission_returns_the_broadcast_signature() {
    let network = Arc::new(FakeNetwork::default());
    let signature = submitter(&network, wallet(None))
        .execute(&[submit_report_ix(None)], &[])
        .await
        .unwrap();

    let sent = network.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].signatures[0], signature);
    assert!(sent[0].verify().is_ok());
    assert_eq!(
        Some(sent[0].message.recent_blockhash),
        *network.blockhash.lock().unwrap()
    );
    assert_eq!(
        *network.confirmed.lock().unwrap(),
        vec![(signature, LAST_VALID_BLOCK_HEIGHT)]
    );
}

#[tokio::test]
async fn confirmation_failure_keeps_the_signature() {
    let network = Arc::new(FakeNetwork {
        confirm_failure: Some(RawFailure::message(
            "Signature has expired: block height exceeded",
        )),
        ..FakeNetwork::default()
    });
    let err = submitter(&network, wallet(None))
        .execute(&[submit_report_ix(None)], &[])
        .await
        .unwrap_err();

    let sent = network.sent();
    assert_eq!(sent.len(), 1);
    let broadcast = sent[0].signatures[0].to_string();
    assert_eq!(err.tx_signature(), Some(broadcast.as_str()));
    assert_eq!(err.code(), ErrorCode::Unknown);
    assert!(err.message().contains(&broadcast));
    assert!(err.message().ends_with("block height exceeded"));
}

#[tokio::test]
async fn confirmation_rpc_outage_is_classified_from_the_failure() {
    let network = Arc::new(FakeNetwork {
        confirm_failure: Some(RawFailure::message("503 Service Unavailable")),
        ..FakeNetwork::default()
    });
    let err = submitter(&network, wallet(None))
        .execute(&[submit_report_ix(None)], &[])
        .await
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::RpcError);
    assert!(err.tx_signature().is_some());
}

#[tokio::test]
async fn disconnected_wallet_never_reaches_the_network() {
    let network = Arc::new(FakeNetwork::default());
    let err = submitter(&network, Arc::new(DisconnectedWallet))
        .execute(&[submit_report_ix(None)], &[])
        .await
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::WalletNotConnected);
    assert_eq!(network.blockhash_calls(), 0);
    assert!(network.sent().is_empty());
}

#[tokio::test]
async fn extra_signers_sign_alongside_the_wallet() {
    let network = Arc::new(FakeNetwork::default());
    let bounty = Keypair::new();
    let signature = submitter(&network, wallet(None))
        .execute(&[submit_report_ix(Some(bounty.pubkey()))], &[&bounty])
        .await
        .unwrap();

    let sent = network.sent();
    assert_eq!(sent[0].signatures.len(), 2);
    assert_eq!(sent[0].signatures[0], signature);
    assert!(sent[0].is_signed());
    assert!(sent[0].message.account_keys.contains(&bounty.pubkey()));
}

#[tokio::test]
async fn every_submission_broadcasts_once() {
    let network = Arc::new(FakeNetwork::default());
    let submitter = submitter(&network, wallet(None));
    for _ in 0..5 {
        submitter
            .execute(&[submit_report_ix(None)], &[])
            .await
            .unwrap();
    }
    assert_eq!(network.blockhash_calls(), 5);
    assert_eq!(network.sent().len(), 5);
}

#[tokio::test]
async fn certain_injection_blocks_every_submission() {
    let network = Arc::new(FakeNetwork::default());
    let injector = FaultInjector::new(InjectorConfig {
        mock_mode: true,
        probability: 1.0,
        seed: Some(42),
    })
    .unwrap();
    let submitter = submitter(&network, wallet(None)).with_fault_injector(injector);

    for _ in 0..100 {
        let err = submitter
            .execute(&[submit_report_ix(None)], &[])
            .await
            .unwrap_err();
        assert_eq!(err.retryable(), err.code().is_retryable());
        assert!(err.tx_signature().unwrap().starts_with("mock"));
    }
    assert_eq!(network.blockhash_calls(), 0);
}
