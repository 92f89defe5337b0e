use anyhow::{anyhow, Result};
use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::hash::Hash;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::VersionedTransaction;
use std::sync::Arc;

/// Observed state of a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxStatus {
    Pending,
    Confirmed,
    Failed(String),
}

/// Network collaborator: submits signed transactions and reports their
/// status. The blockhash is the freshness token a submission needs; it is
/// re-fetched on every retry.
#[async_trait]
pub trait Ledger: Send + Sync {
    async fn latest_blockhash(&self) -> Result<Hash>;
    async fn submit(&self, tx: &VersionedTransaction) -> Result<Signature>;
    async fn get_status(&self, signature: &Signature) -> Result<TxStatus>;
}

pub struct RpcLedger {
    client: Arc<RpcClient>,
}

impl RpcLedger {
    pub fn new(client: Arc<RpcClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Ledger for RpcLedger {
    async fn latest_blockhash(&self) -> Result<Hash> {
        self.client
            .get_latest_blockhash()
            .await
            .map_err(|e| anyhow!("Failed to fetch blockhash: {}", e))
    }

    async fn submit(&self, tx: &VersionedTransaction) -> Result<Signature> {
        self.client
            .send_transaction(tx)
            .await
            .map_err(|e| anyhow!("Failed to send transaction: {}", e))
    }

    async fn get_status(&self, signature: &Signature) -> Result<TxStatus> {
        let response = self
            .client
            .get_signature_statuses(&[*signature])
            .await
            .map_err(|e| anyhow!("Failed to fetch signature status: {}", e))?;

        let status = match response.value.into_iter().next().flatten() {
            Some(status) => status,
            // The node has not seen the signature yet.
            None => return Ok(TxStatus::Pending),
        };

        if let Some(err) = status.err {
            return Ok(TxStatus::Failed(err.to_string()));
        }

        if status.satisfies_commitment(CommitmentConfig::confirmed()) {
            Ok(TxStatus::Confirmed)
        } else {
            Ok(TxStatus::Pending)
        }
    }
}
