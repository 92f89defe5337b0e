use crate::solana::jupiter::SOL_MINT;
use crate::solana::{keypair_from_base58, parse_pubkey};
use crate::storage::db;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::debug;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_request::TokenAccountsFilter;
use solana_sdk::message::VersionedMessage;
use solana_sdk::signature::Keypair;
use solana_sdk::transaction::VersionedTransaction;
use sqlx::PgPool;
use std::sync::Arc;

/// Custody collaborator. The core never touches key material directly:
/// it asks for the user's address, live holdings, and signatures.
#[async_trait]
pub trait WalletStore: Send + Sync {
    async fn address(&self, user_id: i64) -> Result<String>;

    /// Current balance of `mint` in the token's smallest unit
    /// (lamports for SOL).
    async fn holdings(&self, user_id: i64, mint: &str) -> Result<u64>;

    async fn sign(&self, user_id: i64, message: VersionedMessage) -> Result<VersionedTransaction>;
}

/// Wallet store backed by the users table (base58 keypair column) and the
/// RPC node for live balances.
pub struct PgWalletStore {
    db_pool: Arc<PgPool>,
    solana_client: Arc<RpcClient>,
}

impl PgWalletStore {
    pub fn new(db_pool: Arc<PgPool>, solana_client: Arc<RpcClient>) -> Self {
        Self {
            db_pool,
            solana_client,
        }
    }

    async fn load_keypair(&self, user_id: i64) -> Result<Keypair> {
        let wallet = db::get_wallet(&self.db_pool, user_id).await?;
        let key_base58 = wallet
            .private_key
            .ok_or_else(|| anyhow!("No wallet on file for user {}", user_id))?;

        keypair_from_base58(&key_base58)
    }
}

#[async_trait]
impl WalletStore for PgWalletStore {
    async fn address(&self, user_id: i64) -> Result<String> {
        let wallet = db::get_wallet(&self.db_pool, user_id).await?;

        wallet
            .solana_address
            .ok_or_else(|| anyhow!("No wallet on file for user {}", user_id))
    }

    async fn holdings(&self, user_id: i64, mint: &str) -> Result<u64> {
        let owner = parse_pubkey(&self.address(user_id).await?)?;

        if mint == SOL_MINT {
            let lamports = self
                .solana_client
                .get_balance(&owner)
                .await
                .map_err(|e| anyhow!("Failed to get SOL balance: {}", e))?;
            return Ok(lamports);
        }

        let mint_pubkey = parse_pubkey(mint)?;
        let token_accounts = self
            .solana_client
            .get_token_accounts_by_owner(&owner, TokenAccountsFilter::Mint(mint_pubkey))
            .await
            .map_err(|e| anyhow!("Failed to get token accounts: {}", e))?;

        let mut total: u64 = 0;
        for keyed_account in token_accounts {
            let account_pubkey = parse_pubkey(&keyed_account.pubkey)?;
            if let Some(account) = self
                .solana_client
                .get_token_account(&account_pubkey)
                .await
                .map_err(|e| anyhow!("Failed to read token account: {}", e))?
            {
                total += account.token_amount.amount.parse::<u64>().unwrap_or(0);
            }
        }

        debug!("Holdings for {} of {}: {}", user_id, mint, total);
        Ok(total)
    }

    async fn sign(&self, user_id: i64, message: VersionedMessage) -> Result<VersionedTransaction> {
        let keypair = self.load_keypair(user_id).await?;

        VersionedTransaction::try_new(message, &[&keypair])
            .map_err(|e| anyhow!("Failed to sign transaction: {}", e))
    }
}
