pub mod db;

use crate::entity::{SwapOutcome, TradeIntent, UserTradeConfig};
use anyhow::Result;
use async_trait::async_trait;
use log::warn;
use sqlx::PgPool;
use std::sync::Arc;

/// Read-only access to a user's trade settings. The core fetches one
/// snapshot per intent and never writes back.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    async fn get(&self, user_id: i64) -> Result<UserTradeConfig>;
}

/// Records finished trades in the trades table.
#[async_trait]
pub trait TradeHistory: Send + Sync {
    async fn record(&self, user_id: i64, intent: &TradeIntent, outcome: &SwapOutcome);
}

pub struct PgConfigStore {
    db_pool: Arc<PgPool>,
}

impl PgConfigStore {
    pub fn new(db_pool: Arc<PgPool>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl ConfigStore for PgConfigStore {
    async fn get(&self, user_id: i64) -> Result<UserTradeConfig> {
        if let Some(config) = db::get_trade_config(&self.db_pool, user_id).await? {
            return Ok(config);
        }

        // First contact: seed the defaults, then read them back.
        db::insert_default_config(&self.db_pool, user_id).await?;
        match db::get_trade_config(&self.db_pool, user_id).await? {
            Some(config) => Ok(config),
            None => Ok(UserTradeConfig::default()),
        }
    }
}

pub struct PgTradeHistory {
    db_pool: Arc<PgPool>,
}

impl PgTradeHistory {
    pub fn new(db_pool: Arc<PgPool>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl TradeHistory for PgTradeHistory {
    async fn record(&self, user_id: i64, intent: &TradeIntent, outcome: &SwapOutcome) {
        let side = match intent.side {
            Some(side) => side.to_string().to_uppercase(),
            None => return,
        };
        let amount = intent.amount.unwrap_or_default();
        let signature = outcome.signature().map(|s| s.to_string());
        let status = match outcome {
            SwapOutcome::Confirmed { .. } => "SUCCESS",
            SwapOutcome::Expired { .. } => "EXPIRED",
            SwapOutcome::Failed { .. }
            | SwapOutcome::SubmissionExhausted { .. }
            | SwapOutcome::NotSubmitted { .. } => "FAILED",
        };

        // History is best-effort bookkeeping; a write failure must not mask
        // the trade outcome the user is waiting on.
        if let Err(e) = db::record_trade(
            &self.db_pool,
            user_id,
            &intent.asset.mint,
            &intent.asset.symbol,
            &side,
            amount,
            signature.as_deref(),
            status,
        )
        .await
        {
            warn!("Failed to record trade for user {}: {}", user_id, e);
        }
    }
}
