use crate::entity::{PriorityLevel, UserTradeConfig};
use chrono::Utc;
use log::info;
use rust_decimal::Decimal;
use sqlx::{Error as SqlxError, PgPool, Row};

/// Wallet columns for one user.
pub struct WalletRow {
    pub solana_address: Option<String>,
    pub private_key: Option<String>,
}

pub async fn get_wallet(pool: &PgPool, telegram_id: i64) -> Result<WalletRow, SqlxError> {
    let row = sqlx::query("SELECT solana_address, private_key FROM users WHERE telegram_id = $1")
        .bind(telegram_id)
        .fetch_one(pool)
        .await?;

    Ok(WalletRow {
        solana_address: row.try_get("solana_address")?,
        private_key: row.try_get("private_key")?,
    })
}

pub async fn get_trade_config(
    pool: &PgPool,
    telegram_id: i64,
) -> Result<Option<UserTradeConfig>, SqlxError> {
    let row = sqlx::query("SELECT * FROM user_config WHERE telegram_id = $1")
        .bind(telegram_id)
        .fetch_optional(pool)
        .await?;

    let row = match row {
        Some(row) => row,
        None => return Ok(None),
    };

    let priority: String = row.try_get("transaction_priority")?;

    Ok(Some(UserTradeConfig {
        buy_left: row.try_get("buy_left")?,
        buy_right: row.try_get("buy_right")?,
        sell_left: row.try_get("sell_left")?,
        sell_right: row.try_get("sell_right")?,
        slippage_buy: row.try_get("slippage_buy")?,
        slippage_sell: row.try_get("slippage_sell")?,
        max_price_impact: row.try_get("max_price_impact")?,
        priority: priority.parse().unwrap_or(PriorityLevel::Medium),
        tp_medium: row.try_get("tp_medium")?,
        tp_high: row.try_get("tp_high")?,
        tp_very_high: row.try_get("tp_very_high")?,
    }))
}

/// Seeds the default settings row for a new user.
pub async fn insert_default_config(pool: &PgPool, telegram_id: i64) -> Result<(), SqlxError> {
    let defaults = UserTradeConfig::default();

    sqlx::query(
        "INSERT INTO user_config \
         (telegram_id, buy_left, buy_right, sell_left, sell_right, \
          slippage_buy, slippage_sell, max_price_impact, transaction_priority, \
          tp_medium, tp_high, tp_very_high) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
         ON CONFLICT (telegram_id) DO NOTHING",
    )
    .bind(telegram_id)
    .bind(defaults.buy_left)
    .bind(defaults.buy_right)
    .bind(defaults.sell_left)
    .bind(defaults.sell_right)
    .bind(defaults.slippage_buy)
    .bind(defaults.slippage_sell)
    .bind(defaults.max_price_impact)
    .bind(defaults.priority.to_string())
    .bind(defaults.tp_medium)
    .bind(defaults.tp_high)
    .bind(defaults.tp_very_high)
    .execute(pool)
    .await?;

    info!("Seeded default trade config for user {}", telegram_id);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub async fn record_trade(
    pool: &PgPool,
    telegram_id: i64,
    mint: &str,
    symbol: &str,
    side: &str,
    amount: Decimal,
    tx_signature: Option<&str>,
    status: &str,
) -> Result<(), SqlxError> {
    sqlx::query(
        "INSERT INTO trades \
         (telegram_id, mint, symbol, side, amount, tx_signature, status, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(telegram_id)
    .bind(mint)
    .bind(symbol)
    .bind(side)
    .bind(amount)
    .bind(tx_signature)
    .bind(status)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(())
}
