//! Telegram trading bot for Solana - main executable.
//!
//! Users paste a token address or marketplace link into the chat, pick a
//! buy/sell amount from preset buttons, confirm, and the bot routes the
//! swap through Jupiter and reports the on-chain outcome.
use anyhow::Context;
use dotenv::dotenv;
use log::{error, info};
use solana_swap_bot::{create_solana_client, ServiceContainer, TelegramRouter};
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::sync::Arc;
use teloxide::{dptree, Bot};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    info!("Starting Solana swap bot v{}", solana_swap_bot::VERSION);

    let bot_token = env::var("TELEGRAM_BOT_TOKEN")
        .context("TELEGRAM_BOT_TOKEN must be set in environment variables")?;

    let database_url =
        env::var("DATABASE_URL").context("DATABASE_URL must be set in environment variables")?;

    let solana_rpc_url = env::var("SOLANA_RPC_URL")
        .context("SOLANA_RPC_URL must be set in environment variables")?;

    let bot = Bot::new(bot_token);

    info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await
        .context("Failed to create database connection pool")?;
    let db_pool = Arc::new(db_pool);

    info!("Running database migrations...");
    if let Err(e) = sqlx::migrate!("./migrations").run(db_pool.as_ref()).await {
        error!("Failed to run migrations: {}", e);
        return Err(anyhow::Error::from(e));
    }

    info!("Connecting to Solana network...");
    let solana_client =
        create_solana_client(&solana_rpc_url).context("Failed to create Solana client")?;

    let services = Arc::new(ServiceContainer::new(db_pool, solana_client));
    let router = TelegramRouter::new(services.clone());
    let handler = router.setup_handlers();

    let mut dispatcher = teloxide::dispatching::Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![services])
        .enable_ctrlc_handler()
        .build();

    info!("Bot is running! Press Ctrl+C to stop.");
    dispatcher.dispatch().await;

    Ok(())
}
