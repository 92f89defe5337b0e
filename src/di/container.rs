use std::sync::Arc;

use solana_client::nonblocking::rpc_client::RpcClient;
use sqlx::PgPool;

use crate::interactor::{AssetResolver, EngineSettings, QuoteBuilder, SwapEngine, TradeFlow};
use crate::market::{PriceLookup, TrackerConfig, TrackerPriceLookup};
use crate::session::SessionStore;
use crate::solana::custody::{PgWalletStore, WalletStore};
use crate::solana::jupiter::{Config as JupiterConfig, JupiterRouter, SwapRouter};
use crate::solana::ledger::{Ledger, RpcLedger};
use crate::storage::{ConfigStore, PgConfigStore, PgTradeHistory, TradeHistory};

/// Wires the collaborators together and exposes what the router needs.
pub struct ServiceContainer {
    trade_flow: Arc<TradeFlow>,
}

impl ServiceContainer {
    pub fn new(db_pool: Arc<PgPool>, solana_client: Arc<RpcClient>) -> Self {
        let price_lookup: Arc<dyn PriceLookup> =
            Arc::new(TrackerPriceLookup::new(TrackerConfig::from_env()));
        let resolver = AssetResolver::new(price_lookup);

        let config_store: Arc<dyn ConfigStore> = Arc::new(PgConfigStore::new(db_pool.clone()));
        let wallet: Arc<dyn WalletStore> =
            Arc::new(PgWalletStore::new(db_pool.clone(), solana_client.clone()));
        let ledger: Arc<dyn Ledger> = Arc::new(RpcLedger::new(solana_client));
        let swap_router: Arc<dyn SwapRouter> =
            Arc::new(JupiterRouter::new(JupiterConfig::from_env()));

        let quotes = QuoteBuilder::new(swap_router.clone(), wallet.clone());
        let engine = SwapEngine::new(
            swap_router,
            wallet,
            ledger,
            EngineSettings::default(),
        );
        let history: Arc<dyn TradeHistory> = Arc::new(PgTradeHistory::new(db_pool));

        let trade_flow = Arc::new(TradeFlow::new(
            Arc::new(SessionStore::new()),
            resolver,
            config_store,
            quotes,
            engine,
            history,
        ));

        Self { trade_flow }
    }

    pub fn trade_flow(&self) -> Arc<TradeFlow> {
        self.trade_flow.clone()
    }
}
