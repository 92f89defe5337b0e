pub mod quote_builder;
pub mod resolver;
pub mod swap_engine;
pub mod trade_flow;

#[cfg(test)]
pub mod testutil;

pub use quote_builder::QuoteBuilder;
pub use resolver::AssetResolver;
pub use swap_engine::{EngineSettings, SwapEngine};
pub use trade_flow::TradeFlow;
