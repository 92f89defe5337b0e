pub mod tracker;

use crate::entity::{AssetInfo, ResolveError};
use async_trait::async_trait;

pub use tracker::{TrackerConfig, TrackerPriceLookup};

/// Market metadata collaborator. Given a mint address, returns a fresh
/// snapshot of the token's name, price, and recent price action.
#[async_trait]
pub trait PriceLookup: Send + Sync {
    async fn get(&self, mint: &str) -> Result<AssetInfo, ResolveError>;
}
