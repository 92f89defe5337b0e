use serde::{Deserialize, Serialize};

/// Market snapshot for a tradable token. Built once per resolution and
/// never mutated; a fresh card means a fresh lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetInfo {
    /// Mint (contract) address
    pub mint: String,
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
    pub price_usd: f64,
    pub market_cap_usd: f64,
    pub change_5m: f64,
    pub change_1h: f64,
    pub change_6h: f64,
    pub change_24h: f64,
    pub image_url: Option<String>,
}
