use crate::entity::{AssetInfo, ResolveError};
use crate::market::PriceLookup;
use async_trait::async_trait;
use log::{debug, error};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::env;

/// Endpoint and key for the token-data API.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    pub base_url: String,
    pub api_key: Option<String>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://data.solanatracker.io".to_string(),
            api_key: None,
        }
    }
}

impl TrackerConfig {
    pub fn from_env() -> Self {
        Self {
            base_url: env::var("TRACKER_API_URL")
                .unwrap_or_else(|_| "https://data.solanatracker.io".to_string()),
            api_key: env::var("TRACKER_API_KEY").ok(),
        }
    }
}

// Wire models for the /tokens/{mint} endpoint. Only the fields the bot
// renders are decoded.

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: TokenMeta,
    #[serde(default)]
    pools: Vec<Pool>,
    events: Option<EventWindows>,
}

#[derive(Debug, Deserialize)]
struct TokenMeta {
    name: String,
    symbol: String,
    #[serde(default = "default_decimals")]
    decimals: u8,
    image: Option<String>,
}

fn default_decimals() -> u8 {
    9
}

#[derive(Debug, Deserialize)]
struct Pool {
    price: UsdFigure,
    #[serde(rename = "marketCap")]
    market_cap: Option<UsdFigure>,
}

#[derive(Debug, Deserialize)]
struct UsdFigure {
    #[serde(default)]
    usd: f64,
}

#[derive(Debug, Deserialize, Default)]
struct EventWindows {
    #[serde(rename = "5m")]
    five_min: Option<Window>,
    #[serde(rename = "1h")]
    one_hour: Option<Window>,
    #[serde(rename = "6h")]
    six_hours: Option<Window>,
    #[serde(rename = "24h")]
    one_day: Option<Window>,
}

#[derive(Debug, Deserialize, Default)]
struct Window {
    #[serde(rename = "priceChangePercentage", default)]
    price_change_percentage: f64,
}

/// Price lookup backed by a SolanaTracker-compatible data API.
pub struct TrackerPriceLookup {
    http_client: Client,
    config: TrackerConfig,
}

impl TrackerPriceLookup {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            http_client: Client::new(),
            config,
        }
    }
}

#[async_trait]
impl PriceLookup for TrackerPriceLookup {
    async fn get(&self, mint: &str) -> Result<AssetInfo, ResolveError> {
        let url = format!("{}/tokens/{}", self.config.base_url, mint);
        debug!("Fetching token data from {}", url);

        let mut request = self.http_client.get(&url);
        if let Some(key) = &self.config.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ResolveError::LookupFailed(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ResolveError::UnknownAsset);
        }

        if !response.status().is_success() {
            let status = response.status();
            error!("Token data API returned {} for {}", status, mint);
            return Err(ResolveError::LookupFailed(format!("HTTP {}", status)));
        }

        let payload: TokenResponse = response
            .json()
            .await
            .map_err(|e| ResolveError::LookupFailed(format!("bad response body: {}", e)))?;

        // A token without a pool has no price; treat it as unknown rather
        // than rendering a zero-priced card.
        let pool = payload.pools.first().ok_or(ResolveError::UnknownAsset)?;
        let events = payload.events.unwrap_or_default();

        let change = |w: &Option<Window>| w.as_ref().map_or(0.0, |w| w.price_change_percentage);

        Ok(AssetInfo {
            mint: mint.to_string(),
            symbol: payload.token.symbol,
            name: payload.token.name,
            decimals: payload.token.decimals,
            price_usd: pool.price.usd,
            market_cap_usd: pool.market_cap.as_ref().map_or(0.0, |m| m.usd),
            change_5m: change(&events.five_min),
            change_1h: change(&events.one_hour),
            change_6h: change(&events.six_hours),
            change_24h: change(&events.one_day),
            image_url: payload.token.image,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_a_token_payload() {
        let json = r#"{
            "token": {"name": "Example", "symbol": "EXM", "decimals": 6, "image": null},
            "pools": [{"price": {"usd": 0.042}, "marketCap": {"usd": 1200000.0}}],
            "events": {
                "5m": {"priceChangePercentage": -1.2},
                "1h": {"priceChangePercentage": 3.4},
                "24h": {"priceChangePercentage": 10.0}
            }
        }"#;

        let payload: TokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(payload.token.symbol, "EXM");
        assert_eq!(payload.pools[0].price.usd, 0.042);
        assert_eq!(
            payload
                .events
                .unwrap()
                .five_min
                .unwrap()
                .price_change_percentage,
            -1.2
        );
    }

    #[test]
    fn tolerates_missing_windows_and_market_cap() {
        let json = r#"{
            "token": {"name": "Bare", "symbol": "BARE"},
            "pools": [{"price": {"usd": 1.0}}]
        }"#;

        let payload: TokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(payload.token.decimals, 9);
        assert!(payload.events.is_none());
    }
}
