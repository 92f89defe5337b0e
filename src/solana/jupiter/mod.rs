pub mod models;
pub mod router;

pub use models::{QuoteResponse, SOL_MINT};
pub use router::{JupiterRouter, SwapRouter, UnsignedSwapTx};

/// Jupiter endpoint configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub quote_api_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            quote_api_url: "https://quote-api.jup.ag/v6".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        use std::env;

        Self {
            quote_api_url: env::var("QUOTE_API_URL")
                .unwrap_or_else(|_| "https://quote-api.jup.ag/v6".to_string()),
        }
    }
}
