use crate::entity::{AssetInfo, ResolveError};
use crate::market::PriceLookup;
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;
use std::sync::Arc;

lazy_static! {
    // Marketplace URLs that embed the mint as a trailing path segment.
    static ref URL_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"dexscreener\.com/solana/([1-9A-HJ-NP-Za-km-z]{32,44})").unwrap(),
        Regex::new(r"birdeye\.so/token/([1-9A-HJ-NP-Za-km-z]{32,44})").unwrap(),
        Regex::new(r"pump\.fun/(?:coin/)?([1-9A-HJ-NP-Za-km-z]{32,44})").unwrap(),
        Regex::new(r"solscan\.io/token/([1-9A-HJ-NP-Za-km-z]{32,44})").unwrap(),
        Regex::new(r"gmgn\.ai/sol/token/([1-9A-HJ-NP-Za-km-z]{32,44})").unwrap(),
    ];
}

/// Extracts a candidate mint address from free text: either a known
/// marketplace URL or the text itself, trimmed.
fn extract_address(raw: &str) -> &str {
    let trimmed = raw.trim();

    for pattern in URL_PATTERNS.iter() {
        if let Some(captures) = pattern.captures(trimmed) {
            if let Some(address) = captures.get(1) {
                return address.as_str();
            }
        }
    }

    trimmed
}

/// True for a canonical base58 Solana address (decodes to 32 bytes).
pub fn is_token_address(candidate: &str) -> bool {
    Pubkey::from_str(candidate).is_ok()
}

/// Turns free-form chat input into a tradable asset. Pure lookup — the
/// caller decides whether a successful resolution starts a new trade.
pub struct AssetResolver {
    price_lookup: Arc<dyn PriceLookup>,
}

impl AssetResolver {
    pub fn new(price_lookup: Arc<dyn PriceLookup>) -> Self {
        Self { price_lookup }
    }

    pub async fn resolve(&self, raw_text: &str) -> Result<AssetInfo, ResolveError> {
        let candidate = extract_address(raw_text);

        if !is_token_address(candidate) {
            return Err(ResolveError::NotAnAddress);
        }

        debug!("Resolving token {}", candidate);
        self.price_lookup.get(candidate).await
    }
}
