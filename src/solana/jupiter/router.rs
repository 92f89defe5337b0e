use crate::entity::QuoteError;
use crate::solana::jupiter::models::{
    PrioritizationFeeLamports, QuoteResponse, SwapRequest, SwapResponse,
};
use crate::solana::jupiter::Config;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use base64::prelude::{Engine, BASE64_STANDARD};
use log::{debug, info};
use reqwest::Client;
use solana_sdk::transaction::VersionedTransaction;

/// A built but unsigned swap transaction.
pub struct UnsignedSwapTx {
    pub transaction: VersionedTransaction,
    pub last_valid_block_height: u64,
}

/// Liquidity-routing collaborator: finds a route between two tokens and
/// turns a chosen route into an unsigned transaction.
#[async_trait]
pub trait SwapRouter: Send + Sync {
    async fn quote(
        &self,
        input_mint: &str,
        output_mint: &str,
        amount: u64,
        slippage_bps: u16,
    ) -> Result<QuoteResponse, QuoteError>;

    async fn build_tx(
        &self,
        route: &QuoteResponse,
        user_public_key: &str,
        priority_fee_lamports: u64,
    ) -> Result<UnsignedSwapTx>;
}

/// Router implementation over the Jupiter v6 HTTP API.
pub struct JupiterRouter {
    http_client: Client,
    config: Config,
}

impl JupiterRouter {
    pub fn new(config: Config) -> Self {
        Self {
            http_client: Client::new(),
            config,
        }
    }
}

#[async_trait]
impl SwapRouter for JupiterRouter {
    async fn quote(
        &self,
        input_mint: &str,
        output_mint: &str,
        amount: u64,
        slippage_bps: u16,
    ) -> Result<QuoteResponse, QuoteError> {
        let url = format!(
            "{}/quote?inputMint={}&outputMint={}&amount={}&slippageBps={}",
            self.config.quote_api_url, input_mint, output_mint, amount, slippage_bps
        );

        debug!("Requesting quote: {}", url);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| QuoteError::RouterUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            if body.contains("COULD_NOT_FIND_ANY_ROUTE") || status.as_u16() == 400 {
                return Err(QuoteError::NoRoute);
            }
            return Err(QuoteError::RouterUnavailable(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let quote: QuoteResponse = response
            .json()
            .await
            .map_err(|e| QuoteError::RouterUnavailable(format!("bad quote body: {}", e)))?;

        info!(
            "Quote received: in={} out={} impact={}",
            quote.in_amount, quote.out_amount, quote.price_impact_pct
        );

        Ok(quote)
    }

    async fn build_tx(
        &self,
        route: &QuoteResponse,
        user_public_key: &str,
        priority_fee_lamports: u64,
    ) -> Result<UnsignedSwapTx> {
        let url = format!("{}/swap", self.config.quote_api_url);

        let request = SwapRequest {
            user_public_key: user_public_key.to_string(),
            wrap_and_unwrap_sol: true,
            prioritization_fee_lamports: PrioritizationFeeLamports::Exact {
                lamports: priority_fee_lamports,
            },
            quote_response: route.clone(),
        };

        let response = self
            .http_client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| anyhow!("Swap request failed: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Swap endpoint returned {}: {}", status, body));
        }

        let swap: SwapResponse = response
            .json()
            .await
            .map_err(|e| anyhow!("Failed to parse swap response: {}", e))?;

        let tx_bytes = BASE64_STANDARD
            .decode(&swap.swap_transaction)
            .map_err(|e| anyhow!("Failed to decode swap transaction: {}", e))?;

        let transaction: VersionedTransaction = bincode::deserialize(&tx_bytes)
            .map_err(|e| anyhow!("Failed to deserialize transaction: {}", e))?;

        info!(
            "Swap transaction built: {} bytes, valid until block {}",
            tx_bytes.len(),
            swap.last_valid_block_height
        );

        Ok(UnsignedSwapTx {
            transaction,
            last_valid_block_height: swap.last_valid_block_height,
        })
    }
}
