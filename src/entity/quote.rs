use crate::solana::jupiter::models::QuoteResponse;
use std::time::{Duration, Instant};

/// Swap parameters frozen at confirmation time. A quote is never recomputed
/// or patched after it is built; if it sits past the freshness window it is
/// rejected by the engine and must be rebuilt from live state.
#[derive(Debug, Clone)]
pub struct SwapQuote {
    pub input_mint: String,
    pub output_mint: String,
    /// Exact input in the input token's smallest unit
    pub in_amount: u64,
    /// Expected output in the output token's smallest unit
    pub out_amount: u64,
    /// Floor enforced on-chain: expected output reduced by the slippage bound
    pub min_out_amount: u64,
    pub slippage_bps: u16,
    pub priority_fee_lamports: u64,
    /// Estimated price impact as a fraction (0.01 = 1%)
    pub price_impact: f64,
    /// Raw route payload handed back to the swap endpoint unchanged
    pub route: QuoteResponse,
    built_at: Instant,
}

impl SwapQuote {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        input_mint: String,
        output_mint: String,
        in_amount: u64,
        out_amount: u64,
        min_out_amount: u64,
        slippage_bps: u16,
        priority_fee_lamports: u64,
        price_impact: f64,
        route: QuoteResponse,
    ) -> Self {
        Self {
            input_mint,
            output_mint,
            in_amount,
            out_amount,
            min_out_amount,
            slippage_bps,
            priority_fee_lamports,
            price_impact,
            route,
            built_at: Instant::now(),
        }
    }

    pub fn age(&self) -> Duration {
        self.built_at.elapsed()
    }

    pub fn is_fresh(&self, window: Duration) -> bool {
        self.age() <= window
    }
}
