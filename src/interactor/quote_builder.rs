use crate::entity::{QuoteError, SwapQuote, TradeIntent, TradeSide};
use crate::solana::custody::WalletStore;
use crate::solana::jupiter::{SwapRouter, SOL_MINT};
use log::info;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::sync::Arc;

const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Builds the frozen swap parameters for a confirmed intent. Called only
/// at confirmation time: holdings and routes are fetched live at that
/// instant, never cached across the confirmation gap.
pub struct QuoteBuilder {
    router: Arc<dyn SwapRouter>,
    wallet: Arc<dyn WalletStore>,
}

impl QuoteBuilder {
    pub fn new(router: Arc<dyn SwapRouter>, wallet: Arc<dyn WalletStore>) -> Self {
        Self { router, wallet }
    }

    pub async fn build(&self, user_id: i64, intent: &TradeIntent) -> Result<SwapQuote, QuoteError> {
        let (side, amount) = match (intent.side, intent.amount) {
            (Some(side), Some(amount)) => (side, amount),
            _ => return Err(QuoteError::IncompleteIntent),
        };
        let config = &intent.config;

        let (input_mint, output_mint, in_amount, slippage) = match side {
            TradeSide::Buy => {
                let lamports = (amount * Decimal::from(LAMPORTS_PER_SOL))
                    .to_u64()
                    .unwrap_or(0);
                if lamports == 0 {
                    return Err(QuoteError::AmountTooSmall);
                }
                (
                    SOL_MINT.to_string(),
                    intent.asset.mint.clone(),
                    lamports,
                    config.slippage_buy,
                )
            }
            TradeSide::Sell => {
                // Holdings are read at quote time; the balance shown when
                // the preset was tapped may already be out of date.
                let holdings = self
                    .wallet
                    .holdings(user_id, &intent.asset.mint)
                    .await
                    .map_err(|e| QuoteError::WalletUnavailable(e.to_string()))?;

                if holdings == 0 {
                    return Err(QuoteError::NothingToSell);
                }

                let base_units = (amount * Decimal::from(holdings)).to_u64().unwrap_or(0);
                if base_units == 0 {
                    return Err(QuoteError::AmountTooSmall);
                }
                (
                    intent.asset.mint.clone(),
                    SOL_MINT.to_string(),
                    base_units,
                    config.slippage_sell,
                )
            }
        };

        let slippage_bps = (slippage * Decimal::from(10_000)).to_u16().unwrap_or(50);

        let route = self
            .router
            .quote(&input_mint, &output_mint, in_amount, slippage_bps)
            .await?;

        let max_impact = config.max_price_impact.to_f64().unwrap_or(0.0);
        if route.price_impact_pct > max_impact {
            return Err(QuoteError::PriceImpactExceeded {
                impact: route.price_impact_pct * 100.0,
                max: max_impact * 100.0,
            });
        }

        let out_amount: u64 = route.out_amount.parse().unwrap_or(0);
        if out_amount == 0 {
            return Err(QuoteError::NoRoute);
        }

        let min_out = (Decimal::from(out_amount) * (Decimal::ONE - slippage))
            .to_u64()
            .unwrap_or(0);

        info!(
            "Quote frozen for user {}: {} {} -> {} (min {}), impact {:.4}%",
            user_id,
            in_amount,
            input_mint,
            out_amount,
            min_out,
            route.price_impact_pct * 100.0
        );

        Ok(SwapQuote::new(
            input_mint,
            output_mint,
            in_amount,
            out_amount,
            min_out,
            slippage_bps,
            config.priority_fee_lamports(),
            route.price_impact_pct,
            route,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{AmountMode, UserTradeConfig};
    use crate::interactor::testutil::{asset, MockRouter, MockWallet};

    fn intent(side: TradeSide, amount: &str) -> TradeIntent {
        let mut intent = TradeIntent::new(asset(), UserTradeConfig::default());
        intent.select_amount(side, AmountMode::Custom, amount.parse().unwrap());
        intent
    }

    fn builder(router: Arc<MockRouter>, wallet: Arc<MockWallet>) -> QuoteBuilder {
        QuoteBuilder::new(router, wallet)
    }

    #[tokio::test]
    async fn buy_amount_converts_to_lamports() {
        let router = Arc::new(MockRouter::quoting(500_000, 0.001));
        let wallet = Arc::new(MockWallet::with_holdings(0));
        let quote = builder(router.clone(), wallet)
            .build(1, &intent(TradeSide::Buy, "2.5"))
            .await
            .unwrap();

        assert_eq!(quote.in_amount, 2_500_000_000);
        assert_eq!(quote.input_mint, SOL_MINT);
        assert_eq!(router.last_quote_request().2, 2_500_000_000);
    }

    #[tokio::test]
    async fn sell_fraction_quotes_against_live_holdings() {
        // 0.25 of 100 base units must quote exactly 25 units.
        let router = Arc::new(MockRouter::quoting(10, 0.001));
        let wallet = Arc::new(MockWallet::with_holdings(100));
        let quote = builder(router.clone(), wallet)
            .build(1, &intent(TradeSide::Sell, "0.25"))
            .await
            .unwrap();

        assert_eq!(quote.in_amount, 25);
        assert_eq!(quote.output_mint, SOL_MINT);
        assert_eq!(router.last_quote_request().2, 25);
    }

    #[tokio::test]
    async fn sell_with_no_holdings_is_rejected() {
        let router = Arc::new(MockRouter::quoting(10, 0.001));
        let wallet = Arc::new(MockWallet::with_holdings(0));
        let result = builder(router, wallet)
            .build(1, &intent(TradeSide::Sell, "0.5"))
            .await;

        assert!(matches!(result, Err(QuoteError::NothingToSell)));
    }

    #[tokio::test]
    async fn excessive_price_impact_is_rejected() {
        // Default ceiling is 0.25; the route reports 0.40.
        let router = Arc::new(MockRouter::quoting(500_000, 0.40));
        let wallet = Arc::new(MockWallet::with_holdings(0));
        let result = builder(router, wallet)
            .build(1, &intent(TradeSide::Buy, "1"))
            .await;

        assert!(matches!(
            result,
            Err(QuoteError::PriceImpactExceeded { .. })
        ));
    }

    #[tokio::test]
    async fn minimum_output_applies_the_slippage_bound() {
        // slippage_buy default is 0.1, so min_out = out * 0.9
        let router = Arc::new(MockRouter::quoting(1_000, 0.001));
        let wallet = Arc::new(MockWallet::with_holdings(0));
        let quote = builder(router, wallet)
            .build(1, &intent(TradeSide::Buy, "1"))
            .await
            .unwrap();

        assert_eq!(quote.out_amount, 1_000);
        assert_eq!(quote.min_out_amount, 900);
    }

    #[tokio::test]
    async fn incomplete_intent_cannot_be_quoted() {
        let router = Arc::new(MockRouter::quoting(10, 0.001));
        let wallet = Arc::new(MockWallet::with_holdings(0));
        let bare = TradeIntent::new(asset(), UserTradeConfig::default());

        assert!(matches!(
            builder(router, wallet).build(1, &bare).await,
            Err(QuoteError::IncompleteIntent)
        ));
    }
}
