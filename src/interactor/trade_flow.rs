use crate::entity::{
    parse_buy_amount, parse_sell_percent, Action, AmountMode, IntentState, PresetSlot, SwapError,
    SwapOutcome, TradeIntent, TradeSide,
};
use crate::interactor::quote_builder::QuoteBuilder;
use crate::interactor::resolver::AssetResolver;
use crate::interactor::swap_engine::SwapEngine;
use crate::session::{Session, SessionStore};
use crate::storage::{ConfigStore, TradeHistory};
use crate::view::TradeView;
use anyhow::Result;
use log::{debug, info};
use std::sync::Arc;
use tokio::sync::OwnedMutexGuard;

/// The intent state machine. Both entry points take the user's session lock
/// first and hold it for the whole event, so a user's events are strictly
/// serialized — including the span from confirmation through execution.
pub struct TradeFlow {
    sessions: Arc<SessionStore>,
    resolver: AssetResolver,
    config_store: Arc<dyn ConfigStore>,
    quotes: QuoteBuilder,
    engine: SwapEngine,
    history: Arc<dyn TradeHistory>,
}

impl TradeFlow {
    pub fn new(
        sessions: Arc<SessionStore>,
        resolver: AssetResolver,
        config_store: Arc<dyn ConfigStore>,
        quotes: QuoteBuilder,
        engine: SwapEngine,
        history: Arc<dyn TradeHistory>,
    ) -> Self {
        Self {
            sessions,
            resolver,
            config_store,
            quotes,
            engine,
            history,
        }
    }

    /// Plain-text message: either the custom amount a prompt is waiting
    /// for, or a candidate asset identifier.
    pub async fn on_text(&self, user_id: i64, text: &str, view: &dyn TradeView) -> Result<()> {
        let mut session = self.sessions.lock(user_id).await;

        if let Some(intent) = session.intent.as_mut() {
            match intent.state {
                IntentState::AwaitingCustomAmount => {
                    return Self::apply_custom_amount(intent, text, view).await;
                }
                IntentState::Executing => {
                    view.show_error("A trade is executing. Wait for it to finish.")
                        .await?;
                    return Ok(());
                }
                // Any other pending intent is implicitly abandoned by a
                // new asset paste.
                _ => {}
            }
        }

        match self.resolver.resolve(text).await {
            Ok(asset) => {
                let config = self.config_store.get(user_id).await?;
                info!("User {} opened a trade for {}", user_id, asset.symbol);
                view.show_asset_card(&asset, &config).await?;
                session.intent = Some(TradeIntent::new(asset, config));
            }
            Err(crate::entity::ResolveError::NotAnAddress) => {
                debug!("User {} sent unrecognized text", user_id);
                view.show_unrecognized().await?;
            }
            Err(e) => view.show_error(&e.to_string()).await?,
        }

        Ok(())
    }

    /// Button press, already decoded at the router boundary.
    pub async fn on_action(&self, user_id: i64, action: Action, view: &dyn TradeView) -> Result<()> {
        let mut session = self.sessions.lock(user_id).await;

        match action {
            Action::Preset(side, slot) => Self::select_preset(&mut session, side, slot, view).await,
            Action::Custom(side) => Self::start_custom(&mut session, side, view).await,
            Action::Confirm => self.confirm(user_id, &mut session, view).await,
            Action::Cancel => Self::cancel(&mut session, view).await,
            Action::Close => Self::close(&mut session, view).await,
        }
    }

    async fn apply_custom_amount(
        intent: &mut TradeIntent,
        text: &str,
        view: &dyn TradeView,
    ) -> Result<()> {
        let side = match intent.side {
            Some(side) => side,
            None => return Ok(()),
        };

        let parsed = match side {
            TradeSide::Buy => parse_buy_amount(text),
            TradeSide::Sell => parse_sell_percent(text),
        };

        match parsed {
            Ok(amount) => {
                intent.select_amount(side, AmountMode::Custom, amount);
                view.prompt_confirmation(intent).await?;
            }
            // Recoverable: the prompt stays open.
            Err(e) => view.show_error(&e.to_string()).await?,
        }

        Ok(())
    }

    async fn select_preset(
        session: &mut OwnedMutexGuard<Session>,
        side: TradeSide,
        slot: PresetSlot,
        view: &dyn TradeView,
    ) -> Result<()> {
        let intent = match session.intent.as_mut() {
            Some(intent)
                if matches!(
                    intent.state,
                    IntentState::AwaitingAmount | IntentState::AwaitingCustomAmount
                ) =>
            {
                intent
            }
            _ => {
                view.show_error("No active trade. Paste a token address first.")
                    .await?;
                return Ok(());
            }
        };

        let amount = match (side, slot) {
            (TradeSide::Buy, PresetSlot::Left) => intent.config.buy_left,
            (TradeSide::Buy, PresetSlot::Right) => intent.config.buy_right,
            (TradeSide::Sell, PresetSlot::Left) => intent.config.sell_left,
            (TradeSide::Sell, PresetSlot::Right) => intent.config.sell_right,
        };

        let mode = match slot {
            PresetSlot::Left => AmountMode::PresetLeft,
            PresetSlot::Right => AmountMode::PresetRight,
        };

        intent.select_amount(side, mode, amount);
        view.prompt_confirmation(intent).await?;

        Ok(())
    }

    async fn start_custom(
        session: &mut OwnedMutexGuard<Session>,
        side: TradeSide,
        view: &dyn TradeView,
    ) -> Result<()> {
        match session.intent.as_mut() {
            Some(intent) if !intent.state.is_terminal() && intent.state != IntentState::Executing => {
                intent.request_custom_amount(side);
                view.prompt_custom_amount(side).await?;
            }
            _ => {
                view.show_error("No active trade. Paste a token address first.")
                    .await?;
            }
        }

        Ok(())
    }

    /// Confirmation runs the whole quote-and-execute pipeline under the
    /// session lock. A second confirm therefore queues behind the first
    /// and finds the intent already gone.
    async fn confirm(
        &self,
        user_id: i64,
        session: &mut OwnedMutexGuard<Session>,
        view: &dyn TradeView,
    ) -> Result<()> {
        let intent = match session.intent.as_mut() {
            Some(intent) if intent.state == IntentState::AwaitingConfirmation => intent,
            _ => {
                view.show_error("No active confirmation.").await?;
                return Ok(());
            }
        };

        intent.state = IntentState::Executing;
        view.show_executing(intent).await?;

        // The quote is built now, never earlier: holdings and routes must
        // reflect the moment of confirmation.
        let quote = match self.quotes.build(user_id, intent).await {
            Ok(quote) => quote,
            Err(e) => {
                // Recoverable: nothing was signed or submitted.
                intent.state = IntentState::AwaitingConfirmation;
                view.show_error(&e.to_string()).await?;
                return Ok(());
            }
        };

        match self.engine.execute(user_id, &quote).await {
            Ok(report) => {
                intent.state = if report.outcome.is_success() {
                    IntentState::Completed
                } else {
                    IntentState::Failed
                };
                self.history.record(user_id, intent, &report.outcome).await;
                view.show_report(intent, &report).await?;
                session.clear();
            }
            Err(SwapError::StaleQuote(age)) => {
                debug!("Quote for user {} went stale after {}s", user_id, age);
                intent.state = IntentState::AwaitingConfirmation;
                view.show_error("The quote expired. Confirm again to retry with fresh pricing.")
                    .await?;
            }
            Err(e) => {
                intent.state = IntentState::Failed;
                let outcome = SwapOutcome::NotSubmitted {
                    reason: e.to_string(),
                };
                self.history.record(user_id, intent, &outcome).await;
                view.show_error(&e.to_string()).await?;
                session.clear();
            }
        }

        Ok(())
    }

    async fn cancel(session: &mut OwnedMutexGuard<Session>, view: &dyn TradeView) -> Result<()> {
        match session.intent.as_mut() {
            Some(intent) if intent.state == IntentState::Executing => {
                view.show_error("Cannot cancel: the trade is already executing.")
                    .await?;
            }
            Some(intent) => {
                intent.state = IntentState::Cancelled;
                session.clear();
                view.show_cancelled().await?;
            }
            None => {
                view.show_error("Nothing to cancel.").await?;
            }
        }

        Ok(())
    }

    async fn close(session: &mut OwnedMutexGuard<Session>, view: &dyn TradeView) -> Result<()> {
        match session.intent.as_ref() {
            Some(intent) if intent.state == IntentState::Executing => {
                view.show_error("Cannot close: the trade is already executing.")
                    .await?;
            }
            _ => session.clear(),
        }

        Ok(())
    }
}
