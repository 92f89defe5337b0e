use crate::entity::{
    Action, AssetInfo, ExecutionReport, PresetSlot, SwapOutcome, TradeIntent, TradeSide,
    UserTradeConfig,
};
use crate::utils::{format_number, shorten_address};
use anyhow::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;
use teloxide::{
    prelude::*,
    types::{InlineKeyboardButton, InlineKeyboardMarkup, ParseMode},
    Bot,
};

/// Everything the trade flow says back to the user. The flow never touches
/// the transport; swapping this out is how the state machine is tested.
#[async_trait]
pub trait TradeView: Send + Sync {
    async fn show_asset_card(&self, asset: &AssetInfo, config: &UserTradeConfig) -> Result<()>;
    async fn prompt_custom_amount(&self, side: TradeSide) -> Result<()>;
    async fn prompt_confirmation(&self, intent: &TradeIntent) -> Result<()>;
    async fn show_executing(&self, intent: &TradeIntent) -> Result<()>;
    async fn show_report(&self, intent: &TradeIntent, report: &ExecutionReport) -> Result<()>;
    async fn show_cancelled(&self) -> Result<()>;
    async fn show_unrecognized(&self) -> Result<()>;
    async fn show_error(&self, message: &str) -> Result<()>;
}

pub struct TelegramTradeView {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramTradeView {
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self { bot, chat_id }
    }
}

fn percent(fraction: Decimal) -> String {
    (fraction * Decimal::from(100)).normalize().to_string()
}

fn trade_keyboard(config: &UserTradeConfig) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![
            InlineKeyboardButton::callback(
                format!("Buy {} SOL", config.buy_left.normalize()),
                Action::Preset(TradeSide::Buy, PresetSlot::Left).as_callback(),
            ),
            InlineKeyboardButton::callback(
                "Buy X SOL",
                Action::Custom(TradeSide::Buy).as_callback(),
            ),
            InlineKeyboardButton::callback(
                format!("Buy {} SOL", config.buy_right.normalize()),
                Action::Preset(TradeSide::Buy, PresetSlot::Right).as_callback(),
            ),
        ],
        vec![
            InlineKeyboardButton::callback(
                format!("Sell {}%", percent(config.sell_left)),
                Action::Preset(TradeSide::Sell, PresetSlot::Left).as_callback(),
            ),
            InlineKeyboardButton::callback(
                "Sell X %",
                Action::Custom(TradeSide::Sell).as_callback(),
            ),
            InlineKeyboardButton::callback(
                format!("Sell {}%", percent(config.sell_right)),
                Action::Preset(TradeSide::Sell, PresetSlot::Right).as_callback(),
            ),
        ],
        vec![InlineKeyboardButton::callback(
            "Close",
            Action::Close.as_callback(),
        )],
    ])
}

fn confirm_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::callback("✅ Confirm", Action::Confirm.as_callback()),
        InlineKeyboardButton::callback("❌ Cancel", Action::Cancel.as_callback()),
    ]])
}

/// What the user agreed to, phrased per side: SOL spent on a buy, a share
/// of holdings on a sell.
fn describe_selection(intent: &TradeIntent) -> String {
    match (intent.side, intent.amount) {
        (Some(TradeSide::Buy), Some(amount)) => {
            format!("Buy {} for {} SOL", intent.asset.symbol, amount.normalize())
        }
        (Some(TradeSide::Sell), Some(amount)) => {
            format!("Sell {}% of your {}", percent(amount), intent.asset.symbol)
        }
        _ => format!("Trade {}", intent.asset.symbol),
    }
}

fn confirmation_text(intent: &TradeIntent) -> String {
    format!(
        "Please confirm: {}?\nToken: {}",
        describe_selection(intent),
        shorten_address(&intent.asset.mint),
    )
}

fn solscan_tx_link(signature: &str) -> String {
    format!("<a href=\"https://solscan.io/tx/{signature}\">View on Solscan</a>")
}

#[async_trait]
impl TradeView for TelegramTradeView {
    async fn show_asset_card(&self, asset: &AssetInfo, config: &UserTradeConfig) -> Result<()> {
        let text = format!(
            "🔎 <b>{} ({})</b>\n<code>{}</code>\n\n\
             💰 Price: ${}\n\
             📊 Market cap: ${}\n\
             5m: {}% | 1h: {}% | 6h: {}% | 24h: {}%",
            asset.name,
            asset.symbol,
            asset.mint,
            format_number(asset.price_usd),
            format_number(asset.market_cap_usd),
            format_number(asset.change_5m),
            format_number(asset.change_1h),
            format_number(asset.change_6h),
            format_number(asset.change_24h),
        );

        self.bot
            .send_message(self.chat_id, text)
            .parse_mode(ParseMode::Html)
            .reply_markup(trade_keyboard(config))
            .await?;

        Ok(())
    }

    async fn prompt_custom_amount(&self, side: TradeSide) -> Result<()> {
        let prompt = match side {
            TradeSide::Buy => "Enter the amount of SOL to spend:",
            TradeSide::Sell => "Enter the percentage of your holdings to sell (1-100):",
        };

        self.bot.send_message(self.chat_id, prompt).await?;
        Ok(())
    }

    async fn prompt_confirmation(&self, intent: &TradeIntent) -> Result<()> {
        self.bot
            .send_message(self.chat_id, confirmation_text(intent))
            .reply_markup(confirm_keyboard())
            .await?;

        Ok(())
    }

    async fn show_executing(&self, intent: &TradeIntent) -> Result<()> {
        self.bot
            .send_message(
                self.chat_id,
                format!("⏳ Executing: {}...", describe_selection(intent)),
            )
            .await?;

        Ok(())
    }

    async fn show_report(&self, intent: &TradeIntent, report: &ExecutionReport) -> Result<()> {
        let text = match &report.outcome {
            SwapOutcome::Confirmed { signature } => format!(
                "✅ {} confirmed.\n\n{}",
                describe_selection(intent),
                solscan_tx_link(&signature.to_string()),
            ),
            SwapOutcome::Expired { signature } => format!(
                "⚠️ {} was submitted but has not confirmed yet. \
                 It may still go through; check the explorer before retrying.\n\n{}",
                describe_selection(intent),
                solscan_tx_link(&signature.to_string()),
            ),
            SwapOutcome::Failed { signature, reason } => format!(
                "❌ {} failed on-chain: {}\n\n{}",
                describe_selection(intent),
                reason,
                solscan_tx_link(&signature.to_string()),
            ),
            SwapOutcome::SubmissionExhausted { last_error } => format!(
                "❌ {} could not be submitted after {} attempts: {}",
                describe_selection(intent),
                report.attempts.len(),
                last_error,
            ),
            SwapOutcome::NotSubmitted { reason } => format!(
                "❌ {} could not be prepared: {}",
                describe_selection(intent),
                reason,
            ),
        };

        self.bot
            .send_message(self.chat_id, text)
            .parse_mode(ParseMode::Html)
            .await?;

        Ok(())
    }

    async fn show_cancelled(&self) -> Result<()> {
        self.bot
            .send_message(self.chat_id, "Trade cancelled.")
            .await?;

        Ok(())
    }

    async fn show_unrecognized(&self) -> Result<()> {
        self.bot
            .send_message(
                self.chat_id,
                "Paste a Solana token address or a marketplace link to start a trade.",
            )
            .await?;

        Ok(())
    }

    async fn show_error(&self, message: &str) -> Result<()> {
        self.bot
            .send_message(self.chat_id, format!("⚠️ {}", message))
            .await?;

        Ok(())
    }
}
