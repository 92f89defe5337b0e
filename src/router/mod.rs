use std::sync::Arc;

use anyhow::Result;
use log::{info, warn};
use teloxide::{dispatching::UpdateHandler, prelude::*};

use crate::di::ServiceContainer;
use crate::entity::Action;
use crate::view::{TelegramTradeView, TradeView};

/// Bot commands enum for teloxide's command filter.
#[derive(teloxide::utils::command::BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum BotCommands {
    #[command(description = "start the bot")]
    Start,
    #[command(description = "display this help message")]
    Help,
}

const WELCOME: &str = "Paste a Solana token address or a marketplace link \
(dexscreener, birdeye, pump.fun, solscan, GMGN) to open a trade card.\n\n\
Use /help to see the available commands.";

/// Maps Telegram updates onto the trade flow. Commands are handled here;
/// everything else is decoded and forwarded.
pub struct TelegramRouter {
    services: Arc<ServiceContainer>,
}

impl TelegramRouter {
    pub fn new(services: Arc<ServiceContainer>) -> Self {
        Self { services }
    }

    pub fn setup_handlers(&self) -> UpdateHandler<anyhow::Error> {
        use dptree::case;
        use teloxide::dispatching::UpdateFilterExt;

        let command_handler = teloxide::filter_command::<BotCommands, _>()
            .branch(case![BotCommands::Start].endpoint(|bot: Bot, msg: Message| async move {
                bot.send_message(msg.chat.id, WELCOME).await?;
                Ok(())
            }))
            .branch(case![BotCommands::Help].endpoint(|bot: Bot, msg: Message| async move {
                use teloxide::utils::command::BotCommands as _;
                bot.send_message(msg.chat.id, BotCommands::descriptions().to_string())
                    .await?;
                Ok(())
            }));

        let services_for_text = self.services.clone();
        let message_handler = Update::filter_message()
            .branch(command_handler)
            .branch(dptree::entry().endpoint(move |bot: Bot, msg: Message| {
                let services = services_for_text.clone();
                async move { handle_text(bot, msg, services).await }
            }));

        let services_for_callbacks = self.services.clone();
        let callback_handler =
            Update::filter_callback_query().endpoint(move |bot: Bot, q: CallbackQuery| {
                let services = services_for_callbacks.clone();
                async move { handle_callback(bot, q, services).await }
            });

        dptree::entry()
            .branch(message_handler)
            .branch(callback_handler)
    }
}

async fn handle_text(bot: Bot, msg: Message, services: Arc<ServiceContainer>) -> Result<()> {
    let text = match msg.text() {
        Some(text) => text.to_string(),
        None => return Ok(()),
    };

    let telegram_id = msg.from().map_or(0, |user| user.id.0 as i64);
    info!("Received message from user {}", telegram_id);

    let view = TelegramTradeView::new(bot, msg.chat.id);
    services
        .trade_flow()
        .on_text(telegram_id, &text, &view)
        .await
}

async fn handle_callback(bot: Bot, q: CallbackQuery, services: Arc<ServiceContainer>) -> Result<()> {
    let callback_data = match q.data.clone() {
        Some(data) => data,
        None => return Ok(()),
    };

    let chat_id = match q.message {
        Some(ref msg) => msg.chat().id,
        None => return Ok(()),
    };

    let telegram_id = q.from.id.0 as i64;
    info!(
        "Received callback: {} from user {}",
        callback_data, telegram_id
    );

    // Acknowledge early to stop the button spinner.
    if let Err(err) = bot.answer_callback_query(q.id.clone()).await {
        warn!("Failed to answer callback query: {}", err);
    }

    let view = TelegramTradeView::new(bot, chat_id);

    match Action::parse(&callback_data) {
        Some(action) => {
            services
                .trade_flow()
                .on_action(telegram_id, action, &view)
                .await
        }
        None => {
            warn!("Unknown callback payload: {}", callback_data);
            view.show_error("That button is no longer supported.").await
        }
    }
}
