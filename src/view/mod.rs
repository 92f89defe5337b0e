mod trade_view;

pub use trade_view::{TelegramTradeView, TradeView};
