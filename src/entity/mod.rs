mod action;
mod asset;
mod attempt;
mod error;
mod intent;
mod quote;
mod trade_config;

pub use action::{Action, PresetSlot};
pub use asset::AssetInfo;
pub use attempt::{AttemptOutcome, ExecutionReport, SwapAttempt, SwapOutcome};
pub use error::{
    parse_buy_amount, parse_sell_percent, QuoteError, ResolveError, SwapError, ValidationError,
};
pub use intent::{AmountMode, IntentState, TradeIntent, TradeSide};
pub use quote::SwapQuote;
pub use trade_config::{PriorityLevel, UserTradeConfig};
