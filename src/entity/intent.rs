use crate::entity::{AssetInfo, UserTradeConfig};
use rust_decimal::Decimal;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeSide {
    Buy,
    Sell,
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "Buy"),
            Self::Sell => write!(f, "Sell"),
        }
    }
}

/// How the amount was chosen on the asset card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountMode {
    PresetLeft,
    PresetRight,
    Custom,
}

/// Lifecycle of a trade across chat round-trips. A session with no intent
/// is implicitly waiting for an asset paste.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentState {
    AwaitingAmount,
    AwaitingCustomAmount,
    AwaitingConfirmation,
    Executing,
    Completed,
    Cancelled,
    Failed,
}

impl IntentState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Failed)
    }
}

/// A user's in-progress trade, tracked across multiple inbound messages.
/// At most one non-terminal intent exists per user; pasting a new asset
/// replaces any prior intent that is not executing.
#[derive(Debug, Clone)]
pub struct TradeIntent {
    pub asset: AssetInfo,
    pub side: Option<TradeSide>,
    pub amount_mode: Option<AmountMode>,
    /// For Buy a SOL amount, for Sell a fraction of holdings in [0, 1].
    /// Set only when leaving AwaitingAmount/AwaitingCustomAmount.
    pub amount: Option<Decimal>,
    pub state: IntentState,
    /// Settings snapshot taken when the intent started waiting for an amount.
    pub config: UserTradeConfig,
}

impl TradeIntent {
    pub fn new(asset: AssetInfo, config: UserTradeConfig) -> Self {
        Self {
            asset,
            side: None,
            amount_mode: None,
            amount: None,
            state: IntentState::AwaitingAmount,
            config,
        }
    }

    /// Fixes side, mode, and amount and moves to confirmation. Only legal
    /// while the intent is still waiting for an amount.
    pub fn select_amount(&mut self, side: TradeSide, mode: AmountMode, amount: Decimal) {
        debug_assert!(matches!(
            self.state,
            IntentState::AwaitingAmount | IntentState::AwaitingCustomAmount
        ));

        self.side = Some(side);
        self.amount_mode = Some(mode);
        self.amount = Some(amount);
        self.state = IntentState::AwaitingConfirmation;
    }

    /// Moves to the free-text amount prompt for the given side.
    pub fn request_custom_amount(&mut self, side: TradeSide) {
        self.side = Some(side);
        self.amount_mode = Some(AmountMode::Custom);
        self.state = IntentState::AwaitingCustomAmount;
    }
}
