use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// Transaction priority tier selected in the user's settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriorityLevel {
    #[default]
    Medium,
    High,
    VeryHigh,
}

impl FromStr for PriorityLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "very_high" => Ok(Self::VeryHigh),
            _ => Err(anyhow::anyhow!("Invalid priority level '{}'", s)),
        }
    }
}

impl fmt::Display for PriorityLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
            Self::VeryHigh => write!(f, "very_high"),
        }
    }
}

/// Per-user trade settings. The core treats this as a read-only snapshot
/// taken when an intent starts waiting for an amount; later edits to the
/// stored row do not affect an in-progress trade.
#[derive(Debug, Clone)]
pub struct UserTradeConfig {
    /// Preset buy amounts in SOL
    pub buy_left: Decimal,
    pub buy_right: Decimal,
    /// Preset sell fractions of holdings in [0, 1]
    pub sell_left: Decimal,
    pub sell_right: Decimal,
    /// Slippage tolerances as fractions (0.01 = 1%)
    pub slippage_buy: Decimal,
    pub slippage_sell: Decimal,
    /// Price-impact ceiling as a fraction
    pub max_price_impact: Decimal,
    pub priority: PriorityLevel,
    /// Priority fee amounts in SOL per tier
    pub tp_medium: Decimal,
    pub tp_high: Decimal,
    pub tp_very_high: Decimal,
}

impl Default for UserTradeConfig {
    fn default() -> Self {
        Self {
            buy_left: Decimal::ONE,
            buy_right: Decimal::from(5),
            sell_left: dec_str("0.25"),
            sell_right: Decimal::ONE,
            slippage_buy: dec_str("0.1"),
            slippage_sell: dec_str("0.1"),
            max_price_impact: dec_str("0.25"),
            priority: PriorityLevel::Medium,
            tp_medium: dec_str("0.001"),
            tp_high: dec_str("0.005"),
            tp_very_high: dec_str("0.01"),
        }
    }
}

impl UserTradeConfig {
    /// Priority fee in lamports for the configured tier.
    pub fn priority_fee_lamports(&self) -> u64 {
        use rust_decimal::prelude::ToPrimitive;

        let sol = match self.priority {
            PriorityLevel::Medium => self.tp_medium,
            PriorityLevel::High => self.tp_high,
            PriorityLevel::VeryHigh => self.tp_very_high,
        };

        (sol * Decimal::from(1_000_000_000u64))
            .to_u64()
            .unwrap_or(0)
    }
}

fn dec_str(s: &str) -> Decimal {
    s.parse().unwrap_or_default()
}
