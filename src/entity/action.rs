use crate::entity::TradeSide;

/// Which of the two preset buttons was pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetSlot {
    Left,
    Right,
}

/// Button events, decoded once from the raw callback payload at the
/// transport boundary. Everything past the router matches on this enum
/// instead of on strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Preset(TradeSide, PresetSlot),
    Custom(TradeSide),
    Confirm,
    Cancel,
    Close,
}

impl Action {
    /// Decodes a callback payload. Unknown payloads yield None and are
    /// reported by the caller, not dropped silently.
    pub fn parse(data: &str) -> Option<Self> {
        match data {
            "buy_left" => Some(Self::Preset(TradeSide::Buy, PresetSlot::Left)),
            "buy_right" => Some(Self::Preset(TradeSide::Buy, PresetSlot::Right)),
            "buy_custom" => Some(Self::Custom(TradeSide::Buy)),
            "sell_left" => Some(Self::Preset(TradeSide::Sell, PresetSlot::Left)),
            "sell_right" => Some(Self::Preset(TradeSide::Sell, PresetSlot::Right)),
            "sell_custom" => Some(Self::Custom(TradeSide::Sell)),
            "confirm" => Some(Self::Confirm),
            "cancel" => Some(Self::Cancel),
            "close" => Some(Self::Close),
            _ => None,
        }
    }

    /// Callback payload used when building keyboards.
    pub fn as_callback(&self) -> &'static str {
        match self {
            Self::Preset(TradeSide::Buy, PresetSlot::Left) => "buy_left",
            Self::Preset(TradeSide::Buy, PresetSlot::Right) => "buy_right",
            Self::Custom(TradeSide::Buy) => "buy_custom",
            Self::Preset(TradeSide::Sell, PresetSlot::Left) => "sell_left",
            Self::Preset(TradeSide::Sell, PresetSlot::Right) => "sell_right",
            Self::Custom(TradeSide::Sell) => "sell_custom",
            Self::Confirm => "confirm",
            Self::Cancel => "cancel",
            Self::Close => "close",
        }
    }
}
