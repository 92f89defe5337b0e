use rust_decimal::Decimal;

/// Errors produced while turning free-form user input into a tradable asset.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("Input is not a Solana token address")]
    NotAnAddress,

    #[error("No market data found for this token")]
    UnknownAsset,

    #[error("Token lookup failed: {0}")]
    LookupFailed(String),
}

/// Recoverable user-input errors. The session state is never advanced
/// (or discarded) when one of these is reported.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter a valid number")]
    NotANumber,

    #[error("Amount must be greater than zero")]
    NotPositive,

    #[error("Percentage cannot exceed 100")]
    PercentTooLarge,
}

/// Errors from building a swap quote at confirmation time.
#[derive(Debug, thiserror::Error)]
pub enum QuoteError {
    #[error("No trade selection to quote")]
    IncompleteIntent,

    #[error("Price impact {impact:.2}% exceeds your limit of {max:.2}%")]
    PriceImpactExceeded { impact: f64, max: f64 },

    #[error("No swap route available for this pair")]
    NoRoute,

    #[error("You don't hold any of this token")]
    NothingToSell,

    #[error("Amount is too small to swap")]
    AmountTooSmall,

    #[error("Wallet lookup failed: {0}")]
    WalletUnavailable(String),

    #[error("Quote request failed: {0}")]
    RouterUnavailable(String),
}

/// Fatal pre-submission errors from the execution engine. Anything that
/// happens after the first accepted submission is reported through
/// `ExecutionReport` instead, because the outcome may be ambiguous.
#[derive(Debug, thiserror::Error)]
pub enum SwapError {
    #[error("Quote is older than {0} seconds and must be rebuilt")]
    StaleQuote(u64),

    #[error("Failed to build swap transaction: {0}")]
    TxBuild(String),

    #[error("Failed to sign transaction: {0}")]
    Signing(String),
}

/// Parses free-text numeric input for a custom buy amount (SOL).
pub fn parse_buy_amount(text: &str) -> Result<Decimal, ValidationError> {
    let amount: Decimal = text
        .trim()
        .parse()
        .map_err(|_| ValidationError::NotANumber)?;

    if amount <= Decimal::ZERO {
        return Err(ValidationError::NotPositive);
    }

    Ok(amount)
}

/// Parses free-text numeric input for a custom sell percentage and
/// converts it to a fraction of holdings in (0, 1].
pub fn parse_sell_percent(text: &str) -> Result<Decimal, ValidationError> {
    let percent: Decimal = text
        .trim()
        .parse()
        .map_err(|_| ValidationError::NotANumber)?;

    if percent <= Decimal::ZERO {
        return Err(ValidationError::NotPositive);
    }

    if percent > Decimal::from(100) {
        return Err(ValidationError::PercentTooLarge);
    }

    Ok(percent / Decimal::from(100))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buy_amount_accepts_decimals() {
        assert_eq!(parse_buy_amount("2.5").unwrap(), "2.5".parse().unwrap());
        assert_eq!(parse_buy_amount(" 1 ").unwrap(), Decimal::from(1));
    }

    #[test]
    fn buy_amount_rejects_garbage_and_nonpositive() {
        assert!(matches!(
            parse_buy_amount("abc"),
            Err(ValidationError::NotANumber)
        ));
        assert!(matches!(
            parse_buy_amount("0"),
            Err(ValidationError::NotPositive)
        ));
        assert!(matches!(
            parse_buy_amount("-3"),
            Err(ValidationError::NotPositive)
        ));
    }

    #[test]
    fn sell_percent_becomes_fraction() {
        assert_eq!(parse_sell_percent("25").unwrap(), "0.25".parse().unwrap());
        assert_eq!(parse_sell_percent("100").unwrap(), Decimal::from(1));
    }

    #[test]
    fn sell_percent_rejects_out_of_range() {
        assert!(matches!(
            parse_sell_percent("101"),
            Err(ValidationError::PercentTooLarge)
        ));
        assert!(matches!(
            parse_sell_percent("0"),
            Err(ValidationError::NotPositive)
        ));
    }
}
