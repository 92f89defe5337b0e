/// Formats a market figure for chat display: two decimals in the readable
/// range, scientific notation for very small or very large values.
pub fn format_number(value: f64) -> String {
    if value == 0.0 || value.is_nan() {
        return "0.00".to_string();
    }

    if value.abs() < 0.01 || value.abs() > 1_000_000.0 {
        return format!("{:.2e}", value);
    }

    format!("{:.2}", value)
}

/// Shortens a base58 address for display: first and last four characters.
pub fn shorten_address(address: &str) -> String {
    if address.len() <= 12 {
        return address.to_string();
    }

    format!("{}...{}", &address[..4], &address[address.len() - 4..])
}
