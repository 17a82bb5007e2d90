use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;

/// Amounts are exact decimals. Whatever precision an entry carries
/// ("12.5", "0.333") is preserved through every sum; no currency rounding
/// is applied anywhere in the pipeline.
pub type Amount = Decimal;

/// Parse a decimal string into an Amount.
/// Example: "50.00" -> 50.00, "12.5" -> 12.5, "100" -> 100
pub fn parse_amount(input: &str) -> Result<Amount, ParseAmountError> {
    Decimal::from_str(input.trim()).map_err(|_| ParseAmountError::InvalidFormat)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseAmountError {
    InvalidFormat,
}

impl fmt::Display for ParseAmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseAmountError::InvalidFormat => write!(f, "invalid amount format"),
        }
    }
}

impl std::error::Error for ParseAmountError {}
