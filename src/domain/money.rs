use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;

/// Money is represented as an exact base-10 decimal.
/// Arithmetic never goes through floating point, so 100.235 + 50.567 is exactly 150.802.
pub type Amount = Decimal;

/// Format an amount as a human-readable string with at least two decimal places.
/// Example: 50 -> "50.00", 150.802 -> "150.802", -12.5 -> "-12.50"
pub fn format_amount(amount: Amount) -> String {
    let normalized = amount.normalize();
    if normalized.scale() < 2 {
        let mut padded = normalized;
        padded.rescale(2);
        padded.to_string()
    } else {
        normalized.to_string()
    }
}

/// Parse a decimal string into an amount.
/// Example: "50.00" -> 50.00, "100" -> 100, "50.567" -> 50.567
///
/// The sign is preserved; rejecting negative amounts is the job of
/// [`Deposit`](super::Deposit) and [`Withdrawal`](super::Withdrawal).
pub fn parse_amount(input: &str) -> Result<Amount, ParseAmountError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ParseAmountError::Empty);
    }

    Decimal::from_str(input).map_err(|_| ParseAmountError::InvalidFormat(input.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseAmountError {
    Empty,
    InvalidFormat(String),
}

impl fmt::Display for ParseAmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseAmountError::Empty => write!(f, "amount is empty"),
            ParseAmountError::InvalidFormat(input) => {
                write!(f, "invalid money format: '{}'", input)
            }
        }
    }
}

impl std::error::Error for ParseAmountError {}
