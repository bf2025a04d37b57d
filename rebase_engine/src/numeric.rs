//! TEXT ⇄ decimal conversion for price columns.
//!
//! Prices and rebased values persist as decimal strings so recomputation is
//! exact and repeatable; binary floats would accumulate rounding drift across
//! refresh cycles. These helpers convert at the database edge, mirroring how
//! timestamps persist as RFC-3339 text elsewhere in the workspace.

use rust_decimal::Decimal;
use thiserror::Error;

/// A stored value that is not a valid decimal string.
#[derive(Debug, Error)]
#[error("invalid decimal text {value:?}")]
pub struct ParseDecimalError {
    /// The raw column value that failed to parse.
    pub value: String,
}

/// Parse a decimal TEXT column value.
pub fn decimal_from_db(s: &str) -> Result<Decimal, ParseDecimalError> {
    s.trim().parse::<Decimal>().map_err(|_| ParseDecimalError {
        value: s.to_string(),
    })
}

/// Render a decimal for storage in a TEXT column.
pub fn decimal_to_db(d: Decimal) -> String {
    d.to_string()
}

/// Render a rebased value at its canonical two-decimal scale.
///
/// Rounds with banker's rounding, then pads so "100" stores as "100.00" —
/// division can shrink the scale even when the inputs carry two decimals.
pub fn rebased_to_db(d: Decimal) -> String {
    format!("{:.2}", d.round_dp(2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_renders_exactly() {
        let d = decimal_from_db("154.00").unwrap();
        assert_eq!(decimal_to_db(d), "154.00");
    }

    #[test]
    fn rejects_garbage() {
        assert!(decimal_from_db("12.3.4").is_err());
        assert!(decimal_from_db("abc").is_err());
    }

    #[test]
    fn rebased_values_always_carry_two_decimals() {
        assert_eq!(rebased_to_db("100".parse().unwrap()), "100.00");
        assert_eq!(rebased_to_db("110.0".parse().unwrap()), "110.00");
        assert_eq!(rebased_to_db("100.64777".parse().unwrap()), "100.65");
    }
}
