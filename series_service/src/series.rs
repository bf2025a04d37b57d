//! Core series types shared across the serving path.

use chrono::NaiveDate;
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::FetchError;

/// One rebased observation: a trading day and its base-100 value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// Trading day.
    pub date: NaiveDate,
    /// Rebased price (100 at the horizon's anchor).
    pub value: Decimal,
}

/// Per-symbol rebased series, keyed by canonical symbol.
///
/// Callers must not rely on cross-symbol ordering; the cache-aside merge
/// appends freshly fetched symbols after cached ones.
pub type SeriesMap = IndexMap<String, Vec<SeriesPoint>>;

/// Parse a comma-separated symbol list: trim, uppercase, drop empties.
pub fn parse_symbols(symbols_csv: &str) -> Result<Vec<String>, FetchError> {
    let list: Vec<String> = symbols_csv
        .split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect();

    if list.is_empty() {
        return Err(FetchError::NoSymbols);
    }
    Ok(list)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_are_trimmed_and_uppercased() {
        let got = parse_symbols(" aapl.us , msft.us ").unwrap();
        assert_eq!(got, vec!["AAPL.US".to_string(), "MSFT.US".to_string()]);
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(parse_symbols(""), Err(FetchError::NoSymbols)));
        assert!(matches!(parse_symbols(" , ,"), Err(FetchError::NoSymbols)));
    }
}
