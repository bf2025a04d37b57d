//! Daily-return z-score anomaly scan.

use indexmap::IndexMap;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use tracing::warn;

use crate::series::SeriesMap;

/// How many standard deviations from the mean daily return a move must sit
/// before it is flagged.
const Z_THRESHOLD: f64 = 2.5;

/// One statistically unusual daily move.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnomalyRecord {
    /// Index of the move's bar within the symbol's price series (return i
    /// belongs to price i + 1).
    pub date_index: usize,
    /// Rebased price at that bar.
    pub price: Decimal,
    /// The daily return as a percentage, rounded to 2 decimals.
    pub return_pct: f64,
    /// Z-score, rounded to 2 decimals.
    pub z_score: f64,
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Daily returns of `prices` as fractions; `None` when the series is
/// malformed (a non-finite value or a zero denominator — those must surface
/// as a skip, never flow onward as inf/NaN).
fn daily_returns(prices: &[f64]) -> Option<Vec<f64>> {
    let mut returns = Vec::with_capacity(prices.len().saturating_sub(1));
    for pair in prices.windows(2) {
        let r = (pair[1] - pair[0]) / pair[0];
        if !r.is_finite() {
            return None;
        }
        returns.push(r);
    }
    Some(returns)
}

/// Scan every symbol's rebased series for outlier daily moves.
///
/// Symbols with fewer than two points yield no returns and are skipped;
/// symbols producing zero anomalies are omitted from the result entirely. A
/// malformed series is skipped with a warning and never aborts the batch.
pub fn detect_anomalies(series: &SeriesMap) -> IndexMap<String, Vec<AnomalyRecord>> {
    let mut results = IndexMap::new();

    for (symbol, points) in series {
        if points.len() < 2 {
            continue;
        }

        let Some(prices) = points
            .iter()
            .map(|p| p.value.to_f64())
            .collect::<Option<Vec<f64>>>()
        else {
            warn!(symbol = %symbol, "series not representable as f64, skipping");
            continue;
        };
        let Some(returns) = daily_returns(&prices) else {
            warn!(symbol = %symbol, "malformed return series, skipping");
            continue;
        };

        let n = returns.len() as f64;
        let mean = returns.iter().sum::<f64>() / n;
        let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
        let std_dev = variance.sqrt();
        if std_dev == 0.0 {
            continue; // identical returns, nothing can stand out
        }

        let mut anomalies = Vec::new();
        for (i, r) in returns.iter().enumerate() {
            let z = (r - mean) / std_dev;
            if z.abs() > Z_THRESHOLD {
                let price_index = i + 1;
                anomalies.push(AnomalyRecord {
                    date_index: price_index,
                    price: points[price_index].value,
                    return_pct: round2(r * 100.0),
                    z_score: round2(z),
                });
            }
        }
        if !anomalies.is_empty() {
            results.insert(symbol.clone(), anomalies);
        }
    }

    results
}
