//! Best/worst performance ranking over rebased series.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::series::SeriesMap;

/// One symbol's standing: final rebased value against the 100 baseline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceRecord {
    /// Canonical symbol.
    pub symbol: String,
    /// `latest_value - 100`, rounded to 2 decimals. The series is rebased to
    /// 100, so this is a percentage directly.
    pub performance_pct: Decimal,
    /// The last rebased value in the series.
    pub latest_value: Decimal,
}

/// The two ends of a ranking run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceRanking {
    /// Highest performance.
    pub best: PerformanceRecord,
    /// Lowest performance.
    pub worst: PerformanceRecord,
}

/// Rank every symbol with data by final-value performance.
///
/// Returns `None` when no symbol has any data — "nothing to rank" is not an
/// error. Ties keep the series map's order (the sort is stable); no
/// secondary key is applied.
pub fn rank_performance(series: &SeriesMap) -> Option<PerformanceRanking> {
    let mut ranking: Vec<PerformanceRecord> = Vec::new();

    for (symbol, points) in series {
        let Some(last) = points.last() else { continue };
        ranking.push(PerformanceRecord {
            symbol: symbol.clone(),
            performance_pct: (last.value - Decimal::ONE_HUNDRED).round_dp(2),
            latest_value: last.value,
        });
    }

    ranking.sort_by(|a, b| b.performance_pct.cmp(&a.performance_pct));

    let best = ranking.first()?.clone();
    let worst = ranking.last()?.clone();
    Some(PerformanceRanking { best, worst })
}
