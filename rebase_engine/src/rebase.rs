//! Base-100 normalization engine.
//!
//! For each symbol and each supported [`Horizon`], the engine picks the bar
//! nearest the horizon's lookback date (lookback dates rarely land on a
//! trading day), takes its close as the base price, and rewrites
//! `rebased = close / base * 100` for every bar inside the horizon's window.
//! Bars outside the window stay NULL.
//!
//! Recomputation is whole-symbol and transactional: every stored rebased
//! value for the symbol is cleared and repopulated inside one immediate
//! transaction, so a base-date shift (the as-of date advances with every
//! ingestion cycle) can never leave a mix of stale and fresh horizons.
//!
//! All arithmetic is exact decimal; a zero base price is a data-integrity
//! error, never coerced to zero or infinity.

use chrono::NaiveDate;
use diesel::prelude::*;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{info, warn};

use crate::horizon::Horizon;
use crate::numeric;

/// Errors fatal to one symbol's recomputation. The failed symbol's stored
/// values are left untouched (the transaction rolls back).
#[derive(Debug, Error)]
pub enum RebaseError {
    /// The anchor bar for some horizon has a zero close; nothing can be
    /// rebased against it.
    #[error("zero base close for {symbol} at {date}")]
    ZeroBasePrice {
        /// Symbol being recomputed.
        symbol: String,
        /// Date of the offending anchor bar.
        date: NaiveDate,
    },

    /// A stored close is not valid decimal text.
    #[error("bad close {value:?} for {symbol} at {date}")]
    BadClose {
        /// Symbol being recomputed.
        symbol: String,
        /// Date of the offending bar.
        date: NaiveDate,
        /// The raw column value.
        value: String,
    },

    /// The horizon offset walked off the calendar. Unreachable for real
    /// trading dates; kept explicit rather than unwrapped.
    #[error("lookback out of range for {symbol} at horizon {horizon}")]
    LookbackOutOfRange {
        /// Symbol being recomputed.
        symbol: String,
        /// Horizon whose offset failed.
        horizon: Horizon,
    },

    /// Database failure; aborts and rolls back the symbol.
    #[error("database error")]
    Db(#[from] diesel::result::Error),
}

/// The anchor one horizon rebases against: the trading day nearest the
/// lookback date and its close. Built fresh per invocation — anchor state is
/// never shared across symbols or calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseAnchor {
    /// Trading day of the anchor bar.
    pub date: NaiveDate,
    /// Its close price, the divisor for the whole window.
    pub close: Decimal,
}

/// Totals from a whole-store recomputation run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RebaseSummary {
    /// Symbols recomputed successfully.
    pub symbols: usize,
    /// Bars touched across those symbols.
    pub bars: usize,
    /// Symbols skipped on data-integrity errors.
    pub skipped: usize,
}

/// Pick the bar whose date is nearest `lookback`; ties go to the earlier
/// date. `bars` must be sorted ascending by date.
fn select_anchor(bars: &[(i32, NaiveDate, Decimal)], lookback: NaiveDate) -> Option<BaseAnchor> {
    let mut best: Option<(i64, BaseAnchor)> = None;
    for (_, date, close) in bars {
        let dist = (*date - lookback).num_days().abs();
        // ascending scan + strict `<` keeps the earliest date on a tie
        let closer = match &best {
            None => true,
            Some((best_dist, _)) => dist < *best_dist,
        };
        if closer {
            best = Some((
                dist,
                BaseAnchor {
                    date: *date,
                    close: *close,
                },
            ));
        }
    }
    best.map(|(_, anchor)| anchor)
}

/// Recompute every rebased column for one symbol.
///
/// The as-of date is the symbol's latest bar date. Returns the number of
/// bars processed; a symbol with no bars is a no-op.
pub fn rebase_symbol(
    conn: &mut SqliteConnection,
    symbol_name: &str,
) -> Result<usize, RebaseError> {
    use crate::schema::stock_bars::dsl as sb;

    let rows: Vec<(i32, NaiveDate, String)> = sb::stock_bars
        .filter(sb::symbol.eq(symbol_name))
        .select((sb::id, sb::date, sb::close))
        .order(sb::date.asc())
        .load(conn)?;

    let mut bars = Vec::with_capacity(rows.len());
    for (id, date, close_text) in rows {
        let close = numeric::decimal_from_db(&close_text).map_err(|e| RebaseError::BadClose {
            symbol: symbol_name.to_string(),
            date,
            value: e.value,
        })?;
        bars.push((id, date, close));
    }

    let Some(&(_, as_of, _)) = bars.last() else {
        info!(symbol = symbol_name, "no bars to rebase");
        return Ok(0);
    };

    // One (lookback, anchor) pair per horizon, index-aligned with the six
    // rebased columns in Horizon::ALL order.
    let mut anchors: [Option<(NaiveDate, BaseAnchor)>; 6] = [None; 6];
    for (i, h) in Horizon::ALL.iter().enumerate() {
        let lookback = h
            .lookback_from(as_of)
            .ok_or_else(|| RebaseError::LookbackOutOfRange {
                symbol: symbol_name.to_string(),
                horizon: *h,
            })?;
        let Some(anchor) = select_anchor(&bars, lookback) else {
            continue;
        };
        if anchor.close.is_zero() {
            return Err(RebaseError::ZeroBasePrice {
                symbol: symbol_name.to_string(),
                date: anchor.date,
            });
        }
        anchors[i] = Some((lookback, anchor));
    }

    let hundred = Decimal::ONE_HUNDRED;
    let mut values: Vec<[Option<String>; 6]> = Vec::with_capacity(bars.len());
    for (_, date, close) in &bars {
        let mut row: [Option<String>; 6] = Default::default();
        for (i, slot) in anchors.iter().enumerate() {
            let Some((lookback, anchor)) = slot else {
                continue;
            };
            // A bar exactly one horizon back is inside the window.
            if date >= lookback {
                let rebased = close / anchor.close * hundred;
                row[i] = Some(numeric::rebased_to_db(rebased));
            }
        }
        values.push(row);
    }

    conn.immediate_transaction::<_, RebaseError, _>(|conn| {
        // Whole-symbol clear first so no stale value survives an anchor shift.
        diesel::update(sb::stock_bars.filter(sb::symbol.eq(symbol_name)))
            .set((
                sb::norm_1mo.eq(None::<String>),
                sb::norm_3mo.eq(None::<String>),
                sb::norm_6mo.eq(None::<String>),
                sb::norm_1y.eq(None::<String>),
                sb::norm_5y.eq(None::<String>),
                sb::norm_20y.eq(None::<String>),
            ))
            .execute(conn)?;

        for ((id, _, _), vals) in bars.iter().zip(&values) {
            diesel::update(sb::stock_bars.find(id))
                .set((
                    sb::norm_1mo.eq(vals[0].as_deref()),
                    sb::norm_3mo.eq(vals[1].as_deref()),
                    sb::norm_6mo.eq(vals[2].as_deref()),
                    sb::norm_1y.eq(vals[3].as_deref()),
                    sb::norm_5y.eq(vals[4].as_deref()),
                    sb::norm_20y.eq(vals[5].as_deref()),
                ))
                .execute(conn)?;
        }
        Ok(())
    })?;

    info!(
        symbol = symbol_name,
        bars = bars.len(),
        as_of = %as_of,
        "rebased series refreshed"
    );

    Ok(bars.len())
}

/// Distinct symbols currently present in the bar store, sorted.
pub fn list_symbols(conn: &mut SqliteConnection) -> QueryResult<Vec<String>> {
    use crate::schema::stock_bars::dsl as sb;

    sb::stock_bars
        .select(sb::symbol)
        .distinct()
        .order(sb::symbol.asc())
        .load(conn)
}

/// Recompute every symbol in the store.
///
/// Data-integrity failures are isolated: the offending symbol is skipped
/// with a warning and the run continues. Database failures abort the run.
pub fn rebase_all(conn: &mut SqliteConnection) -> Result<RebaseSummary, diesel::result::Error> {
    let symbols = list_symbols(conn)?;

    let mut summary = RebaseSummary::default();
    for s in symbols {
        match rebase_symbol(conn, &s) {
            Ok(n) => {
                summary.symbols += 1;
                summary.bars += n;
            }
            Err(RebaseError::Db(e)) => return Err(e),
            Err(e) => {
                warn!(symbol = %s, error = %e, "skipping symbol");
                summary.skipped += 1;
            }
        }
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use proptest::prelude::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn bar(id: i32, date: NaiveDate) -> (i32, NaiveDate, Decimal) {
        (id, date, Decimal::from(100))
    }

    #[test]
    fn anchor_is_nearest_bar() {
        let bars = vec![
            bar(1, d(2024, 11, 25)),
            bar(2, d(2024, 12, 2)),
            bar(3, d(2024, 12, 9)),
        ];
        let anchor = select_anchor(&bars, d(2024, 12, 1)).unwrap();
        assert_eq!(anchor.date, d(2024, 12, 2));
    }

    #[test]
    fn anchor_tie_goes_to_earlier_date() {
        let bars = vec![bar(1, d(2024, 11, 30)), bar(2, d(2024, 12, 2))];
        // Both are one day away from 2024-12-01.
        let anchor = select_anchor(&bars, d(2024, 12, 1)).unwrap();
        assert_eq!(anchor.date, d(2024, 11, 30));
    }

    #[test]
    fn anchor_of_empty_slice_is_none() {
        assert!(select_anchor(&[], d(2024, 12, 1)).is_none());
    }

    proptest! {
        #[test]
        fn anchor_minimizes_distance_and_prefers_earliest(
            offsets in proptest::collection::btree_set(-720i64..720, 1..40),
            pivot in -30i64..30,
        ) {
            let origin = d(2020, 1, 1);
            let bars: Vec<(i32, NaiveDate, Decimal)> = offsets
                .iter()
                .enumerate()
                .map(|(i, off)| bar(i as i32, origin + Duration::days(*off)))
                .collect();
            let lookback = origin + Duration::days(pivot);

            let anchor = select_anchor(&bars, lookback).unwrap();

            let best_dist = bars
                .iter()
                .map(|(_, date, _)| (*date - lookback).num_days().abs())
                .min()
                .unwrap();
            let earliest_at_best = bars
                .iter()
                .map(|(_, date, _)| *date)
                .filter(|date| (*date - lookback).num_days().abs() == best_dist)
                .min()
                .unwrap();

            prop_assert_eq!((anchor.date - lookback).num_days().abs(), best_dist);
            prop_assert_eq!(anchor.date, earliest_at_best);
        }
    }
}
