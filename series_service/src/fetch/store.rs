//! Slow-store fetcher: one batched query against the rebased columns.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use tokio::time::timeout;
use tracing::warn;

use rebase_engine::horizon::Horizon;

use crate::errors::FetchError;
use crate::fetch::SeriesFetcher;
use crate::series::{SeriesMap, SeriesPoint};

/// Fetches rebased series straight from the bar store.
///
/// Diesel is synchronous, so each request checks a pooled connection out on
/// the blocking thread pool; the async caller only awaits, bounded by
/// `query_timeout`.
pub struct DbSeriesFetcher {
    pool: Pool<ConnectionManager<SqliteConnection>>,
    query_timeout: Duration,
}

impl DbSeriesFetcher {
    /// Wrap an existing connection pool.
    pub fn new(pool: Pool<ConnectionManager<SqliteConnection>>, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    /// Build a small pool for `database_url` and wrap it.
    pub fn connect(database_url: &str, query_timeout: Duration) -> Result<Self, FetchError> {
        let manager = ConnectionManager::<SqliteConnection>::new(database_url);
        let pool = Pool::builder()
            .max_size(8)
            .build(manager)
            .map_err(|e| FetchError::Upstream(e.to_string()))?;
        Ok(Self::new(pool, query_timeout))
    }
}

/// The batched query: `(symbol, date, rebased)` for every requested symbol at
/// once, restricted to rows inside the horizon's window, ordered by symbol
/// then date.
fn load_rows(
    conn: &mut SqliteConnection,
    horizon: Horizon,
    symbols: &[String],
) -> QueryResult<Vec<(String, NaiveDate, Option<String>)>> {
    use rebase_engine::schema::stock_bars::dsl as sb;

    let base = sb::stock_bars
        .filter(sb::symbol.eq_any(symbols))
        .order((sb::symbol.asc(), sb::date.asc()));

    match horizon {
        Horizon::OneMonth => base
            .filter(sb::norm_1mo.is_not_null())
            .select((sb::symbol, sb::date, sb::norm_1mo))
            .load(conn),
        Horizon::ThreeMonths => base
            .filter(sb::norm_3mo.is_not_null())
            .select((sb::symbol, sb::date, sb::norm_3mo))
            .load(conn),
        Horizon::SixMonths => base
            .filter(sb::norm_6mo.is_not_null())
            .select((sb::symbol, sb::date, sb::norm_6mo))
            .load(conn),
        Horizon::OneYear => base
            .filter(sb::norm_1y.is_not_null())
            .select((sb::symbol, sb::date, sb::norm_1y))
            .load(conn),
        Horizon::FiveYears => base
            .filter(sb::norm_5y.is_not_null())
            .select((sb::symbol, sb::date, sb::norm_5y))
            .load(conn),
        Horizon::TwentyYears => base
            .filter(sb::norm_20y.is_not_null())
            .select((sb::symbol, sb::date, sb::norm_20y))
            .load(conn),
    }
}

#[async_trait]
impl SeriesFetcher for DbSeriesFetcher {
    async fn fetch(&self, horizon: Horizon, symbols: &[String]) -> Result<SeriesMap, FetchError> {
        let pool = self.pool.clone();
        let requested: Vec<String> = symbols.to_vec();
        let query_symbols = requested.clone();

        let join = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get().map_err(|e| FetchError::Upstream(e.to_string()))?;
            load_rows(&mut conn, horizon, &query_symbols)
                .map_err(|e| FetchError::Upstream(e.to_string()))
        });

        let rows = timeout(self.query_timeout, join)
            .await
            .map_err(|_| FetchError::Timeout)?
            .map_err(|e| FetchError::Upstream(e.to_string()))??;

        let mut grouped: IndexMap<String, Vec<SeriesPoint>> = IndexMap::new();
        for (sym, date, rebased) in rows {
            let Some(text) = rebased else { continue };
            let value = text.parse::<Decimal>().map_err(|_| {
                warn!(symbol = %sym, value = %text, "stored rebased value is not decimal text");
                FetchError::Integrity(sym.clone())
            })?;
            grouped
                .entry(sym)
                .or_default()
                .push(SeriesPoint { date, value });
        }

        // Re-key in request order and surface symbols with no rows at all.
        let mut out = SeriesMap::new();
        for sym in &requested {
            match grouped.shift_remove(sym) {
                Some(points) => {
                    out.insert(sym.clone(), points);
                }
                None => {
                    if out.contains_key(sym) {
                        continue; // duplicate request entry
                    }
                    return Err(FetchError::NotFound(sym.clone()));
                }
            }
        }
        Ok(out)
    }
}
