//! Diesel models mapping to the database schema.
//!
//! These types mirror the `stock_bars` table defined in the embedded
//! migrations and in [`crate::schema`]:
//! - one row per `(symbol, date)` trading day, prices as decimal TEXT
//! - one nullable rebased TEXT column per supported horizon
//!
//! The `(symbol, date)` pair is unique; re-ingesting an existing pair is a
//! silent no-op, never an update (see [`crate::ingest`]).

use chrono::NaiveDate;
use diesel::prelude::*;

use crate::schema::stock_bars;

/// A row in [`crate::schema::stock_bars`]: one trading day for one symbol.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = stock_bars, check_for_backend(diesel::sqlite::Sqlite))]
pub struct BarRow {
    /// Database primary key (SQLite INTEGER PRIMARY KEY rowid).
    pub id: i32,
    /// Uppercase symbol with market suffix (e.g., "AAPL.US").
    pub symbol: String,
    /// Trading day (calendar date, no time component).
    pub date: NaiveDate,
    /// Opening price as a decimal string.
    pub open: String,
    /// Highest price as a decimal string.
    pub high: String,
    /// Lowest price as a decimal string.
    pub low: String,
    /// Closing price as a decimal string.
    pub close: String,
    /// Shares traded during the day.
    pub volume: i64,
    /// Rebased value for the 1-month horizon; NULL outside its window.
    pub norm_1mo: Option<String>,
    /// Rebased value for the 3-month horizon; NULL outside its window.
    pub norm_3mo: Option<String>,
    /// Rebased value for the 6-month horizon; NULL outside its window.
    pub norm_6mo: Option<String>,
    /// Rebased value for the 1-year horizon; NULL outside its window.
    pub norm_1y: Option<String>,
    /// Rebased value for the 5-year horizon; NULL outside its window.
    pub norm_5y: Option<String>,
    /// Rebased value for the 20-year horizon; NULL outside its window.
    pub norm_20y: Option<String>,
    /// Row creation timestamp in RFC3339 UTC (maintained by a DB default).
    pub created_at: String,
}

/// Insertable form of [`BarRow`] for ingestion; rebased columns start NULL
/// and `created_at` comes from the DB default.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = stock_bars)]
pub struct NewBar {
    /// Uppercase symbol with market suffix.
    pub symbol: String,
    /// Trading day.
    pub date: NaiveDate,
    /// Opening price as a decimal string.
    pub open: String,
    /// Highest price as a decimal string.
    pub high: String,
    /// Lowest price as a decimal string.
    pub low: String,
    /// Closing price as a decimal string.
    pub close: String,
    /// Shares traded during the day.
    pub volume: i64,
}
