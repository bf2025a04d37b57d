//! Idempotent CSV ingestion for daily bars.
//!
//! Reads the stooq-style daily export (`Date,Open,High,Low,Close,Volume`)
//! and inserts one row per trading day with `ON CONFLICT DO NOTHING` on the
//! `(symbol, date)` unique constraint, inside a single immediate transaction
//! per file. Re-loading the same file is a no-op; an existing row is never
//! updated. Rebased columns are left NULL here and filled by
//! [`crate::rebase`] afterwards.

use std::io::Read;

use chrono::NaiveDate;
use diesel::prelude::*;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::models::NewBar;
use crate::numeric;
use crate::schema::stock_bars;

/// One raw CSV record as exported by the dataset source.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(alias = "Date", alias = "date")]
    date: String,
    #[serde(alias = "Open", alias = "open")]
    open: String,
    #[serde(alias = "High", alias = "high")]
    high: String,
    #[serde(alias = "Low", alias = "low")]
    low: String,
    #[serde(alias = "Close", alias = "close")]
    close: String,
    #[serde(alias = "Volume", alias = "volume", default)]
    volume: f64,
}

/// Errors raised while loading a bar CSV.
#[derive(Debug, Error)]
pub enum IngestError {
    /// A record carried a date that none of the accepted formats parse.
    #[error("row {row}: invalid date {value:?}")]
    BadDate {
        /// 1-based CSV data row.
        row: usize,
        /// The raw field value.
        value: String,
    },

    /// A record carried a price field that is not decimal text.
    #[error("row {row}: invalid price {value:?}")]
    BadPrice {
        /// 1-based CSV data row.
        row: usize,
        /// The raw field value.
        value: String,
    },

    /// The CSV itself could not be read or deserialized.
    #[error("csv read failed")]
    Csv(#[from] csv::Error),

    /// Database failure while inserting.
    #[error("database error")]
    Db(#[from] diesel::result::Error),
}

// Daily exports are Y-m-d; older dumps used day-first.
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d-%m-%Y"];

fn parse_date(s: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s.trim(), fmt).ok())
}

fn parse_price(s: &str, row: usize) -> Result<String, IngestError> {
    let d = numeric::decimal_from_db(s).map_err(|e| IngestError::BadPrice {
        row,
        value: e.value,
    })?;
    Ok(numeric::decimal_to_db(d))
}

/// Load every record of `reader` as bars for `symbol_name`.
///
/// The symbol is trimmed and uppercased. Returns the number of rows actually
/// inserted; rows whose `(symbol, date)` already exists are silently skipped.
pub fn load_csv<R: Read>(
    conn: &mut SqliteConnection,
    symbol_name: &str,
    reader: R,
) -> Result<usize, IngestError> {
    let symbol_name = symbol_name.trim().to_uppercase();

    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut bars = Vec::new();
    for (i, record) in csv_reader.deserialize::<CsvRecord>().enumerate() {
        let row = i + 1;
        let record = record?;

        let date = parse_date(&record.date).ok_or_else(|| IngestError::BadDate {
            row,
            value: record.date.clone(),
        })?;

        bars.push(NewBar {
            symbol: symbol_name.clone(),
            date,
            open: parse_price(&record.open, row)?,
            high: parse_price(&record.high, row)?,
            low: parse_price(&record.low, row)?,
            close: parse_price(&record.close, row)?,
            volume: record.volume as i64,
        });
    }

    let inserted = conn.immediate_transaction::<_, IngestError, _>(|conn| {
        let mut inserted = 0;
        for bar in &bars {
            inserted += diesel::insert_into(stock_bars::table)
                .values(bar)
                .on_conflict_do_nothing()
                .execute(conn)?;
        }
        Ok(inserted)
    })?;

    info!(
        symbol = %symbol_name,
        rows = bars.len(),
        inserted,
        "bar csv loaded"
    );

    Ok(inserted)
}
