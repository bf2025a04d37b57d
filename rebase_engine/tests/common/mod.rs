#![allow(dead_code)]

use std::path::PathBuf;

use chrono::NaiveDate;
use diesel::prelude::*;
use rebase_engine::db::{connection, migrate};
use rebase_engine::models::NewBar;
use rebase_engine::schema::stock_bars;
use tempfile::TempDir;

pub struct TestDb {
    _dir: TempDir, // keep alive for the life of the test
    pub path: String,
}

pub fn setup_db() -> (TestDb, SqliteConnection) {
    let dir = TempDir::new().expect("tempdir");
    let mut p = PathBuf::from(dir.path());
    p.push("test.db");
    let path = p.to_string_lossy().to_string();

    migrate::run_sqlite(&path).expect("migrations");

    let conn = connection::connect_sqlite(&path).expect("connect");
    (TestDb { _dir: dir, path }, conn)
}

pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

/// Insert one flat-priced bar (all prices = `close`) for `symbol` at `date`.
pub fn seed_bar(conn: &mut SqliteConnection, symbol: &str, date: NaiveDate, close: &str) {
    let bar = NewBar {
        symbol: symbol.to_string(),
        date,
        open: close.to_string(),
        high: close.to_string(),
        low: close.to_string(),
        close: close.to_string(),
        volume: 1_000,
    };
    diesel::insert_into(stock_bars::table)
        .values(&bar)
        .on_conflict_do_nothing()
        .execute(conn)
        .expect("seed bar");
}

/// Load `(date, norm)` pairs for one symbol/column, ordered by date.
pub fn norm_column(
    conn: &mut SqliteConnection,
    symbol: &str,
    column: &str,
) -> Vec<(NaiveDate, Option<String>)> {
    use rebase_engine::schema::stock_bars::dsl as sb;

    match column {
        "norm_1mo" => sb::stock_bars
            .filter(sb::symbol.eq(symbol))
            .select((sb::date, sb::norm_1mo))
            .order(sb::date.asc())
            .load(conn)
            .unwrap(),
        "norm_3mo" => sb::stock_bars
            .filter(sb::symbol.eq(symbol))
            .select((sb::date, sb::norm_3mo))
            .order(sb::date.asc())
            .load(conn)
            .unwrap(),
        "norm_1y" => sb::stock_bars
            .filter(sb::symbol.eq(symbol))
            .select((sb::date, sb::norm_1y))
            .order(sb::date.asc())
            .load(conn)
            .unwrap(),
        "norm_20y" => sb::stock_bars
            .filter(sb::symbol.eq(symbol))
            .select((sb::date, sb::norm_20y))
            .order(sb::date.asc())
            .load(conn)
            .unwrap(),
        other => panic!("unmapped column {other}"),
    }
}
