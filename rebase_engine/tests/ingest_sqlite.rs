use diesel::prelude::*;
use rebase_engine::ingest::{self, IngestError};
use rebase_engine::models::BarRow;
use rebase_engine::schema::stock_bars::dsl as sb;

mod common;

const DAILY_CSV: &str = "\
Date,Open,High,Low,Close,Volume
2025-01-02,150.00,155.00,149.00,154.00,1000000
2025-01-03,154.00,156.00,153.00,155.50,1500000
2025-01-06,155.50,158.00,155.00,157.25,900000
";

#[test]
fn load_csv_inserts_rows_with_canonical_symbol() {
    let (_db, mut conn) = common::setup_db();

    let inserted = ingest::load_csv(&mut conn, " aapl.us ", DAILY_CSV.as_bytes()).expect("load");
    assert_eq!(inserted, 3);

    let rows: Vec<BarRow> = sb::stock_bars
        .select(BarRow::as_select())
        .order(sb::date.asc())
        .load(&mut conn)
        .expect("rows");

    assert_eq!(rows.len(), 3);
    for row in &rows {
        assert_eq!(row.symbol, "AAPL.US");
        assert!(row.norm_1mo.is_none(), "ingestion never fills rebased columns");
        assert!(!row.created_at.is_empty());
    }
    assert_eq!(rows[0].date, common::d(2025, 1, 2));
    assert_eq!(rows[0].close, "154.00");
    assert_eq!(rows[0].volume, 1_000_000);
}

#[test]
fn reloading_the_same_file_is_a_noop() {
    let (_db, mut conn) = common::setup_db();

    let first = ingest::load_csv(&mut conn, "AAPL.US", DAILY_CSV.as_bytes()).expect("load");
    let second = ingest::load_csv(&mut conn, "AAPL.US", DAILY_CSV.as_bytes()).expect("reload");

    assert_eq!(first, 3);
    assert_eq!(second, 0);

    let count: i64 = sb::stock_bars.count().get_result(&mut conn).expect("count");
    assert_eq!(count, 3);
}

#[test]
fn conflicting_reingestion_never_updates_existing_rows() {
    let (_db, mut conn) = common::setup_db();

    ingest::load_csv(&mut conn, "AAPL.US", DAILY_CSV.as_bytes()).expect("load");

    // Same dates, different closes: the stored rows must win.
    let revised = "\
Date,Open,High,Low,Close,Volume
2025-01-02,1.00,1.00,1.00,1.00,1
2025-01-03,2.00,2.00,2.00,2.00,2
";
    let inserted = ingest::load_csv(&mut conn, "AAPL.US", revised.as_bytes()).expect("reload");
    assert_eq!(inserted, 0);

    let close: String = sb::stock_bars
        .filter(sb::date.eq(common::d(2025, 1, 2)))
        .select(sb::close)
        .first(&mut conn)
        .expect("row");
    assert_eq!(close, "154.00");
}

#[test]
fn same_date_for_two_symbols_is_not_a_conflict() {
    let (_db, mut conn) = common::setup_db();

    ingest::load_csv(&mut conn, "AAPL.US", DAILY_CSV.as_bytes()).expect("load aapl");
    let inserted = ingest::load_csv(&mut conn, "MSFT.US", DAILY_CSV.as_bytes()).expect("load msft");
    assert_eq!(inserted, 3);

    let count: i64 = sb::stock_bars.count().get_result(&mut conn).expect("count");
    assert_eq!(count, 6);
}

#[test]
fn malformed_date_reports_the_row() {
    let (_db, mut conn) = common::setup_db();

    let bad = "\
Date,Open,High,Low,Close,Volume
2025-01-02,150.00,155.00,149.00,154.00,1000000
not-a-date,154.00,156.00,153.00,155.50,1500000
";
    let err = ingest::load_csv(&mut conn, "AAPL.US", bad.as_bytes()).unwrap_err();
    match err {
        IngestError::BadDate { row, value } => {
            assert_eq!(row, 2);
            assert_eq!(value, "not-a-date");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    // The parse failed before any write; nothing was inserted.
    let count: i64 = sb::stock_bars.count().get_result(&mut conn).expect("count");
    assert_eq!(count, 0);
}

#[test]
fn malformed_price_reports_the_row() {
    let (_db, mut conn) = common::setup_db();

    let bad = "\
Date,Open,High,Low,Close,Volume
2025-01-02,150.00,155.00,149.00,n/a,1000000
";
    let err = ingest::load_csv(&mut conn, "AAPL.US", bad.as_bytes()).unwrap_err();
    match err {
        IngestError::BadPrice { row, value } => {
            assert_eq!(row, 1);
            assert_eq!(value, "n/a");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
