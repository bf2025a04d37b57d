use std::fs::File;

use anyhow::Result;
use clap::{Parser, Subcommand};
use shared_utils::env::get_env_var;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about = "Rebase Engine CLI")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Apply pending migrations to the bar store.
    Migrate,
    /// Load a daily bar CSV for one symbol, then refresh its rebased series.
    Ingest {
        #[arg(long)]
        symbol: String,
        #[arg(long, value_name = "FILE")]
        csv: String,
    },
    /// Recompute rebased series for one symbol, or for every stored symbol.
    Rebase {
        #[arg(long)]
        symbol: Option<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let db_url = get_env_var("DATABASE_URL")?;

    match cli.cmd {
        Cmd::Migrate => {
            rebase_engine::db::migrate::run_sqlite(&db_url)?;
        }
        Cmd::Ingest { symbol, csv } => {
            let mut conn = rebase_engine::db::connection::connect_sqlite(&db_url)?;
            let file = File::open(&csv)?;
            let inserted = rebase_engine::ingest::load_csv(&mut conn, &symbol, file)?;

            let canonical = symbol.trim().to_uppercase();
            let bars = rebase_engine::rebase::rebase_symbol(&mut conn, &canonical)?;
            println!("{canonical}: inserted {inserted} new bars, rebased {bars}");
        }
        Cmd::Rebase { symbol } => {
            let mut conn = rebase_engine::db::connection::connect_sqlite(&db_url)?;
            match symbol {
                Some(s) => {
                    let canonical = s.trim().to_uppercase();
                    let bars = rebase_engine::rebase::rebase_symbol(&mut conn, &canonical)?;
                    println!("{canonical}: rebased {bars} bars");
                }
                None => {
                    let summary = rebase_engine::rebase::rebase_all(&mut conn)?;
                    println!(
                        "rebased {} bars across {} symbols ({} skipped)",
                        summary.bars, summary.symbols, summary.skipped
                    );
                }
            }
        }
    }

    Ok(())
}
