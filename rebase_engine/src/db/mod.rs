//! Database plumbing: connections and embedded migrations.

pub mod connection;
pub mod migrate;
