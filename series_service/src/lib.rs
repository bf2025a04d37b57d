//! Serving side of the rebased-series service: cache-aside reconciliation
//! over the bar store's rebased columns, plus the anomaly and performance
//! analytics computed on the reconciled output.

pub mod analytics;
pub mod cache;
pub mod errors;
pub mod fetch;
pub mod series;
pub mod service;
