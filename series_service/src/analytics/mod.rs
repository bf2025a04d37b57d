//! Derived analytics over the serving path's output.
//!
//! Both consumers take the post-reconciliation series map, never the store
//! directly, and both treat a symbol with no data as "skip", not an error.

pub mod anomaly;
pub mod performance;

pub use anomaly::{AnomalyRecord, detect_anomalies};
pub use performance::{PerformanceRanking, PerformanceRecord, rank_performance};
