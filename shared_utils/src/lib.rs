//! Small helpers shared by the rebase engine and the series service.

pub mod config;
pub mod env;
