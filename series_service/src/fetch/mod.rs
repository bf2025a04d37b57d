//! Capability traits for fetching rebased series.
//!
//! [`SeriesFetcher`] is the single seam of the serving path. The slow-store
//! implementation lives in [`store`]; [`cached`] wraps any fetcher with the
//! fast store. Composing them explicitly (instead of wrapping functions)
//! keeps the cache behavior testable and swappable per deployment.

pub mod cached;
pub mod store;

use async_trait::async_trait;

use rebase_engine::horizon::Horizon;

use crate::errors::FetchError;
use crate::series::SeriesMap;

/// Unified interface for "rebased series for horizon + symbol set".
#[async_trait]
pub trait SeriesFetcher: Send + Sync {
    /// Fetch the rebased series for every requested symbol.
    ///
    /// Symbols are expected canonical (trimmed, uppercase). A symbol with no
    /// data signals [`FetchError::NotFound`].
    async fn fetch(&self, horizon: Horizon, symbols: &[String]) -> Result<SeriesMap, FetchError>;
}
