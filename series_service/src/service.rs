//! Validated entry points consumed by the HTTP layer.

use std::sync::Arc;
use std::time::Duration;

use indexmap::IndexMap;
use tracing::warn;

use rebase_engine::horizon::Horizon;
use shared_utils::config::Settings;

use crate::analytics::{self, AnomalyRecord, PerformanceRanking};
use crate::cache::memory::MemoryCache;
use crate::cache::redis::RedisCache;
use crate::cache::FastCache;
use crate::errors::FetchError;
use crate::fetch::cached::CachedFetcher;
use crate::fetch::store::DbSeriesFetcher;
use crate::fetch::SeriesFetcher;
use crate::series::{self, SeriesMap};

/// Deadline for one slow-store query.
const QUERY_TIMEOUT: Duration = Duration::from_secs(10);
/// Deadline for one fast-store operation.
const CACHE_OP_TIMEOUT: Duration = Duration::from_secs(2);

/// Front door of the serving path: parses and validates raw request inputs,
/// then delegates to the injected fetcher.
///
/// Construct one per process with whatever fetcher stack the deployment
/// wants — usually a [`crate::fetch::cached::CachedFetcher`] over a
/// [`crate::fetch::store::DbSeriesFetcher`]. The analytics entry points
/// compose on top of the same request path, so they see exactly what a plain
/// fetch would return.
pub struct SeriesService {
    fetcher: Arc<dyn SeriesFetcher>,
}

impl SeriesService {
    /// Build a service around `fetcher`.
    pub fn new(fetcher: Arc<dyn SeriesFetcher>) -> Self {
        Self { fetcher }
    }

    /// Assemble the production stack from process settings: a pooled
    /// slow-store fetcher wrapped by the fast cache.
    ///
    /// An unreachable redis at startup is not fatal; the service falls back
    /// to an in-process cache so reads keep working (the same degradation
    /// the cache-aside layer applies per operation at runtime).
    pub async fn from_settings(settings: &Settings) -> Result<Self, FetchError> {
        let store = DbSeriesFetcher::connect(&settings.database_url, QUERY_TIMEOUT)?;

        let cache: Arc<dyn FastCache> =
            match RedisCache::connect(&settings.redis_url, CACHE_OP_TIMEOUT).await {
                Ok(cache) => Arc::new(cache),
                Err(error) => {
                    warn!(%error, "fast store unreachable at startup, using in-process cache");
                    Arc::new(MemoryCache::new())
                }
            };

        let fetcher = CachedFetcher::new(Arc::new(store), cache, settings.cache_ttl_secs);
        Ok(Self::new(Arc::new(fetcher)))
    }

    /// The serving-path contract: rebased series for a horizon code and a
    /// comma-separated symbol list.
    pub async fn fetch(&self, horizon: &str, symbols_csv: &str) -> Result<SeriesMap, FetchError> {
        let horizon: Horizon = horizon.parse().map_err(|_| FetchError::InvalidHorizon {
            got: horizon.to_string(),
            allowed: Horizon::allowed(),
        })?;
        let symbols = series::parse_symbols(symbols_csv)?;
        self.fetcher.fetch(horizon, &symbols).await
    }

    /// Anomalous daily moves per symbol; symbols with none are omitted.
    pub async fn anomalies(
        &self,
        horizon: &str,
        symbols_csv: &str,
    ) -> Result<IndexMap<String, Vec<AnomalyRecord>>, FetchError> {
        let series_map = self.fetch(horizon, symbols_csv).await?;
        Ok(analytics::detect_anomalies(&series_map))
    }

    /// Best and worst performer over the requested set; `None` when no
    /// requested symbol has data.
    pub async fn performance(
        &self,
        horizon: &str,
        symbols_csv: &str,
    ) -> Result<Option<PerformanceRanking>, FetchError> {
        let series_map = self.fetch(horizon, symbols_csv).await?;
        Ok(analytics::rank_performance(&series_map))
    }
}
