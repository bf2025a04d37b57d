//! Cache-aside decorator over any [`SeriesFetcher`].

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use rebase_engine::horizon::Horizon;

use crate::cache::{FastCache, series_key};
use crate::errors::FetchError;
use crate::fetch::SeriesFetcher;
use crate::series::{SeriesMap, SeriesPoint};

/// Serves series from the fast store, falling back to the wrapped fetcher
/// for the missing subset and repopulating whole entries with a TTL.
///
/// Per request: each symbol's key is probed independently; every miss lands
/// in one batched inner fetch; each freshly fetched symbol is written back
/// as a whole entry. Repeating a request inside the TTL never reaches the
/// inner fetcher, and a refresh for one symbol never touches another's entry.
///
/// Fast-store trouble never fails a request: probe errors count as misses
/// and write errors are dropped after a warning, so a down cache degrades to
/// slow-store reads instead of an outage. Two concurrent requests may both
/// miss the same key and both write it back; the entries are equivalent and
/// the last writer wins, so this race is left unmitigated.
pub struct CachedFetcher {
    inner: Arc<dyn SeriesFetcher>,
    cache: Arc<dyn FastCache>,
    ttl_secs: u64,
}

impl CachedFetcher {
    /// Wrap `inner`, caching entries in `cache` for `ttl_secs`.
    pub fn new(inner: Arc<dyn SeriesFetcher>, cache: Arc<dyn FastCache>, ttl_secs: u64) -> Self {
        Self {
            inner,
            cache,
            ttl_secs,
        }
    }
}

#[async_trait]
impl SeriesFetcher for CachedFetcher {
    async fn fetch(&self, horizon: Horizon, symbols: &[String]) -> Result<SeriesMap, FetchError> {
        let mut merged = SeriesMap::new();
        let mut missing: Vec<String> = Vec::new();

        for sym in symbols {
            if merged.contains_key(sym) || missing.iter().any(|m| m == sym) {
                continue; // duplicate request entry
            }
            let key = series_key(horizon, sym);
            match self.cache.get(&key).await {
                Ok(Some(json)) => match serde_json::from_str::<Vec<SeriesPoint>>(&json) {
                    Ok(points) => {
                        merged.insert(sym.clone(), points);
                    }
                    Err(error) => {
                        warn!(key = %key, error = %error, "undecodable cache entry, refetching");
                        missing.push(sym.clone());
                    }
                },
                Ok(None) => missing.push(sym.clone()),
                Err(error) => {
                    warn!(key = %key, error = %error, "fast store unavailable, treating as miss");
                    missing.push(sym.clone());
                }
            }
        }

        if !missing.is_empty() {
            // One batched slow-store query covering the whole missing subset.
            let fetched = self.inner.fetch(horizon, &missing).await?;
            for (sym, points) in fetched {
                let key = series_key(horizon, &sym);
                match serde_json::to_string(&points) {
                    Ok(json) => {
                        if let Err(error) = self.cache.set_ex(&key, &json, self.ttl_secs).await {
                            warn!(key = %key, error = %error, "cache write failed, serving uncached");
                        }
                    }
                    Err(error) => {
                        warn!(key = %key, error = %error, "unserializable series, not cached");
                    }
                }
                merged.insert(sym, points);
            }
        }

        Ok(merged)
    }
}
