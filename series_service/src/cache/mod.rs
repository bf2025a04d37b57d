//! Fast-store abstraction for the cache-aside layer.
//!
//! The cache holds one whole entry per `(horizon, symbol)` pair under keys
//! shaped `stock:{horizon}:{SYMBOL}`. Entries are write-once-per-refresh:
//! once present and unexpired they are authoritative, and a refresh always
//! replaces the whole entry. The cache-aside layer is the only writer.

pub mod memory;
pub mod redis;

use async_trait::async_trait;
use thiserror::Error;

use rebase_engine::horizon::Horizon;

/// Errors from the fast store.
///
/// These never fail a request: the cache-aside layer treats every one of
/// them as a miss (reads) or drops the write with a warning.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The redis client reported a failure.
    #[error("redis error")]
    Redis(#[from] ::redis::RedisError),

    /// The fast store exceeded its deadline.
    #[error("fast store timed out")]
    Timeout,
}

/// Capability: a shared, TTL'd key/value store for whole series entries.
#[async_trait]
pub trait FastCache: Send + Sync {
    /// Look up a cached entry. `Ok(None)` is a miss.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store a whole entry, expiring after `ttl_secs`.
    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), CacheError>;
}

/// Cache key for one symbol's series at one horizon.
pub fn series_key(horizon: Horizon, symbol: &str) -> String {
    format!("stock:{}:{}", horizon.as_str(), symbol)
}
