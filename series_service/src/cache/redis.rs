//! Redis-backed fast store.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use tokio::time::timeout;

use super::{CacheError, FastCache};

/// Fast store backed by a shared redis connection manager.
///
/// The manager multiplexes one connection and reconnects by itself; clones
/// are cheap handles onto it. Every operation carries a bounded timeout so a
/// wedged fast store can never hang the serving path.
#[derive(Clone)]
pub struct RedisCache {
    manager: ConnectionManager,
    op_timeout: Duration,
}

impl RedisCache {
    /// Connect to `url` (e.g. `redis://127.0.0.1:6379`).
    pub async fn connect(url: &str, op_timeout: Duration) -> Result<Self, CacheError> {
        let client = redis::Client::open(url)?;
        let manager = ConnectionManager::new(client).await?;
        Ok(Self {
            manager,
            op_timeout,
        })
    }
}

#[async_trait]
impl FastCache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.manager.clone();
        let got = timeout(self.op_timeout, conn.get::<_, Option<String>>(key))
            .await
            .map_err(|_| CacheError::Timeout)??;
        Ok(got)
    }

    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), CacheError> {
        let mut conn = self.manager.clone();
        timeout(
            self.op_timeout,
            conn.set_ex::<_, _, ()>(key, value, ttl_secs),
        )
        .await
        .map_err(|_| CacheError::Timeout)??;
        Ok(())
    }
}
