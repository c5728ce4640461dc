//! Redis-backed response store

use super::{CacheError, CacheStore};
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, RedisResult};
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;

/// Redis/Valkey store using a shared, auto-reconnecting connection
#[derive(Clone)]
pub struct RedisStore {
    manager: ConnectionManager,
    /// Upper bound for every store operation
    op_timeout: Duration,
}

impl RedisStore {
    /// Connect and verify the server answers `PING`
    pub async fn connect(url: &str, op_timeout: Duration) -> Result<Self, CacheError> {
        let client = redis::Client::open(url)?;
        let manager = timeout(op_timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| CacheError::Timeout)??;

        let store = Self {
            manager,
            op_timeout,
        };
        store.ping().await?;
        Ok(store)
    }

    async fn bounded<T, F>(&self, fut: F) -> Result<T, CacheError>
    where
        F: Future<Output = RedisResult<T>>,
    {
        timeout(self.op_timeout, fut)
            .await
            .map_err(|_| CacheError::Timeout)?
            .map_err(CacheError::from)
    }
}

#[async_trait]
impl CacheStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut con = self.manager.clone();
        self.bounded(con.get::<_, Option<String>>(key)).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut con = self.manager.clone();
        // SETEX rejects a zero expiry
        let seconds = ttl.as_secs().max(1);
        self.bounded(con.set_ex::<_, _, ()>(key, value, seconds)).await
    }

    async fn ping(&self) -> Result<(), CacheError> {
        let mut con = self.manager.clone();
        let _: String = self
            .bounded(redis::cmd("PING").query_async(&mut con))
            .await?;
        Ok(())
    }
}
