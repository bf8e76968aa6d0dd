//! Redis cache collaborator
//!
//! Maps the collaborator interface onto plain Redis commands: `GET`, `SET`
//! and `PEXPIREAT`. The connection manager reconnects on its own; this type
//! adds no retries or timeouts.

use crate::cache::{backend::CacheBackend, types::CacheValue};
use crate::error::{CacheError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::aio::ConnectionManager;
use std::time::Duration;
use tracing::{debug, info};

/// Default Redis URL when `REDIS_URL` is not set
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";

/// Redis-backed cache collaborator
#[derive(Clone)]
pub struct RedisBackend {
    manager: ConnectionManager,
}

impl RedisBackend {
    /// Connect to the Redis server at `url`
    ///
    /// # Example
    /// ```no_run
    /// use memo_cache::RedisBackend;
    ///
    /// #[tokio::main]
    /// async fn main() -> anyhow::Result<()> {
    ///     let backend = RedisBackend::connect("redis://127.0.0.1:6379").await?;
    ///     assert!(backend.ping().await?);
    ///     Ok(())
    /// }
    /// ```
    pub async fn connect(url: &str) -> Result<Self> {
        info!("Connecting to Redis at {}", url);

        let client = redis::Client::open(url)
            .map_err(|e| CacheError::ConfigError(format!("invalid Redis URL {}: {}", url, e)))?;
        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| CacheError::ConnectionError(e.to_string()))?;

        info!("Connected to Redis");
        Ok(Self { manager })
    }

    /// Connect using `REDIS_URL` (a `.env` file is honoured)
    pub async fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        let url = std::env::var("REDIS_URL").unwrap_or_else(|_| DEFAULT_REDIS_URL.to_string());
        Self::connect(&url).await
    }

    /// Check connectivity with `PING`
    pub async fn ping(&self) -> Result<bool> {
        let mut conn = self.manager.clone();
        let reply = redis::cmd("PING").query_async::<_, String>(&mut conn).await?;
        Ok(reply == "PONG")
    }

    /// Remaining time to live of `key`
    ///
    /// `None` when the key does not exist or has no expiration.
    pub async fn ttl(&self, key: &str) -> Result<Option<Duration>> {
        let mut conn = self.manager.clone();
        let millis: i64 = redis::cmd("PTTL").arg(key).query_async(&mut conn).await?;
        // -2: missing key, -1: no expiration
        Ok(u64::try_from(millis).ok().map(Duration::from_millis))
    }

    /// Delete `key`; returns whether it existed
    pub async fn delete(&self, key: &str) -> Result<bool> {
        let mut conn = self.manager.clone();
        let removed: i64 = redis::cmd("DEL").arg(key).query_async(&mut conn).await?;
        Ok(removed > 0)
    }
}

#[async_trait]
impl CacheBackend for RedisBackend {
    async fn get(&self, key: &str) -> Result<Option<CacheValue>> {
        let mut conn = self.manager.clone();
        let value: Option<String> = redis::cmd("GET").arg(key).query_async(&mut conn).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: CacheValue) -> Result<()> {
        let mut conn = self.manager.clone();
        redis::cmd("SET")
            .arg(key)
            .arg(value)
            .query_async::<_, ()>(&mut conn)
            .await?;
        Ok(())
    }

    async fn expire_at(&self, key: &str, at: DateTime<Utc>) -> Result<()> {
        let mut conn = self.manager.clone();
        let applied: i64 = redis::cmd("PEXPIREAT")
            .arg(key)
            .arg(at.timestamp_millis())
            .query_async(&mut conn)
            .await?;
        if applied == 0 {
            debug!("PEXPIREAT on missing key: {}", key);
        }
        Ok(())
    }
}
