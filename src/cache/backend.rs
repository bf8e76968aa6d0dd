//! The interface a memoizer consumes from its cache collaborator

use crate::cache::types::CacheValue;
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Key-value store with absolute expirations
///
/// Storage, eviction and expiry enforcement belong to the implementation.
/// `set` and `expire_at` are separate calls: between them an entry may be
/// observed without any expiration.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Fetch the value stored under `key`, if any
    async fn get(&self, key: &str) -> Result<Option<CacheValue>>;

    /// Store `value` under `key`, replacing any previous value and expiration
    async fn set(&self, key: &str, value: CacheValue) -> Result<()>;

    /// Request that `key` expire at the absolute time `at`
    ///
    /// Does nothing when `key` is not present.
    async fn expire_at(&self, key: &str, at: DateTime<Utc>) -> Result<()>;
}

