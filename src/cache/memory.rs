//! In-process cache collaborator

use crate::cache::{
    backend::CacheBackend,
    entry::CacheEntry,
    types::{BackendStats, CacheKey, CacheValue},
};
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// In-memory key-value store with absolute expirations
///
/// Expired entries are treated as absent and removed lazily on access, or in
/// bulk by [`MemoryBackend::cleanup_expired`]. There is no size limit and no
/// eviction. Clones share the same storage.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    store: Arc<RwLock<MemoryStore>>,
}

#[derive(Default)]
struct MemoryStore {
    entries: HashMap<CacheKey, CacheEntry>,
    stats: BackendStats,
}

impl MemoryStore {
    // Drops `key` if its expiration has passed; returns whether it did.
    fn purge_if_expired(&mut self, key: &str, now: DateTime<Utc>) -> bool {
        let expired = self
            .entries
            .get(key)
            .map_or(false, |entry| entry.is_expired_at(now));
        if expired {
            self.entries.remove(key);
            self.stats.expirations += 1;
            debug!("Cache entry expired: {}", key);
        }
        expired
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        info!("Initializing in-memory cache backend");
        Self::default()
    }

    /// Absolute expiration of a live entry, if one was requested
    pub async fn expiration(&self, key: &str) -> Option<DateTime<Utc>> {
        let store = self.store.read().await;
        store
            .entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .and_then(|entry| entry.metadata.expires_at)
    }

    /// Copy of the live entry stored under `key`
    pub async fn entry(&self, key: &str) -> Option<CacheEntry> {
        let store = self.store.read().await;
        store
            .entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .cloned()
    }

    /// Check if a live entry exists (without touching the stats)
    pub async fn contains_key(&self, key: &str) -> bool {
        self.entry(key).await.is_some()
    }

    /// Remove a specific entry
    pub async fn remove(&self, key: &str) -> Option<CacheValue> {
        let mut store = self.store.write().await;
        store.entries.remove(key).map(|entry| {
            debug!("Removed cache entry: {}", key);
            entry.value
        })
    }

    /// Remove all entries
    pub async fn clear(&self) {
        let mut store = self.store.write().await;
        let count = store.entries.len();
        store.entries.clear();
        info!("Cleared {} entries from cache", count);
    }

    /// Remove all expired entries, returning how many were dropped
    pub async fn cleanup_expired(&self) -> usize {
        let mut store = self.store.write().await;
        let now = Utc::now();
        let before = store.entries.len();

        store.entries.retain(|_, entry| !entry.is_expired_at(now));

        let removed = before - store.entries.len();
        store.stats.expirations += removed as u64;
        if removed > 0 {
            debug!("Cleaned up {} expired entries", removed);
        }
        removed
    }

    /// Number of stored entries, expired ones included until purged
    pub async fn len(&self) -> usize {
        self.store.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.read().await.entries.is_empty()
    }

    pub async fn stats(&self) -> BackendStats {
        self.store.read().await.stats.clone()
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<CacheValue>> {
        let mut store = self.store.write().await;
        store.stats.gets += 1;
        store.purge_if_expired(key, Utc::now());

        let value = store.entries.get(key).map(|entry| entry.value.clone());
        match value {
            Some(value) => {
                store.stats.hits += 1;
                Ok(Some(value))
            }
            None => {
                store.stats.misses += 1;
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &str, value: CacheValue) -> Result<()> {
        let mut store = self.store.write().await;
        store.stats.sets += 1;

        if let Some(existing) = store.entries.get_mut(key) {
            debug!("Updating existing cache entry: {}", key);
            existing.update_value(value);
        } else {
            debug!("Inserting new cache entry: {}", key);
            store
                .entries
                .insert(key.to_string(), CacheEntry::new(key.to_string(), value));
        }
        Ok(())
    }

    async fn expire_at(&self, key: &str, at: DateTime<Utc>) -> Result<()> {
        let mut store = self.store.write().await;
        store.purge_if_expired(key, Utc::now());

        if let Some(entry) = store.entries.get_mut(key) {
            entry.expire_at(at);
        }
        Ok(())
    }
}
