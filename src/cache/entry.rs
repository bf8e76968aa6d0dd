//! Cache entry with an optional absolute expiration

use crate::cache::types::{CacheKey, CacheValue};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored value and its metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// The cache key
    pub key: CacheKey,

    /// The cached value
    pub value: CacheValue,

    /// Entry metadata
    pub metadata: CacheMetadata,
}

impl CacheEntry {
    /// Create an entry that never expires
    pub fn new(key: CacheKey, value: CacheValue) -> Self {
        let now = Utc::now();

        Self {
            key,
            value,
            metadata: CacheMetadata {
                created_at: now,
                updated_at: now,
                expires_at: None,
                version: 1,
            },
        }
    }

    /// Check if the entry has expired
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Check expiration against a given instant
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        matches!(self.metadata.expires_at, Some(at) if now >= at)
    }

    /// Set or replace the absolute expiration
    pub fn expire_at(&mut self, at: DateTime<Utc>) {
        self.metadata.expires_at = Some(at);
    }

    /// Replace the value; clears any expiration, like a plain `SET`
    pub fn update_value(&mut self, new_value: CacheValue) {
        self.value = new_value;
        self.metadata.updated_at = Utc::now();
        self.metadata.expires_at = None;
        self.metadata.version += 1;
    }
}

/// Metadata associated with a cache entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheMetadata {
    /// When the entry was created
    pub created_at: DateTime<Utc>,

    /// When the value was last written
    pub updated_at: DateTime<Utc>,

    /// When the entry expires, if ever
    pub expires_at: Option<DateTime<Utc>>,

    /// Version number (incremented on updates)
    pub version: u64,
}
