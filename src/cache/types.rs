//! Core type definitions for the cache collaborators

use serde::{Deserialize, Serialize};
use std::fmt;

/// Cache key type - the canonical call signature of a memoized function
pub type CacheKey = String;

/// Cache value type - JSON-encoded return value
pub type CacheValue = String;

/// Operation counters kept by the in-memory collaborator
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct BackendStats {
    /// Total number of `get` calls
    pub gets: u64,

    /// `get` calls that found a live entry
    pub hits: u64,

    /// `get` calls that found nothing, or an expired entry
    pub misses: u64,

    /// Total number of `set` calls
    pub sets: u64,

    /// Entries dropped because their expiration passed
    pub expirations: u64,
}

impl BackendStats {
    /// Calculate hit rate as a percentage
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

impl fmt::Display for BackendStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BackendStats {{ gets: {}, hits: {}, misses: {}, hit_rate: {:.2}%, sets: {}, expirations: {} }}",
            self.gets,
            self.hits,
            self.misses,
            self.hit_rate(),
            self.sets,
            self.expirations
        )
    }
}
