//! Error types for memoization and cache collaborator operations
//!
//! A single error enum covers key derivation, (de)serialization of cached
//! values, configuration, and failures reported by the cache collaborator.
//! Errors raised by a wrapped function never pass through this type: they are
//! returned to the caller unmodified.

use thiserror::Error;

/// Main error type for memoization operations
#[derive(Error, Debug)]
pub enum CacheError {
    /// The cache collaborator could not be reached
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The cache collaborator rejected or failed an operation
    #[error("Backend error: {0}")]
    BackendError(String),

    /// A value could not be encoded for, or decoded from, the cache
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// An argument cannot be part of a cache key
    #[error("Unhashable argument at {position}: {kind}")]
    Unhashable {
        kind: &'static str,
        position: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Redis driver error (wrapper)
    #[cfg(feature = "redis-cache")]
    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),

    /// Generic error with context
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for memoization operations
pub type Result<T> = std::result::Result<T, CacheError>;

impl From<String> for CacheError {
    fn from(s: String) -> Self {
        CacheError::Other(s)
    }
}

impl From<&str> for CacheError {
    fn from(s: &str) -> Self {
        CacheError::Other(s.to_string())
    }
}

impl From<serde_json::Error> for CacheError {
    fn from(e: serde_json::Error) -> Self {
        CacheError::SerializationError(e.to_string())
    }
}
