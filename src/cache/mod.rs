//! # Cache collaborators
//!
//! The memoizer only talks to a [`CacheBackend`]: a key-value store with
//! `get`, `set` and `expire_at`. Storage, expiry enforcement and network
//! access live behind that trait.
//!
//! - [`MemoryBackend`]: in-process store with lazy expiration, suitable for
//!   tests and single-process use
//! - `RedisBackend` (feature `redis-cache`): plain Redis commands over a
//!   connection manager
//!
//! ## Example
//!
//! ```rust
//! use memo_cache::cache::{CacheBackend, MemoryBackend};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let backend = MemoryBackend::new();
//!
//! backend.set("greeting", "\"hello\"".to_string()).await?;
//! backend
//!     .expire_at("greeting", chrono::Utc::now() + chrono::Duration::hours(1))
//!     .await?;
//!
//! assert_eq!(backend.get("greeting").await?, Some("\"hello\"".to_string()));
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod entry;
pub mod memory;
#[cfg(feature = "redis-cache")]
pub mod redis_cache;
pub mod types;

pub use backend::CacheBackend;
pub use entry::{CacheEntry, CacheMetadata};
pub use memory::MemoryBackend;
#[cfg(feature = "redis-cache")]
pub use redis_cache::RedisBackend;
pub use types::{BackendStats, CacheKey, CacheValue};
