//! # memo-cache
//!
//! Read-through memoization of function results in an external key-value
//! cache.
//!
//! ## Features
//!
//! - Explicit higher-order wrappers instead of global state: the cache
//!   collaborator is injected into a [`Memoizer`]
//! - Deterministic, documented cache keys: `name(args; kwargs)`, with numeric
//!   arguments compared by value (`1` and `1.0` share a key)
//! - Argument freezing: mutable mappings become hashable [`FrozenMap`]s
//! - Fixed absolute TTL (one hour by default), requested from the
//!   collaborator after each store
//! - In-memory collaborator for tests and single-process use; Redis
//!   collaborator behind the `redis-cache` feature
//!
//! ## Caveats
//!
//! - A cached falsy value (`0`, `""`, `false`, `null`, empty collections) is
//!   treated as a miss and recomputed on every call. Disable with
//!   [`MemoizeConfig::falsy_is_miss`].
//! - Concurrent misses on the same key all compute and overwrite each other.
//! - `set` and `expire_at` are separate calls and not atomic.
//!
//! ## Example
//!
//! ```rust
//! use memo_cache::{Args, CacheError, MemoryBackend, Memoizer};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let backend = Arc::new(MemoryBackend::new());
//!     let memoizer = Memoizer::new(backend.clone());
//!
//!     let greet = memoizer.wrap("greet", |args: Args| async move {
//!         let name = args.kw("name").and_then(|v| v.as_str()).unwrap_or("world").to_string();
//!         Ok::<_, CacheError>(format!("hello, {}", name))
//!     });
//!
//!     let first = greet.call(Args::new().kwarg("name", "ada")).await?;
//!     let second = greet.call(Args::new().kwarg("name", "ada")).await?;
//!     assert_eq!(first, second);
//!
//!     let key = greet.cache_key(&Args::new().kwarg("name", "ada"))?;
//!     assert_eq!(key, r#"greet(; name="ada")"#);
//!     assert!(backend.expiration(&key).await.is_some());
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod error;
pub mod memo;

// Re-export main types for convenience
#[cfg(feature = "redis-cache")]
pub use cache::RedisBackend;
pub use cache::{BackendStats, CacheBackend, CacheEntry, CacheKey, CacheValue, MemoryBackend};
pub use error::{CacheError, Result};
pub use memo::{
    freeze_args, is_truthy, make_key, Args, FrozenMap, MemoizeConfig, MemoizeConfigBuilder,
    Memoized, Memoizer, Value,
};
