//! # Memoization
//!
//! Two composable wrappers:
//!
//! - [`freeze_args`]: converts mutable mapping arguments into immutable,
//!   hashable [`FrozenMap`]s before the wrapped function runs
//! - [`Memoizer`] / [`Memoized`]: read-through caching of a function's result
//!   in a [`CacheBackend`](crate::cache::CacheBackend), keyed on the function
//!   name and its arguments, with a fixed absolute expiration
//!
//! Freezing has to happen before key derivation, so the freezer sits in
//! front of the memoized call: either [`Memoizer::wrap_frozen`], or
//! [`freeze_args`] around [`Memoized::call`]. Plain [`Memoizer::wrap`]
//! rejects mapping arguments as unhashable.
//!
//! ```rust
//! use memo_cache::{freeze_args, Args, CacheError, MemoryBackend, Memoizer};
//! use std::collections::HashMap;
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let memoizer = Memoizer::new(Arc::new(MemoryBackend::new()));
//! let keys = memoizer.wrap_frozen("keys", |args: Args| async move {
//!     let map = args.get(0).and_then(|v| v.as_frozen()).cloned().unwrap_or_default();
//!     Ok::<_, CacheError>(map.keys().cloned().collect::<Vec<String>>())
//! });
//!
//! let mut options = HashMap::new();
//! options.insert("verbose".to_string(), true);
//! assert_eq!(keys.call(Args::new().arg(options.clone())).await?, vec!["verbose"]);
//!
//! // Equivalent composition with the free-standing freezer
//! let keys = &keys;
//! let frozen_keys = freeze_args(move |args: Args| keys.call(args));
//! assert_eq!(frozen_keys(Args::new().arg(options)).await?, vec!["verbose"]);
//! # Ok(())
//! # }
//! ```

pub mod args;
pub mod config;
pub mod freeze;
pub mod key;
pub mod memoizer;
pub mod value;

pub use args::Args;
pub use config::{MemoizeConfig, MemoizeConfigBuilder};
pub use freeze::freeze_args;
pub use key::make_key;
pub use memoizer::{is_truthy, Memoized, Memoizer};
pub use value::{FrozenMap, Value};
