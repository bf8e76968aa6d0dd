//! Read-through memoization over an injected cache collaborator

use crate::cache::{backend::CacheBackend, types::CacheKey};
use crate::error::{CacheError, Result};
use crate::memo::{args::Args, config::MemoizeConfig, key::make_key};
use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info};

/// Factory for memoized functions sharing one cache collaborator
///
/// # Example
///
/// ```rust
/// use memo_cache::{Args, CacheError, MemoryBackend, Memoizer};
/// use std::sync::Arc;
///
/// # async fn example() -> anyhow::Result<()> {
/// let memoizer = Memoizer::new(Arc::new(MemoryBackend::new()));
///
/// let double = memoizer.wrap("double", |args: Args| async move {
///     let x = args.get(0).and_then(|v| v.as_i64()).unwrap_or_default();
///     Ok::<_, CacheError>(x * 2)
/// });
///
/// assert_eq!(double.call(Args::new().arg(5)).await?, 10);
/// // Served from the cache
/// assert_eq!(double.call(Args::new().arg(5)).await?, 10);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Memoizer {
    backend: Arc<dyn CacheBackend>,
    config: MemoizeConfig,
}

impl Memoizer {
    /// Create a memoizer with the default one-hour TTL
    pub fn new(backend: Arc<dyn CacheBackend>) -> Self {
        Self {
            backend,
            config: MemoizeConfig::default(),
        }
    }

    /// Create a memoizer with a custom, validated configuration
    pub fn with_config(backend: Arc<dyn CacheBackend>, config: MemoizeConfig) -> Result<Self> {
        config.validate()?;
        info!("Initializing memoizer with config: {:?}", config);
        Ok(Self { backend, config })
    }

    pub fn config(&self) -> &MemoizeConfig {
        &self.config
    }

    /// Wrap `func` so that its results are cached under `name`
    ///
    /// `name` is the only thing distinguishing one function's keys from
    /// another's: two functions wrapped under the same name share entries.
    ///
    /// Mapping arguments are rejected as unhashable. Use
    /// [`Memoizer::wrap_frozen`], or put [`freeze_args`](crate::freeze_args)
    /// around the [`Memoized::call`] path, to accept them.
    pub fn wrap<F>(&self, name: impl Into<String>, func: F) -> Memoized<F> {
        Memoized {
            name: name.into(),
            func,
            backend: Arc::clone(&self.backend),
            config: self.config.clone(),
            freeze: false,
        }
    }

    /// Like [`Memoizer::wrap`], with mapping arguments frozen first
    ///
    /// Freezing happens before key derivation, so distinct but equal
    /// mappings share one cache entry. `func` receives the frozen arguments.
    pub fn wrap_frozen<F>(&self, name: impl Into<String>, func: F) -> Memoized<F> {
        Memoized {
            freeze: true,
            ..self.wrap(name, func)
        }
    }
}

/// A function whose results are cached in the collaborator
pub struct Memoized<F> {
    name: String,
    func: F,
    backend: Arc<dyn CacheBackend>,
    config: MemoizeConfig,
    freeze: bool,
}

impl<F> Memoized<F> {
    /// The name keys are derived from
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The cache key a call with `args` would use
    pub fn cache_key(&self, args: &Args) -> Result<CacheKey> {
        if self.freeze {
            make_key(&self.name, &args.clone().freeze())
        } else {
            make_key(&self.name, args)
        }
    }

    /// Call the function, going through the cache
    ///
    /// A cached truthy value is returned without calling the function. On a
    /// miss, or when the cached value is falsy and `falsy_is_miss` is set, the
    /// function runs and its result is stored with an expiration of
    /// now + TTL. Errors from the function are returned unchanged and nothing
    /// is stored; cache failures are returned through `E::from`.
    pub async fn call<Fut, R, E>(&self, args: Args) -> std::result::Result<R, E>
    where
        F: Fn(Args) -> Fut,
        Fut: Future<Output = std::result::Result<R, E>>,
        R: Serialize + DeserializeOwned,
        E: From<CacheError>,
    {
        let args = if self.freeze { args.freeze() } else { args };
        let key = make_key(&self.name, &args)?;

        if let Some(raw) = self.backend.get(&key).await? {
            let cached: serde_json::Value =
                serde_json::from_str(&raw).map_err(CacheError::from)?;

            if !self.config.falsy_is_miss || is_truthy(&cached) {
                debug!("Cache hit: {}", key);
                return Ok(serde_json::from_value(cached).map_err(CacheError::from)?);
            }
            debug!("Cached value is falsy, recomputing: {}", key);
        } else {
            debug!("Cache miss: {}", key);
        }

        let value = (self.func)(args).await?;
        self.store(&key, &value).await?;
        Ok(value)
    }

    async fn store<R: Serialize>(&self, key: &str, value: &R) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.backend.set(key, raw).await?;

        let expires_at = self.config.expiration_from(Utc::now())?;
        self.backend.expire_at(key, expires_at).await?;

        debug!("Stored {} (expires at {})", key, expires_at);
        Ok(())
    }
}

impl<F: Clone> Clone for Memoized<F> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            func: self.func.clone(),
            backend: Arc::clone(&self.backend),
            config: self.config.clone(),
            freeze: self.freeze,
        }
    }
}

/// Truthiness of a cached JSON value
///
/// `null`, `false`, zero, the empty string, the empty array and the empty
/// object are falsy; everything else is truthy.
pub fn is_truthy(value: &serde_json::Value) -> bool {
    use serde_json::Value as Json;

    match value {
        Json::Null => false,
        Json::Bool(b) => *b,
        Json::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Json::String(s) => !s.is_empty(),
        Json::Array(items) => !items.is_empty(),
        Json::Object(map) => !map.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryBackend;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_truthiness() {
        for falsy in [json!(null), json!(false), json!(0), json!(0.0), json!(""), json!([]), json!({})] {
            assert!(!is_truthy(&falsy), "{} should be falsy", falsy);
        }
        for truthy in [json!(true), json!(1), json!(-0.5), json!("0"), json!([0]), json!({"a": null})] {
            assert!(is_truthy(&truthy), "{} should be truthy", truthy);
        }
    }

    #[tokio::test]
    async fn test_hit_skips_function() {
        let backend = Arc::new(MemoryBackend::new());
        let memoizer = Memoizer::new(backend.clone());
        let calls = AtomicUsize::new(0);

        let square = memoizer.wrap("square", |args: Args| {
            calls.fetch_add(1, Ordering::SeqCst);
            let x = args.get(0).and_then(|v| v.as_i64()).unwrap_or_default();
            async move { Ok::<_, CacheError>(x * x) }
        });

        assert_eq!(square.call(Args::new().arg(3)).await.unwrap(), 9);
        assert_eq!(square.call(Args::new().arg(3)).await.unwrap(), 9);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        assert_eq!(square.call(Args::new().arg(4)).await.unwrap(), 16);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(backend.len().await, 2);
    }

    #[tokio::test]
    async fn test_falsy_is_miss_disabled() {
        let backend = Arc::new(MemoryBackend::new());
        let config = MemoizeConfig::builder().falsy_is_miss(false).build();
        let memoizer = Memoizer::with_config(backend, config).unwrap();
        let calls = AtomicUsize::new(0);

        let zero = memoizer.wrap("zero", |_args: Args| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<i64, CacheError>(0) }
        });

        zero.call(Args::new()).await.unwrap();
        zero.call(Args::new()).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_with_config_rejects_invalid() {
        let config = MemoizeConfig::builder().ttl(std::time::Duration::ZERO).build();
        let result = Memoizer::with_config(Arc::new(MemoryBackend::new()), config);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_cache_key_and_name() {
        let memoizer = Memoizer::new(Arc::new(MemoryBackend::new()));
        let f = memoizer.wrap("lookup", |_args: Args| async { Ok::<_, CacheError>(1) });

        assert_eq!(f.name(), "lookup");
        assert_eq!(f.cache_key(&Args::new().arg("id")).unwrap(), "lookup(\"id\")");
    }

    #[tokio::test]
    async fn test_undecodable_cached_value_is_an_error() {
        let backend = Arc::new(MemoryBackend::new());
        backend.set("f()", "not json".to_string()).await.unwrap();

        let memoizer = Memoizer::new(backend);
        let f = memoizer.wrap("f", |_args: Args| async { Ok::<_, CacheError>(1) });

        let err = f.call(Args::new()).await.unwrap_err();
        assert!(matches!(err, CacheError::SerializationError(_)));
    }

    #[tokio::test]
    async fn test_wrap_frozen_accepts_maps() {
        let backend = Arc::new(MemoryBackend::new());
        let memoizer = Memoizer::new(backend.clone());
        let calls = AtomicUsize::new(0);

        let size = memoizer.wrap_frozen("size", |args: Args| {
            calls.fetch_add(1, Ordering::SeqCst);
            let len = args.get(0).and_then(|v| v.as_frozen()).map_or(0, |m| m.len());
            async move { Ok::<_, CacheError>(len) }
        });

        let mut map = std::collections::HashMap::new();
        map.insert("a".to_string(), 1);
        assert_eq!(size.call(Args::new().arg(map.clone())).await.unwrap(), 1);
        assert_eq!(size.call(Args::new().arg(map.clone())).await.unwrap(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let key = size.cache_key(&Args::new().arg(map)).unwrap();
        assert_eq!(key, "size({\"a\": 1})");
        assert!(backend.contains_key(&key).await);
    }

    #[tokio::test]
    async fn test_wrap_still_rejects_maps() {
        let memoizer = Memoizer::new(Arc::new(MemoryBackend::new()));
        let size = memoizer.wrap("size", |_args: Args| async { Ok::<_, CacheError>(0) });

        let mut map = std::collections::HashMap::new();
        map.insert("a".to_string(), 1);
        assert!(size.cache_key(&Args::new().arg(map.clone())).is_err());

        let err = size.call(Args::new().arg(map)).await.unwrap_err();
        assert!(matches!(err, CacheError::Unhashable { kind: "map", .. }));
    }

    #[tokio::test]
    async fn test_unrepresentable_expiration_is_an_error() {
        let backend = Arc::new(MemoryBackend::new());
        let config = MemoizeConfig {
            ttl: std::time::Duration::from_secs(1_000_000_000_000_000),
            falsy_is_miss: true,
        };
        // Bypasses `with_config` validation; the store must still not panic
        let memoizer = Memoizer {
            backend: backend.clone(),
            config,
        };
        let f = memoizer.wrap("f", |_args: Args| async { Ok::<_, CacheError>(1) });

        let err = f.call(Args::new()).await.unwrap_err();
        assert!(matches!(err, CacheError::ConfigError(_)));
    }
}
