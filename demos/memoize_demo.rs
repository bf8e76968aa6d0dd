//! Memoization Demo Application
//!
//! Wraps a slow function, calls it repeatedly and shows which calls were
//! served from the cache.
//!
//! Usage:
//!   cargo run --example memoize_demo
//!   cargo run --example memoize_demo --features redis-cache   (uses Redis)
//!
//! Environment variables:
//!   REDIS_URL                 - Redis connection URL (default: redis://127.0.0.1:6379)
//!   MEMO_CACHE_TTL_SECS       - entry lifetime in seconds (default: 3600)
//!   MEMO_CACHE_FALSY_IS_MISS  - recompute cached falsy values (default: true)
//!   RUST_LOG                  - log filter (default: info,memo_cache=debug)

use memo_cache::{Args, CacheBackend, MemoizeConfig, Memoizer, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[cfg(feature = "redis-cache")]
async fn backend() -> anyhow::Result<Arc<dyn CacheBackend>> {
    Ok(Arc::new(memo_cache::RedisBackend::from_env().await?))
}

#[cfg(not(feature = "redis-cache"))]
async fn backend() -> anyhow::Result<Arc<dyn CacheBackend>> {
    Ok(Arc::new(memo_cache::MemoryBackend::new()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,memo_cache=debug")),
        )
        .init();

    info!("=== Memoization Demo ===");

    let config = MemoizeConfig::from_env()?;
    let memoizer = Memoizer::with_config(backend().await?, config)?;

    let price = memoizer.wrap_frozen("price", |args: Args| async move {
        // Stand-in for a slow upstream lookup
        tokio::time::sleep(Duration::from_millis(300)).await;

        let sku = args.get(0).and_then(Value::as_str).unwrap_or_default().to_string();
        let discount = args
            .kw("options")
            .and_then(Value::as_frozen)
            .and_then(|options| options.get("discount"))
            .and_then(Value::as_f64)
            .unwrap_or(0.0);

        Ok::<_, anyhow::Error>((sku.len() as f64 * 10.0) * (1.0 - discount))
    });

    let mut options = HashMap::new();
    options.insert("discount".to_string(), Value::Float(0.25));

    for attempt in 1..=3 {
        let started = Instant::now();
        let value = price
            .call(Args::new().arg("widget").kwarg("options", options.clone()))
            .await?;
        info!(
            "attempt {}: price = {:.2} ({} ms)",
            attempt,
            value,
            started.elapsed().as_millis()
        );
    }

    info!("\n--- Falsy results are recomputed ---");
    let zero = memoizer.wrap("zero", |_args: Args| async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        Ok::<i64, anyhow::Error>(0)
    });

    for attempt in 1..=2 {
        let started = Instant::now();
        let value = zero.call(Args::new()).await?;
        info!(
            "attempt {}: zero = {} ({} ms)",
            attempt,
            value,
            started.elapsed().as_millis()
        );
    }

    Ok(())
}
