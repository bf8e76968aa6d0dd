//! Configuration for memoized functions

use crate::error::{CacheError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable holding the TTL in seconds
pub const ENV_TTL_SECS: &str = "MEMO_CACHE_TTL_SECS";

/// Environment variable toggling falsy-as-miss (`true`/`false`)
pub const ENV_FALSY_IS_MISS: &str = "MEMO_CACHE_FALSY_IS_MISS";

/// Configuration for a [`Memoizer`](crate::Memoizer)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoizeConfig {
    /// Time from store until the entry expires
    /// Absolute: a hit does not push the expiration back
    pub ttl: Duration,

    /// Treat a cached falsy value (`0`, `""`, `false`, `null`, `[]`, `{}`)
    /// as a miss and recompute it
    pub falsy_is_miss: bool,
}

impl Default for MemoizeConfig {
    fn default() -> Self {
        Self {
            // 1 hour
            ttl: Duration::from_secs(3600),
            falsy_is_miss: true,
        }
    }
}

impl MemoizeConfig {
    /// Create a new builder for memoize configuration
    pub fn builder() -> MemoizeConfigBuilder {
        MemoizeConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.ttl.is_zero() {
            return Err(CacheError::ConfigError(
                "ttl must be greater than 0".to_string(),
            ));
        }

        self.expiration_from(Utc::now())?;
        Ok(())
    }

    /// Absolute expiration of an entry stored at `now`
    pub fn expiration_from(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
        now.checked_add_signed(self.chrono_ttl()?).ok_or_else(|| {
            CacheError::ConfigError(format!("ttl of {:?} overflows the expiration time", self.ttl))
        })
    }

    /// The TTL as a chrono duration, for computing absolute expirations
    pub fn chrono_ttl(&self) -> Result<chrono::Duration> {
        chrono::Duration::from_std(self.ttl)
            .map_err(|e| CacheError::ConfigError(format!("ttl out of range: {}", e)))
    }

    /// Load configuration from the environment
    ///
    /// A `.env` file is read first if present. Unset variables keep their
    /// defaults; unparseable ones are an error.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut builder = Self::builder();

        if let Some(raw) = lookup(ENV_TTL_SECS) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                CacheError::ConfigError(format!("{} must be an integer, got {:?}", ENV_TTL_SECS, raw))
            })?;
            builder = builder.ttl(Duration::from_secs(secs));
        }

        if let Some(raw) = lookup(ENV_FALSY_IS_MISS) {
            let flag: bool = raw.trim().parse().map_err(|_| {
                CacheError::ConfigError(format!("{} must be true or false, got {:?}", ENV_FALSY_IS_MISS, raw))
            })?;
            builder = builder.falsy_is_miss(flag);
        }

        let config = builder.build();
        config.validate()?;
        Ok(config)
    }
}

/// Builder for memoize configuration
#[derive(Debug, Default)]
pub struct MemoizeConfigBuilder {
    ttl: Option<Duration>,
    falsy_is_miss: Option<bool>,
}

impl MemoizeConfigBuilder {
    /// Set the time-to-live of stored entries
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Enable or disable falsy-as-miss
    pub fn falsy_is_miss(mut self, enable: bool) -> Self {
        self.falsy_is_miss = Some(enable);
        self
    }

    /// Build the configuration
    pub fn build(self) -> MemoizeConfig {
        let defaults = MemoizeConfig::default();

        MemoizeConfig {
            ttl: self.ttl.unwrap_or(defaults.ttl),
            falsy_is_miss: self.falsy_is_miss.unwrap_or(defaults.falsy_is_miss),
        }
    }
}
