//! Application configuration loading and validation.
//!
//! Configuration is loaded from a TOML file; every section and field has a
//! default, so a missing section is fine but a present-and-invalid value is
//! rejected at startup.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};

use crate::cache::DEFAULT_CAPACITY;
use crate::domain::TtlPolicy;
use crate::error::{ConfigError, Result};
use crate::pipeline::DEFAULT_BATCH_SIZE;

/// Main application configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub cache: CacheConfig,
    pub logging: LoggingConfig,
}

/// HTTP server bind settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8080,
        }
    }
}

/// Upstream data source settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the upstream API.
    pub base_url: String,
    /// Upstream-imposed cap on ids per call.
    pub batch_size: usize,
    /// Fixed pause between consecutive batch calls, in milliseconds.
    pub pacing_delay_ms: u64,
    /// User-Agent header sent with upstream requests.
    pub user_agent: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://boardgamegeek.com".into(),
            batch_size: DEFAULT_BATCH_SIZE,
            pacing_delay_ms: 1_000,
            user_agent: concat!("tabletally/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

impl UpstreamConfig {
    pub fn pacing_delay(&self) -> Duration {
        Duration::from_millis(self.pacing_delay_ms)
    }
}

/// Cache sizing and TTL policy settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of cached entries.
    pub capacity: usize,
    /// TTL floor in days.
    pub base_ttl_days: i64,
    /// Additional TTL days per year of game age.
    pub ttl_days_per_year: i64,
    /// Publication year substituted when upstream reports an unparsable one.
    pub fallback_year: i32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            base_ttl_days: 30,
            ttl_days_per_year: 10,
            fallback_year: 2000,
        }
    }
}

impl CacheConfig {
    pub fn ttl_policy(&self) -> TtlPolicy {
        TtlPolicy {
            base_days: self.base_ttl_days,
            per_year_days: self.ttl_days_per_year,
            fallback_year: self.fallback_year,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}

impl LoggingConfig {
    /// Initialize the tracing subscriber with this logging configuration.
    pub fn init(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        match self.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}

impl Config {
    /// Load and validate configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.upstream.base_url.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "base_url",
                reason: "cannot be empty".into(),
            }
            .into());
        }
        if self.upstream.batch_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "batch_size",
                reason: "must be at least 1".into(),
            }
            .into());
        }
        if self.cache.capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "capacity",
                reason: "must be at least 1".into(),
            }
            .into());
        }
        Ok(())
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}
