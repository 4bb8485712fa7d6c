use std::time::Duration;

use crate::retry::RetryConfig;
use crate::walker::RecordErrorPolicy;

/// Default upstream catalog endpoint.
pub const DEFAULT_CATALOG_BASE_URL: &str = "https://rickandmortyapi.com/api/character";

/// Invalid or missing sync configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} must be a whole number of seconds, got '{value}'")]
    InvalidSeconds { key: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

/// Sync run configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Catalog endpoint; the seed query is appended to it.
    pub catalog_base_url: String,
    /// Timeout for a single catalog request.
    pub http_timeout: Duration,
    /// Backoff schedule applied to every page fetch.
    pub retry: RetryConfig,
    /// Handling of eligible records that fail validation.
    pub record_policy: RecordErrorPolicy,
}

impl SyncConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                                     |
    /// |-----------------------------|---------------------------------------------|
    /// | `DATABASE_URL`              | required                                    |
    /// | `CATALOG_BASE_URL`          | `https://rickandmortyapi.com/api/character` |
    /// | `SYNC_HTTP_TIMEOUT_SECS`    | `20` (must be > 0)                          |
    /// | `SYNC_RETRY_MIN_DELAY_SECS` | `1` (must be > 0)                           |
    /// | `SYNC_RETRY_MAX_DELAY_SECS` | `60` (must be > 0)                          |
    /// | `SYNC_RETRY_BUDGET_SECS`    | `120`                                       |
    /// | `SYNC_SKIP_INVALID`         | `false`                                     |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let catalog_base_url =
            lookup("CATALOG_BASE_URL").unwrap_or_else(|| DEFAULT_CATALOG_BASE_URL.into());

        let defaults = RetryConfig::default();
        let retry = RetryConfig {
            initial_delay: positive_secs(
                &lookup,
                "SYNC_RETRY_MIN_DELAY_SECS",
                defaults.initial_delay,
            )?,
            max_delay: positive_secs(&lookup, "SYNC_RETRY_MAX_DELAY_SECS", defaults.max_delay)?,
            budget: secs(&lookup, "SYNC_RETRY_BUDGET_SECS", defaults.budget)?,
            ..defaults
        };

        let record_policy = match lookup("SYNC_SKIP_INVALID").as_deref() {
            Some("1" | "true" | "TRUE" | "True") => RecordErrorPolicy::Skip,
            _ => RecordErrorPolicy::Abort,
        };

        Ok(Self {
            database_url,
            catalog_base_url,
            http_timeout: positive_secs(
                &lookup,
                "SYNC_HTTP_TIMEOUT_SECS",
                Duration::from_secs(20),
            )?,
            retry,
            record_policy,
        })
    }
}

fn secs<F>(lookup: &F, key: &'static str, default: Duration) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Duration::from_secs)
            .map_err(|_| ConfigError::InvalidSeconds { key, value: raw }),
        None => Ok(default),
    }
}

fn positive_secs<F>(
    lookup: &F,
    key: &'static str,
    default: Duration,
) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = secs(lookup, key, default)?;
    if value.is_zero() {
        return Err(ConfigError::Zero(key));
    }
    Ok(value)
}
