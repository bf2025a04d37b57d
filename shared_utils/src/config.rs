use thiserror::Error;

use crate::env::{get_env_var, get_env_var_or};

/// Errors related to application configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable required by the application is not set.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    /// An environment variable is set but its value could not be parsed.
    #[error("Invalid value {value:?} for environment variable {name}")]
    InvalidEnvVar {
        /// Name of the offending variable.
        name: String,
        /// The raw value that failed to parse.
        value: String,
    },
}

/// Process-level settings, assembled from the environment once at startup
/// and handed to components at construction.
#[derive(Debug, Clone)]
pub struct Settings {
    /// SQLite database URL/path holding the bar store.
    pub database_url: String,
    /// Redis URL for the fast series cache.
    pub redis_url: String,
    /// TTL applied to fast-cache entries, in seconds.
    pub cache_ttl_secs: u64,
}

impl Settings {
    /// Reads settings from the environment.
    ///
    /// `DATABASE_URL` is required; `REDIS_URL` and `SERIES_CACHE_TTL_SECS`
    /// fall back to local defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url =
            get_env_var("DATABASE_URL").map_err(|e| ConfigError::MissingEnvVar(e.0))?;
        let redis_url = get_env_var_or("REDIS_URL", "redis://127.0.0.1:6379");

        let ttl_raw = get_env_var_or("SERIES_CACHE_TTL_SECS", "86400");
        let cache_ttl_secs = ttl_raw
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidEnvVar {
                name: "SERIES_CACHE_TTL_SECS".to_string(),
                value: ttl_raw,
            })?;

        Ok(Self {
            database_url,
            redis_url,
            cache_ttl_secs,
        })
    }
}
