//! Engine configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `SYNC_COUNTRY_CODE` - Country calling code for phone canonicalization
//!   (default: 961)
//! - `SYNC_DUPLICATE_WINDOW_DAYS` - Window for the fuzzy duplicate check
//!   (default: 7)
//! - `SHEETS_BASE_URL` - Base URL for the spreadsheet export endpoint
//!   (default: <https://docs.google.com>)
//! - `SHEETS_TIMEOUT_SECS` - HTTP timeout for the export fetch (default: 30)

use thiserror::Error;

use crate::classify::DEFAULT_DUPLICATE_WINDOW_DAYS;

/// Default base URL of the public spreadsheet export.
pub const DEFAULT_SHEETS_BASE_URL: &str = "https://docs.google.com";

/// Default HTTP timeout for one export fetch, in seconds.
pub const DEFAULT_SHEETS_TIMEOUT_SECS: u64 = 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Tuning knobs for the sync engine.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Country calling code prepended to domestic phone numbers.
    pub country_code: String,
    /// Fuzzy duplicate window, in days.
    pub duplicate_window_days: i64,
    /// Base URL for the spreadsheet export endpoint.
    pub sheets_base_url: String,
    /// HTTP timeout for one export fetch, in seconds.
    pub sheets_timeout_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            country_code: cedar_core::phone::DEFAULT_COUNTRY_CODE.to_owned(),
            duplicate_window_days: DEFAULT_DUPLICATE_WINDOW_DAYS,
            sheets_base_url: DEFAULT_SHEETS_BASE_URL.to_owned(),
            sheets_timeout_secs: DEFAULT_SHEETS_TIMEOUT_SECS,
        }
    }
}

impl SyncConfig {
    /// Load engine configuration from environment variables, falling back to
    /// defaults for anything unset.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if a set variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let country_code =
            get_env_or_default("SYNC_COUNTRY_CODE", &defaults.country_code);
        let duplicate_window_days = parse_env_or(
            "SYNC_DUPLICATE_WINDOW_DAYS",
            defaults.duplicate_window_days,
        )?;
        let sheets_base_url =
            get_env_or_default("SHEETS_BASE_URL", &defaults.sheets_base_url);
        let sheets_timeout_secs =
            parse_env_or("SHEETS_TIMEOUT_SECS", defaults.sheets_timeout_secs)?;

        Ok(Self {
            country_code,
            duplicate_window_days,
            sheets_base_url,
            sheets_timeout_secs,
        })
    }
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Parse an environment variable, falling back to a default when unset.
fn parse_env_or<T: std::str::FromStr>(key: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_owned(), e.to_string())),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SyncConfig::default();
        assert_eq!(config.country_code, "961");
        assert_eq!(config.duplicate_window_days, 7);
        assert_eq!(config.sheets_base_url, "https://docs.google.com");
        assert_eq!(config.sheets_timeout_secs, 30);
    }
}
