//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `FAKESTORE_API_URL` - Catalog API base URL (default: <https://fakestoreapi.com>)
//! - `FAKESTORE_CACHE_TTL_SECS` - Freshness window for cached catalog reads (default: 60, at most one year)
//! - `FAKESTORE_CACHE_CAPACITY` - Maximum cached catalog entries (default: 1000)
//! - `FAKESTORE_REQUEST_TIMEOUT_SECS` - Catalog request timeout (default: 30)
//! - `FAKESTORE_DATA_DIR` - Directory for the wishlist mirror (default: .fakestore)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "https://fakestoreapi.com";
const DEFAULT_CACHE_TTL_SECS: u64 = 60;
const DEFAULT_CACHE_CAPACITY: u64 = 1000;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_DATA_DIR: &str = ".fakestore";

/// Longest accepted freshness window for cached catalog reads (one year).
pub const MAX_CACHE_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Remote catalog API configuration
    pub catalog: CatalogConfig,
    /// Directory holding the local storage files
    pub data_dir: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Remote catalog API configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL; `products` and `products/{id}` are resolved against it
    pub base_url: Url,
    /// How long a cached read stays fresh
    pub cache_ttl: Duration,
    /// Maximum number of cached query results
    pub cache_capacity: u64,
    /// Per-request timeout
    pub request_timeout: Duration,
}

impl Default for CatalogConfig {
    #[allow(clippy::unwrap_used)] // DEFAULT_API_URL is a valid absolute URL
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_API_URL).unwrap(),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl CatalogConfig {
    /// Catalog configuration pointing at `base_url` with default cache settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `base_url` is not a valid absolute URL.
    pub fn with_base_url(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url("FAKESTORE_API_URL", base_url)?,
            ..Self::default()
        })
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let catalog = CatalogConfig::from_env()?;
        let data_dir = PathBuf::from(get_env_or_default("FAKESTORE_DATA_DIR", DEFAULT_DATA_DIR));

        Ok(Self {
            catalog,
            data_dir,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }
}

impl CatalogConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let base_url = parse_base_url(
            "FAKESTORE_API_URL",
            &get_env_or_default("FAKESTORE_API_URL", DEFAULT_API_URL),
        )?;
        let cache_ttl = check_cache_ttl(
            "FAKESTORE_CACHE_TTL_SECS",
            get_parsed_env("FAKESTORE_CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS)?,
        )?;
        let cache_capacity = get_parsed_env("FAKESTORE_CACHE_CAPACITY", DEFAULT_CACHE_CAPACITY)?;
        let request_timeout = Duration::from_secs(get_parsed_env(
            "FAKESTORE_REQUEST_TIMEOUT_SECS",
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )?);

        Ok(Self {
            base_url,
            cache_ttl,
            cache_capacity,
            request_timeout,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn get_parsed_env<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_optional_env(key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

/// Reject freshness windows longer than [`MAX_CACHE_TTL`].
fn check_cache_ttl(key: &str, secs: u64) -> Result<Duration, ConfigError> {
    let ttl = Duration::from_secs(secs);
    if ttl > MAX_CACHE_TTL {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be at most {} seconds", MAX_CACHE_TTL.as_secs()),
        ));
    }
    Ok(ttl)
}

/// Parse a base URL, making sure relative joins keep its path.
///
/// `Url::join` replaces the last path segment unless the path ends in `/`,
/// so `http://host/api` becomes `http://host/api/`.
fn parse_base_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    let mut url =
        Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be an absolute http(s) URL".to_string(),
        ));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
