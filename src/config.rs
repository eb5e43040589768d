//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the server starts.
//!
//! ## Cache Backend Selection
//!
//! Redis is used when either form of connection settings is present:
//!
//! ```bash
//! export REDIS_URL="redis://localhost:6379/0"
//! # or
//! export REDIS_HOST="localhost"
//! export REDIS_PORT="6379"
//! export REDIS_PASSWORD=""
//! export REDIS_DB="0"
//! ```
//!
//! Without them, responses are cached as files under `CACHE_DIR`.
//!
//! ## Required Variables
//!
//! - `TMDB_KEY` - TMDB v3 API key
//!
//! ## Optional Variables
//!
//! - `PORT` - Listen port (default: `8080`)
//! - `LISTEN_HOST` - Bind host (default: `0.0.0.0`)
//! - `TMDB_BASE_URL` - Upstream base URL (default: `https://api.themoviedb.org/3`)
//! - `UPSTREAM_TIMEOUT_SECONDS` - Upstream request timeout (default: 10)
//! - `CACHE_TTL_SECONDS` - Entry lifetime (default: 86400)
//! - `REDIS_OP_TIMEOUT_MS` - Per-command Redis timeout (default: 500)
//! - `CACHE_DIR` - File cache directory (default: `cache`)
//! - `CACHE_SWEEP_INTERVAL_SECONDS` - File cache sweep period, 0 disables (default: 0)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)

use anyhow::{Context, Result};
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::infrastructure::tmdb::DEFAULT_BASE_URL;

/// Cache backend chosen for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheBackendConfig {
    Redis { url: String, op_timeout: Duration },
    File { dir: PathBuf },
}

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_host: String,
    pub port: u16,
    /// Loaded from `TMDB_KEY`. Never logged.
    pub tmdb_api_key: String,
    pub tmdb_base_url: String,
    pub upstream_timeout_seconds: u64,
    pub cache_ttl_seconds: u64,
    pub redis_url: Option<String>,
    pub redis_op_timeout_ms: u64,
    pub cache_dir: PathBuf,
    /// Has no effect when Redis is configured.
    pub cache_sweep_interval_seconds: u64,
    pub log_level: String,
    pub log_format: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `TMDB_KEY` is missing or a numeric variable does not parse.
    pub fn from_env() -> Result<Self> {
        let tmdb_api_key = env::var("TMDB_KEY").context("TMDB_KEY must be set")?;

        let redis_url = Self::load_redis_url();

        let listen_host = env::var("LISTEN_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let tmdb_base_url =
            env::var("TMDB_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let cache_dir = env::var("CACHE_DIR").unwrap_or_else(|_| "cache".to_string());
        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        Ok(Self {
            listen_host,
            port: parse_var("PORT", 8080)?,
            tmdb_api_key,
            tmdb_base_url,
            upstream_timeout_seconds: parse_var("UPSTREAM_TIMEOUT_SECONDS", 10)?,
            cache_ttl_seconds: parse_var("CACHE_TTL_SECONDS", 86_400)?,
            redis_url,
            redis_op_timeout_ms: parse_var("REDIS_OP_TIMEOUT_MS", 500)?,
            cache_dir: PathBuf::from(cache_dir),
            cache_sweep_interval_seconds: parse_var("CACHE_SWEEP_INTERVAL_SECONDS", 0)?,
            log_level,
            log_format,
        })
    }

    /// Loads Redis URL with fallback to component-based configuration.
    ///
    /// Priority:
    /// 1. `REDIS_URL` environment variable
    /// 2. Constructed from `REDIS_HOST`, `REDIS_PORT`, `REDIS_PASSWORD`, `REDIS_DB`
    ///
    /// The password is percent-encoded into the userinfo.
    ///
    /// Returns `None` if Redis is not configured.
    fn load_redis_url() -> Option<String> {
        if let Ok(url) = env::var("REDIS_URL") {
            return Some(url);
        }

        let host = env::var("REDIS_HOST").ok().filter(|h| !h.is_empty())?;
        let port = env::var("REDIS_PORT").unwrap_or_else(|_| "6379".to_string());
        let password = env::var("REDIS_PASSWORD").ok();
        let db = env::var("REDIS_DB").unwrap_or_else(|_| "0".to_string());

        let url = match password {
            // Empty password means no authentication
            Some(pwd) if !pwd.is_empty() => format!(
                "redis://:{}@{}:{}/{}",
                utf8_percent_encode(&pwd, NON_ALPHANUMERIC),
                host,
                port,
                db
            ),
            _ => format!("redis://{}:{}/{}", host, port, db),
        };

        Some(url)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `TMDB_KEY` is empty
    /// - `TMDB_BASE_URL` is not an http(s) URL
    /// - any timeout or the cache TTL is zero
    /// - `log_format` is not `text` or `json`
    /// - `REDIS_URL` has an unknown scheme
    pub fn validate(&self) -> Result<()> {
        if self.tmdb_api_key.trim().is_empty() {
            anyhow::bail!("TMDB_KEY must not be empty");
        }

        if !self.tmdb_base_url.starts_with("http://") && !self.tmdb_base_url.starts_with("https://")
        {
            anyhow::bail!(
                "TMDB_BASE_URL must start with 'http://' or 'https://', got '{}'",
                self.tmdb_base_url
            );
        }

        if self.upstream_timeout_seconds == 0 {
            anyhow::bail!("UPSTREAM_TIMEOUT_SECONDS must be greater than 0");
        }

        if self.cache_ttl_seconds == 0 {
            anyhow::bail!("CACHE_TTL_SECONDS must be greater than 0");
        }

        if self.redis_op_timeout_ms == 0 {
            anyhow::bail!("REDIS_OP_TIMEOUT_MS must be greater than 0");
        }

        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if let Some(ref redis_url) = self.redis_url
            && !redis_url.starts_with("redis://")
            && !redis_url.starts_with("rediss://")
        {
            anyhow::bail!(
                "REDIS_URL must start with 'redis://' or 'rediss://', got '{}'",
                mask_connection_string(redis_url)
            );
        }

        if self.redis_url.is_none() && self.cache_dir.as_os_str().is_empty() {
            anyhow::bail!("CACHE_DIR must not be empty");
        }

        Ok(())
    }

    /// Bind address in `host:port` form.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.listen_host, self.port)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_seconds)
    }

    /// Sweep period for the file cache, `None` when disabled.
    pub fn sweep_interval(&self) -> Option<Duration> {
        (self.cache_sweep_interval_seconds > 0)
            .then(|| Duration::from_secs(self.cache_sweep_interval_seconds))
    }

    /// Picks the cache backend: Redis when configured, local files otherwise.
    pub fn cache_backend(&self) -> CacheBackendConfig {
        match &self.redis_url {
            Some(url) => CacheBackendConfig::Redis {
                url: url.clone(),
                op_timeout: Duration::from_millis(self.redis_op_timeout_ms),
            },
            None => CacheBackendConfig::File {
                dir: self.cache_dir.clone(),
            },
        }
    }

    /// Prints configuration summary (without sensitive data).
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr());
        tracing::info!("  Upstream: {}", self.tmdb_base_url);
        tracing::info!("  Upstream timeout: {}s", self.upstream_timeout_seconds);
        tracing::info!("  Cache TTL: {}s", self.cache_ttl_seconds);

        match self.cache_backend() {
            CacheBackendConfig::Redis { url, .. } => {
                tracing::info!("  Cache: Redis at {}", mask_connection_string(&url));
            }
            CacheBackendConfig::File { dir } => {
                tracing::info!("  Cache: files in {}", dir.display());
            }
        }

        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
    }
}

/// Reads a numeric variable, falling back to `default` when unset.
fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a valid number, got '{}'", name, raw)),
        Err(_) => Ok(default),
    }
}

/// Masks sensitive information in connection strings for logging.
///
/// `redis://:password@host:port/db` → `redis://:***@host:port/db`
pub fn mask_connection_string(url: &str) -> String {
    if let Some(start) = url.find("://") {
        let scheme_end = start + 3;
        let rest = &url[scheme_end..];

        if let Some(at_pos) = rest.find('@') {
            let credentials = &rest[..at_pos];
            let host_part = &rest[at_pos..];

            if let Some(colon_pos) = credentials.rfind(':') {
                let username = &credentials[..colon_pos];
                return format!("{}://{}:***{}", &url[..start], username, host_part);
            }
        }
    }

    url.to_string()
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if required variables are missing or validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}

/// Directory and TTL of the file cache, as the server would use them.
///
/// Needs no `TMDB_KEY`, so maintenance tools can open the cache on their own.
///
/// # Errors
///
/// Returns an error if `CACHE_TTL_SECONDS` does not parse or is zero, or if
/// `CACHE_DIR` is empty.
pub fn load_file_cache_settings() -> Result<(PathBuf, Duration)> {
    let dir = PathBuf::from(env::var("CACHE_DIR").unwrap_or_else(|_| "cache".to_string()));
    let ttl_seconds: u64 = parse_var("CACHE_TTL_SECONDS", 86_400)?;

    if ttl_seconds == 0 {
        anyhow::bail!("CACHE_TTL_SECONDS must be greater than 0");
    }
    if dir.as_os_str().is_empty() {
        anyhow::bail!("CACHE_DIR must not be empty");
    }

    Ok((dir, Duration::from_secs(ttl_seconds)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const MANAGED_VARS: &[&str] = &[
        "TMDB_KEY",
        "PORT",
        "CACHE_TTL_SECONDS",
        "REDIS_URL",
        "REDIS_HOST",
        "REDIS_PORT",
        "REDIS_PASSWORD",
        "REDIS_DB",
        "CACHE_DIR",
    ];

    fn clear_env() {
        // SAFETY: Tests touching the environment are run serially via #[serial]
        unsafe {
            for var in MANAGED_VARS {
                env::remove_var(var);
            }
        }
    }

    fn test_config() -> Config {
        Config {
            listen_host: "0.0.0.0".to_string(),
            port: 8080,
            tmdb_api_key: "test-key".to_string(),
            tmdb_base_url: DEFAULT_BASE_URL.to_string(),
            upstream_timeout_seconds: 10,
            cache_ttl_seconds: 86_400,
            redis_url: None,
            redis_op_timeout_ms: 500,
            cache_dir: PathBuf::from("cache"),
            cache_sweep_interval_seconds: 0,
            log_level: "info".to_string(),
            log_format: "text".to_string(),
        }
    }

    #[test]
    fn test_mask_connection_string() {
        assert_eq!(
            mask_connection_string("redis://:password@localhost:6379/0"),
            "redis://:***@localhost:6379/0"
        );

        assert_eq!(
            mask_connection_string("redis://localhost:6379/0"),
            "redis://localhost:6379/0"
        );
    }

    #[test]
    fn test_config_validation() {
        let mut config = test_config();
        assert!(config.validate().is_ok());

        config.tmdb_api_key = "  ".to_string();
        assert!(config.validate().is_err());
        config.tmdb_api_key = "test-key".to_string();

        config.cache_ttl_seconds = 0;
        assert!(config.validate().is_err());
        config.cache_ttl_seconds = 60;

        config.log_format = "invalid".to_string();
        assert!(config.validate().is_err());
        config.log_format = "json".to_string();
        assert!(config.validate().is_ok());

        config.tmdb_base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
        config.tmdb_base_url = DEFAULT_BASE_URL.to_string();

        config.redis_url = Some("memcached://localhost".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cache_backend_selection() {
        let mut config = test_config();
        assert_eq!(
            config.cache_backend(),
            CacheBackendConfig::File {
                dir: PathBuf::from("cache")
            }
        );

        config.redis_url = Some("redis://localhost:6379/0".to_string());
        assert_eq!(
            config.cache_backend(),
            CacheBackendConfig::Redis {
                url: "redis://localhost:6379/0".to_string(),
                op_timeout: Duration::from_millis(500),
            }
        );
    }

    #[test]
    fn test_sweep_interval_disabled_by_zero() {
        let mut config = test_config();
        assert_eq!(config.sweep_interval(), None);

        config.cache_sweep_interval_seconds = 300;
        assert_eq!(config.sweep_interval(), Some(Duration::from_secs(300)));
    }

    #[test]
    #[serial]
    fn test_missing_tmdb_key_is_an_error() {
        clear_env();

        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("TMDB_KEY"));
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        // SAFETY: Tests are run serially due to #[serial], so no concurrent access
        unsafe {
            env::set_var("TMDB_KEY", "abc");
        }

        let config = Config::from_env().unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.cache_ttl_seconds, 86_400);
        assert_eq!(config.redis_url, None);
        assert_eq!(config.listen_addr(), "0.0.0.0:8080");

        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_number_is_an_error() {
        clear_env();
        // SAFETY: Tests are run serially
        unsafe {
            env::set_var("TMDB_KEY", "abc");
            env::set_var("PORT", "eighty");
        }

        assert!(Config::from_env().is_err());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_load_redis_url_from_components() {
        clear_env();
        // SAFETY: Tests are run serially due to #[serial], so no concurrent access
        unsafe {
            env::set_var("REDIS_HOST", "redis-host");
            env::set_var("REDIS_PORT", "6380");
            env::set_var("REDIS_DB", "1");
        }

        let url = Config::load_redis_url().unwrap();
        assert_eq!(url, "redis://redis-host:6380/1");

        unsafe {
            env::set_var("REDIS_PASSWORD", "secret");
        }
        let url = Config::load_redis_url().unwrap();
        assert_eq!(url, "redis://:secret@redis-host:6380/1");

        // Empty password means no authentication
        unsafe {
            env::set_var("REDIS_PASSWORD", "");
        }
        let url = Config::load_redis_url().unwrap();
        assert_eq!(url, "redis://redis-host:6380/1");

        clear_env();
    }

    #[test]
    #[serial]
    fn test_redis_password_with_reserved_characters() {
        use redis::{ConnectionAddr, IntoConnectionInfo};

        clear_env();
        // SAFETY: Tests are run serially due to #[serial], so no concurrent access
        unsafe {
            env::set_var("REDIS_HOST", "cache.internal");
            env::set_var("REDIS_PASSWORD", "p/ss#word?%40");
        }

        let url = Config::load_redis_url().unwrap();
        assert_eq!(
            url,
            "redis://:p%2Fss%23word%3F%2540@cache.internal:6379/0"
        );

        let info = url.as_str().into_connection_info().unwrap();
        assert!(matches!(
            info.addr(),
            ConnectionAddr::Tcp(host, 6379) if host == "cache.internal"
        ));
        assert_eq!(info.redis_settings().password(), Some("p/ss#word?%40"));
        assert_eq!(info.redis_settings().db(), 0);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_redis_url_priority() {
        clear_env();
        // SAFETY: Tests are run serially
        unsafe {
            env::set_var("REDIS_URL", "redis://from-url:6379/0");
            env::set_var("REDIS_HOST", "from-components");
        }

        let url = Config::load_redis_url().unwrap();
        assert!(url.contains("from-url"));
        assert!(!url.contains("from-components"));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_file_cache_settings() {
        clear_env();

        let (dir, ttl) = load_file_cache_settings().unwrap();
        assert_eq!(dir, PathBuf::from("cache"));
        assert_eq!(ttl, Duration::from_secs(86_400));

        // SAFETY: Tests are run serially due to #[serial], so no concurrent access
        unsafe {
            env::set_var("CACHE_DIR", "/var/cache/tmdb");
            env::set_var("CACHE_TTL_SECONDS", "60");
        }
        let (dir, ttl) = load_file_cache_settings().unwrap();
        assert_eq!(dir, PathBuf::from("/var/cache/tmdb"));
        assert_eq!(ttl, Duration::from_secs(60));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_file_cache_settings_reject_zero_ttl() {
        clear_env();
        // SAFETY: Tests are run serially due to #[serial], so no concurrent access
        unsafe {
            env::set_var("CACHE_TTL_SECONDS", "0");
        }

        let err = load_file_cache_settings().unwrap_err();
        assert!(err.to_string().contains("CACHE_TTL_SECONDS"));

        unsafe {
            env::set_var("CACHE_TTL_SECONDS", "soon");
        }
        assert!(load_file_cache_settings().is_err());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_no_redis_host_selects_file_backend() {
        clear_env();
        assert_eq!(Config::load_redis_url(), None);
    }
}
