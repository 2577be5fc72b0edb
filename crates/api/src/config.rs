//! # API Configuration Module
//!
//! This module loads configuration for the Chairbook API server from
//! environment variables, with defaults where appropriate.
//!
//! ## Environment Variables
//!
//! - `API_HOST`: The host address to bind the server to (default: "0.0.0.0")
//! - `API_PORT`: The port to listen on (default: 3000)
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `API_CORS_ORIGINS`: Comma-separated list of allowed CORS origins
//! - `API_REQUEST_TIMEOUT_SECONDS`: Per-request timeout (default: 30)
//! - `DB_MAX_CONNECTIONS`: Connection pool size (default: 5)
//! - `DB_ACQUIRE_TIMEOUT_SECONDS`: Wait for a pooled connection (default: 5)
//! - `DB_STATEMENT_TIMEOUT_MS`: Server-side statement timeout (default: 5000)

use std::env;
use std::str::FromStr;
use std::time::Duration;

use chairbook_db::PoolSettings;
use eyre::{Result, WrapErr};
use tracing::Level;

/// Configuration for the Chairbook API server
///
/// # Example
///
/// ```no_run
/// use eyre::Result;
/// use chairbook_api::config::ApiConfig;
///
/// fn example() -> Result<()> {
///     let config = ApiConfig::from_env()?;
///     println!("Starting server on {}", config.server_addr());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address for the API server (e.g., "127.0.0.1", "0.0.0.0")
    pub host: String,

    /// Port for the API server to listen on
    pub port: u16,

    /// PostgreSQL database connection string
    pub database_url: String,

    /// Log level for the application
    pub log_level: Level,

    /// CORS allowed origins (optional)
    pub cors_origins: Option<Vec<String>>,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// Maximum number of pooled database connections
    pub db_max_connections: u32,

    /// Seconds to wait for a free database connection
    pub db_acquire_timeout: u64,

    /// Milliseconds before the database cancels a statement
    pub db_statement_timeout_ms: u64,
}

impl ApiConfig {
    /// Creates a new ApiConfig from environment variables
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The DATABASE_URL environment variable is not set
    /// - A numeric setting cannot be parsed
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Network settings
        let host = var("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or(&var, "API_PORT", 3000)?;

        // Database settings
        let database_url = var("DATABASE_URL")
            .ok_or_else(|| eyre::eyre!("DATABASE_URL environment variable must be set"))?;
        let db_max_connections = parse_or(&var, "DB_MAX_CONNECTIONS", 5)?;
        let db_acquire_timeout = parse_or(&var, "DB_ACQUIRE_TIMEOUT_SECONDS", 5)?;
        let db_statement_timeout_ms = parse_or(&var, "DB_STATEMENT_TIMEOUT_MS", 5000)?;

        // Logging settings
        let log_level = match var("LOG_LEVEL").unwrap_or_else(|| "info".to_string()).as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };

        // CORS settings
        let cors_origins = var("API_CORS_ORIGINS").map(|origins| {
            origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        });

        // Performance settings
        let request_timeout = parse_or(&var, "API_REQUEST_TIMEOUT_SECONDS", 30)?;

        Ok(Self {
            host,
            port,
            database_url,
            log_level,
            cors_origins,
            request_timeout,
            db_max_connections,
            db_acquire_timeout,
            db_statement_timeout_ms,
        })
    }

    /// Returns the server address as a string (e.g., "127.0.0.1:8080")
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Connection pool limits derived from the `DB_*` settings.
    pub fn pool_settings(&self) -> PoolSettings {
        PoolSettings {
            max_connections: self.db_max_connections,
            acquire_timeout: Duration::from_secs(self.db_acquire_timeout),
            statement_timeout: Duration::from_millis(self.db_statement_timeout_ms),
        }
    }
}

fn parse_or<F, T>(var: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .wrap_err_with(|| format!("Invalid {key} value: {raw}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config =
            ApiConfig::from_vars(vars(&[("DATABASE_URL", "postgres://localhost/chairbook")]))
                .unwrap();

        assert_eq!(config.server_addr(), "0.0.0.0:3000");
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.cors_origins, None);
        assert_eq!(config.request_timeout, 30);

        let pool = config.pool_settings();
        assert_eq!(pool.max_connections, 5);
        assert_eq!(pool.acquire_timeout, Duration::from_secs(5));
        assert_eq!(pool.statement_timeout, Duration::from_millis(5000));
    }

    #[test]
    fn test_overrides() {
        let config = ApiConfig::from_vars(vars(&[
            ("DATABASE_URL", "postgres://db/chairbook"),
            ("API_HOST", "127.0.0.1"),
            ("API_PORT", "8080"),
            ("LOG_LEVEL", "debug"),
            ("API_CORS_ORIGINS", "http://a.test, http://b.test,"),
            ("DB_STATEMENT_TIMEOUT_MS", "250"),
        ]))
        .unwrap();

        assert_eq!(config.server_addr(), "127.0.0.1:8080");
        assert_eq!(config.log_level, Level::DEBUG);
        assert_eq!(
            config.cors_origins,
            Some(vec!["http://a.test".to_string(), "http://b.test".to_string()])
        );
        assert_eq!(config.pool_settings().statement_timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_missing_database_url_and_bad_numbers_fail() {
        assert!(ApiConfig::from_vars(vars(&[])).is_err());
        let bad_port = vars(&[("DATABASE_URL", "postgres://x"), ("API_PORT", "eighty")]);
        assert!(ApiConfig::from_vars(bad_port).is_err());
    }
}
