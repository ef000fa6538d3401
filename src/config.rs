//! Configuration handling for the items server.
//!
//! This module provides configuration management via CLI arguments and environment variables.

use clap::Parser;
use std::time::Duration;

pub const DEFAULT_HTTP_HOST: &str = "127.0.0.1";
pub const DEFAULT_HTTP_PORT: u16 = 8080;
pub const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 30;

// Pool configuration defaults
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_MIN_CONNECTIONS: u32 = 1;
pub const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 30;

/// Configuration for the items server.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "items-server",
    about = "HTTP CRUD service for items backed by a pooled SQL store",
    version,
    author
)]
pub struct Config {
    /// Database connection string (postgres://... or sqlite:...).
    /// Not required at startup: the first request that needs the store
    /// fails with a configuration error when this is absent.
    #[arg(long = "database-url", value_name = "URL", env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// HTTP host to bind to
    #[arg(long, default_value = DEFAULT_HTTP_HOST, env = "ITEMS_HTTP_HOST")]
    pub http_host: String,

    /// HTTP port to bind to
    #[arg(long, default_value_t = DEFAULT_HTTP_PORT, env = "ITEMS_HTTP_PORT")]
    pub http_port: u16,

    /// Query timeout in seconds
    #[arg(
        long,
        default_value_t = DEFAULT_QUERY_TIMEOUT_SECS,
        env = "ITEMS_QUERY_TIMEOUT"
    )]
    pub query_timeout: u64,

    /// Connection acquire timeout in seconds
    #[arg(
        long,
        default_value_t = DEFAULT_ACQUIRE_TIMEOUT_SECS,
        env = "ITEMS_ACQUIRE_TIMEOUT"
    )]
    pub acquire_timeout: u64,

    /// Maximum connections in the pool
    #[arg(
        long,
        default_value_t = DEFAULT_MAX_CONNECTIONS,
        env = "ITEMS_MAX_CONNECTIONS"
    )]
    pub max_connections: u32,

    /// Minimum connections in the pool
    #[arg(
        long,
        default_value_t = DEFAULT_MIN_CONNECTIONS,
        env = "ITEMS_MIN_CONNECTIONS"
    )]
    pub min_connections: u32,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "ITEMS_LOG_LEVEL")]
    pub log_level: String,

    /// Enable JSON logging format
    #[arg(long, env = "ITEMS_JSON_LOGS")]
    pub json_logs: bool,
}

impl Config {
    /// Parse configuration from command line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Create a default configuration (useful for testing).
    pub fn default_config() -> Self {
        Self {
            database_url: None,
            http_host: DEFAULT_HTTP_HOST.to_string(),
            http_port: DEFAULT_HTTP_PORT,
            query_timeout: DEFAULT_QUERY_TIMEOUT_SECS,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT_SECS,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            min_connections: DEFAULT_MIN_CONNECTIONS,
            log_level: "info".to_string(),
            json_logs: false,
        }
    }

    /// Validate pool bounds and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_connections == 0 {
            return Err("max_connections must be greater than 0".to_string());
        }
        if self.min_connections == 0 {
            return Err("min_connections must be greater than 0".to_string());
        }
        if self.min_connections > self.max_connections {
            return Err(format!(
                "min_connections ({}) cannot exceed max_connections ({})",
                self.min_connections, self.max_connections
            ));
        }
        Ok(())
    }

    /// Get the HTTP bind address.
    pub fn http_bind_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }

    /// Get the query timeout as a Duration.
    pub fn query_timeout_duration(&self) -> Duration {
        Duration::from_secs(self.query_timeout)
    }

    /// Get the connection acquire timeout as a Duration.
    pub fn acquire_timeout_duration(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.database_url.is_none());
        assert_eq!(config.http_host, DEFAULT_HTTP_HOST);
        assert_eq!(config.http_port, DEFAULT_HTTP_PORT);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_http_bind_addr() {
        let config = Config {
            http_host: "0.0.0.0".to_string(),
            http_port: 3000,
            ..Config::default()
        };
        assert_eq!(config.http_bind_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_timeout_durations() {
        let config = Config {
            query_timeout: 60,
            acquire_timeout: 15,
            ..Config::default()
        };
        assert_eq!(config.query_timeout_duration(), Duration::from_secs(60));
        assert_eq!(config.acquire_timeout_duration(), Duration::from_secs(15));
    }

    #[test]
    fn test_validate_max_zero() {
        let config = Config {
            max_connections: 0,
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.contains("max_connections"));
    }

    #[test]
    fn test_validate_min_zero() {
        let config = Config {
            min_connections: 0,
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.contains("min_connections"));
    }

    #[test]
    fn test_validate_min_exceeds_max() {
        let config = Config {
            min_connections: 10,
            max_connections: 5,
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.contains("cannot exceed"));
    }
}
