//! Configuration types and loading
//!
//! Settings come from the process environment (optionally seeded from a
//! `.env` file by the binary) layered over built-in defaults.

use config::{Config, Environment, Source};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    /// Verbose (debug) or terse (release) operation
    pub mode: ServiceMode,
    /// Sibling services, reserved for replacing the static lookups
    pub upstream: UpstreamConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections to maintain
    pub min_connections: u32,
    /// Pool acquire timeout in seconds
    pub connect_timeout_seconds: u64,
    /// Idle connections are closed after this many seconds
    pub idle_timeout_seconds: u64,
    /// Connections are recycled after this many seconds
    pub max_lifetime_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    pub bus_service_url: String,
    pub staff_service_url: String,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ServiceMode {
    #[default]
    Debug,
    Release,
}

impl ServiceMode {
    pub fn is_release(&self) -> bool {
        matches!(self, ServiceMode::Release)
    }
}

impl FromStr for ServiceMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "debug" => Ok(ServiceMode::Debug),
            "release" => Ok(ServiceMode::Release),
            other => Err(ConfigError::InvalidValue {
                key: "SERVICE_MODE".to_string(),
                message: format!("expected 'debug' or 'release', got '{}'", other),
            }),
        }
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Environment variable not set: {0}")]
    MissingEnvVar(String),
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
    #[error("Configuration source error: {0}")]
    Source(#[from] config::ConfigError),
}

/// Flat view of the environment, one field per variable
#[derive(Debug, Deserialize)]
struct EnvSettings {
    host: String,
    port: u16,
    database_url: Option<String>,
    db_max_connections: u32,
    db_min_connections: u32,
    db_connect_timeout: u64,
    db_idle_timeout: u64,
    db_max_lifetime: u64,
    service_mode: Option<String>,
    gin_mode: Option<String>,
    bus_service_url: String,
    staff_service_url: String,
}

pub const DEFAULT_PORT: u16 = 8082;

impl AppConfig {
    /// Load configuration from the process environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_source(Environment::default())
    }

    /// Load configuration from an arbitrary source layered over the defaults
    pub fn from_source<S>(source: S) -> Result<Self, ConfigError>
    where
        S: Source + Send + Sync + 'static,
    {
        let settings: EnvSettings = Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", i64::from(DEFAULT_PORT))?
            .set_default("db_max_connections", 10_i64)?
            .set_default("db_min_connections", 1_i64)?
            .set_default("db_connect_timeout", 30_i64)?
            .set_default("db_idle_timeout", 600_i64)?
            .set_default("db_max_lifetime", 1800_i64)?
            .set_default("bus_service_url", "http://localhost:8080")?
            .set_default("staff_service_url", "http://localhost:8081")?
            .add_source(source)
            .build()?
            .try_deserialize()
            .map_err(|e| ConfigError::InvalidValue {
                key: "environment".to_string(),
                message: e.to_string(),
            })?;

        let url = settings
            .database_url
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))?;

        let host = settings
            .host
            .trim()
            .parse::<IpAddr>()
            .map_err(|_| ConfigError::InvalidValue {
                key: "HOST".to_string(),
                message: format!("expected an IP address, got '{}'", settings.host),
            })?;

        // GIN_MODE keeps gin's reading: anything but "release" runs as debug
        let mode = match (settings.service_mode, settings.gin_mode) {
            (Some(raw), _) => raw.parse()?,
            (None, Some(raw)) => raw.parse().unwrap_or_default(),
            (None, None) => ServiceMode::default(),
        };

        if settings.db_min_connections > settings.db_max_connections {
            return Err(ConfigError::InvalidValue {
                key: "DB_MIN_CONNECTIONS".to_string(),
                message: "must not exceed DB_MAX_CONNECTIONS".to_string(),
            });
        }

        Ok(Self {
            server: ServerConfig {
                host,
                port: settings.port,
            },
            database: DatabaseConfig {
                url,
                max_connections: settings.db_max_connections,
                min_connections: settings.db_min_connections,
                connect_timeout_seconds: settings.db_connect_timeout,
                idle_timeout_seconds: settings.db_idle_timeout,
                max_lifetime_seconds: settings.db_max_lifetime,
            },
            mode,
            upstream: UpstreamConfig {
                bus_service_url: settings.bus_service_url,
                staff_service_url: settings.staff_service_url,
            },
        })
    }

    /// Get the server address
    pub fn server_addr(&self) -> SocketAddr {
        SocketAddr::new(self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::default().source(Some(map))
    }

    #[test]
    fn test_defaults_with_database_url() {
        let config =
            AppConfig::from_source(env(&[("DATABASE_URL", "postgres://localhost/bsa")])).unwrap();

        assert_eq!(config.server.port, 8082);
        assert_eq!(config.server.host, IpAddr::from([0, 0, 0, 0]));
        assert_eq!(config.database.url, "postgres://localhost/bsa");
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.database.idle_timeout_seconds, 600);
        assert_eq!(config.database.max_lifetime_seconds, 1800);
        assert_eq!(config.mode, ServiceMode::Debug);
        assert_eq!(config.upstream.bus_service_url, "http://localhost:8080");
    }

    #[test]
    fn test_missing_database_url() {
        let err = AppConfig::from_source(env(&[("PORT", "9000")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref var) if var == "DATABASE_URL"));

        let err = AppConfig::from_source(env(&[("DATABASE_URL", "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(_)));
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_source(env(&[
            ("DATABASE_URL", "postgres://db/bsa"),
            ("PORT", "9090"),
            ("DB_MAX_CONNECTIONS", "4"),
            ("SERVICE_MODE", "release"),
            ("STAFF_SERVICE_URL", "http://staff:9000"),
        ]))
        .unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.database.max_connections, 4);
        assert!(config.mode.is_release());
        assert_eq!(config.upstream.staff_service_url, "http://staff:9000");
        assert_eq!(config.server_addr().port(), 9090);
    }

    #[test]
    fn test_gin_mode_fallback() {
        let config = AppConfig::from_source(env(&[
            ("DATABASE_URL", "postgres://db/bsa"),
            ("GIN_MODE", "release"),
        ]))
        .unwrap();
        assert_eq!(config.mode, ServiceMode::Release);

        let config = AppConfig::from_source(env(&[
            ("DATABASE_URL", "postgres://db/bsa"),
            ("GIN_MODE", "test"),
        ]))
        .unwrap();
        assert_eq!(config.mode, ServiceMode::Debug);
    }

    #[test]
    fn test_host_must_be_an_ip_address() {
        let err = AppConfig::from_source(env(&[
            ("DATABASE_URL", "postgres://db/bsa"),
            ("HOST", "localhost"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "HOST"));

        let config = AppConfig::from_source(env(&[
            ("DATABASE_URL", "postgres://db/bsa"),
            ("HOST", "127.0.0.1"),
            ("PORT", "9000"),
        ]))
        .unwrap();
        assert_eq!(config.server_addr(), SocketAddr::from(([127, 0, 0, 1], 9000)));
    }

    #[test]
    fn test_invalid_values() {
        let err = AppConfig::from_source(env(&[
            ("DATABASE_URL", "postgres://db/bsa"),
            ("SERVICE_MODE", "verbose"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));

        let err = AppConfig::from_source(env(&[
            ("DATABASE_URL", "postgres://db/bsa"),
            ("PORT", "not-a-port"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_service_mode_parse() {
        assert_eq!("Release".parse::<ServiceMode>().unwrap(), ServiceMode::Release);
        assert_eq!("".parse::<ServiceMode>().unwrap(), ServiceMode::Debug);
        assert!("test".parse::<ServiceMode>().is_err());
    }
}
