//! Application configuration management.

use std::time::Duration;

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Ledger engine configuration.
    #[serde(default)]
    pub ledger: LedgerConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of idle connections kept in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Seconds to wait for a new connection.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Maximum lifetime of a pooled connection in seconds.
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    /// Whether sqlx logs every statement.
    #[serde(default)]
    pub sqlx_logging: bool,
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    10
}

fn default_connect_timeout() -> u64 {
    8
}

fn default_max_lifetime() -> u64 {
    1800 // 30 minutes
}

impl DatabaseConfig {
    /// Connection timeout as a `Duration`.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Connection lifetime as a `Duration`.
    #[must_use]
    pub const fn max_lifetime(&self) -> Duration {
        Duration::from_secs(self.max_lifetime_secs)
    }
}

/// Ledger engine configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LedgerConfig {
    /// Deadline applied to every ledger operation, in milliseconds.
    ///
    /// An operation that exceeds it is aborted and its transaction rolled back.
    #[serde(default)]
    pub operation_timeout_ms: Option<u64>,
}

impl LedgerConfig {
    /// Operation deadline as a `Duration`, if configured.
    #[must_use]
    pub fn operation_timeout(&self) -> Option<Duration> {
        self.operation_timeout_ms.map(Duration::from_millis)
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("TALLY").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_environment_with_defaults() {
        temp_env::with_vars(
            [
                ("TALLY__DATABASE__URL", Some("postgres://localhost/tally")),
                ("RUN_MODE", Some("test-missing-profile")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.database.url, "postgres://localhost/tally");
                assert_eq!(config.database.max_connections, 20);
                assert_eq!(config.database.min_connections, 10);
                assert_eq!(config.database.max_lifetime(), Duration::from_secs(1800));
                assert!(!config.database.sqlx_logging);
                assert!(config.ledger.operation_timeout().is_none());
            },
        );
    }

    #[test]
    fn test_load_overrides_from_environment() {
        temp_env::with_vars(
            [
                ("TALLY__DATABASE__URL", Some("postgres://db/tally")),
                ("TALLY__DATABASE__MAX_CONNECTIONS", Some("5")),
                ("TALLY__LEDGER__OPERATION_TIMEOUT_MS", Some("250")),
                ("RUN_MODE", Some("test-missing-profile")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.database.max_connections, 5);
                assert_eq!(
                    config.ledger.operation_timeout(),
                    Some(Duration::from_millis(250))
                );
            },
        );
    }

    #[test]
    fn test_missing_database_url_fails() {
        temp_env::with_vars(
            [
                ("TALLY__DATABASE__URL", None::<&str>),
                ("RUN_MODE", Some("test-missing-profile")),
            ],
            || {
                assert!(AppConfig::load().is_err());
            },
        );
    }
}
