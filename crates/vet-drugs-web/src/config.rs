//! Server configuration read from the environment, plus app constants.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "vet-drugs";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable naming the listen address
pub const BIND_ADDR_VAR: &str = "DRUGS_BIND_ADDR";
/// Environment variable naming the SQLite database file
pub const DATABASE_PATH_VAR: &str = "DRUGS_DATABASE_PATH";

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_DATABASE_PATH: &str = "drugs.db";

/// Log filter used when `RUST_LOG` is not set
pub fn default_log_filter() -> &'static str {
    "vet_drugs_web=info,vet_drugs_core=info,tower_http=info"
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is not a valid socket address: {value}")]
    InvalidBindAddr { var: &'static str, value: String },
    #[error("{var} must not be empty")]
    EmptyDatabasePath { var: &'static str },
}

/// Settings supplied by the hosting environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// SQLite file; `:memory:` keeps everything in memory
    pub database_path: PathBuf,
}

impl ServerConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, falling back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind = lookup(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddr {
                var: BIND_ADDR_VAR,
                value: bind.clone(),
            })?;

        let database_path =
            lookup(DATABASE_PATH_VAR).unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string());
        if database_path.trim().is_empty() {
            return Err(ConfigError::EmptyDatabasePath {
                var: DATABASE_PATH_VAR,
            });
        }

        Ok(Self {
            bind_addr,
            database_path: PathBuf::from(database_path),
        })
    }
}
