//! Server configuration.
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | HTTP_HOST | 0.0.0.0 | Listen address |
//! | HTTP_PORT | 8000 | Listen port |
//! | STORE_BACKEND | memory | `memory` or `mongodb` |
//! | MONGODB_URI | mongodb://localhost:27017 | MongoDB connection string |
//! | MONGODB_DATABASE | companyDB | MongoDB database name |
//! | LOG_LEVEL | info | Log level when `RUST_LOG` is unset |

use std::{fmt, str::FromStr};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown store backend: {0} (expected `memory` or `mongodb`)")]
    UnknownBackend(String),

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// Which storage backend the server runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackendKind {
    #[default]
    Memory,
    MongoDb,
}

impl FromStr for StoreBackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "mongodb" | "mongo" => Ok(Self::MongoDb),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }
}

impl fmt::Display for StoreBackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => f.write_str("memory"),
            Self::MongoDb => f.write_str("mongodb"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub http_host: String,
    pub http_port: u16,
    pub store_backend: StoreBackendKind,
    pub mongodb_uri: String,
    pub mongodb_database: String,
    pub log_level: String,
}

impl Config {
    /// Loads configuration from the process environment.
    ///
    /// Call `dotenv` first if a `.env` file should be honored.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration through `lookup`, falling back to defaults for
    /// unset variables.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let http_port = match lookup("HTTP_PORT") {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidValue { name: "HTTP_PORT", value })?,
            None => 8000,
        };

        let store_backend = match lookup("STORE_BACKEND") {
            Some(value) => value.parse()?,
            None => StoreBackendKind::default(),
        };

        Ok(Self {
            http_host: lookup("HTTP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            http_port,
            store_backend,
            mongodb_uri: lookup("MONGODB_URI").unwrap_or_else(|| "mongodb://localhost:27017".into()),
            mongodb_database: lookup("MONGODB_DATABASE").unwrap_or_else(|| "companyDB".into()),
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".into()),
        })
    }

    /// `host:port` to bind the listener to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }
}
