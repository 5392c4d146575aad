//! REST API configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// REST API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP listen port
    pub port: u16,

    /// Bind address (default: 0.0.0.0)
    pub bind_addr: String,

    /// Directory holding one SQLite file per tenant
    pub data_dir: PathBuf,

    /// JWT secret key for signing tokens
    pub jwt_secret: String,

    /// JWT access token lifetime in seconds
    pub jwt_access_lifetime_secs: i64,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = ServerConfig {
            port: env::var("MERIDIAN_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("MERIDIAN_PORT".to_string()))?,

            bind_addr: env::var("MERIDIAN_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0".to_string()),

            data_dir: env::var("MERIDIAN_DATA_DIR")
                .unwrap_or_else(|_| "./data".to_string())
                .into(),

            jwt_secret: env::var("MERIDIAN_JWT_SECRET").unwrap_or_else(|_| {
                // Development fallback only.
                // In production, this MUST be set via environment variable.
                "meridian-dev-secret-change-in-production".to_string()
            }),

            jwt_access_lifetime_secs: env::var("MERIDIAN_JWT_LIFETIME_SECS")
                .unwrap_or_else(|_| "3600".to_string()) // 1 hour
                .parse()
                .map_err(|_| ConfigError::InvalidValue("MERIDIAN_JWT_LIFETIME_SECS".to_string()))?,
        };

        if config.jwt_access_lifetime_secs <= 0 {
            return Err(ConfigError::InvalidValue(
                "MERIDIAN_JWT_LIFETIME_SECS".to_string(),
            ));
        }

        Ok(config)
    }

    /// Returns the full bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
