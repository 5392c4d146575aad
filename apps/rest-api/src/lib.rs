//! # Meridian REST API
//!
//! Library portion of the REST server, exposed so integration tests can
//! build the router without binding a socket.

pub mod auth;
pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod tenant;

use std::sync::Arc;

use meridian_db::TenantRegistry;

use crate::auth::JwtManager;
use crate::config::ServerConfig;

/// Shared application state.
pub struct AppState {
    /// Tenant name → cached database registry.
    pub tenants: TenantRegistry,
    /// JWT issuance for /auth/login.
    pub jwt: JwtManager,
    /// Loaded server configuration.
    pub config: ServerConfig,
}

impl AppState {
    /// Builds shared state from a loaded configuration.
    pub fn new(config: ServerConfig) -> Arc<Self> {
        Arc::new(AppState {
            tenants: TenantRegistry::new(&config.data_dir),
            jwt: JwtManager::new(config.jwt_secret.clone(), config.jwt_access_lifetime_secs),
            config,
        })
    }
}
