//! # Tenant Connection Registry
//!
//! Resolves a tenant identifier (from the `x-tenant-db` request header) to a
//! live, cached database handle.
//!
//! ## Resolution Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Tenant Resolution                                    │
//! │                                                                         │
//! │  Request: x-tenant-db: acme_traders                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate_tenant_name("acme_traders")                                  │
//! │       │ (only [A-Za-z0-9_-]: a header can never escape data_dir)       │
//! │       ▼                                                                 │
//! │  registry cache hit? ──yes──► return cached Database                   │
//! │       │ no                                                              │
//! │       ▼                                                                 │
//! │  Database::new(<data_dir>/acme_traders.db)                             │
//! │       │ (creates file, runs migrations)                                 │
//! │       ▼                                                                 │
//! │  cache it, return it                                                    │
//! │                                                                         │
//! │  One Database per tenant, memoized process-wide. There is NO expiry,   │
//! │  eviction, or health-check policy: once cached, a connection is        │
//! │  reused for the process lifetime.                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::path::PathBuf;

use tokio::sync::RwLock;
use tracing::info;

use meridian_core::validation::validate_tenant_name;

use crate::error::{DbError, DbResult};
use crate::pool::{Database, DbConfig};

/// Process-wide map from tenant name to its open database.
pub struct TenantRegistry {
    /// Directory holding one `<tenant>.db` file per tenant.
    data_dir: PathBuf,
    /// Open databases, keyed by tenant name.
    databases: RwLock<HashMap<String, Database>>,
}

impl TenantRegistry {
    /// Creates a registry rooted at `data_dir`.
    ///
    /// The directory itself is created lazily by SQLite's `mode=rwc` when
    /// the first tenant database is opened, so constructing a registry does
    /// no I/O.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        TenantRegistry {
            data_dir: data_dir.into(),
            databases: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the database for `tenant`, opening it on first use.
    ///
    /// ## Errors
    /// * [`DbError::InvalidTenant`] - empty or unsafe tenant name
    /// * [`DbError::ConnectionFailed`] - the database file cannot be opened
    pub async fn database(&self, tenant: &str) -> DbResult<Database> {
        validate_tenant_name(tenant)
            .map_err(|_| DbError::InvalidTenant(tenant.to_string()))?;

        // Fast path: already open.
        if let Some(db) = self.databases.read().await.get(tenant) {
            return Ok(db.clone());
        }

        // Slow path: open under the write lock. Re-check after acquiring it;
        // another request may have opened the same tenant meanwhile.
        let mut databases = self.databases.write().await;
        if let Some(db) = databases.get(tenant) {
            return Ok(db.clone());
        }

        let path = self.data_dir.join(format!("{tenant}.db"));
        info!(tenant = %tenant, path = %path.display(), "Opening tenant database");

        let db = Database::new(DbConfig::new(path)).await?;
        databases.insert(tenant.to_string(), db.clone());

        Ok(db)
    }

    /// Number of tenants with an open database.
    pub async fn open_count(&self) -> usize {
        self.databases.read().await.len()
    }

    /// Closes every cached database.
    ///
    /// ## When To Call
    /// On application shutdown.
    pub async fn close_all(&self) {
        let databases = self.databases.write().await;
        for (tenant, db) in databases.iter() {
            info!(tenant = %tenant, "Closing tenant database");
            db.close().await;
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rejects_unsafe_tenant_names() {
        let registry = TenantRegistry::new("/tmp/meridian-test-unused");

        for bad in ["", "../escape", "a/b", "dot.dot", "with space"] {
            let err = registry.database(bad).await.unwrap_err();
            assert!(
                matches!(err, DbError::InvalidTenant(_)),
                "expected InvalidTenant for {bad:?}, got {err:?}"
            );
        }

        // Nothing was opened
        assert_eq!(registry.open_count().await, 0);
    }

    #[tokio::test]
    async fn test_memoizes_databases() {
        let dir = std::env::temp_dir().join(format!("meridian-registry-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();

        let registry = TenantRegistry::new(&dir);

        let first = registry.database("alpha").await.unwrap();
        let second = registry.database("alpha").await.unwrap();
        assert_eq!(registry.open_count().await, 1);

        // Same underlying pool: a write through one handle is visible
        // through the other.
        sqlx::query("INSERT INTO categories (id, name, description, created_at) VALUES ('c1', 'Hardware', NULL, '2026-01-01T00:00:00Z')")
            .execute(first.pool())
            .await
            .unwrap();
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(second.pool())
            .await
            .unwrap();
        assert_eq!(count, 1);

        registry.database("beta").await.unwrap();
        assert_eq!(registry.open_count().await, 2);

        registry.close_all().await;
        std::fs::remove_dir_all(&dir).ok();
    }
}
