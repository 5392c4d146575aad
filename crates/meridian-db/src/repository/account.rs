//! # Account & User Repositories
//!
//! Ledger account masters and application users. User passwords are hashed
//! with Argon2 before they touch the database; the hash never leaves this
//! layer except for verification at login.

use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::activity::{insert_activity, new_activity};
use meridian_core::{Account, AccountKind, ActivityAction, User, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};

fn effective_limit(limit: i64) -> i64 {
    if limit <= 0 {
        DEFAULT_PAGE_LIMIT
    } else {
        limit.min(MAX_PAGE_LIMIT)
    }
}

// =============================================================================
// Password Hashing
// =============================================================================

/// Hashes a password for storage.
pub(crate) fn hash_password(password: &str) -> DbResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| DbError::PasswordHash(e.to_string()))?;

    Ok(hash.to_string())
}

/// Verifies a password against its stored hash.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

// =============================================================================
// Accounts
// =============================================================================

/// Input for account creation.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub kind: AccountKind,
    pub opening_balance_cents: i64,
}

/// Repository for ledger account masters.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    pool: SqlitePool,
}

impl AccountRepository {
    /// Creates a new AccountRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AccountRepository { pool }
    }

    /// Inserts an account.
    ///
    /// ## Errors
    /// * `UniqueViolation` - an account with this name already exists
    pub async fn insert(&self, new: NewAccount) -> DbResult<Account> {
        let account = Account {
            id: Uuid::new_v4().to_string(),
            name: new.name,
            kind: new.kind,
            opening_balance_cents: new.opening_balance_cents,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO accounts (id, name, kind, opening_balance_cents, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&account.id)
        .bind(&account.name)
        .bind(account.kind)
        .bind(account.opening_balance_cents)
        .bind(account.created_at)
        .execute(&self.pool)
        .await?;

        Ok(account)
    }

    /// Gets an account by its name.
    pub async fn get_by_name(&self, name: &str) -> DbResult<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(
            "SELECT id, name, kind, opening_balance_cents, created_at \
             FROM accounts WHERE name = ?1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    /// Lists accounts by name.
    pub async fn list(&self, skip: i64, limit: i64) -> DbResult<(Vec<Account>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM accounts")
            .fetch_one(&self.pool)
            .await?;

        let accounts = sqlx::query_as::<_, Account>(
            "SELECT id, name, kind, opening_balance_cents, created_at \
             FROM accounts ORDER BY name LIMIT ?1 OFFSET ?2",
        )
        .bind(effective_limit(limit))
        .bind(skip.max(0))
        .fetch_all(&self.pool)
        .await?;

        Ok((accounts, total))
    }
}

// =============================================================================
// Users
// =============================================================================

/// Input for user creation. The plaintext password is hashed on insert.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub display_name: String,
    pub password: String,
    pub role: String,
    pub actor: Option<String>,
}

/// Repository for application users.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Inserts a user, hashing the password first.
    ///
    /// ## Errors
    /// * `UniqueViolation` - the username is taken
    pub async fn insert(&self, new: NewUser) -> DbResult<User> {
        let user = User {
            id: Uuid::new_v4().to_string(),
            username: new.username,
            display_name: new.display_name,
            password_hash: hash_password(&new.password)?,
            role: new.role,
            created_at: Utc::now(),
        };

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO users (id, username, display_name, password_hash, role, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.display_name)
        .bind(&user.password_hash)
        .bind(&user.role)
        .bind(user.created_at)
        .execute(&mut *tx)
        .await?;

        let activity = new_activity(
            ActivityAction::Create,
            "user",
            &user.id,
            new.actor.as_deref(),
            Some(user.username.clone()),
        );
        insert_activity(&mut *tx, &activity).await?;

        tx.commit().await?;

        Ok(user)
    }

    /// Gets a user by username (for login).
    pub async fn get_by_username(&self, username: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, display_name, password_hash, role, created_at \
             FROM users WHERE username = ?1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Lists users by username.
    pub async fn list(&self, skip: i64, limit: i64) -> DbResult<(Vec<User>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        let users = sqlx::query_as::<_, User>(
            "SELECT id, username, display_name, password_hash, role, created_at \
             FROM users ORDER BY username LIMIT ?1 OFFSET ?2",
        )
        .bind(effective_limit(limit))
        .bind(skip.max(0))
        .fetch_all(&self.pool)
        .await?;

        Ok((users, total))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_account_insert_get_list() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.accounts();

        repo.insert(NewAccount {
            name: "Cash".to_string(),
            kind: AccountKind::Asset,
            opening_balance_cents: 50_000,
        })
        .await
        .unwrap();
        repo.insert(NewAccount {
            name: "Rent".to_string(),
            kind: AccountKind::Expense,
            opening_balance_cents: 0,
        })
        .await
        .unwrap();

        let cash = repo.get_by_name("Cash").await.unwrap().unwrap();
        assert_eq!(cash.kind, AccountKind::Asset);
        assert_eq!(cash.opening_balance_cents, 50_000);

        assert!(repo.get_by_name("Nope").await.unwrap().is_none());

        let (accounts, total) = repo.list(0, 10).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(accounts[0].name, "Cash");

        let err = repo
            .insert(NewAccount {
                name: "Cash".to_string(),
                kind: AccountKind::Asset,
                opening_balance_cents: 0,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_user_password_roundtrip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.users();

        let user = repo
            .insert(NewUser {
                username: "clerk".to_string(),
                display_name: "Front Desk".to_string(),
                password: "hunter2-but-long".to_string(),
                role: "operator".to_string(),
                actor: None,
            })
            .await
            .unwrap();

        // The stored value is a hash, not the password
        assert_ne!(user.password_hash, "hunter2-but-long");

        let fetched = repo.get_by_username("clerk").await.unwrap().unwrap();
        assert!(verify_password("hunter2-but-long", &fetched.password_hash));
        assert!(!verify_password("wrong", &fetched.password_hash));

        let err = repo
            .insert(NewUser {
                username: "clerk".to_string(),
                display_name: "Imposter".to_string(),
                password: "x".to_string(),
                role: "operator".to_string(),
                actor: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }
}
