//! # Activity Log Repository
//!
//! Append-only audit trail. Mutation repositories write their audit record
//! inside the same transaction as the mutation itself, via
//! [`insert_activity`], so a voucher can never exist without its `create`
//! record (and vice versa).

use chrono::Utc;
use sqlx::{SqliteExecutor, SqlitePool};
use uuid::Uuid;

use crate::error::DbResult;
use meridian_core::{ActivityAction, ActivityLog};

/// Writes one activity record through any executor (pool or transaction).
///
/// ## Usage
/// Inside a mutation transaction:
/// ```rust,ignore
/// insert_activity(&mut *tx, &activity).await?;
/// ```
pub(crate) async fn insert_activity<'e, E>(executor: E, log: &ActivityLog) -> DbResult<()>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query(
        r#"
        INSERT INTO activity_logs (
            id, action, entity_kind, entity_id, actor, detail, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(&log.id)
    .bind(log.action)
    .bind(&log.entity_kind)
    .bind(&log.entity_id)
    .bind(&log.actor)
    .bind(&log.detail)
    .bind(log.created_at)
    .execute(executor)
    .await?;

    Ok(())
}

/// Builds a new activity record with a fresh id and timestamp.
pub(crate) fn new_activity(
    action: ActivityAction,
    entity_kind: &str,
    entity_id: &str,
    actor: Option<&str>,
    detail: Option<String>,
) -> ActivityLog {
    ActivityLog {
        id: Uuid::new_v4().to_string(),
        action,
        entity_kind: entity_kind.to_string(),
        entity_id: entity_id.to_string(),
        actor: actor.map(str::to_string),
        detail,
        created_at: Utc::now(),
    }
}

/// Repository for reading and appending activity records.
#[derive(Debug, Clone)]
pub struct ActivityLogRepository {
    pool: SqlitePool,
}

impl ActivityLogRepository {
    /// Creates a new ActivityLogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ActivityLogRepository { pool }
    }

    /// Appends a standalone activity record (login/logout, ad-hoc events).
    ///
    /// Mutations on vouchers and masters do NOT use this - their audit
    /// record rides in the mutation's own transaction.
    pub async fn append(
        &self,
        action: ActivityAction,
        entity_kind: &str,
        entity_id: &str,
        actor: Option<&str>,
        detail: Option<String>,
    ) -> DbResult<ActivityLog> {
        let log = new_activity(action, entity_kind, entity_id, actor, detail);
        insert_activity(&self.pool, &log).await?;
        Ok(log)
    }

    /// Lists activity records, newest first.
    pub async fn list(&self, skip: i64, limit: i64) -> DbResult<(Vec<ActivityLog>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM activity_logs")
            .fetch_one(&self.pool)
            .await?;

        let logs = sqlx::query_as::<_, ActivityLog>(
            r#"
            SELECT id, action, entity_kind, entity_id, actor, detail, created_at
            FROM activity_logs
            ORDER BY created_at DESC, id
            LIMIT ?1 OFFSET ?2
            "#,
        )
        .bind(limit)
        .bind(skip)
        .fetch_all(&self.pool)
        .await?;

        Ok((logs, total))
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
    async fn test_append_and_list_newest_first() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.activity();

        repo.append(ActivityAction::Login, "user", "clerk", Some("clerk"), None)
            .await
            .unwrap();
        repo.append(
            ActivityAction::Logout,
            "user",
            "clerk",
            Some("clerk"),
            Some("shift end".to_string()),
        )
        .await
        .unwrap();

        let (logs, total) = repo.list(0, 10).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].action, ActivityAction::Logout);
        assert_eq!(logs[0].detail.as_deref(), Some("shift end"));
        assert_eq!(logs[1].action, ActivityAction::Login);
    }

    #[tokio::test]
    async fn test_list_pagination() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.activity();

        for i in 0..5 {
            repo.append(ActivityAction::Create, "category", &format!("c{i}"), None, None)
                .await
                .unwrap();
        }

        let (page, total) = repo.list(3, 2).await.unwrap();
        assert_eq!(total, 5);
        assert_eq!(page.len(), 2);
    }
}
