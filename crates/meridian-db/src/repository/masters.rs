//! # Master Record Repositories
//!
//! Create/list access for the simple reference records: gate passes, stock
//! items, and categories. Each create writes its audit record in the same
//! transaction as the insert.

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::error::DbResult;
use crate::repository::activity::{insert_activity, new_activity};
use meridian_core::{
    ActivityAction, Category, GatePass, GatePassDirection, Stock, DEFAULT_PAGE_LIMIT,
    MAX_PAGE_LIMIT,
};

fn effective_limit(limit: i64) -> i64 {
    if limit <= 0 {
        DEFAULT_PAGE_LIMIT
    } else {
        limit.min(MAX_PAGE_LIMIT)
    }
}

// =============================================================================
// Gate Passes
// =============================================================================

/// Input for gate pass creation.
#[derive(Debug, Clone)]
pub struct NewGatePass {
    pub pass_number: String,
    pub party: String,
    pub vehicle: Option<String>,
    pub item: String,
    pub quantity: i64,
    pub direction: GatePassDirection,
    pub date: DateTime<Utc>,
    pub actor: Option<String>,
}

/// Repository for gate pass records.
#[derive(Debug, Clone)]
pub struct GatePassRepository {
    pool: SqlitePool,
}

impl GatePassRepository {
    /// Creates a new GatePassRepository.
    pub fn new(pool: SqlitePool) -> Self {
        GatePassRepository { pool }
    }

    /// Inserts a gate pass and its audit record in one transaction.
    pub async fn insert(&self, new: NewGatePass) -> DbResult<GatePass> {
        let pass = GatePass {
            id: Uuid::new_v4().to_string(),
            pass_number: new.pass_number,
            party: new.party,
            vehicle: new.vehicle,
            item: new.item,
            quantity: new.quantity,
            direction: new.direction,
            date: new.date,
            created_at: Utc::now(),
        };

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO gate_passes (
                id, pass_number, party, vehicle, item,
                quantity, direction, date, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&pass.id)
        .bind(&pass.pass_number)
        .bind(&pass.party)
        .bind(&pass.vehicle)
        .bind(&pass.item)
        .bind(pass.quantity)
        .bind(pass.direction)
        .bind(pass.date)
        .bind(pass.created_at)
        .execute(&mut *tx)
        .await?;

        let activity = new_activity(
            ActivityAction::Create,
            "gate_pass",
            &pass.id,
            new.actor.as_deref(),
            Some(pass.pass_number.clone()),
        );
        insert_activity(&mut *tx, &activity).await?;

        tx.commit().await?;

        Ok(pass)
    }

    /// Lists gate passes, newest date first.
    pub async fn list(
        &self,
        direction: Option<GatePassDirection>,
        skip: i64,
        limit: i64,
    ) -> DbResult<(Vec<GatePass>, i64)> {
        let mut count_qb: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT COUNT(*) FROM gate_passes WHERE 1 = 1");
        if let Some(direction) = direction {
            count_qb.push(" AND direction = ").push_bind(direction);
        }
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT id, pass_number, party, vehicle, item, quantity, direction, date, created_at \
             FROM gate_passes WHERE 1 = 1",
        );
        if let Some(direction) = direction {
            qb.push(" AND direction = ").push_bind(direction);
        }
        qb.push(" ORDER BY date DESC, created_at DESC LIMIT ")
            .push_bind(effective_limit(limit))
            .push(" OFFSET ")
            .push_bind(skip.max(0));

        let passes = qb.build_query_as::<GatePass>().fetch_all(&self.pool).await?;

        Ok((passes, total))
    }
}

// =============================================================================
// Stock
// =============================================================================

/// Input for stock creation.
#[derive(Debug, Clone)]
pub struct NewStock {
    pub name: String,
    pub category: String,
    pub unit: String,
    pub opening_qty: i64,
    pub rate_cents: i64,
    pub actor: Option<String>,
}

/// Repository for stock item masters.
#[derive(Debug, Clone)]
pub struct StockRepository {
    pool: SqlitePool,
}

impl StockRepository {
    /// Creates a new StockRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StockRepository { pool }
    }

    /// Inserts a stock item.
    ///
    /// ## Errors
    /// * `UniqueViolation` - a stock item with this name already exists
    pub async fn insert(&self, new: NewStock) -> DbResult<Stock> {
        let stock = Stock {
            id: Uuid::new_v4().to_string(),
            name: new.name,
            category: new.category,
            unit: new.unit,
            opening_qty: new.opening_qty,
            rate_cents: new.rate_cents,
            created_at: Utc::now(),
        };

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO stocks (id, name, category, unit, opening_qty, rate_cents, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&stock.id)
        .bind(&stock.name)
        .bind(&stock.category)
        .bind(&stock.unit)
        .bind(stock.opening_qty)
        .bind(stock.rate_cents)
        .bind(stock.created_at)
        .execute(&mut *tx)
        .await?;

        let activity = new_activity(
            ActivityAction::Create,
            "stock",
            &stock.id,
            new.actor.as_deref(),
            Some(stock.name.clone()),
        );
        insert_activity(&mut *tx, &activity).await?;

        tx.commit().await?;

        Ok(stock)
    }

    /// Lists stock items, optionally restricted to one category.
    pub async fn list(
        &self,
        category: Option<&str>,
        skip: i64,
        limit: i64,
    ) -> DbResult<(Vec<Stock>, i64)> {
        let mut count_qb: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT COUNT(*) FROM stocks WHERE 1 = 1");
        if let Some(category) = category {
            count_qb.push(" AND category = ").push_bind(category);
        }
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT id, name, category, unit, opening_qty, rate_cents, created_at \
             FROM stocks WHERE 1 = 1",
        );
        if let Some(category) = category {
            qb.push(" AND category = ").push_bind(category);
        }
        qb.push(" ORDER BY name LIMIT ")
            .push_bind(effective_limit(limit))
            .push(" OFFSET ")
            .push_bind(skip.max(0));

        let stocks = qb.build_query_as::<Stock>().fetch_all(&self.pool).await?;

        Ok((stocks, total))
    }
}

// =============================================================================
// Categories
// =============================================================================

/// Input for category creation.
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
    pub actor: Option<String>,
}

/// Repository for stock categories.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    /// Creates a new CategoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// Inserts a category.
    ///
    /// ## Errors
    /// * `UniqueViolation` - a category with this name already exists
    pub async fn insert(&self, new: NewCategory) -> DbResult<Category> {
        let category = Category {
            id: Uuid::new_v4().to_string(),
            name: new.name,
            description: new.description,
            created_at: Utc::now(),
        };

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO categories (id, name, description, created_at) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&category.id)
        .bind(&category.name)
        .bind(&category.description)
        .bind(category.created_at)
        .execute(&mut *tx)
        .await?;

        let activity = new_activity(
            ActivityAction::Create,
            "category",
            &category.id,
            new.actor.as_deref(),
            Some(category.name.clone()),
        );
        insert_activity(&mut *tx, &activity).await?;

        tx.commit().await?;

        Ok(category)
    }

    /// Lists categories by name.
    pub async fn list(&self, skip: i64, limit: i64) -> DbResult<(Vec<Category>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(&self.pool)
            .await?;

        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, description, created_at FROM categories \
             ORDER BY name LIMIT ?1 OFFSET ?2",
        )
        .bind(effective_limit(limit))
        .bind(skip.max(0))
        .fetch_all(&self.pool)
        .await?;

        Ok((categories, total))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};
    use chrono::TimeZone;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, d, 9, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_gate_pass_insert_and_direction_filter() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.gate_passes();

        repo.insert(NewGatePass {
            pass_number: "GP-001".to_string(),
            party: "Khan & Co".to_string(),
            vehicle: Some("LEB-1234".to_string()),
            item: "Cement bags".to_string(),
            quantity: 200,
            direction: GatePassDirection::Outward,
            date: day(1),
            actor: None,
        })
        .await
        .unwrap();
        repo.insert(NewGatePass {
            pass_number: "GP-002".to_string(),
            party: "Steel Mills".to_string(),
            vehicle: None,
            item: "Rebar".to_string(),
            quantity: 50,
            direction: GatePassDirection::Inward,
            date: day(2),
            actor: None,
        })
        .await
        .unwrap();

        let (all, total) = repo.list(None, 0, 10).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(all[0].pass_number, "GP-002"); // newest date first

        let (inward, total) = repo
            .list(Some(GatePassDirection::Inward), 0, 10)
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(inward[0].party, "Steel Mills");
    }

    #[tokio::test]
    async fn test_stock_duplicate_name_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.stocks();

        let new = |name: &str| NewStock {
            name: name.to_string(),
            category: "Construction".to_string(),
            unit: "bag".to_string(),
            opening_qty: 10,
            rate_cents: 123_00,
            actor: None,
        };

        repo.insert(new("Cement")).await.unwrap();
        let err = repo.insert(new("Cement")).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));

        let (stocks, total) = repo.list(Some("Construction"), 0, 10).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(stocks[0].rate_cents, 12300);

        let (none, total) = repo.list(Some("Grocery"), 0, 10).await.unwrap();
        assert_eq!(total, 0);
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_category_list_sorted() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.categories();

        for name in ["Steel", "Cement", "Paint"] {
            repo.insert(NewCategory {
                name: name.to_string(),
                description: None,
                actor: None,
            })
            .await
            .unwrap();
        }

        let (categories, total) = repo.list(0, 10).await.unwrap();
        assert_eq!(total, 3);
        let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Cement", "Paint", "Steel"]);
    }
}
