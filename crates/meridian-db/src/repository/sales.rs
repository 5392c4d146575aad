//! # Sales Voucher Repository
//!
//! A specialized create/list flow for sales-type vouchers: line items
//! instead of free-form transactions, plus a single party account.
//!
//! ## Posting Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Sales Voucher Posting                              │
//! │                                                                         │
//! │  POST { party_account: "Khan & Co", items: [...] }                      │
//! │       │                                                                 │
//! │       ▼  (one transaction)                                              │
//! │  seq ← voucher_counters['sales'] + 1    → code SV-<seq>                │
//! │  vouchers        ← header row (voucher_type = 'sales')                 │
//! │  sales_vouchers  ← party account, grand total                          │
//! │  sale_items      ← one row per line item (totals frozen)               │
//! │  entry ledger    ← party debited, sales account credited              │
//! │  activity_logs   ← create record                                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Item totals use the snapshot pattern: `line_total_cents` is computed at
//! creation time and never recomputed, so a later rate change cannot
//! rewrite history.

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use crate::repository::activity::{insert_activity, new_activity};
use crate::repository::voucher::post_lines;
use meridian_core::money::line_total_cents;
use meridian_core::{
    format_voucher_code, ActivityAction, SaleItem, SalesVoucher, TransactionLine, Voucher,
    VoucherType, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT,
};

/// Columns selected for every `SalesVoucher` query (header + extension).
const SALES_COLUMNS: &str = "v.id, v.code, v.date, s.party_account, s.sales_account, \
     v.narration, s.total_cents, v.is_void, v.created_at, v.updated_at";

// =============================================================================
// Inputs
// =============================================================================

/// One requested line item. The line total is computed server-side.
#[derive(Debug, Clone)]
pub struct NewSaleItem {
    pub item_name: String,
    pub quantity: i64,
    pub rate_cents: i64,
    pub discount_bps: u32,
}

/// Input for sales voucher creation.
#[derive(Debug, Clone)]
pub struct NewSalesVoucher {
    pub date: DateTime<Utc>,
    pub party_account: String,
    pub sales_account: String,
    pub narration: Option<String>,
    pub items: Vec<NewSaleItem>,
    pub actor: Option<String>,
}

/// Filters plus pagination for sales voucher listings.
/// `date_to` is exclusive.
#[derive(Debug, Clone, Default)]
pub struct SalesFilter {
    pub is_void: Option<bool>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    /// Free-text search over code, narration, and party account.
    pub search: Option<String>,
    pub party_account: Option<String>,
    pub skip: i64,
    pub limit: i64,
}

impl SalesFilter {
    fn effective_limit(&self) -> i64 {
        if self.limit <= 0 {
            DEFAULT_PAGE_LIMIT
        } else {
            self.limit.min(MAX_PAGE_LIMIT)
        }
    }

    fn push_conditions(&self, qb: &mut QueryBuilder<Sqlite>) {
        if let Some(is_void) = self.is_void {
            qb.push(" AND v.is_void = ").push_bind(is_void);
        }
        if let Some(from) = self.date_from {
            qb.push(" AND v.date >= ").push_bind(from);
        }
        if let Some(to) = self.date_to {
            qb.push(" AND v.date < ").push_bind(to);
        }
        if let Some(search) = &self.search {
            let pattern = format!("%{}%", search.trim());
            qb.push(" AND (v.code LIKE ")
                .push_bind(pattern.clone())
                .push(" OR v.narration LIKE ")
                .push_bind(pattern.clone())
                .push(" OR s.party_account LIKE ")
                .push_bind(pattern)
                .push(")");
        }
        if let Some(party) = &self.party_account {
            qb.push(" AND s.party_account = ").push_bind(party.clone());
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for sales voucher operations.
#[derive(Debug, Clone)]
pub struct SalesVoucherRepository {
    pool: SqlitePool,
}

impl SalesVoucherRepository {
    /// Creates a new SalesVoucherRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SalesVoucherRepository { pool }
    }

    /// Creates a sales voucher: header, extension row, item rows, ledger
    /// posting, and audit record in ONE transaction.
    pub async fn create(&self, new: NewSalesVoucher) -> DbResult<(SalesVoucher, Vec<SaleItem>)> {
        let now = Utc::now();
        let id = Uuid::new_v4().to_string();

        let mut tx = self.pool.begin().await?;

        let seq: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO voucher_counters (voucher_type, next_seq)
            VALUES (?1, 1)
            ON CONFLICT (voucher_type) DO UPDATE SET next_seq = next_seq + 1
            RETURNING next_seq
            "#,
        )
        .bind(VoucherType::Sales)
        .fetch_one(&mut *tx)
        .await?;

        let code = format_voucher_code(VoucherType::Sales, seq);
        debug!(code = %code, party = %new.party_account, "Creating sales voucher");

        // Freeze item totals and the grand total before writing anything.
        let items: Vec<SaleItem> = new
            .items
            .iter()
            .map(|item| SaleItem {
                id: Uuid::new_v4().to_string(),
                voucher_id: id.clone(),
                item_name: item.item_name.clone(),
                quantity: item.quantity,
                rate_cents: item.rate_cents,
                discount_bps: item.discount_bps,
                line_total_cents: line_total_cents(item.quantity, item.rate_cents, item.discount_bps),
            })
            .collect();
        let total_cents: i64 = items.iter().map(|i| i.line_total_cents).sum();

        sqlx::query(
            r#"
            INSERT INTO vouchers (
                id, code, voucher_type, seq, date, narration,
                is_void, is_posted, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, 1, ?7, ?7)
            "#,
        )
        .bind(&id)
        .bind(&code)
        .bind(VoucherType::Sales)
        .bind(seq)
        .bind(new.date)
        .bind(&new.narration)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO sales_vouchers (id, party_account, sales_account, total_cents) \
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&id)
        .bind(&new.party_account)
        .bind(&new.sales_account)
        .bind(total_cents)
        .execute(&mut *tx)
        .await?;

        for item in &items {
            sqlx::query(
                r#"
                INSERT INTO sale_items (
                    id, voucher_id, item_name, quantity,
                    rate_cents, discount_bps, line_total_cents
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )
            .bind(&item.id)
            .bind(&item.voucher_id)
            .bind(&item.item_name)
            .bind(item.quantity)
            .bind(item.rate_cents)
            .bind(item.discount_bps)
            .bind(item.line_total_cents)
            .execute(&mut *tx)
            .await?;
        }

        // Ledger posting: party owes the total, sales account earns it.
        let header = Voucher {
            id: id.clone(),
            code: code.clone(),
            voucher_type: VoucherType::Sales,
            seq,
            date: new.date,
            narration: new.narration.clone(),
            is_void: false,
            is_posted: true,
            created_at: now,
            updated_at: now,
        };
        let ledger_lines = vec![
            TransactionLine {
                account: new.party_account.clone(),
                debit_cents: total_cents,
                credit_cents: 0,
                narration: new.narration.clone(),
            },
            TransactionLine {
                account: new.sales_account.clone(),
                debit_cents: 0,
                credit_cents: total_cents,
                narration: new.narration.clone(),
            },
        ];
        post_lines(&mut tx, &header, &ledger_lines).await?;

        let activity = new_activity(
            ActivityAction::Create,
            "sales_voucher",
            &id,
            new.actor.as_deref(),
            Some(code.clone()),
        );
        insert_activity(&mut *tx, &activity).await?;

        tx.commit().await?;

        let voucher = SalesVoucher {
            id,
            code,
            date: new.date,
            party_account: new.party_account,
            sales_account: new.sales_account,
            narration: new.narration,
            total_cents,
            is_void: false,
            created_at: now,
            updated_at: now,
        };

        Ok((voucher, items))
    }

    /// Lists sales vouchers matching the filter.
    pub async fn list(&self, filter: SalesFilter) -> DbResult<(Vec<SalesVoucher>, i64)> {
        let limit = filter.effective_limit();

        let mut count_qb: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT COUNT(*) FROM vouchers v \
             INNER JOIN sales_vouchers s ON s.id = v.id WHERE 1 = 1",
        );
        filter.push_conditions(&mut count_qb);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT {SALES_COLUMNS} FROM vouchers v \
             INNER JOIN sales_vouchers s ON s.id = v.id WHERE 1 = 1"
        ));
        filter.push_conditions(&mut qb);
        qb.push(" ORDER BY v.date DESC, v.seq DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(filter.skip.max(0));

        let vouchers = qb
            .build_query_as::<SalesVoucher>()
            .fetch_all(&self.pool)
            .await?;

        Ok((vouchers, total))
    }

    /// Items for a set of sales vouchers in one round trip.
    ///
    /// The list endpoint merges these in memory keyed by `voucher_id`.
    pub async fn items_for_vouchers(&self, voucher_ids: &[String]) -> DbResult<Vec<SaleItem>> {
        if voucher_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT id, voucher_id, item_name, quantity, \
             rate_cents, discount_bps, line_total_cents \
             FROM sale_items WHERE voucher_id IN (",
        );
        let mut separated = qb.separated(", ");
        for id in voucher_ids {
            separated.push_bind(id);
        }
        qb.push(") ORDER BY voucher_id, rowid");

        let items = qb.build_query_as::<SaleItem>().fetch_all(&self.pool).await?;

        Ok(items)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::TimeZone;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, d, 10, 0, 0).unwrap()
    }

    fn new_sale(d: u32, party: &str, items: Vec<NewSaleItem>) -> NewSalesVoucher {
        NewSalesVoucher {
            date: day(d),
            party_account: party.to_string(),
            sales_account: "Sales".to_string(),
            narration: None,
            items,
            actor: Some("tester".to_string()),
        }
    }

    fn item(name: &str, qty: i64, rate: i64, discount_bps: u32) -> NewSaleItem {
        NewSaleItem {
            item_name: name.to_string(),
            quantity: qty,
            rate_cents: rate,
            discount_bps,
        }
    }

    #[tokio::test]
    async fn test_create_computes_totals_and_posts_ledger() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.sales();

        // 3 × 2.99 = 8.97, minus 10% = 8.07; plus 2 × 5.00 = 10.00 → 18.07
        let (voucher, items) = repo
            .create(new_sale(
                1,
                "Khan & Co",
                vec![item("Widget", 3, 299, 1000), item("Gadget", 2, 500, 0)],
            ))
            .await
            .unwrap();

        assert_eq!(voucher.code, "SV-1");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].line_total_cents, 807);
        assert_eq!(items[1].line_total_cents, 1000);
        assert_eq!(voucher.total_cents, 1807);

        // Ledger: party debited, sales credited, by the grand total.
        let party = db.vouchers().account_totals("Khan & Co", None).await.unwrap();
        assert_eq!(party.debit_cents, 1807);
        assert_eq!(party.credit_cents, 0);

        let sales = db.vouchers().account_totals("Sales", None).await.unwrap();
        assert_eq!(sales.credit_cents, 1807);

        // The header is visible on the generic voucher side too.
        let header = db.vouchers().get(&voucher.id).await.unwrap().unwrap();
        assert_eq!(header.voucher_type, VoucherType::Sales);
    }

    #[tokio::test]
    async fn test_sales_share_the_sales_sequence() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let (sv1, _) = db
            .sales()
            .create(new_sale(1, "A", vec![item("X", 1, 100, 0)]))
            .await
            .unwrap();
        let (sv2, _) = db
            .sales()
            .create(new_sale(2, "B", vec![item("Y", 1, 100, 0)]))
            .await
            .unwrap();

        assert_eq!(sv1.code, "SV-1");
        assert_eq!(sv2.code, "SV-2");
    }

    #[tokio::test]
    async fn test_list_filters_and_item_merge() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.sales();

        repo.create(new_sale(1, "Khan & Co", vec![item("X", 1, 100, 0)]))
            .await
            .unwrap();
        repo.create(new_sale(5, "Ameen Traders", vec![item("Y", 2, 250, 0), item("Z", 1, 50, 0)]))
            .await
            .unwrap();

        // Party filter
        let (vouchers, total) = repo
            .list(SalesFilter {
                party_account: Some("Ameen Traders".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(vouchers[0].total_cents, 550);

        // Date range [day 2, day 9)
        let (vouchers, _) = repo
            .list(SalesFilter {
                date_from: Some(day(2)),
                date_to: Some(day(9)),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(vouchers.len(), 1);
        assert_eq!(vouchers[0].party_account, "Ameen Traders");

        // Search hits the party name
        let (vouchers, _) = repo
            .list(SalesFilter {
                search: Some("Khan".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(vouchers.len(), 1);

        // Batched item fetch for the merge
        let (all, _) = repo.list(SalesFilter::default()).await.unwrap();
        let ids: Vec<String> = all.iter().map(|v| v.id.clone()).collect();
        let items = repo.items_for_vouchers(&ids).await.unwrap();
        assert_eq!(items.len(), 3);
    }
}
