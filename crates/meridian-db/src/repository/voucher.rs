//! # Voucher Repository
//!
//! Voucher lifecycle and aggregate queries.
//!
//! ## Voucher Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Voucher Lifecycle                                 │
//! │                                                                         │
//! │  1. CREATE (one transaction)                                           │
//! │     ├── bump voucher_counters[type] → seq                              │
//! │     ├── insert header with code <prefix>-<seq>                         │
//! │     ├── group transaction lines by account                             │
//! │     ├── insert one entry batch per account + its lines                 │
//! │     └── insert activity record                                         │
//! │                                                                         │
//! │  2. (OPTIONAL) UPDATE                                                  │
//! │     └── mutate header, mirror date into entry lines                    │
//! │                                                                         │
//! │  3. (OPTIONAL) VOID / UNVOID                                           │
//! │     └── toggle is_void on header AND lines in one transaction          │
//! │                                                                         │
//! │  4. (OPTIONAL) DELETE                                                  │
//! │     └── remove header; batches/lines/sales rows go via ON DELETE       │
//! │         CASCADE, keyed by voucher id                                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Numbering
//! Sequence numbers come from `voucher_counters`, bumped with an UPSERT in
//! the creation transaction. Two concurrent creates serialize on the
//! counter row; the UNIQUE index on `code` backstops the invariant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::activity::{insert_activity, new_activity};
use meridian_core::{
    format_voucher_code, AccountBalance, AccountTotals, ActivityAction, EntryLine,
    TransactionLine, Voucher, VoucherType, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT,
};

/// Columns selected for every `Voucher` query.
const VOUCHER_COLUMNS: &str = "id, code, voucher_type, seq, date, narration, \
     is_void, is_posted, created_at, updated_at";

// =============================================================================
// Inputs
// =============================================================================

/// Input for voucher creation. Callers validate with
/// `meridian_core::validation` before handing it to the repository.
#[derive(Debug, Clone)]
pub struct NewVoucher {
    pub voucher_type: VoucherType,
    pub date: DateTime<Utc>,
    pub narration: Option<String>,
    pub is_posted: bool,
    pub lines: Vec<TransactionLine>,
    pub actor: Option<String>,
}

/// Partial update of a voucher header. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateVoucher {
    pub date: Option<DateTime<Utc>>,
    pub narration: Option<String>,
    pub is_posted: Option<bool>,
    pub actor: Option<String>,
}

/// Sort order for voucher listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoucherSort {
    /// Newest transaction date first (the ledger screen default).
    #[default]
    DateDesc,
    DateAsc,
    /// Type then sequence, so CV-2 sorts before CV-10.
    CodeAsc,
    CreatedDesc,
}

impl VoucherSort {
    fn order_clause(&self) -> &'static str {
        match self {
            VoucherSort::DateDesc => "date DESC, voucher_type, seq DESC",
            VoucherSort::DateAsc => "date ASC, voucher_type, seq ASC",
            VoucherSort::CodeAsc => "voucher_type ASC, seq ASC",
            VoucherSort::CreatedDesc => "created_at DESC, seq DESC",
        }
    }
}

/// Optional filters plus pagination for voucher listings.
///
/// `date_to` is exclusive; the API layer turns a single-date filter into a
/// one-day `[from, to)` range.
#[derive(Debug, Clone, Default)]
pub struct VoucherFilter {
    pub voucher_type: Option<VoucherType>,
    pub is_void: Option<bool>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    /// Free-text search over code and narration.
    pub search: Option<String>,
    /// Only vouchers touching this account (via their entry lines).
    pub account: Option<String>,
    pub skip: i64,
    pub limit: i64,
    pub sort: VoucherSort,
}

impl VoucherFilter {
    /// Effective page size: defaulted and clamped.
    fn effective_limit(&self) -> i64 {
        if self.limit <= 0 {
            DEFAULT_PAGE_LIMIT
        } else {
            self.limit.min(MAX_PAGE_LIMIT)
        }
    }

    /// Appends the WHERE conditions shared by the page and count queries.
    fn push_conditions(&self, qb: &mut QueryBuilder<Sqlite>) {
        if let Some(vt) = self.voucher_type {
            qb.push(" AND voucher_type = ").push_bind(vt);
        }
        if let Some(is_void) = self.is_void {
            qb.push(" AND is_void = ").push_bind(is_void);
        }
        if let Some(from) = self.date_from {
            qb.push(" AND date >= ").push_bind(from);
        }
        if let Some(to) = self.date_to {
            qb.push(" AND date < ").push_bind(to);
        }
        if let Some(search) = &self.search {
            let pattern = format!("%{}%", search.trim());
            qb.push(" AND (code LIKE ")
                .push_bind(pattern.clone())
                .push(" OR narration LIKE ")
                .push_bind(pattern)
                .push(")");
        }
        if let Some(account) = &self.account {
            qb.push(
                " AND EXISTS (SELECT 1 FROM entry_lines e \
                 WHERE e.voucher_id = vouchers.id AND e.account = ",
            )
            .push_bind(account.clone())
            .push(")");
        }
    }
}

/// One page of vouchers plus the unpaginated match count.
#[derive(Debug, Clone)]
pub struct VoucherPage {
    pub vouchers: Vec<Voucher>,
    pub total: i64,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for voucher database operations.
#[derive(Debug, Clone)]
pub struct VoucherRepository {
    pool: SqlitePool,
}

impl VoucherRepository {
    /// Creates a new VoucherRepository.
    pub fn new(pool: SqlitePool) -> Self {
        VoucherRepository { pool }
    }

    /// Creates a voucher: header, ledger batches/lines, and audit record in
    /// ONE transaction. Either everything lands or nothing does.
    ///
    /// ## Returns
    /// The stored header and the entry lines it posted.
    pub async fn create(&self, new: NewVoucher) -> DbResult<(Voucher, Vec<EntryLine>)> {
        let now = Utc::now();
        let id = Uuid::new_v4().to_string();

        let mut tx = self.pool.begin().await?;

        // Next sequence for this type. The UPSERT serializes concurrent
        // creators on the counter row.
        let seq: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO voucher_counters (voucher_type, next_seq)
            VALUES (?1, 1)
            ON CONFLICT (voucher_type) DO UPDATE SET next_seq = next_seq + 1
            RETURNING next_seq
            "#,
        )
        .bind(new.voucher_type)
        .fetch_one(&mut *tx)
        .await?;

        let code = format_voucher_code(new.voucher_type, seq);
        debug!(code = %code, "Creating voucher");

        let voucher = Voucher {
            id: id.clone(),
            code: code.clone(),
            voucher_type: new.voucher_type,
            seq,
            date: new.date,
            narration: new.narration.clone(),
            is_void: false,
            is_posted: new.is_posted,
            created_at: now,
            updated_at: now,
        };

        insert_header(&mut tx, &voucher).await?;

        let lines = post_lines(&mut tx, &voucher, &new.lines).await?;

        let activity = new_activity(
            ActivityAction::Create,
            "voucher",
            &id,
            new.actor.as_deref(),
            Some(code),
        );
        insert_activity(&mut *tx, &activity).await?;

        tx.commit().await?;

        Ok((voucher, lines))
    }

    /// Gets a voucher by ID.
    pub async fn get(&self, id: &str) -> DbResult<Option<Voucher>> {
        let voucher = sqlx::query_as::<_, Voucher>(&format!(
            "SELECT {VOUCHER_COLUMNS} FROM vouchers WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(voucher)
    }

    /// Gets a voucher by its human-readable code.
    pub async fn get_by_code(&self, code: &str) -> DbResult<Option<Voucher>> {
        let voucher = sqlx::query_as::<_, Voucher>(&format!(
            "SELECT {VOUCHER_COLUMNS} FROM vouchers WHERE code = ?1"
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(voucher)
    }

    /// Lists vouchers matching the filter, with skip/limit pagination.
    ///
    /// Two queries: an unpaginated COUNT and the page itself, built from the
    /// same conditions.
    pub async fn list(&self, filter: VoucherFilter) -> DbResult<VoucherPage> {
        let limit = filter.effective_limit();

        let mut count_qb: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT COUNT(*) FROM vouchers WHERE 1 = 1");
        filter.push_conditions(&mut count_qb);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT {VOUCHER_COLUMNS} FROM vouchers WHERE 1 = 1"
        ));
        filter.push_conditions(&mut qb);
        qb.push(" ORDER BY ")
            .push(filter.sort.order_clause())
            .push(" LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(filter.skip.max(0));

        let vouchers = qb
            .build_query_as::<Voucher>()
            .fetch_all(&self.pool)
            .await?;

        debug!(count = vouchers.len(), total, "Voucher list query");

        Ok(VoucherPage { vouchers, total })
    }

    /// Updates header fields and mirrors the date into the entry lines
    /// (lines carry the voucher date, so a header date change propagates).
    pub async fn update(&self, id: &str, update: UpdateVoucher) -> DbResult<Voucher> {
        let current = self.get(id).await?.ok_or_else(|| DbError::not_found("Voucher", id))?;

        let now = Utc::now();
        let date = update.date.unwrap_or(current.date);
        let narration = update.narration.clone().or(current.narration.clone());
        let is_posted = update.is_posted.unwrap_or(current.is_posted);

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE vouchers SET
                date = ?2,
                narration = ?3,
                is_posted = ?4,
                updated_at = ?5
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(date)
        .bind(&narration)
        .bind(is_posted)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE entry_lines SET date = ?2, is_posted = ?3 WHERE voucher_id = ?1")
            .bind(id)
            .bind(date)
            .bind(is_posted)
            .execute(&mut *tx)
            .await?;

        let activity = new_activity(
            ActivityAction::Update,
            "voucher",
            id,
            update.actor.as_deref(),
            Some(current.code.clone()),
        );
        insert_activity(&mut *tx, &activity).await?;

        tx.commit().await?;

        self.get(id)
            .await?
            .ok_or_else(|| DbError::not_found("Voucher", id))
    }

    /// Voids or unvoids a voucher: header and entry lines toggle together in
    /// one transaction.
    ///
    /// ## Errors
    /// * `NotFound` when the id is unknown OR the voucher is already in the
    ///   requested state (the `is_void` guard matched zero rows). Handlers
    ///   pre-read the voucher to report the friendlier conflict message.
    pub async fn set_void(&self, id: &str, void: bool, actor: Option<&str>) -> DbResult<Voucher> {
        let now = Utc::now();

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "UPDATE vouchers SET is_void = ?2, updated_at = ?3 WHERE id = ?1 AND is_void = ?4",
        )
        .bind(id)
        .bind(void)
        .bind(now)
        .bind(!void)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Voucher", id));
        }

        sqlx::query("UPDATE entry_lines SET is_void = ?2 WHERE voucher_id = ?1")
            .bind(id)
            .bind(void)
            .execute(&mut *tx)
            .await?;

        let action = if void {
            ActivityAction::Void
        } else {
            ActivityAction::Unvoid
        };
        let activity = new_activity(action, "voucher", id, actor, None);
        insert_activity(&mut *tx, &activity).await?;

        tx.commit().await?;

        self.get(id)
            .await?
            .ok_or_else(|| DbError::not_found("Voucher", id))
    }

    /// Deletes a voucher. Entry batches, lines, and any sales extension rows
    /// are pruned by voucher id through ON DELETE CASCADE.
    pub async fn delete(&self, id: &str, actor: Option<&str>) -> DbResult<()> {
        let current = self.get(id).await?.ok_or_else(|| DbError::not_found("Voucher", id))?;

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM vouchers WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Voucher", id));
        }

        let activity = new_activity(
            ActivityAction::Delete,
            "voucher",
            id,
            actor,
            Some(current.code),
        );
        insert_activity(&mut *tx, &activity).await?;

        tx.commit().await?;

        Ok(())
    }

    // =========================================================================
    // Aggregates
    // =========================================================================

    /// Debit/credit totals for one account over its non-void entry lines,
    /// optionally up to an exclusive cutoff date.
    pub async fn account_totals(
        &self,
        account: &str,
        until: Option<DateTime<Utc>>,
    ) -> DbResult<AccountTotals> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT COALESCE(SUM(debit_cents), 0), COALESCE(SUM(credit_cents), 0) \
             FROM entry_lines WHERE is_void = 0 AND account = ",
        );
        qb.push_bind(account);
        if let Some(until) = until {
            qb.push(" AND date < ").push_bind(until);
        }

        let (debit_cents, credit_cents): (i64, i64) =
            qb.build_query_as().fetch_one(&self.pool).await?;

        Ok(AccountTotals {
            account: account.to_string(),
            debit_cents,
            credit_cents,
        })
    }

    /// Per-account balances over all account masters as of an optional
    /// exclusive cutoff: opening balance plus non-void ledger movement.
    pub async fn account_balances(
        &self,
        as_of: Option<DateTime<Utc>>,
    ) -> DbResult<Vec<AccountBalance>> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT a.name AS account, a.kind AS kind, \
                    a.opening_balance_cents AS opening_balance_cents, \
                    COALESCE(SUM(e.debit_cents), 0) AS debit_cents, \
                    COALESCE(SUM(e.credit_cents), 0) AS credit_cents \
             FROM accounts a \
             LEFT JOIN entry_lines e \
               ON e.account = a.name AND e.is_void = 0",
        );
        if let Some(as_of) = as_of {
            qb.push(" AND e.date < ").push_bind(as_of);
        }
        qb.push(" GROUP BY a.name, a.kind, a.opening_balance_cents ORDER BY a.name");

        let balances = qb
            .build_query_as::<AccountBalance>()
            .fetch_all(&self.pool)
            .await?;

        Ok(balances)
    }
}

// =============================================================================
// Transaction Helpers
// =============================================================================

async fn insert_header(
    tx: &mut sqlx::Transaction<'_, Sqlite>,
    voucher: &Voucher,
) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO vouchers (
            id, code, voucher_type, seq, date, narration,
            is_void, is_posted, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
        "#,
    )
    .bind(&voucher.id)
    .bind(&voucher.code)
    .bind(voucher.voucher_type)
    .bind(voucher.seq)
    .bind(voucher.date)
    .bind(&voucher.narration)
    .bind(voucher.is_void)
    .bind(voucher.is_posted)
    .bind(voucher.created_at)
    .bind(voucher.updated_at)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Groups transaction lines by account (first-seen order) and inserts one
/// entry batch per account with its lines.
pub(crate) async fn post_lines(
    tx: &mut sqlx::Transaction<'_, Sqlite>,
    voucher: &Voucher,
    lines: &[TransactionLine],
) -> DbResult<Vec<EntryLine>> {
    let mut grouped: Vec<(&str, Vec<&TransactionLine>)> = Vec::new();
    for line in lines {
        match grouped.iter_mut().find(|(account, _)| *account == line.account) {
            Some((_, bucket)) => bucket.push(line),
            None => grouped.push((line.account.as_str(), vec![line])),
        }
    }

    let mut stored = Vec::with_capacity(lines.len());

    for (account, bucket) in grouped {
        let batch_id = Uuid::new_v4().to_string();

        sqlx::query(
            "INSERT INTO entry_batches (id, account, voucher_id, created_at) \
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&batch_id)
        .bind(account)
        .bind(&voucher.id)
        .bind(voucher.created_at)
        .execute(&mut **tx)
        .await?;

        for line in bucket {
            let entry = EntryLine {
                id: Uuid::new_v4().to_string(),
                batch_id: batch_id.clone(),
                account: account.to_string(),
                voucher_id: voucher.id.clone(),
                voucher_code: voucher.code.clone(),
                debit_cents: line.debit_cents,
                credit_cents: line.credit_cents,
                narration: line.narration.clone(),
                date: voucher.date,
                is_void: false,
                is_posted: voucher.is_posted,
            };

            sqlx::query(
                r#"
                INSERT INTO entry_lines (
                    id, batch_id, account, voucher_id, voucher_code,
                    debit_cents, credit_cents, narration, date, is_void, is_posted
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                "#,
            )
            .bind(&entry.id)
            .bind(&entry.batch_id)
            .bind(&entry.account)
            .bind(&entry.voucher_id)
            .bind(&entry.voucher_code)
            .bind(entry.debit_cents)
            .bind(entry.credit_cents)
            .bind(&entry.narration)
            .bind(entry.date)
            .bind(entry.is_void)
            .bind(entry.is_posted)
            .execute(&mut **tx)
            .await?;

            stored.push(entry);
        }
    }

    Ok(stored)
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
        Utc.with_ymd_and_hms(2026, 3, d, 12, 0, 0).unwrap()
    }

    fn debit(account: &str, cents: i64) -> TransactionLine {
        TransactionLine {
            account: account.to_string(),
            debit_cents: cents,
            credit_cents: 0,
            narration: None,
        }
    }

    fn credit(account: &str, cents: i64) -> TransactionLine {
        TransactionLine {
            account: account.to_string(),
            debit_cents: 0,
            credit_cents: cents,
            narration: None,
        }
    }

    fn new_voucher(vt: VoucherType, d: u32, lines: Vec<TransactionLine>) -> NewVoucher {
        NewVoucher {
            voucher_type: vt,
            date: day(d),
            narration: Some("test".to_string()),
            is_posted: true,
            lines,
            actor: Some("tester".to_string()),
        }
    }

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_codes_increase_per_type() {
        let db = test_db().await;
        let repo = db.vouchers();

        let (v1, _) = repo
            .create(new_voucher(VoucherType::Cash, 1, vec![debit("Cash", 100), credit("Sales", 100)]))
            .await
            .unwrap();
        let (v2, _) = repo
            .create(new_voucher(VoucherType::Journal, 1, vec![debit("A", 50), credit("B", 50)]))
            .await
            .unwrap();
        let (v3, _) = repo
            .create(new_voucher(VoucherType::Cash, 2, vec![debit("Cash", 200), credit("Sales", 200)]))
            .await
            .unwrap();

        assert_eq!(v1.code, "CV-1");
        assert_eq!(v2.code, "JV-1");
        assert_eq!(v3.code, "CV-2");
        assert_eq!(v3.seq, 2);
    }

    #[tokio::test]
    async fn test_create_posts_one_batch_per_account() {
        let db = test_db().await;
        let repo = db.vouchers();

        // Two lines on Cash, one on Sales: 2 batches, 3 lines.
        let (voucher, lines) = repo
            .create(new_voucher(
                VoucherType::Cash,
                1,
                vec![debit("Cash", 600), debit("Cash", 400), credit("Sales", 1000)],
            ))
            .await
            .unwrap();

        assert_eq!(lines.len(), 3);

        let batches = db.entries().batches_for_voucher(&voucher.id).await.unwrap();
        assert_eq!(batches.len(), 2);
        let accounts: Vec<&str> = batches.iter().map(|b| b.account.as_str()).collect();
        assert_eq!(accounts, vec!["Cash", "Sales"]);

        let stored = db.entries().lines_for_voucher(&voucher.id).await.unwrap();
        assert_eq!(stored.len(), 3);
        assert!(stored.iter().all(|l| l.voucher_code == "CV-1"));
    }

    #[tokio::test]
    async fn test_create_is_atomic_on_code_collision() {
        let db = test_db().await;
        let repo = db.vouchers();

        // Occupy code CV-1 behind the counter's back.
        sqlx::query(
            "INSERT INTO vouchers (id, code, voucher_type, seq, date, narration, is_void, is_posted, created_at, updated_at) \
             VALUES ('rogue', 'CV-1', 'cash', 1, '2026-03-01T00:00:00Z', NULL, 0, 1, '2026-03-01T00:00:00Z', '2026-03-01T00:00:00Z')",
        )
        .execute(db.pool())
        .await
        .unwrap();

        let err = repo
            .create(new_voucher(VoucherType::Cash, 1, vec![debit("Cash", 100), credit("Sales", 100)]))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));

        // Nothing leaked: no entry lines, no activity, counter rolled back.
        let lines: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM entry_lines")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(lines, 0);

        let activities: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM activity_logs")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(activities, 0);

        let counter: Option<i64> =
            sqlx::query_scalar("SELECT next_seq FROM voucher_counters WHERE voucher_type = 'cash'")
                .fetch_optional(db.pool())
                .await
                .unwrap();
        assert_eq!(counter, None);
    }

    #[tokio::test]
    async fn test_list_filters_narrow_results() {
        let db = test_db().await;
        let repo = db.vouchers();

        repo.create(new_voucher(VoucherType::Cash, 1, vec![debit("Cash", 100), credit("Sales", 100)]))
            .await
            .unwrap();
        repo.create(new_voucher(VoucherType::Cash, 5, vec![debit("Cash", 200), credit("Rent", 200)]))
            .await
            .unwrap();
        let (jv, _) = repo
            .create(new_voucher(VoucherType::Journal, 9, vec![debit("Rent", 300), credit("Bank", 300)]))
            .await
            .unwrap();
        repo.set_void(&jv.id, true, None).await.unwrap();

        // Type filter
        let page = repo
            .list(VoucherFilter {
                voucher_type: Some(VoucherType::Cash),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.total, 2);

        // Void filter
        let page = repo
            .list(VoucherFilter {
                is_void: Some(true),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.vouchers[0].code, "JV-1");

        // Date range: [day 4, day 8) catches only the day-5 voucher
        let page = repo
            .list(VoucherFilter {
                date_from: Some(day(4)),
                date_to: Some(day(8)),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.vouchers[0].code, "CV-2");

        // Account membership
        let page = repo
            .list(VoucherFilter {
                account: Some("Rent".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.total, 2);

        // Search by code
        let page = repo
            .list(VoucherFilter {
                search: Some("JV".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.total, 1);
    }

    #[tokio::test]
    async fn test_list_pagination_and_sort() {
        let db = test_db().await;
        let repo = db.vouchers();

        for d in 1..=7 {
            repo.create(new_voucher(VoucherType::Cash, d, vec![debit("Cash", 100), credit("Sales", 100)]))
                .await
                .unwrap();
        }

        let page = repo
            .list(VoucherFilter {
                skip: 2,
                limit: 3,
                sort: VoucherSort::CodeAsc,
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(page.total, 7);
        assert_eq!(page.vouchers.len(), 3);
        let codes: Vec<&str> = page.vouchers.iter().map(|v| v.code.as_str()).collect();
        assert_eq!(codes, vec!["CV-3", "CV-4", "CV-5"]);

        // DateDesc default: newest first
        let page = repo.list(VoucherFilter::default()).await.unwrap();
        assert_eq!(page.vouchers[0].code, "CV-7");
    }

    #[tokio::test]
    async fn test_void_mirrors_into_lines_and_totals() {
        let db = test_db().await;
        let repo = db.vouchers();

        let (v1, _) = repo
            .create(new_voucher(VoucherType::Cash, 1, vec![debit("Cash", 1000), credit("Sales", 1000)]))
            .await
            .unwrap();
        repo.create(new_voucher(VoucherType::Cash, 2, vec![debit("Cash", 500), credit("Sales", 500)]))
            .await
            .unwrap();

        let totals = repo.account_totals("Cash", None).await.unwrap();
        assert_eq!(totals.debit_cents, 1500);
        assert_eq!(totals.credit_cents, 0);

        let voided = repo.set_void(&v1.id, true, None).await.unwrap();
        assert!(voided.is_void);

        let lines = db.entries().lines_for_voucher(&v1.id).await.unwrap();
        assert!(lines.iter().all(|l| l.is_void));

        // Voided voucher drops out of totals
        let totals = repo.account_totals("Cash", None).await.unwrap();
        assert_eq!(totals.debit_cents, 500);

        // Unvoid restores it
        repo.set_void(&v1.id, false, None).await.unwrap();
        let totals = repo.account_totals("Cash", None).await.unwrap();
        assert_eq!(totals.debit_cents, 1500);

        // Double-unvoid is a no-match
        let err = repo.set_void(&v1.id, false, None).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_totals_respect_cutoff() {
        let db = test_db().await;
        let repo = db.vouchers();

        repo.create(new_voucher(VoucherType::Cash, 1, vec![debit("Cash", 100), credit("Sales", 100)]))
            .await
            .unwrap();
        repo.create(new_voucher(VoucherType::Cash, 10, vec![debit("Cash", 900), credit("Sales", 900)]))
            .await
            .unwrap();

        let totals = repo.account_totals("Cash", Some(day(5))).await.unwrap();
        assert_eq!(totals.debit_cents, 100);

        let totals = repo.account_totals("Cash", None).await.unwrap();
        assert_eq!(totals.debit_cents, 1000);
    }

    #[tokio::test]
    async fn test_account_balances() {
        let db = test_db().await;
        let repo = db.vouchers();

        db.accounts()
            .insert(crate::repository::account::NewAccount {
                name: "Cash".to_string(),
                kind: meridian_core::AccountKind::Asset,
                opening_balance_cents: 5000,
            })
            .await
            .unwrap();
        db.accounts()
            .insert(crate::repository::account::NewAccount {
                name: "Sales".to_string(),
                kind: meridian_core::AccountKind::Income,
                opening_balance_cents: 0,
            })
            .await
            .unwrap();

        repo.create(new_voucher(VoucherType::Cash, 1, vec![debit("Cash", 1000), credit("Sales", 1000)]))
            .await
            .unwrap();

        let balances = repo.account_balances(None).await.unwrap();
        assert_eq!(balances.len(), 2);

        let cash = balances.iter().find(|b| b.account == "Cash").unwrap();
        assert_eq!(cash.balance_cents(), 6000);

        let sales = balances.iter().find(|b| b.account == "Sales").unwrap();
        assert_eq!(sales.balance_cents(), -1000);
    }

    #[tokio::test]
    async fn test_update_mirrors_date() {
        let db = test_db().await;
        let repo = db.vouchers();

        let (v, _) = repo
            .create(new_voucher(VoucherType::Cash, 1, vec![debit("Cash", 100), credit("Sales", 100)]))
            .await
            .unwrap();

        let updated = repo
            .update(
                &v.id,
                UpdateVoucher {
                    date: Some(day(20)),
                    narration: Some("revised".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.date, day(20));
        assert_eq!(updated.narration.as_deref(), Some("revised"));

        let lines = db.entries().lines_for_voucher(&v.id).await.unwrap();
        assert!(lines.iter().all(|l| l.date == day(20)));
    }

    #[tokio::test]
    async fn test_delete_prunes_ledger() {
        let db = test_db().await;
        let repo = db.vouchers();

        let (v, _) = repo
            .create(new_voucher(VoucherType::Cash, 1, vec![debit("Cash", 100), credit("Sales", 100)]))
            .await
            .unwrap();

        repo.delete(&v.id, Some("tester")).await.unwrap();

        assert!(repo.get(&v.id).await.unwrap().is_none());
        let lines: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM entry_lines")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(lines, 0);
        let batches: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM entry_batches")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(batches, 0);

        let err = repo.delete(&v.id, None).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
