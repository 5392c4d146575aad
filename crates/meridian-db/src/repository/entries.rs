//! # Entry Repository
//!
//! Read access to ledger entry batches and lines. Writing happens in the
//! voucher repositories, inside the voucher creation transaction - a batch
//! never exists without its voucher.
//!
//! ## Container Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │             One batch per account per voucher creation                  │
//! │                                                                         │
//! │  Voucher CV-7 { Cash debit 1000, Sales credit 800, Tax credit 200 }    │
//! │       │                                                                 │
//! │       ├── EntryBatch(account: "Cash")  ── line: debit 1000             │
//! │       ├── EntryBatch(account: "Sales") ── line: credit 800             │
//! │       └── EntryBatch(account: "Tax")   ── line: credit 200             │
//! │                                                                         │
//! │  NOT one global ledger: account screens read their own batches.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::error::DbResult;
use meridian_core::{EntryBatch, EntryLine};

/// Columns selected for every `EntryLine` query.
const LINE_COLUMNS: &str = "id, batch_id, account, voucher_id, voucher_code, \
     debit_cents, credit_cents, narration, date, is_void, is_posted";

/// Repository for ledger entry reads.
#[derive(Debug, Clone)]
pub struct EntryRepository {
    pool: SqlitePool,
}

impl EntryRepository {
    /// Creates a new EntryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        EntryRepository { pool }
    }

    /// All entry lines posted by one voucher, grouped by account order.
    pub async fn lines_for_voucher(&self, voucher_id: &str) -> DbResult<Vec<EntryLine>> {
        let lines = sqlx::query_as::<_, EntryLine>(&format!(
            "SELECT {LINE_COLUMNS} FROM entry_lines WHERE voucher_id = ?1 ORDER BY account, id"
        ))
        .bind(voucher_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Entry lines for a set of vouchers in one round trip.
    ///
    /// Used by the list endpoints: vouchers are fetched first, then their
    /// lines are fetched with this method and merged in memory keyed by
    /// `voucher_id` (there is no SQL join on the list path).
    pub async fn lines_for_vouchers(&self, voucher_ids: &[String]) -> DbResult<Vec<EntryLine>> {
        if voucher_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {LINE_COLUMNS} FROM entry_lines WHERE voucher_id IN ("));
        let mut separated = qb.separated(", ");
        for id in voucher_ids {
            separated.push_bind(id);
        }
        qb.push(") ORDER BY voucher_id, account, id");

        let lines = qb
            .build_query_as::<EntryLine>()
            .fetch_all(&self.pool)
            .await?;

        Ok(lines)
    }

    /// The per-account containers created by one voucher.
    pub async fn batches_for_voucher(&self, voucher_id: &str) -> DbResult<Vec<EntryBatch>> {
        let batches = sqlx::query_as::<_, EntryBatch>(
            r#"
            SELECT id, account, voucher_id, created_at
            FROM entry_batches
            WHERE voucher_id = ?1
            ORDER BY account
            "#,
        )
        .bind(voucher_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(batches)
    }
}
