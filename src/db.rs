// 🗄️ Transaction Store - per-user persistence collaborator
//
// The ingest core only needs two calls: fetch a user's stored transactions
// before duplicate detection, and persist a batch afterwards. A batch insert is
// all-or-nothing.

use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

use crate::deduplication::content_hash;
use crate::error::Result;
use crate::transaction::{CellValue, CreditCardInfo, NormalizedTransaction, TransactionType};

/// Storage seam used by the import pipeline.
pub trait TransactionStore {
    /// Every stored transaction for `user_id`, oldest first.
    fn existing_transactions(&self, user_id: &str) -> Result<Vec<NormalizedTransaction>>;

    /// Persist `transactions` atomically; returns the number stored.
    fn insert_transactions(
        &mut self,
        user_id: &str,
        transactions: &[NormalizedTransaction],
    ) -> Result<usize>;
}

// ============================================================================
// SQLITE STORE
// ============================================================================

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        // WAL for crash recovery
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        setup_database(&conn)?;
        Ok(SqliteStore { conn })
    }

    pub fn count(&self, user_id: &str) -> Result<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM transactions WHERE user_id = ?1",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

pub fn setup_database(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS transactions (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            content_hash TEXT NOT NULL,
            date TEXT,
            description TEXT,
            amount REAL,
            transaction_type TEXT NOT NULL,
            category TEXT NOT NULL,
            merchant TEXT NOT NULL,
            tags TEXT NOT NULL,
            is_credit_card_payment INTEGER NOT NULL,
            credit_card_info TEXT,
            original_data TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_user_hash ON transactions(user_id, content_hash)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_user_date ON transactions(user_id, date)",
        [],
    )?;

    Ok(())
}

/// Columns as read back, before JSON decoding.
struct StoredRow {
    date: Option<String>,
    description: Option<String>,
    amount: Option<f64>,
    transaction_type: String,
    category: String,
    merchant: String,
    tags: String,
    is_credit_card_payment: bool,
    credit_card_info: Option<String>,
    original_data: String,
}

impl StoredRow {
    fn into_transaction(self) -> Result<NormalizedTransaction> {
        let tags: Vec<String> = serde_json::from_str(&self.tags)?;
        let original_data: BTreeMap<String, CellValue> = serde_json::from_str(&self.original_data)?;
        let credit_card_info: Option<CreditCardInfo> = self
            .credit_card_info
            .as_deref()
            .map(serde_json::from_str::<CreditCardInfo>)
            .transpose()?;

        Ok(NormalizedTransaction {
            date: self
                .date
                .as_deref()
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()),
            description: self.description,
            amount: self.amount,
            transaction_type: TransactionType::parse(&self.transaction_type),
            category: self.category,
            merchant: self.merchant,
            tags,
            is_credit_card_payment: self.is_credit_card_payment,
            credit_card_info,
            original_data,
            ..NormalizedTransaction::empty()
        })
    }
}

impl TransactionStore for SqliteStore {
    fn existing_transactions(&self, user_id: &str) -> Result<Vec<NormalizedTransaction>> {
        let mut stmt = self.conn.prepare(
            "SELECT date, description, amount, transaction_type, category, merchant,
                    tags, is_credit_card_payment, credit_card_info, original_data
             FROM transactions
             WHERE user_id = ?1
             ORDER BY created_at, rowid",
        )?;

        let rows = stmt
            .query_map(params![user_id], |row| {
                Ok(StoredRow {
                    date: row.get(0)?,
                    description: row.get(1)?,
                    amount: row.get(2)?,
                    transaction_type: row.get(3)?,
                    category: row.get(4)?,
                    merchant: row.get(5)?,
                    tags: row.get(6)?,
                    is_credit_card_payment: row.get(7)?,
                    credit_card_info: row.get(8)?,
                    original_data: row.get(9)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let transactions = rows
            .into_iter()
            .map(StoredRow::into_transaction)
            .collect::<Result<Vec<_>>>()?;

        debug!(user_id, count = transactions.len(), "loaded stored transactions");
        Ok(transactions)
    }

    fn insert_transactions(
        &mut self,
        user_id: &str,
        transactions: &[NormalizedTransaction],
    ) -> Result<usize> {
        let created_at = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO transactions (
                    id, user_id, content_hash, date, description, amount,
                    transaction_type, category, merchant, tags,
                    is_credit_card_payment, credit_card_info, original_data, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            )?;

            for record in transactions {
                let credit_card_info = record
                    .credit_card_info
                    .as_ref()
                    .map(serde_json::to_string)
                    .transpose()?;

                stmt.execute(params![
                    uuid::Uuid::new_v4().to_string(),
                    user_id,
                    content_hash(record),
                    record.date.map(|d| d.format("%Y-%m-%d").to_string()),
                    record.description,
                    record.amount,
                    record.transaction_type.as_str(),
                    record.category,
                    record.merchant,
                    serde_json::to_string(&record.tags)?,
                    record.is_credit_card_payment,
                    credit_card_info,
                    serde_json::to_string(&record.original_data)?,
                    created_at,
                ])?;
            }
        }

        // Dropping `tx` on any early return above rolls the batch back
        tx.commit()?;

        info!(user_id, inserted = transactions.len(), "stored transactions");
        Ok(transactions.len())
    }
}

// ============================================================================
// TESTS
// ============================================================================
