//! Relational persistence for position rows.
//!
//! A single append-only `positions` table in an embedded Turso database.
//! Rows are never updated or deleted by this service; retention is handled
//! externally.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use turso::Builder;

use crate::application::ports::StoreError;
use crate::domain::position::PositionReport;

const CREATE_TABLE_SQL: &str = "\
CREATE TABLE IF NOT EXISTS positions (
    id INTEGER PRIMARY KEY,
    account_number TEXT,
    file_size INTEGER NOT NULL,
    start_date TEXT,
    end_date TEXT,
    url TEXT NOT NULL,
    created_at TEXT NOT NULL,
    raw_data TEXT NOT NULL
)";

const INSERT_SQL: &str = "\
INSERT INTO positions (account_number, file_size, start_date, end_date, url, created_at, raw_data)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";

struct Inner {
    // keeps the database open for the connection's lifetime
    _db: turso::Database,
    conn: turso::Connection,
}

/// Embedded relational store for accepted positions.
#[derive(Clone)]
pub struct PositionDatabase {
    inner: Arc<Inner>,
}

impl PositionDatabase {
    /// Open the database at `path` (`:memory:` for tests) and ensure the
    /// `positions` table exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] when the file cannot be opened or
    /// the migration fails.
    pub async fn open(path: &str) -> Result<Self, StoreError> {
        let db = Builder::new_local(path)
            .build()
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;
        let conn = db
            .connect()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        conn.execute(CREATE_TABLE_SQL, ())
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        tracing::info!(path, "position database ready");

        Ok(Self {
            inner: Arc::new(Inner { _db: db, conn }),
        })
    }

    /// Append one position row.
    ///
    /// `created_at` is assigned here, at persistence time; `raw_data`
    /// carries the payload exactly as it arrived.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] when the insert fails.
    pub async fn insert(&self, report: &PositionReport, raw_data: &Value) -> Result<(), StoreError> {
        let created_at = Utc::now().to_rfc3339();

        self.inner
            .conn
            .execute(
                INSERT_SQL,
                turso::params![
                    report.account_number.clone(),
                    report.file_size,
                    report.start_date.map(|d| d.to_rfc3339()),
                    report.end_date.map(|d| d.to_rfc3339()),
                    report.url.clone(),
                    created_at,
                    raw_data.to_string(),
                ],
            )
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    /// Number of stored position rows.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] when the query fails.
    pub async fn count(&self) -> Result<i64, StoreError> {
        let mut rows = self
            .inner
            .conn
            .query("SELECT COUNT(*) FROM positions", ())
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let row = rows
            .next()
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?
            .ok_or_else(|| StoreError::Database("count query returned no rows".to_string()))?;

        match row
            .get_value(0)
            .map_err(|e| StoreError::Database(e.to_string()))?
        {
            turso::Value::Integer(n) => Ok(n),
            other => Err(StoreError::Database(format!(
                "unexpected count value: {other:?}"
            ))),
        }
    }
}
