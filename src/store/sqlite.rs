//! SQLite-backed store.
//!
//! Ids come from `INTEGER PRIMARY KEY AUTOINCREMENT`, which SQLite never
//! reuses even after rows disappear. Installments are stored as decimal
//! text so they read back without float drift.

use super::{EmiRecordStore, StoreResult};
use crate::amount::Money;
use crate::error::StoreError;
use crate::record::{EmiRecord, NewEmiRecord, RecordId};
use log::{debug, info};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};

/// Create the records table and its email index.
fn create_tables(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS emi_records (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            emi TEXT NOT NULL,
            email TEXT,
            emi_option TEXT,
            created_at INTEGER NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_emi_records_email ON emi_records(email)",
        [],
    )?;

    Ok(())
}

/// A single SQLite connection shared behind a mutex.
///
/// The insert and the `last_insert_rowid` read happen under the same lock,
/// so concurrent requests always see their own id.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (or creates) the database file at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        info!("Opened SQLite store at {}", path.display());
        Self::from_connection(conn)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> StoreResult<Self> {
        create_tables(&conn)?;
        Ok(SqliteStore {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }
}

/// Columns in the order `read_row` expects.
const SELECT_COLUMNS: &str = "SELECT id, emi, email, emi_option FROM emi_records";

/// A row before the emi text is parsed.
type RawRow = (RecordId, String, Option<String>, Option<String>);

fn read_row(row: &Row<'_>) -> rusqlite::Result<RawRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

fn decode((id, emi, email, option): RawRow) -> StoreResult<EmiRecord> {
    let emi = Money::from_str(&emi).map_err(|e| StoreError::Corrupt {
        id,
        message: format!("invalid emi '{}': {}", emi, e),
    })?;
    Ok(EmiRecord {
        id,
        emi,
        email,
        option,
    })
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

impl EmiRecordStore for SqliteStore {
    fn insert(&self, record: NewEmiRecord) -> StoreResult<EmiRecord> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO emi_records (emi, email, emi_option, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                record.emi.to_string(),
                record.email,
                record.option,
                unix_now()
            ],
        )?;
        let id = conn.last_insert_rowid();
        debug!("Inserted EMI record {}", id);
        Ok(record.with_id(id))
    }

    fn get_by_id(&self, id: RecordId) -> StoreResult<Option<EmiRecord>> {
        let conn = self.lock()?;
        let row = conn
            .query_row(
                &format!("{} WHERE id = ?1", SELECT_COLUMNS),
                params![id],
                read_row,
            )
            .optional()?;
        row.map(decode).transpose()
    }

    fn get_by_email(&self, email: &str) -> StoreResult<Vec<EmiRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "{} WHERE email = ?1 ORDER BY id ASC",
            SELECT_COLUMNS
        ))?;
        let rows = stmt.query_map(params![email], read_row)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(decode(row?)?);
        }
        Ok(records)
    }
}
