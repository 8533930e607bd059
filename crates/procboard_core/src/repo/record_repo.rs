//! Record repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the CRUD surface over the `processos` table.
//! - Map between domain types and the legacy column layout.
//!
//! # Invariants
//! - Write paths call `ProcessRecord::validate()` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - `close_records` is deliberately not atomic across the number set.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::record::{ProcessRecord, RecordStatus, RecordValidationError};
use rusqlite::{params, Connection, Row};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

const RECORD_SELECT_SQL: &str = "SELECT
    numero,
    usuario,
    status,
    data_envio,
    data_fechado
FROM processos";

const RECORDS_TABLE: &str = "processos";
const REQUIRED_COLUMNS: &[&str] = &["numero", "usuario", "status", "data_envio", "data_fechado"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for record persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(RecordValidationError),
    Db(DbError),
    /// Connection has not been migrated by `db::open_db`.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection is not migrated: schema version is {actual_version}, expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted record data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RecordValidationError> for RepoError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistence contract for process records.
pub trait RecordRepository {
    /// Inserts a validated record. Empty fields fail before any SQL runs.
    fn create_record(&self, record: &ProcessRecord) -> RepoResult<()>;
    /// Returns all records, unfiltered, in storage order.
    fn list_records(&self) -> RepoResult<Vec<ProcessRecord>>;
    /// Closes every pending record whose number is in `numbers`.
    ///
    /// Unmatched numbers are a no-op; already-closed records keep their
    /// original closure time. Returns the number of rows changed.
    fn close_records(&self, numbers: &BTreeSet<String>, closed_at: i64) -> RepoResult<usize>;
    /// Deletes every record with the given number, pending or closed.
    fn remove_by_number(&self, number: &str) -> RepoResult<usize>;
    /// Deletes all closed records. Pending records are untouched.
    fn purge_closed(&self) -> RepoResult<usize>;
}

/// SQLite-backed record repository over an injected connection.
pub struct SqliteRecordRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRecordRepository<'conn> {
    /// Wraps a connection after verifying it carries the expected schema.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema(conn)?;
        Ok(Self { conn })
    }
}

impl RecordRepository for SqliteRecordRepository<'_> {
    fn create_record(&self, record: &ProcessRecord) -> RepoResult<()> {
        record.validate()?;

        self.conn.execute(
            "INSERT INTO processos (numero, usuario, status, data_envio, data_fechado)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                record.number.as_str(),
                record.submitter.as_str(),
                status_to_db(record.status),
                record.submitted_at,
                record.closed_at,
            ],
        )?;

        Ok(())
    }

    fn list_records(&self) -> RepoResult<Vec<ProcessRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{RECORD_SELECT_SQL} ORDER BY id ASC;"))?;

        let mut rows = stmt.query([])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_record_row(row)?);
        }

        Ok(records)
    }

    fn close_records(&self, numbers: &BTreeSet<String>, closed_at: i64) -> RepoResult<usize> {
        // One statement per number, no enclosing transaction: a failure
        // mid-set leaves earlier numbers closed.
        let mut stmt = self.conn.prepare(
            "UPDATE processos
             SET status = ?1, data_fechado = ?2
             WHERE numero = ?3 AND status = ?4;",
        )?;

        let mut changed = 0;
        for number in numbers {
            changed += stmt.execute(params![
                status_to_db(RecordStatus::Closed),
                closed_at,
                number.as_str(),
                status_to_db(RecordStatus::Pending),
            ])?;
        }

        Ok(changed)
    }

    fn remove_by_number(&self, number: &str) -> RepoResult<usize> {
        let deleted = self
            .conn
            .execute("DELETE FROM processos WHERE numero = ?1;", params![number])?;
        Ok(deleted)
    }

    fn purge_closed(&self) -> RepoResult<usize> {
        let deleted = self.conn.execute(
            "DELETE FROM processos WHERE status = ?1;",
            params![status_to_db(RecordStatus::Closed)],
        )?;
        Ok(deleted)
    }
}

fn ensure_schema(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, RECORDS_TABLE)? {
        return Err(RepoError::MissingRequiredTable(RECORDS_TABLE));
    }

    let columns = table_columns(conn, RECORDS_TABLE)?;
    for column in REQUIRED_COLUMNS {
        if !columns.iter().any(|have| have == column) {
            return Err(RepoError::MissingRequiredColumn {
                table: RECORDS_TABLE,
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table_name: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        params![table_name],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_columns(conn: &Connection, table_name: &str) -> RepoResult<Vec<String>> {
    // PRAGMA arguments cannot be bound; `table_name` is always a constant here.
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table_name});"))?;
    let mut rows = stmt.query([])?;
    let mut columns = Vec::new();
    while let Some(row) = rows.next()? {
        columns.push(row.get::<_, String>("name")?);
    }
    Ok(columns)
}

fn parse_record_row(row: &Row<'_>) -> RepoResult<ProcessRecord> {
    let status_text: String = row.get("status")?;
    let status = parse_status(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid status `{status_text}` in processos.status"))
    })?;

    let record = ProcessRecord {
        number: row.get("numero")?,
        submitter: row.get("usuario")?,
        status,
        submitted_at: row.get("data_envio")?,
        closed_at: row.get("data_fechado")?,
    };
    record.validate()?;
    Ok(record)
}

fn status_to_db(status: RecordStatus) -> &'static str {
    match status {
        RecordStatus::Pending => "pending",
        RecordStatus::Closed => "closed",
    }
}

fn parse_status(value: &str) -> Option<RecordStatus> {
    match value {
        "pending" => Some(RecordStatus::Pending),
        "closed" => Some(RecordStatus::Closed),
        _ => None,
    }
}
