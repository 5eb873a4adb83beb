//! Database operations for vocabulary review records
//!
//! Handles SQLite database initialization and CRUD operations for review
//! records, keyed by user and term. No scheduling logic lives here.

use crate::error::StorageError;
use crate::models::{Clock, VocabularyReviewRecord};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::path::Path;
use tracing::info;

type Result<T> = std::result::Result<T, StorageError>;

const DATE_FORMAT: &str = "%Y-%m-%d";

const RECORD_COLUMNS: &str = "term, definition, ease_factor, interval_days, repetitions,
     next_review_date, last_review_date, is_suspended, is_mastered,
     correct_count, incorrect_count, created_at";

/// Opens (or creates) the database at `path` and ensures the schema exists.
pub fn init_database(path: impl AsRef<Path>) -> Result<Connection> {
    let conn = Connection::open(path)?;
    create_schema(&conn)?;
    Ok(conn)
}

/// In-memory database, used by tests and dry runs.
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    create_schema(&conn)?;
    Ok(conn)
}

fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS review_records (
            user_id TEXT NOT NULL,
            term TEXT NOT NULL,
            definition TEXT NOT NULL,
            ease_factor REAL NOT NULL DEFAULT 2.5,
            interval_days INTEGER NOT NULL DEFAULT 0,
            repetitions INTEGER NOT NULL DEFAULT 0,
            next_review_date TEXT NOT NULL,
            last_review_date TEXT,
            is_suspended INTEGER NOT NULL DEFAULT 0,
            is_mastered INTEGER NOT NULL DEFAULT 0,
            correct_count INTEGER NOT NULL DEFAULT 0,
            incorrect_count INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            PRIMARY KEY (user_id, term)
        )",
        (),
    )?;
    Ok(())
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| StorageError::InvalidDate(value.to_string()))
}

/// Raw row with dates still as text; converted once the row is read.
struct StoredRecord {
    term: String,
    definition: String,
    ease_factor: f64,
    interval: u32,
    repetitions: u32,
    next_review_date: String,
    last_review_date: Option<String>,
    is_suspended: bool,
    is_mastered: bool,
    correct_count: u32,
    incorrect_count: u32,
    created_at: String,
}

impl StoredRecord {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            term: row.get(0)?,
            definition: row.get(1)?,
            ease_factor: row.get(2)?,
            interval: row.get(3)?,
            repetitions: row.get(4)?,
            next_review_date: row.get(5)?,
            last_review_date: row.get(6)?,
            is_suspended: row.get(7)?,
            is_mastered: row.get(8)?,
            correct_count: row.get(9)?,
            incorrect_count: row.get(10)?,
            created_at: row.get(11)?,
        })
    }

    fn into_record(self) -> Result<VocabularyReviewRecord> {
        Ok(VocabularyReviewRecord {
            term: self.term,
            definition: self.definition,
            ease_factor: self.ease_factor,
            interval: self.interval,
            repetitions: self.repetitions,
            next_review_date: parse_date(&self.next_review_date)?,
            last_review_date: self.last_review_date.as_deref().map(parse_date).transpose()?,
            is_suspended: self.is_suspended,
            is_mastered: self.is_mastered,
            correct_count: self.correct_count,
            incorrect_count: self.incorrect_count,
            created_at: parse_date(&self.created_at)?,
        })
    }
}

/// Inserts or replaces the stored state for `(user_id, record.term)`.
pub fn save_record(user_id: &str, record: &VocabularyReviewRecord, conn: &Connection) -> Result<()> {
    conn.execute(
        "INSERT INTO review_records (user_id, term, definition, ease_factor, interval_days,
             repetitions, next_review_date, last_review_date, is_suspended, is_mastered,
             correct_count, incorrect_count, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
         ON CONFLICT (user_id, term) DO UPDATE SET
             definition = excluded.definition,
             ease_factor = excluded.ease_factor,
             interval_days = excluded.interval_days,
             repetitions = excluded.repetitions,
             next_review_date = excluded.next_review_date,
             last_review_date = excluded.last_review_date,
             is_suspended = excluded.is_suspended,
             is_mastered = excluded.is_mastered,
             correct_count = excluded.correct_count,
             incorrect_count = excluded.incorrect_count",
        params![
            user_id,
            record.term,
            record.definition,
            record.ease_factor,
            record.interval,
            record.repetitions,
            format_date(record.next_review_date),
            record.last_review_date.map(format_date),
            record.is_suspended,
            record.is_mastered,
            record.correct_count,
            record.incorrect_count,
            format_date(record.created_at),
        ],
    )?;
    info!(user_id, term = %record.term, interval = record.interval, "saved review record");
    Ok(())
}

/// Returns the record for a term, creating a new one the first time it is seen.
pub fn add_term(
    user_id: &str,
    term: &str,
    definition: &str,
    clock: &impl Clock,
    conn: &Connection,
) -> Result<VocabularyReviewRecord> {
    if let Some(existing) = get_record(user_id, term, conn)? {
        return Ok(existing);
    }
    let record = VocabularyReviewRecord::new(term, definition, clock.today());
    save_record(user_id, &record, conn)?;
    Ok(record)
}

pub fn get_record(
    user_id: &str,
    term: &str,
    conn: &Connection,
) -> Result<Option<VocabularyReviewRecord>> {
    let sql = format!("SELECT {RECORD_COLUMNS} FROM review_records WHERE user_id = ?1 AND term = ?2");
    conn.query_row(&sql, params![user_id, term], StoredRecord::from_row)
        .optional()?
        .map(StoredRecord::into_record)
        .transpose()
}

/// Loads every record of a user, the pool session selection works from.
pub fn load_records_for_user(user_id: &str, conn: &Connection) -> Result<Vec<VocabularyReviewRecord>> {
    let sql = format!("SELECT {RECORD_COLUMNS} FROM review_records WHERE user_id = ?1 ORDER BY term");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![user_id], StoredRecord::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    rows.into_iter().map(StoredRecord::into_record).collect()
}

/// Explicit "don't show again" toggle. The scheduler never changes this flag.
pub fn set_suspended(user_id: &str, term: &str, suspended: bool, conn: &Connection) -> Result<()> {
    let changed = conn.execute(
        "UPDATE review_records SET is_suspended = ?1 WHERE user_id = ?2 AND term = ?3",
        params![suspended, user_id, term],
    )?;
    if changed == 0 {
        return Err(StorageError::NotFound {
            user: user_id.to_string(),
            term: term.to_string(),
        });
    }
    Ok(())
}

pub fn delete_record(user_id: &str, term: &str, conn: &Connection) -> Result<bool> {
    let removed = conn.execute(
        "DELETE FROM review_records WHERE user_id = ?1 AND term = ?2",
        params![user_id, term],
    )?;
    Ok(removed > 0)
}
