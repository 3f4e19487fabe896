//! Day persistence using SQLite

use std::path::Path;

use rusqlite::{Connection, Row, params};

use crate::date::parse_date_key;
use crate::store::Day;
use crate::{Error, Result};

const SELECT_COLUMNS: &str = "id, date_str, who, lesson";

/// SQLite-based Day record store
pub struct DayStore {
    conn: Connection,
}

impl DayStore {
    /// Create a new store with the given database path
    ///
    /// The parent directory is created if it does not exist yet.
    pub fn new(db_path: &str) -> Result<Self> {
        if let Some(parent) = Path::new(db_path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(db_path)?;
        let store = Self { conn };
        store.init_tables()?;
        Ok(store)
    }

    /// Create an in-memory store (for testing)
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_tables()?;
        Ok(store)
    }

    /// Initialize database tables
    fn init_tables(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS days (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date_str TEXT NOT NULL UNIQUE,
                who TEXT,
                lesson TEXT
            )",
            [],
        )?;
        Ok(())
    }

    fn row_to_day(row: &Row<'_>) -> rusqlite::Result<Day> {
        Ok(Day {
            id: row.get(0)?,
            date_str: row.get(1)?,
            who: row.get(2)?,
            lesson: row.get(3)?,
        })
    }

    /// Load the record for an exact date key
    pub fn get_by_date(&self, date_key: &str) -> Result<Option<Day>> {
        let sql = format!("SELECT {} FROM days WHERE date_str = ?1", SELECT_COLUMNS);
        let result = self.conn.query_row(&sql, params![date_key], Self::row_to_day);

        match result {
            Ok(day) => Ok(Some(day)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Error::from(e)),
        }
    }

    /// List records with `start <= date_str <= end`, oldest first
    pub fn get_range(&self, start: &str, end: &str) -> Result<Vec<Day>> {
        let sql = format!(
            "SELECT {} FROM days WHERE date_str >= ?1 AND date_str <= ?2 ORDER BY date_str ASC",
            SELECT_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let days = stmt.query_map(params![start, end], Self::row_to_day)?;

        let mut result = Vec::new();
        for day in days {
            result.push(day?);
        }
        Ok(result)
    }

    /// Create the record for `date_key`, or overwrite its who/lesson
    ///
    /// Both fields are replaced as given; `None` clears a field.
    pub fn upsert(&self, date_key: &str, who: Option<&str>, lesson: Option<&str>) -> Result<Day> {
        parse_date_key(date_key)?;

        let sql = format!(
            "INSERT INTO days (date_str, who, lesson) VALUES (?1, ?2, ?3)
             ON CONFLICT(date_str) DO UPDATE SET who = excluded.who, lesson = excluded.lesson
             RETURNING {}",
            SELECT_COLUMNS
        );
        let day = self
            .conn
            .query_row(&sql, params![date_key, who, lesson], Self::row_to_day)?;
        Ok(day)
    }

    /// Count stored records
    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM days", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
