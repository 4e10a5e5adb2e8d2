//! Append-only event journal backed by SQLite.
//!
//! The journal is a handle owned by the composition root and passed to
//! whatever drains the runner's event stream; nothing in the core reaches
//! for it ambiently. Rows are never updated or deleted.

use std::path::PathBuf;

use rusqlite::{params, Connection};

use super::data_dir;
use crate::error::StoreError;
use crate::events::Event;

/// One journaled event with its assigned sequence number.
#[derive(Debug, Clone, PartialEq)]
pub struct JournalEntry {
    pub seq: i64,
    pub event: Event,
}

/// SQLite-backed append-only event journal.
pub struct EventJournal {
    conn: Connection,
}

impl EventJournal {
    /// Open the journal at the default location.
    pub fn open() -> Result<Self, StoreError> {
        let path = data_dir()?.join("journal.db");
        let conn = Connection::open(&path).map_err(|source| StoreError::OpenFailed {
            path: path.clone(),
            source,
        })?;
        let journal = Self { conn };
        journal.initialize()?;
        Ok(journal)
    }

    /// Open an in-memory journal (for tests).
    pub fn open_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(|source| StoreError::OpenFailed {
            path: PathBuf::from(":memory:"),
            source,
        })?;
        let journal = Self { conn };
        journal.initialize()?;
        Ok(journal)
    }

    fn initialize(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS events (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                kind TEXT NOT NULL,
                at TEXT NOT NULL,
                payload TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_events_kind ON events(kind);",
        )?;
        Ok(())
    }

    /// Append an event; returns its sequence number.
    pub fn append(&self, event: &Event) -> Result<i64, StoreError> {
        let payload = serde_json::to_string(event)?;
        self.conn.execute(
            "INSERT INTO events (kind, at, payload) VALUES (?1, ?2, ?3)",
            params![event.kind_name(), event.at().to_rfc3339(), payload],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// The most recent `limit` entries, oldest first.
    pub fn recent(&self, limit: usize) -> Result<Vec<JournalEntry>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT seq, payload FROM events ORDER BY seq DESC LIMIT ?1")?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            let seq: i64 = row.get(0)?;
            let payload: String = row.get(1)?;
            Ok((seq, payload))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (seq, payload) = row?;
            let event: Event = serde_json::from_str(&payload)?;
            entries.push(JournalEntry { seq, event });
        }
        entries.reverse();
        Ok(entries)
    }

    /// Total number of journaled events.
    pub fn count(&self) -> Result<i64, StoreError> {
        let count =
            self.conn
                .query_row("SELECT COUNT(*) FROM events", [], |row| row.get::<_, i64>(0))?;
        Ok(count)
    }
}
