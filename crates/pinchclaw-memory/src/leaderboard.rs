//! Persistent high-score table.
//!
//! # Storage layout
//!
//! A single SQLite table `leaderboard` is created (if it does not already
//! exist):
//!
//! | column      | type    | description                                  |
//! |-------------|---------|----------------------------------------------|
//! | id          | INTEGER | Insertion sequence; breaks score ties        |
//! | name        | TEXT    | Player name (trimmed, never empty)           |
//! | score       | INTEGER | Final score, always positive                 |
//! | recorded_at | TEXT    | RFC-3339 timestamp (UTC)                     |
//!
//! Only the best [`CAPACITY`] rows survive each insert.  Ordering is score
//! descending, then insertion order, so an older entry outranks a newer one
//! with the same score.
//!
//! # Example
//!
//! ```rust
//! use pinchclaw_memory::leaderboard::Leaderboard;
//!
//! let board = Leaderboard::open_in_memory().unwrap();
//! board.record("ada", 300).unwrap();
//! board.record("grace", 700).unwrap();
//! board.record("nobody", 0).unwrap(); // ignored
//!
//! let top = board.top().unwrap();
//! assert_eq!(top[0].name, "grace");
//! assert_eq!(top.len(), 2);
//! ```

use std::path::Path;

use chrono::Utc;
use rusqlite::{Connection, params};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Number of entries kept.
pub const CAPACITY: usize = 10;

#[derive(Error, Debug)]
pub enum LeaderboardError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// One leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u32,
    /// RFC-3339 timestamp of the run.
    pub recorded_at: String,
}

/// SQLite-backed top-N score table.
pub struct Leaderboard {
    conn: Connection,
}

impl Leaderboard {
    /// Open (or create) a persistent leaderboard at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LeaderboardError> {
        let conn = Connection::open(path)?;
        let board = Self { conn };
        board.init_schema()?;
        Ok(board)
    }

    /// Open a temporary in-memory leaderboard.
    pub fn open_in_memory() -> Result<Self, LeaderboardError> {
        let conn = Connection::open_in_memory()?;
        let board = Self { conn };
        board.init_schema()?;
        Ok(board)
    }

    fn init_schema(&self) -> Result<(), LeaderboardError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS leaderboard (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                name        TEXT NOT NULL,
                score       INTEGER NOT NULL,
                recorded_at TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    /// Record a finished run.
    ///
    /// Blank names and zero scores are ignored.  Returns the 1-based rank of
    /// the new entry, or `None` when it was ignored or did not make the cut.
    pub fn record(&self, name: &str, score: u32) -> Result<Option<usize>, LeaderboardError> {
        let name = name.trim();
        if name.is_empty() || score == 0 {
            debug!(name, score, "leaderboard entry ignored");
            return Ok(None);
        }

        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO leaderboard (name, score, recorded_at) VALUES (?1, ?2, ?3)",
            params![name, score, now],
        )?;
        let row_id = self.conn.last_insert_rowid();

        self.conn.execute(
            "DELETE FROM leaderboard WHERE id NOT IN (
                SELECT id FROM leaderboard ORDER BY score DESC, id ASC LIMIT ?1
            )",
            params![CAPACITY as i64],
        )?;

        let mut stmt = self
            .conn
            .prepare("SELECT id FROM leaderboard ORDER BY score DESC, id ASC")?;
        let ids = stmt
            .query_map([], |row| row.get::<_, i64>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        let rank = ids.iter().position(|&id| id == row_id).map(|i| i + 1);
        debug!(name, score, ?rank, "leaderboard entry recorded");
        Ok(rank)
    }

    /// All retained entries, best first.
    pub fn top(&self) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        let mut stmt = self.conn.prepare(
            "SELECT name, score, recorded_at FROM leaderboard
             ORDER BY score DESC, id ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(LeaderboardEntry {
                name: row.get(0)?,
                score: row.get(1)?,
                recorded_at: row.get(2)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(LeaderboardError::Sqlite)
    }

    /// Remove every entry.
    pub fn clear(&self) -> Result<(), LeaderboardError> {
        self.conn.execute("DELETE FROM leaderboard", [])?;
        Ok(())
    }
}
