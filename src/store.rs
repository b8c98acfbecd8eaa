use crate::error::Result;
use crate::mistypes::MistypeTable;
use chrono::{DateTime, Local};
use directories::ProjectDirs;
use rusqlite::{params, Connection};
use std::path::PathBuf;
use tracing::debug;

/// Cross-session store of mistyped-key observations.
///
/// Each row is one miss: the character the target required and the character
/// that was typed instead, with the session's timestamp. Aggregating over
/// sessions gives the long-term weak-spot picture the per-session
/// `MistypeTable` cannot.
#[derive(Debug)]
pub struct MistypeDb {
    conn: Connection,
}

impl MistypeDb {
    /// Opens (creating if needed) the database at the default location.
    pub fn new() -> Result<Self> {
        let db_path = Self::default_path().unwrap_or_else(|| PathBuf::from("keyscore_stats.db"));
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        debug!(path = %db_path.display(), "opening mistype database");
        Self::with_connection(Connection::open(&db_path)?)
    }

    /// Opens an in-memory database, used by tests.
    pub fn in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS mistypes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                intended TEXT NOT NULL,
                typed TEXT NOT NULL,
                count INTEGER NOT NULL,
                session_at TEXT NOT NULL
            )
            "#,
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_mistypes_intended ON mistypes(intended)",
            [],
        )?;

        Ok(MistypeDb { conn })
    }

    /// Database file path under the XDG state directory.
    fn default_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("keyscore");
            Some(state_dir.join("stats.db"))
        } else if let Some(proj_dirs) = ProjectDirs::from("", "", "keyscore") {
            Some(proj_dirs.data_local_dir().join("stats.db"))
        } else {
            None
        }
    }

    /// Persists one session's mistype table in a single transaction.
    pub fn record_table(
        &mut self,
        table: &MistypeTable,
        session_at: DateTime<Local>,
    ) -> Result<()> {
        let tx = self.conn.transaction()?;
        let mut rows = 0usize;
        for (intended, typed, count) in table.iter() {
            tx.execute(
                "INSERT INTO mistypes (intended, typed, count, session_at) VALUES (?1, ?2, ?3, ?4)",
                params![
                    intended.to_string(),
                    typed.to_string(),
                    count,
                    session_at.to_rfc3339(),
                ],
            )?;
            rows += 1;
        }
        tx.commit()?;
        debug!(rows, "recorded session mistypes");

        Ok(())
    }

    /// Wrong keys observed for `intended` across all sessions, most frequent
    /// first.
    pub fn confusions_for(&self, intended: char) -> Result<Vec<(char, u32)>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT typed, SUM(count) as total
            FROM mistypes
            WHERE intended = ?1
            GROUP BY typed
            ORDER BY total DESC, typed ASC
            "#,
        )?;

        let rows = stmt.query_map([intended.to_string()], |row| {
            let typed: String = row.get(0)?;
            let total: u32 = row.get(1)?;
            Ok((typed.chars().next().unwrap_or('\0'), total))
        })?;

        let mut confusions = Vec::new();
        for row in rows {
            confusions.push(row?);
        }

        Ok(confusions)
    }

    /// Total recorded misses for `intended` across all sessions.
    pub fn total_misses(&self, intended: char) -> Result<u32> {
        let mut stmt = self
            .conn
            .prepare("SELECT COALESCE(SUM(count), 0) FROM mistypes WHERE intended = ?1")?;
        let total: u32 = stmt.query_row([intended.to_string()], |row| row.get(0))?;

        Ok(total)
    }

    /// Per-character summary: (intended, total misses, distinct wrong keys),
    /// worst characters first.
    pub fn summary(&self) -> Result<Vec<(char, u32, u32)>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT intended, SUM(count) as total, COUNT(DISTINCT typed) as variants
            FROM mistypes
            GROUP BY intended
            ORDER BY total DESC, intended ASC
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            let intended: String = row.get(0)?;
            let total: u32 = row.get(1)?;
            let variants: u32 = row.get(2)?;
            Ok((intended.chars().next().unwrap_or('\0'), total, variants))
        })?;

        let mut summary = Vec::new();
        for row in rows {
            summary.push(row?);
        }

        Ok(summary)
    }

    /// Removes every stored observation (reset/testing).
    pub fn clear_all(&self) -> Result<()> {
        self.conn.execute("DELETE FROM mistypes", [])?;
        Ok(())
    }
}
