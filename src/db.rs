//! Database module for the tattoo backend
//!
//! Persists every conversation turn in a single append-only log.

mod schema;

pub use schema::*;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Transaction};
use std::path::Path;
use std::sync::{Arc, Mutex};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Turn {id} has unknown role: {role}")]
    UnknownRole { id: i64, role: String },
}

pub type DbResult<T> = Result<T, DbError>;

/// Thread-safe database handle
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    fn run_migrations(&self) -> DbResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    // ==================== Turn Operations ====================

    /// Store a prompt and the reply it produced.
    ///
    /// Both turns are written in one transaction: either both land or neither.
    pub fn record_exchange(
        &self,
        prompt: &str,
        reply_text: &str,
        image_url: Option<&str>,
        engineered_prompt: Option<&str>,
    ) -> DbResult<(Turn, Turn)> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        let user = insert_turn(&tx, TurnRole::User, prompt, None, None)?;
        let ai = insert_turn(&tx, TurnRole::Ai, reply_text, image_url, engineered_prompt)?;

        tx.commit()?;
        Ok((user, ai))
    }

    /// All stored turns, oldest first
    pub fn list_turns(&self) -> DbResult<Vec<Turn>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, timestamp, role, prompt_text, generated_image_url, engineered_prompt
             FROM conversations ORDER BY id ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, Option<String>>(4)?,
                row.get::<_, Option<String>>(5)?,
            ))
        })?;

        let mut turns = Vec::new();
        for row in rows {
            let (id, timestamp, role, prompt_text, generated_image_url, engineered_prompt) = row?;
            let role = TurnRole::parse(&role).ok_or(DbError::UnknownRole { id, role })?;
            turns.push(Turn {
                id,
                timestamp: parse_datetime(&timestamp),
                role,
                prompt_text,
                generated_image_url,
                engineered_prompt,
            });
        }
        Ok(turns)
    }

    /// Number of stored turns
    pub fn turn_count(&self) -> DbResult<i64> {
        let conn = self.conn.lock().unwrap();
        let count = conn.query_row("SELECT COUNT(*) FROM conversations", [], |row| row.get(0))?;
        Ok(count)
    }
}

fn insert_turn(
    tx: &Transaction<'_>,
    role: TurnRole,
    prompt_text: &str,
    image_url: Option<&str>,
    engineered_prompt: Option<&str>,
) -> DbResult<Turn> {
    let now = Utc::now();
    tx.execute(
        "INSERT INTO conversations (timestamp, role, prompt_text, generated_image_url, engineered_prompt)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            now.to_rfc3339(),
            role.as_str(),
            prompt_text,
            image_url,
            engineered_prompt
        ],
    )?;

    Ok(Turn {
        id: tx.last_insert_rowid(),
        timestamp: now,
        role,
        prompt_text: prompt_text.to_string(),
        generated_image_url: image_url.map(String::from),
        engineered_prompt: engineered_prompt.map(String::from),
    })
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc))
}
