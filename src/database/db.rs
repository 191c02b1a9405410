//! SQLite-backed document store
//!
//! Keeps every document as one row of a `documents` table. Each save is a single
//! upsert statement, so a document is either fully replaced or left untouched.

use super::store::{DocumentStore, Result, StoreError, backup_name, validate_name};
use crate::models::Timestamp;
use rusqlite::{Connection, OptionalExtension, params};
use serde_json::Value;
use std::path::Path;
use std::sync::Mutex;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        init_database(&conn)?;
        log::info!("Using SQLite document store at {:?}", path);
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        init_database(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

/// Creates the documents table if it is missing.
fn init_database(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS documents (
            name TEXT PRIMARY KEY,
            body TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        (),
    )?;
    Ok(())
}

/// Renames the row `name` to `backup`, replacing any earlier backup.
fn move_aside(conn: &mut Connection, name: &str, backup: &str) -> rusqlite::Result<()> {
    let tx = conn.transaction()?;
    tx.execute("DELETE FROM documents WHERE name = ?1", params![backup])?;
    tx.execute(
        "UPDATE documents SET name = ?2 WHERE name = ?1",
        params![name, backup],
    )?;
    tx.commit()
}

impl DocumentStore for SqliteStore {
    fn load(&self, name: &str) -> Result<Option<Value>> {
        validate_name(name)?;
        let mut conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        let body: Option<String> = conn
            .query_row(
                "SELECT body FROM documents WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;
        let Some(body) = body else {
            return Ok(None);
        };

        match serde_json::from_str(&body) {
            Ok(value) => Ok(Some(value)),
            Err(source) => {
                let backup = backup_name(name);
                match move_aside(&mut conn, name, &backup) {
                    Ok(()) => log::warn!("Moved unreadable document '{}' to '{}'", name, backup),
                    Err(e) => log::warn!("Failed to move unreadable document '{}' aside: {}", name, e),
                }
                Err(StoreError::Corrupt {
                    name: name.to_string(),
                    source,
                })
            }
        }
    }

    fn save(&self, name: &str, document: &Value) -> Result<()> {
        validate_name(name)?;
        let body = serde_json::to_string(document)?;
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        conn.execute(
            "INSERT INTO documents (name, body, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(name) DO UPDATE SET body = excluded.body, updated_at = excluded.updated_at",
            params![name, body, Timestamp::now().to_string()],
        )?;
        Ok(())
    }
}
