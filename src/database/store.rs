//! Whole-document persistence keyed by logical name.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

pub const PRACTICE_HISTORY: &str = "practice_history";
pub const LP_QUESTIONS: &str = "lp_questions";
pub const COMMON_QUESTIONS: &str = "common_questions";
pub const LP_MATRIX: &str = "lp_matrix";
pub const EXPERIENCES: &str = "experiences";
pub const FRAMEWORK: &str = "framework";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Document '{name}' is corrupt: {source}")]
    Corrupt {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid document name: {0:?}")]
    InvalidName(String),

    #[error("Store lock poisoned")]
    Poisoned,
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Load/save of whole JSON documents. A save replaces the document atomically.
pub trait DocumentStore: Send + Sync {
    /// Returns `Ok(None)` when the document has never been saved.
    fn load(&self, name: &str) -> Result<Option<Value>>;

    fn save(&self, name: &str, document: &Value) -> Result<()>;
}

/// Document names double as file names, so they are restricted to `[A-Za-z0-9_-]`.
pub fn validate_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidName(name.to_string()))
    }
}

pub fn load_typed<T: DeserializeOwned>(store: &dyn DocumentStore, name: &str) -> Result<Option<T>> {
    match store.load(name)? {
        None => Ok(None),
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|source| StoreError::Corrupt {
                name: name.to_string(),
                source,
            }),
    }
}

/// Name under which an unreadable copy of `name` is kept.
pub fn backup_name(name: &str) -> String {
    format!("{}_corrupt", name)
}

/// Like [`load_typed`], but a document that does not match `T` is first copied to
/// [`backup_name`] so the next save cannot destroy it.
///
/// Stores move documents that are not JSON at all aside themselves.
pub fn load_typed_or_backup<T: DeserializeOwned>(store: &dyn DocumentStore, name: &str) -> Result<Option<T>> {
    let result = load_typed(store, name);
    if let Err(StoreError::Corrupt { .. }) = &result {
        backup_document(store, name);
    }
    result
}

fn backup_document(store: &dyn DocumentStore, name: &str) {
    let backup = backup_name(name);
    match store.load(name) {
        Ok(Some(raw)) => match store.save(&backup, &raw) {
            Ok(()) => log::warn!("Copied unreadable '{}' to '{}'", name, backup),
            Err(e) => log::warn!("Failed to back up unreadable '{}': {}", name, e),
        },
        Ok(None) => {}
        Err(e) => log::debug!("'{}' not copied, store reported: {}", name, e),
    }
}

pub fn save_typed<T: Serialize + ?Sized>(store: &dyn DocumentStore, name: &str, value: &T) -> Result<()> {
    let document = serde_json::to_value(value)?;
    store.save(name, &document)?;
    log::debug!("Saved document '{}'", name);
    Ok(())
}
