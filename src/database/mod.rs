pub mod db;
pub mod json_store;
pub mod library;
pub mod store;

pub use db::SqliteStore;
pub use json_store::JsonFileStore;
pub use store::{DocumentStore, StoreError};

use crate::config::{AppConfig, StorageBackend};
use std::sync::Arc;

/// Opens the document store selected in the configuration.
pub fn open_store(config: &AppConfig) -> store::Result<Arc<dyn DocumentStore>> {
    let dir = config.resolved_data_dir();
    let store: Arc<dyn DocumentStore> = match config.storage {
        StorageBackend::Json => Arc::new(JsonFileStore::open(dir)?),
        StorageBackend::Sqlite => Arc::new(SqliteStore::open(&dir.join("lp_matrix.sqlite3"))?),
    };
    Ok(store)
}
