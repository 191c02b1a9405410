//! One pretty-printed JSON file per document inside a data directory.

use super::store::{DocumentStore, Result, StoreError, backup_name, validate_name};
use serde_json::Value;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Opens (and creates if needed) the data directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        log::info!("Using JSON document store in {:?}", dir);
        Ok(Self { dir })
    }

    fn document_path(&self, name: &str) -> Result<PathBuf> {
        validate_name(name)?;
        Ok(self.dir.join(format!("{}.json", name)))
    }
}

impl DocumentStore for JsonFileStore {
    fn load(&self, name: &str) -> Result<Option<Value>> {
        let path = self.document_path(name)?;
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str(&content) {
            Ok(value) => Ok(Some(value)),
            Err(source) => {
                // Keep the unreadable file out of the way of the next save.
                let backup = self.document_path(&backup_name(name))?;
                match fs::rename(&path, &backup) {
                    Ok(()) => log::warn!("Moved unreadable {:?} to {:?}", path, backup),
                    Err(e) => log::warn!("Failed to move unreadable {:?} aside: {}", path, e),
                }
                Err(StoreError::Corrupt {
                    name: name.to_string(),
                    source,
                })
            }
        }
    }

    fn save(&self, name: &str, document: &Value) -> Result<()> {
        let path = self.document_path(name)?;
        fs::create_dir_all(&self.dir)?;

        let json_string = serde_json::to_string_pretty(document)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(json_string.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| e.error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::store::PRACTICE_HISTORY;
    use serde_json::json;

    #[test]
    fn test_missing_document_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();

        assert!(store.load(PRACTICE_HISTORY).unwrap().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        let doc = json!({"Ownership": {"OW1": "2024-01-01 10:00:00"}});

        store.save(PRACTICE_HISTORY, &doc).unwrap();

        assert!(dir.path().join("practice_history.json").exists());
        assert_eq!(store.load(PRACTICE_HISTORY).unwrap(), Some(doc));
    }

    #[test]
    fn test_save_keeps_unicode_readable() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();

        store.save("framework", &json!("Situación ★")).unwrap();

        let raw = fs::read_to_string(dir.path().join("framework.json")).unwrap();
        assert!(raw.contains("Situación ★"));
    }

    #[test]
    fn test_save_replaces_whole_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();

        store.save(PRACTICE_HISTORY, &json!({"a": {"1": "x"}})).unwrap();
        store.save(PRACTICE_HISTORY, &json!({})).unwrap();

        assert_eq!(store.load(PRACTICE_HISTORY).unwrap(), Some(json!({})));
        let leftovers = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1, "temporary files must not be left behind");
    }

    #[test]
    fn test_corrupt_document_is_moved_aside() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        fs::write(dir.path().join("practice_history.json"), "{ this is not valid json }").unwrap();

        let result = store.load(PRACTICE_HISTORY);

        assert!(matches!(result, Err(StoreError::Corrupt { .. })));
        assert!(dir.path().join("practice_history_corrupt.json").exists());
        assert!(store.load(PRACTICE_HISTORY).unwrap().is_none());
    }

    #[test]
    fn test_rejects_path_like_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();

        assert!(matches!(
            store.save("../escape", &json!(1)),
            Err(StoreError::InvalidName(_))
        ));
    }
}
