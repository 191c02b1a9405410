//! JSON import/export of question banks.
//! Lets a bank be shared between machines or backed up outside the data directory.

use crate::models::QuestionBank;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Exports a question bank to a JSON file at the specified path.
pub fn export_json_to_path(bank: &QuestionBank, path: &Path) -> Result<(), ExportError> {
    let json_string = serde_json::to_string_pretty(bank)?;
    let mut file = File::create(path)?;
    file.write_all(json_string.as_bytes())?;
    log::info!("Question bank exported to {:?}", path);
    Ok(())
}

/// Imports a question bank from a JSON file.
/// Returns an error if the file doesn't exist or contains invalid JSON.
pub fn import_json(path: &Path) -> Result<QuestionBank, ExportError> {
    let mut file = File::open(path)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;

    let bank: QuestionBank = serde_json::from_str(&contents)?;

    log::info!(
        "Imported {} principle pools and {} common questions from {:?}",
        bank.principles.len(),
        bank.common.len(),
        path
    );
    Ok(bank)
}
