//! Error types shared by the practice core and the editable library.

use crate::database::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PracticeError {
    /// Selection was requested on an empty pool.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A document could not be loaded; the caller continues with defaults.
    #[error("Could not load '{name}', continuing with defaults: {source}")]
    PersistenceUnavailable {
        name: String,
        #[source]
        source: StoreError,
    },

    /// The in-memory state was kept but could not be written out.
    #[error("Could not save '{name}', your review will not be remembered: {source}")]
    PersistenceWriteFailure {
        name: String,
        #[source]
        source: StoreError,
    },
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please select both Experience and Leadership Principle")]
    MissingSelection,

    #[error("Score must be between 0 and {max}, got {score}")]
    ScoreOutOfRange { score: u8, max: u8 },

    #[error("Name must not be empty")]
    EmptyName,

    #[error("Question text must not be empty")]
    EmptyQuestion,

    #[error("Question {id} not found in '{pool}'")]
    QuestionNotFound { pool: String, id: String },
}
