pub mod audio;
pub mod config;
pub mod database;
pub mod error;
pub mod export;
pub mod models;
pub mod practice;

pub use error::{PracticeError, ValidationError};
pub use models::{DisplayState, FlashcardItem, PracticeHistory, Timestamp};
pub use practice::{PracticeScope, PracticeSession, record_review, select_next};
