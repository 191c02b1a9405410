//! Loading and saving the user-maintained library documents.

use super::store::{
    self, COMMON_QUESTIONS, DocumentStore, EXPERIENCES, FRAMEWORK, LP_MATRIX, LP_QUESTIONS, Result,
};
use crate::error::PracticeError;
use crate::models::{ExperienceLibrary, Framework, Library, Question, QuestionBank, StoryMatrix};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;

/// Collects a warning for every document that had to be replaced by its default.
struct Loader<'a> {
    store: &'a dyn DocumentStore,
    warnings: Vec<String>,
}

impl Loader<'_> {
    /// `Ok(None)` for a document that was never saved, `Err(())` for one that could not be read.
    fn load<T: DeserializeOwned>(&mut self, name: &str) -> std::result::Result<Option<T>, ()> {
        store::load_typed_or_backup(self.store, name).map_err(|source| {
            let error = PracticeError::PersistenceUnavailable {
                name: name.to_string(),
                source,
            };
            log::warn!("{}", error);
            self.warnings.push(error.to_string());
        })
    }

    fn load_or_default<T: DeserializeOwned + Default>(&mut self, name: &str) -> T {
        self.load(name).ok().flatten().unwrap_or_default()
    }
}

/// Loads every library document, falling back to defaults for anything missing or unreadable.
/// Each document is loaded on its own, so one bad document never resets another.
///
/// A first run (no question document at all) is seeded with the sample questions and experiences.
pub fn load_library(store: &dyn DocumentStore) -> Library {
    let mut loader = Loader {
        store,
        warnings: Vec::new(),
    };

    let principles = loader.load::<BTreeMap<String, Vec<Question>>>(LP_QUESTIONS);
    let first_run = matches!(principles, Ok(None));
    let common: Vec<Question> = loader.load_or_default(COMMON_QUESTIONS);

    let questions = match principles {
        Ok(Some(principles)) => {
            let mut bank = QuestionBank::from_parts(principles, common);
            let added = bank.ensure_every_principle();
            if added > 0 {
                log::info!("Added placeholder questions for {} principles", added);
            }
            bank
        }
        Ok(None) | Err(()) => {
            log::info!("No readable question bank, seeding sample questions");
            let mut bank = QuestionBank::with_defaults();
            bank.common = common;
            bank
        }
    };

    let experiences = match loader.load::<ExperienceLibrary>(EXPERIENCES) {
        Ok(Some(experiences)) => experiences,
        Ok(None) if first_run => ExperienceLibrary::with_samples(),
        Ok(None) | Err(()) => ExperienceLibrary::default(),
    };

    let library = Library {
        questions,
        matrix: loader.load_or_default::<StoryMatrix>(LP_MATRIX),
        experiences,
        framework: loader.load_or_default::<Framework>(FRAMEWORK),
        load_warnings: loader.warnings,
    };
    log::info!(
        "Loaded {} experiences and {} stories",
        library.experiences.len(),
        library.matrix.story_count()
    );
    library
}

pub fn save_questions(store: &dyn DocumentStore, bank: &QuestionBank) -> Result<()> {
    store::save_typed(store, LP_QUESTIONS, &bank.principles)?;
    store::save_typed(store, COMMON_QUESTIONS, &bank.common)
}

/// The matrix and the experience list are saved together since removing an
/// experience touches both.
pub fn save_matrix(store: &dyn DocumentStore, matrix: &StoryMatrix, experiences: &ExperienceLibrary) -> Result<()> {
    store::save_typed(store, LP_MATRIX, matrix)?;
    store::save_typed(store, EXPERIENCES, experiences)
}

pub fn save_framework(store: &dyn DocumentStore, framework: &Framework) -> Result<()> {
    store::save_typed(store, FRAMEWORK, framework)
}
