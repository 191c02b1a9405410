//! Practice session controller.
//! Owns the single in-memory practice history and writes it back after every completed review.

use super::selector::{record_review, select_next};
use crate::database::store::{self, DocumentStore, PRACTICE_HISTORY};
use crate::error::PracticeError;
use crate::models::{DisplayCursor, DisplayState, FlashcardItem, PracticeHistory, Timestamp};
use std::sync::Arc;

/// A failed history save is retried this many times before it is reported.
const FLUSH_ATTEMPTS: usize = 2;

/// The card currently on screen together with its reveal cursor.
#[derive(Clone, Debug)]
pub struct ActiveCard {
    pub scope_label: String,
    pub item: FlashcardItem,
    cursor: DisplayCursor,
}

impl ActiveCard {
    pub fn state(&self) -> DisplayState {
        self.cursor.state()
    }
}

pub struct PracticeSession {
    store: Arc<dyn DocumentStore>,
    history: PracticeHistory,
    active: Option<ActiveCard>,
    load_warning: Option<String>,
    dirty: bool,
}

impl PracticeSession {
    /// Loads the practice history. An unreadable history is replaced by an empty one;
    /// the problem is logged and kept for display instead of blocking practice.
    pub fn open(store: Arc<dyn DocumentStore>) -> Self {
        let (history, load_warning) = match store::load_typed_or_backup::<PracticeHistory>(store.as_ref(), PRACTICE_HISTORY) {
            Ok(history) => (history.unwrap_or_default(), None),
            Err(source) => {
                let error = PracticeError::PersistenceUnavailable {
                    name: PRACTICE_HISTORY.to_string(),
                    source,
                };
                log::warn!("{}", error);
                (PracticeHistory::default(), Some(error.to_string()))
            }
        };
        log::info!("Loaded practice history with {} entries", history.len());

        Self {
            store,
            history,
            active: None,
            load_warning,
            dirty: false,
        }
    }

    pub fn history(&self) -> &PracticeHistory {
        &self.history
    }

    pub fn load_warning(&self) -> Option<&str> {
        self.load_warning.as_deref()
    }

    pub fn active(&self) -> Option<&ActiveCard> {
        self.active.as_ref()
    }

    /// True while a completed review has not reached the store yet.
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    /// Picks the next card from `pool` and shows its question.
    /// Any previously active card is replaced.
    pub fn start(&mut self, scope_label: impl Into<String>, pool: &[FlashcardItem]) -> Result<&ActiveCard, PracticeError> {
        let item = select_next(pool, &self.history)?.clone();
        let scope_label = scope_label.into();
        log::debug!("Selected {}/{} for {}", item.pool_key, item.id, scope_label);

        let card = self.active.insert(ActiveCard {
            scope_label,
            cursor: DisplayCursor::for_item(&item),
            item,
        });
        Ok(&*card)
    }

    /// Handles one reveal event. Wrapping back to the question completes a review:
    /// the history is updated and flushed before this returns.
    ///
    /// Returns `Ok(None)` when no card is active. A failed flush still leaves the
    /// review recorded in memory.
    pub fn reveal_next(&mut self, now: Timestamp) -> Result<Option<DisplayState>, PracticeError> {
        let Some(card) = self.active.as_mut() else {
            return Ok(None);
        };
        let wrapped = card.cursor.advance();
        let state = card.cursor.state();

        if wrapped {
            record_review(&mut self.history, &card.item.pool_key, &card.item.id, now);
            log::info!("Reviewed {}/{} at {}", card.item.pool_key, card.item.id, now);
            self.dirty = true;
            self.flush()?;
        }
        Ok(Some(state))
    }

    /// Writes pending history changes to the store.
    pub fn flush(&mut self) -> Result<(), PracticeError> {
        if !self.dirty {
            return Ok(());
        }

        let mut attempt = 1;
        loop {
            match store::save_typed(self.store.as_ref(), PRACTICE_HISTORY, &self.history) {
                Ok(()) => {
                    self.dirty = false;
                    return Ok(());
                }
                Err(e) if attempt < FLUSH_ATTEMPTS => {
                    log::warn!("Saving practice history failed (attempt {}): {}", attempt, e);
                    attempt += 1;
                }
                Err(source) => {
                    log::error!("Practice history not saved after {} attempts: {}", attempt, source);
                    return Err(PracticeError::PersistenceWriteFailure {
                        name: PRACTICE_HISTORY.to_string(),
                        source,
                    });
                }
            }
        }
    }

    /// Last review of the active card, `None` if it was never practiced.
    pub fn last_practiced(&self) -> Option<Timestamp> {
        let card = self.active.as_ref()?;
        self.history.last_practiced(&card.item.pool_key, &card.item.id)
    }
}
