//! Least-recently-practiced-first flashcard selection.
//!
//! There are no intervals or ease factors here: the next card is simply the one
//! whose last review is oldest, and a card that was never reviewed beats every
//! card that was.

use crate::error::PracticeError;
use crate::models::{FlashcardItem, PracticeHistory, Timestamp};

/// Picks the item with the oldest last-practiced time.
///
/// A missing history entry orders before any timestamp (`None < Some(_)`), and
/// ties keep the pool's original order. Calling this twice with the same inputs
/// always returns the same item.
pub fn select_next<'a>(
    pool: &'a [FlashcardItem],
    history: &PracticeHistory,
) -> Result<&'a FlashcardItem, PracticeError> {
    pool.iter()
        .enumerate()
        .min_by_key(|(position, item)| (history.last_practiced(&item.pool_key, &item.id), *position))
        .map(|(_, item)| item)
        .ok_or_else(|| PracticeError::InvalidArgument("no items available for this scope".to_string()))
}

/// Records a completed review cycle of `(pool_key, item_id)` at `at`.
pub fn record_review(history: &mut PracticeHistory, pool_key: &str, item_id: &str, at: Timestamp) {
    history.set(pool_key, item_id, at);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(text: &str) -> Timestamp {
        Timestamp::parse(text).unwrap()
    }

    fn item(pool_key: &str, id: &str) -> FlashcardItem {
        FlashcardItem::new(pool_key, id, format!("Question {}", id))
    }

    #[test]
    fn test_never_practiced_comes_first() {
        let pool = vec![item("Ownership", "Q1"), item("Ownership", "Q2")];
        let mut history = PracticeHistory::new();
        history.set("Ownership", "Q2", ts("2024-01-01 10:00:00"));

        assert_eq!(select_next(&pool, &history).unwrap().id, "Q1");
    }

    #[test]
    fn test_reviewed_item_moves_to_the_back() {
        let pool = vec![item("Ownership", "Q1"), item("Ownership", "Q2")];
        let mut history = PracticeHistory::new();
        history.set("Ownership", "Q2", ts("2024-01-01 10:00:00"));

        record_review(&mut history, "Ownership", "Q1", ts("2024-01-02 09:00:00"));

        assert_eq!(select_next(&pool, &history).unwrap().id, "Q2");
    }

    #[test]
    fn test_ties_keep_definition_order() {
        let pool = vec![item("Think Big", "Q3"), item("Think Big", "Q4")];
        assert_eq!(select_next(&pool, &PracticeHistory::new()).unwrap().id, "Q3");

        let mut history = PracticeHistory::new();
        history.set("Think Big", "Q3", ts("2024-03-01 08:00:00"));
        history.set("Think Big", "Q4", ts("2024-03-01 08:00:00"));
        assert_eq!(select_next(&pool, &history).unwrap().id, "Q3");
    }

    #[test]
    fn test_empty_pool_is_invalid_argument() {
        let result = select_next(&[], &PracticeHistory::new());
        assert!(matches!(result, Err(PracticeError::InvalidArgument(_))));
    }

    #[test]
    fn test_selection_is_idempotent() {
        let pool = vec![item("Dive Deep", "A"), item("Dive Deep", "B"), item("Dive Deep", "C")];
        let mut history = PracticeHistory::new();
        history.set("Dive Deep", "A", ts("2024-01-05 10:00:00"));

        let first = select_next(&pool, &history).unwrap().id.clone();
        for _ in 0..5 {
            assert_eq!(select_next(&pool, &history).unwrap().id, first);
        }
    }

    #[test]
    fn test_oldest_review_wins_regardless_of_position() {
        let pool = vec![item("Earn Trust", "A"), item("Earn Trust", "B"), item("Earn Trust", "C")];
        let mut history = PracticeHistory::new();
        history.set("Earn Trust", "A", ts("2024-05-01 10:00:00"));
        history.set("Earn Trust", "B", ts("2024-05-03 10:00:00"));
        history.set("Earn Trust", "C", ts("2023-12-31 23:59:59"));

        assert_eq!(select_next(&pool, &history).unwrap().id, "C");
    }

    #[test]
    fn test_repeated_reviews_cycle_round_robin() {
        let pool = vec![item("Frugality", "A"), item("Frugality", "B"), item("Frugality", "C")];
        let mut history = PracticeHistory::new();
        let mut seen = Vec::new();

        for minute in 0..6 {
            let next = select_next(&pool, &history).unwrap();
            seen.push(next.id.clone());
            let at = ts(&format!("2024-06-01 10:{:02}:00", minute));
            record_review(&mut history, &next.pool_key, &next.id, at);
        }

        assert_eq!(seen, vec!["A", "B", "C", "A", "B", "C"]);
    }

    #[test]
    fn test_history_is_keyed_by_pool_and_id() {
        let pool = vec![item("Ownership", "1"), item("common", "1")];
        let mut history = PracticeHistory::new();
        record_review(&mut history, "Ownership", "1", ts("2024-01-01 10:00:00"));

        let next = select_next(&pool, &history).unwrap();
        assert_eq!((next.pool_key.as_str(), next.id.as_str()), ("common", "1"));
    }

    #[test]
    fn test_record_review_round_trip() {
        let mut history = PracticeHistory::new();
        let at = ts("2024-01-02 09:00:00");
        record_review(&mut history, "Bias for Action", "BFA1", at);

        assert_eq!(history.last_practiced("Bias for Action", "BFA1"), Some(at));
    }
}
