//! A flashcard is one prompt/response pair drawn from a named pool.
//! `(pool_key, id)` is the unique key; the same `id` may appear in several pools.
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashcardItem {
    pub id: String,
    pub prompt: String,
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub key_points: Vec<String>,
    pub pool_key: String,
}

impl FlashcardItem {
    pub fn new(pool_key: impl Into<String>, id: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
            response: String::new(),
            key_points: Vec::new(),
            pool_key: pool_key.into(),
        }
    }

    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.response = response.into();
        self
    }

    pub fn with_key_points<I, S>(mut self, key_points: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.key_points = key_points.into_iter().map(Into::into).collect();
        self
    }

    /// Items without key points cycle Question -> Answer only.
    pub fn has_key_points(&self) -> bool {
        !self.key_points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flashcard_creation() {
        let card = FlashcardItem::new("Ownership", "OW1", "Describe a time you took ownership.")
            .with_response("I stepped up to lead the project.");

        assert_eq!(card.pool_key, "Ownership");
        assert_eq!(card.id, "OW1");
        assert_eq!(card.response, "I stepped up to lead the project.");
        assert!(!card.has_key_points());
    }

    #[test]
    fn test_key_points_keep_insertion_order() {
        let card = FlashcardItem::new("common", "C1", "Why this company?")
            .with_key_points(["Mission", "Scale", "Growth"]);

        assert!(card.has_key_points());
        assert_eq!(card.key_points, vec!["Mission", "Scale", "Growth"]);
    }

    #[test]
    fn test_missing_response_deserializes_empty() {
        let card: FlashcardItem =
            serde_json::from_str(r#"{"id": "C2", "prompt": "Tell me about yourself", "pool_key": "common"}"#)
                .unwrap();

        assert!(card.response.is_empty());
        assert!(card.key_points.is_empty());
    }
}
