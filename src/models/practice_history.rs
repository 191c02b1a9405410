//! Last-practiced timestamps, namespaced by pool and then by item id.
use super::Timestamp;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PracticeHistory {
    pools: BTreeMap<String, BTreeMap<String, Timestamp>>,
}

impl PracticeHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` means the item has never been practiced.
    pub fn last_practiced(&self, pool_key: &str, item_id: &str) -> Option<Timestamp> {
        self.pools
            .get(pool_key)
            .and_then(|items| items.get(item_id))
            .copied()
    }

    /// Stores `at` for the item, creating the pool entry on first use.
    /// Returns the previous timestamp, if any.
    pub fn set(&mut self, pool_key: &str, item_id: &str, at: Timestamp) -> Option<Timestamp> {
        self.pools
            .entry(pool_key.to_string())
            .or_default()
            .insert(item_id.to_string(), at)
    }

    /// Total number of recorded items across all pools.
    pub fn len(&self) -> usize {
        self.pools.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(text: &str) -> Timestamp {
        Timestamp::parse(text).unwrap()
    }

    #[test]
    fn test_missing_entries_are_none() {
        let history = PracticeHistory::new();
        assert_eq!(history.last_practiced("Ownership", "OW1"), None);
        assert!(history.is_empty());
    }

    #[test]
    fn test_same_id_in_different_pools_does_not_collide() {
        let mut history = PracticeHistory::new();
        history.set("Ownership", "1", ts("2024-01-01 10:00:00"));
        history.set("common", "1", ts("2024-02-01 10:00:00"));

        assert_eq!(history.last_practiced("Ownership", "1"), Some(ts("2024-01-01 10:00:00")));
        assert_eq!(history.last_practiced("common", "1"), Some(ts("2024-02-01 10:00:00")));
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_set_returns_previous_value() {
        let mut history = PracticeHistory::new();
        assert_eq!(history.set("Frugality", "F1", ts("2024-01-01 10:00:00")), None);
        assert_eq!(
            history.set("Frugality", "F1", ts("2024-01-03 10:00:00")),
            Some(ts("2024-01-01 10:00:00"))
        );
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_document_shape_is_nested_string_map() {
        let json = r#"{"Ownership": {"OW1": "2024-01-01 10:00:00"}}"#;
        let history: PracticeHistory = serde_json::from_str(json).unwrap();

        assert_eq!(history.last_practiced("Ownership", "OW1"), Some(ts("2024-01-01 10:00:00")));
        let value = serde_json::to_value(&history).unwrap();
        assert_eq!(value["Ownership"]["OW1"], "2024-01-01 10:00:00");
    }
}
