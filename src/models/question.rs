//! Question bank: principle-tagged questions plus the reserved common pool.
use super::principles::{COMMON_POOL, LEADERSHIP_PRINCIPLES, initials};
use super::FlashcardItem;
use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub question: String,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub key_points: Vec<String>,
    /// Retired questions keep their id reserved so history never points at a different question.
    #[serde(default, skip_serializing_if = "is_false")]
    pub retired: bool,
}

impl Question {
    pub fn new(id: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            question: question.into(),
            answer: String::new(),
            key_points: Vec::new(),
            retired: false,
        }
    }

    pub fn to_item(&self, pool_key: &str) -> FlashcardItem {
        FlashcardItem::new(pool_key, self.id.clone(), self.question.clone())
            .with_response(self.answer.clone())
            .with_key_points(self.key_points.iter().cloned())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionBank {
    #[serde(default)]
    pub principles: BTreeMap<String, Vec<Question>>,
    #[serde(default)]
    pub common: Vec<Question>,
}

impl QuestionBank {
    pub fn from_parts(principles: BTreeMap<String, Vec<Question>>, common: Vec<Question>) -> Self {
        Self { principles, common }
    }

    /// Sample questions plus a placeholder for every principle.
    pub fn with_defaults() -> Self {
        let mut bank = Self::default();
        bank.principles.insert(
            "Customer Obsession".to_string(),
            vec![Question {
                id: "CO1".to_string(),
                question: "Tell me about a time you went above and beyond for a customer.".to_string(),
                answer: "In my previous role, I noticed a customer's recurring issue with our software. \
                         I proactively reached out, gathered their feedback, and worked with the development \
                         team to implement a solution that improved their experience."
                    .to_string(),
                key_points: vec![
                    "Proactive engagement".to_string(),
                    "Collaboration with team".to_string(),
                    "Improved customer satisfaction".to_string(),
                ],
                retired: false,
            }],
        );
        bank.principles.insert(
            "Ownership".to_string(),
            vec![Question {
                id: "OW1".to_string(),
                question: "Describe a time you took ownership of a project.".to_string(),
                answer: "When our team leader left unexpectedly, I stepped up to lead the project. \
                         I coordinated tasks, communicated with stakeholders, and ensured we met our \
                         deadlines successfully."
                    .to_string(),
                key_points: vec![
                    "Stepping up in challenging times".to_string(),
                    "Leadership and coordination".to_string(),
                    "Successful project delivery".to_string(),
                ],
                retired: false,
            }],
        );
        bank.ensure_every_principle();
        bank
    }

    /// Gives every principle without an active question a generic placeholder.
    pub fn ensure_every_principle(&mut self) -> usize {
        let mut added = 0;
        for principle in LEADERSHIP_PRINCIPLES {
            let questions = self.principles.entry(principle.to_string()).or_default();
            if questions.iter().all(|q| q.retired) {
                let id = format!("{}{}", principle.replace(' ', ""), questions.len() + 1);
                questions.push(Question {
                    id,
                    question: format!("Describe how you embody the '{}' principle.", principle),
                    answer: "Provide a specific example from your experience.".to_string(),
                    key_points: vec![
                        "Specific example".to_string(),
                        "Demonstrate the principle".to_string(),
                        "Reflect on outcomes".to_string(),
                    ],
                    retired: false,
                });
                added += 1;
            }
        }
        added
    }

    fn pool(&self, pool_key: &str) -> Option<&Vec<Question>> {
        if pool_key == COMMON_POOL {
            Some(&self.common)
        } else {
            self.principles.get(pool_key)
        }
    }

    fn pool_mut(&mut self, pool_key: &str) -> &mut Vec<Question> {
        if pool_key == COMMON_POOL {
            &mut self.common
        } else {
            self.principles.entry(pool_key.to_string()).or_default()
        }
    }

    /// Active questions of a pool, in definition order.
    pub fn questions(&self, pool_key: &str) -> Vec<&Question> {
        self.pool(pool_key)
            .map(|questions| questions.iter().filter(|q| !q.retired).collect())
            .unwrap_or_default()
    }

    pub fn find(&self, pool_key: &str, id: &str) -> Option<&Question> {
        self.pool(pool_key)?.iter().find(|q| q.id == id)
    }

    /// Adds a question and returns its newly assigned id.
    pub fn add_question(
        &mut self,
        pool_key: &str,
        question: &str,
        answer: &str,
        key_points: Vec<String>,
    ) -> Result<String, ValidationError> {
        let pool_key = pool_key.trim();
        if pool_key.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if question.trim().is_empty() {
            return Err(ValidationError::EmptyQuestion);
        }
        let prefix = initials(pool_key);
        let questions = self.pool_mut(pool_key);
        let mut serial = questions.len() + 1;
        let mut id = format!("{}{}", prefix, serial);
        while questions.iter().any(|q| q.id == id) {
            serial += 1;
            id = format!("{}{}", prefix, serial);
        }
        questions.push(Question {
            id: id.clone(),
            question: question.trim().to_string(),
            answer: answer.trim().to_string(),
            key_points: clean_points(key_points),
            retired: false,
        });
        Ok(id)
    }

    /// Replaces the text of an existing question; its id never changes.
    pub fn update_question(
        &mut self,
        pool_key: &str,
        id: &str,
        question: &str,
        answer: &str,
        key_points: Vec<String>,
    ) -> Result<(), ValidationError> {
        if question.trim().is_empty() {
            return Err(ValidationError::EmptyQuestion);
        }
        let existing = self.find_mut(pool_key, id)?;
        existing.question = question.trim().to_string();
        existing.answer = answer.trim().to_string();
        existing.key_points = clean_points(key_points);
        Ok(())
    }

    pub fn remove_question(&mut self, pool_key: &str, id: &str) -> Result<(), ValidationError> {
        self.find_mut(pool_key, id)?.retired = true;
        Ok(())
    }

    fn find_mut(&mut self, pool_key: &str, id: &str) -> Result<&mut Question, ValidationError> {
        let questions = if pool_key == COMMON_POOL {
            Some(&mut self.common)
        } else {
            self.principles.get_mut(pool_key)
        };
        questions
            .and_then(|questions| questions.iter_mut().find(|q| q.id == id && !q.retired))
            .ok_or_else(|| ValidationError::QuestionNotFound {
                pool: pool_key.to_string(),
                id: id.to_string(),
            })
    }

    /// Adds every question of `other` whose `(pool, id)` is not already present.
    pub fn merge(&mut self, other: QuestionBank) -> usize {
        let mut added = 0;
        let incoming = other
            .principles
            .into_iter()
            .chain(std::iter::once((COMMON_POOL.to_string(), other.common)));
        for (pool_key, questions) in incoming {
            let existing = self.pool_mut(&pool_key);
            for question in questions {
                if !existing.iter().any(|q| q.id == question.id) {
                    existing.push(question);
                    added += 1;
                }
            }
        }
        added
    }

    pub fn items_for(&self, pool_key: &str) -> Vec<FlashcardItem> {
        self.questions(pool_key)
            .into_iter()
            .map(|q| q.to_item(pool_key))
            .collect()
    }

    /// Every principle-tagged item: canonical principles first, then any custom ones.
    pub fn principle_items(&self) -> Vec<FlashcardItem> {
        let custom = self
            .principles
            .keys()
            .map(String::as_str)
            .filter(|key| !LEADERSHIP_PRINCIPLES.contains(key));
        LEADERSHIP_PRINCIPLES
            .iter()
            .copied()
            .chain(custom)
            .flat_map(|principle| self.items_for(principle))
            .collect()
    }

    /// Every pool a question can be filed under, in display order.
    pub fn pool_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = LEADERSHIP_PRINCIPLES.iter().map(|p| p.to_string()).collect();
        keys.extend(
            self.principles
                .keys()
                .filter(|key| !LEADERSHIP_PRINCIPLES.contains(&key.as_str()))
                .cloned(),
        );
        keys.push(COMMON_POOL.to_string());
        keys
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn clean_points(points: Vec<String>) -> Vec<String> {
    points
        .into_iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_every_principle() {
        let bank = QuestionBank::with_defaults();
        for principle in LEADERSHIP_PRINCIPLES {
            assert!(!bank.questions(principle).is_empty(), "{} has no question", principle);
        }
        assert_eq!(bank.questions("Customer Obsession")[0].id, "CO1");
        assert_eq!(bank.questions("Think Big")[0].id, "ThinkBig1");
    }

    #[test]
    fn test_add_question_assigns_unique_ids() {
        let mut bank = QuestionBank::default();
        let first = bank.add_question(COMMON_POOL, "Tell me about yourself", "", vec![]).unwrap();
        let second = bank
            .add_question(COMMON_POOL, "Why this company?", "Mission", vec![" Scale ".to_string(), "".to_string()])
            .unwrap();

        assert_eq!(first, "C1");
        assert_eq!(second, "C2");
        assert_eq!(bank.find(COMMON_POOL, "C2").unwrap().key_points, vec!["Scale"]);
    }

    #[test]
    fn test_removed_ids_are_never_reused() {
        let mut bank = QuestionBank::default();
        let id = bank.add_question("Frugality", "Doing more with less?", "", vec![]).unwrap();
        bank.remove_question("Frugality", &id).unwrap();
        let next = bank.add_question("Frugality", "Cutting costs?", "", vec![]).unwrap();

        assert_ne!(id, next);
        assert_eq!(bank.questions("Frugality").len(), 1);
        assert!(bank.remove_question("Frugality", &id).is_err());
    }

    #[test]
    fn test_update_keeps_id() {
        let mut bank = QuestionBank::with_defaults();
        bank.update_question("Ownership", "OW1", "New text", "New answer", vec![]).unwrap();

        let question = bank.find("Ownership", "OW1").unwrap();
        assert_eq!(question.question, "New text");
        assert!(question.key_points.is_empty());
    }

    #[test]
    fn test_rejects_empty_question() {
        let mut bank = QuestionBank::default();
        assert!(matches!(
            bank.add_question(COMMON_POOL, "   ", "", vec![]),
            Err(ValidationError::EmptyQuestion)
        ));
    }

    #[test]
    fn test_merge_skips_existing_ids() {
        let mut bank = QuestionBank::with_defaults();
        let mut incoming = QuestionBank::default();
        incoming
            .principles
            .insert("Ownership".to_string(), vec![Question::new("OW1", "dup"), Question::new("OW2", "new")]);
        incoming.common.push(Question::new("C1", "Tell me about yourself"));

        assert_eq!(bank.merge(incoming), 2);
        assert_eq!(bank.find("Ownership", "OW1").unwrap().question, "Describe a time you took ownership of a project.");
        assert!(bank.find(COMMON_POOL, "C1").is_some());
    }

    #[test]
    fn test_items_carry_pool_key() {
        let bank = QuestionBank::with_defaults();
        let items = bank.items_for("Ownership");

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].pool_key, "Ownership");
        assert_eq!(items[0].key_points.len(), 3);
    }

    #[test]
    fn test_principle_items_follow_canonical_order() {
        let bank = QuestionBank::with_defaults();
        let items = bank.principle_items();

        assert_eq!(items.len(), LEADERSHIP_PRINCIPLES.len());
        assert_eq!(items[0].id, "CO1");
        assert_eq!(items[1].id, "OW1");
    }
}
