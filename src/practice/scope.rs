//! Which questions a practice run draws from.

use crate::models::{COMMON_POOL, FlashcardItem, LEADERSHIP_PRINCIPLES, QuestionBank};
use rand::Rng;
use rand::seq::SliceRandom;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PracticeScope {
    /// One principle's questions.
    Principle(String),
    /// Every principle-tagged question.
    All,
    /// A named pool such as `"common"`.
    Pool(String),
    /// Principle-tagged and common questions, shuffled together.
    Integrated,
}

impl PracticeScope {
    pub fn common() -> Self {
        Self::Pool(COMMON_POOL.to_string())
    }

    pub fn random_principle<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let index = rng.gen_range(0..LEADERSHIP_PRINCIPLES.len());
        Self::Principle(LEADERSHIP_PRINCIPLES[index].to_string())
    }

    pub fn label(&self) -> String {
        match self {
            Self::Principle(name) => format!("Leadership Principle: {}", name),
            Self::All => "All Leadership Principles".to_string(),
            Self::Pool(name) if name == COMMON_POOL => "Common Questions".to_string(),
            Self::Pool(name) => format!("Pool: {}", name),
            Self::Integrated => "Integrated Practice".to_string(),
        }
    }

    /// Builds the candidate pool. The shuffle in integrated mode only decides the
    /// order among cards with equal history; recency still comes first.
    pub fn assemble<R: Rng + ?Sized>(&self, bank: &QuestionBank, rng: &mut R) -> Vec<FlashcardItem> {
        match self {
            Self::Principle(name) | Self::Pool(name) => bank.items_for(name),
            Self::All => bank.principle_items(),
            Self::Integrated => {
                let mut items = bank.principle_items();
                items.extend(bank.items_for(COMMON_POOL));
                items.shuffle(rng);
                items
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn bank() -> QuestionBank {
        let mut bank = QuestionBank::with_defaults();
        bank.add_question(COMMON_POOL, "Tell me about yourself", "", vec![]).unwrap();
        bank.add_question(COMMON_POOL, "Why this role?", "", vec![]).unwrap();
        bank
    }

    #[test]
    fn test_principle_scope() {
        let items = PracticeScope::Principle("Ownership".to_string()).assemble(&bank(), &mut StdRng::seed_from_u64(1));
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "OW1");
    }

    #[test]
    fn test_unknown_principle_is_empty() {
        let items = PracticeScope::Principle("Nope".to_string()).assemble(&bank(), &mut StdRng::seed_from_u64(1));
        assert!(items.is_empty());
    }

    #[test]
    fn test_common_pool_keeps_definition_order() {
        let items = PracticeScope::common().assemble(&bank(), &mut StdRng::seed_from_u64(1));
        let ids: Vec<_> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["C1", "C2"]);
        assert!(items.iter().all(|i| i.pool_key == COMMON_POOL));
    }

    #[test]
    fn test_all_excludes_common() {
        let items = PracticeScope::All.assemble(&bank(), &mut StdRng::seed_from_u64(1));
        assert_eq!(items.len(), LEADERSHIP_PRINCIPLES.len());
        assert!(items.iter().all(|i| i.pool_key != COMMON_POOL));
    }

    #[test]
    fn test_integrated_is_a_permutation_of_everything() {
        let bank = bank();
        let mut shuffled: Vec<_> = PracticeScope::Integrated
            .assemble(&bank, &mut StdRng::seed_from_u64(7))
            .into_iter()
            .map(|i| (i.pool_key, i.id))
            .collect();
        let mut expected: Vec<_> = bank
            .principle_items()
            .into_iter()
            .chain(bank.items_for(COMMON_POOL))
            .map(|i| (i.pool_key, i.id))
            .collect();

        shuffled.sort();
        expected.sort();
        assert_eq!(shuffled, expected);
    }

    #[test]
    fn test_random_principle_is_canonical() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            match PracticeScope::random_principle(&mut rng) {
                PracticeScope::Principle(name) => assert!(LEADERSHIP_PRINCIPLES.contains(&name.as_str())),
                other => panic!("unexpected scope {:?}", other),
            }
        }
    }
}
