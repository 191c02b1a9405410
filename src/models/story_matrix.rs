//! Experience x principle matrix of STAR stories.
use super::principles::LEADERSHIP_PRINCIPLES;
use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const MAX_SCORE: u8 = 4;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryEntry {
    #[serde(default)]
    pub points: Vec<String>,
    #[serde(default)]
    pub score: u8,
    #[serde(default)]
    pub story: String,
}

impl StoryEntry {
    pub fn new(points: Vec<String>, score: u8, story: impl Into<String>) -> Self {
        Self {
            points,
            score,
            story: story.into(),
        }
    }

    pub fn stars(&self) -> String {
        "★".repeat(self.score.min(MAX_SCORE) as usize)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoryMatrix {
    entries: BTreeMap<String, BTreeMap<String, StoryEntry>>,
}

impl StoryMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert_story(
        &mut self,
        experience: &str,
        principle: &str,
        entry: StoryEntry,
    ) -> Result<(), ValidationError> {
        let (experience, principle) = (experience.trim(), principle.trim());
        if experience.is_empty() || principle.is_empty() {
            return Err(ValidationError::MissingSelection);
        }
        if entry.score > MAX_SCORE {
            return Err(ValidationError::ScoreOutOfRange {
                score: entry.score,
                max: MAX_SCORE,
            });
        }
        let entry = StoryEntry {
            points: entry
                .points
                .into_iter()
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect(),
            score: entry.score,
            story: entry.story.trim().to_string(),
        };
        self.entries
            .entry(experience.to_string())
            .or_default()
            .insert(principle.to_string(), entry);
        Ok(())
    }

    pub fn story(&self, experience: &str, principle: &str) -> Option<&StoryEntry> {
        self.entries.get(experience)?.get(principle)
    }

    pub fn remove_story(&mut self, experience: &str, principle: &str) -> Option<StoryEntry> {
        let row = self.entries.get_mut(experience)?;
        let removed = row.remove(principle);
        if row.is_empty() {
            self.entries.remove(experience);
        }
        removed
    }

    pub fn remove_experience(&mut self, experience: &str) -> usize {
        self.entries.remove(experience).map(|row| row.len()).unwrap_or(0)
    }

    pub fn story_count(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }

    /// Principles for which no experience has a story yet.
    pub fn uncovered_principles(&self) -> Vec<&'static str> {
        LEADERSHIP_PRINCIPLES
            .iter()
            .copied()
            .filter(|principle| !self.entries.values().any(|row| row.contains_key(*principle)))
            .collect()
    }
}

/// The user's library of past work experiences, in the order they were added.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExperienceLibrary {
    names: Vec<String>,
}

/// Experiences a fresh install starts with.
const SAMPLE_EXPERIENCES: [&str; 3] = ["RPA Project", "Amazon Investigation", "Mercari Risk Control"];

impl ExperienceLibrary {
    pub fn with_samples() -> Self {
        Self {
            names: SAMPLE_EXPERIENCES.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn add(&mut self, name: &str) -> Result<bool, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self.contains(name) {
            return Ok(false);
        }
        self.names.push(name.to_string());
        Ok(true)
    }

    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.names.len();
        self.names.retain(|n| n != name);
        self.names.len() != before
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
