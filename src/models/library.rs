//! Container for everything the user maintains besides practice history.
use super::{ExperienceLibrary, Framework, QuestionBank, StoryMatrix};

#[derive(Clone, Debug, Default)]
pub struct Library {
    pub questions: QuestionBank,
    pub matrix: StoryMatrix,
    pub experiences: ExperienceLibrary,
    pub framework: Framework,
    /// Documents that could not be read and were replaced by defaults.
    pub load_warnings: Vec<String>,
}
