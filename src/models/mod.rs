pub mod display_state;
pub mod flashcard;
pub mod framework;
pub mod library;
pub mod practice_history;
pub mod principles;
pub mod question;
pub mod story_matrix;
pub mod timestamp;

pub use display_state::{DisplayCursor, DisplayState};
pub use flashcard::FlashcardItem;
pub use framework::Framework;
pub use library::Library;
pub use practice_history::PracticeHistory;
pub use principles::{COMMON_POOL, LEADERSHIP_PRINCIPLES};
pub use question::{Question, QuestionBank};
pub use story_matrix::{ExperienceLibrary, StoryEntry, StoryMatrix};
pub use timestamp::Timestamp;
