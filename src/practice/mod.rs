pub mod scope;
pub mod selector;
pub mod session;

pub use scope::PracticeScope;
pub use selector::{record_review, select_next};
pub use session::{ActiveCard, PracticeSession};
