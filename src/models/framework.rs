//! Free-form preparation notes.
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Framework {
    pub text: String,
}

impl Default for Framework {
    fn default() -> Self {
        Self {
            text: "Situation:\n\nTask:\n\nAction:\n\nResult:\n".to_string(),
        }
    }
}
