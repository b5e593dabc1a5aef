use serde::{Deserialize, Serialize};
use crate::enums::priority::Priority;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(alias = "recommendation")]
    pub text: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub priority: Priority,
}

impl Recommendation {
    pub fn new(text: &str, reason: &str, priority: Priority) -> Self {
        Self {
            text: text.to_string(),
            reason: reason.to_string(),
            priority,
        }
    }

    pub fn is_high_priority(&self) -> bool {
        self.priority == Priority::High
    }
}
