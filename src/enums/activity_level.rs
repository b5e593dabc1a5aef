use std::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    High,
    Medium,
    Low,
    Inactive,
}

impl ActivityLevel {
    /// Keyword classification of a free-text activity assessment.
    ///
    /// "inactive" or "none" wins over everything else, then "high", then "low";
    /// anything unrecognised is `Medium`.
    pub fn from_label(label: &str) -> Self {
        let lower = label.to_lowercase();
        if lower.contains("inactive") || lower.contains("none") {
            Self::Inactive
        } else if lower.contains("high") {
            Self::High
        } else if lower.contains("low") {
            Self::Low
        } else {
            Self::Medium
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::Inactive => "inactive",
        }
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
