use std::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueLevel {
    High,
    Medium,
    Low,
}

impl ValueLevel {
    /// Keyword classification of a free-text value estimate, defaulting to `Medium`.
    ///
    /// Exact labels first. Otherwise "medium" wins, so mixed answers such as
    /// "Medium-high" never classify as `High`.
    pub fn from_label(label: &str) -> Self {
        let lower = label.trim().to_lowercase();
        match lower.as_str() {
            "high" => return Self::High,
            "medium" => return Self::Medium,
            "low" => return Self::Low,
            _ => {}
        }

        if lower.contains("medium") {
            Self::Medium
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
        }
    }
}

impl fmt::Display for ValueLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
