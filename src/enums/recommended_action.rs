use std::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecommendedAction {
    Delete,
    Archive,
    Extract,
    Keep,
    Pin,
}

impl RecommendedAction {
    pub const ALL: [Self; 5] = [Self::Delete, Self::Archive, Self::Extract, Self::Keep, Self::Pin];

    /// Unrecognised labels fall back to `Keep`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_uppercase().as_str() {
            "DELETE" => Self::Delete,
            "ARCHIVE" => Self::Archive,
            "EXTRACT" => Self::Extract,
            "PIN" => Self::Pin,
            _ => Self::Keep,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Delete => "DELETE",
            Self::Archive => "ARCHIVE",
            Self::Extract => "EXTRACT",
            Self::Keep => "KEEP",
            Self::Pin => "PIN",
        }
    }
}

impl Default for RecommendedAction {
    fn default() -> Self {
        Self::Keep
    }
}

impl fmt::Display for RecommendedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
