use std::fmt;
use serde::{Deserialize, Serialize};

/// Event types a handler can subscribe to. `Any` is the supertype of every event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Any,
    RepositoryAnalysisCompleted,
    RepositoryActionRecommended,
    HighPriorityIssueIdentified,
    AnalysisError,
}

impl EventKind {
    /// Whether a handler registered for `self` receives events of kind `concrete`.
    pub fn accepts(self, concrete: Self) -> bool {
        self == Self::Any || self == concrete
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Any => "DomainEvent",
            Self::RepositoryAnalysisCompleted => "RepositoryAnalysisCompleted",
            Self::RepositoryActionRecommended => "RepositoryActionRecommended",
            Self::HighPriorityIssueIdentified => "HighPriorityIssueIdentified",
            Self::AnalysisError => "AnalysisError",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
