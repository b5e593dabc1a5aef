use serde::{Deserialize, Serialize};

/// Lifecycle of one repository inside a scheduler run.
///
/// `Pending -> Skipped` or `Pending -> Running -> Succeeded | Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskState {
    Pending,
    Skipped,
    Running,
    Succeeded,
    Failed,
}

impl TaskState {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Skipped | Self::Succeeded | Self::Failed)
    }

    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Skipped | Self::Running)
                | (Self::Running, Self::Succeeded | Self::Failed)
        )
    }
}
