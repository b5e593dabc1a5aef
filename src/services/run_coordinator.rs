use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use crate::config::constants::MAX_PROGRESS_STATUS_LEN;
use crate::enums::task_state::TaskState;

/// `(completed, total, status)`; invoked on every task state transition.
pub type ProgressCallback = Arc<dyn Fn(usize, usize, Option<&str>) + Send + Sync>;

#[derive(Debug, Default)]
struct Counters {
    succeeded: usize,
    failed: usize,
    skipped: usize,
    event_errors: usize,
    write_errors: usize,
    running: usize,
    peak_running: usize,
    states: HashMap<String, TaskState>,
}

impl Counters {
    fn resolved(&self) -> usize {
        self.succeeded + self.failed + self.skipped
    }
}

/// Snapshot of the counters once a run has finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunCounts {
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub event_errors: usize,
    pub write_errors: usize,
    pub peak_running: usize,
}

/// Owns every piece of mutable bookkeeping for one scheduler run.
pub struct RunCoordinator {
    total: usize,
    counters: Mutex<Counters>,
    progress: Option<ProgressCallback>,
}

impl RunCoordinator {
    pub fn new(total: usize, progress: Option<ProgressCallback>) -> Self {
        Self {
            total,
            counters: Mutex::new(Counters::default()),
            progress,
        }
    }

    /// Registers a repository as `Pending`. Returns `false` if the name is already known.
    pub fn admit(&self, name: &str) -> bool {
        let mut counters = self.counters.lock().unwrap_or_else(PoisonError::into_inner);
        if counters.states.contains_key(name) {
            return false;
        }
        counters.states.insert(name.to_string(), TaskState::Pending);
        true
    }

    pub fn mark_skipped(&self, name: &str, reason: &str) {
        self.transition(name, TaskState::Skipped, &format!("Skipped {name}: {reason}"));
    }

    /// Counts a skip for an entry that was never admitted (no name, or a repeated name).
    pub fn skip_unadmitted(&self, label: &str, reason: &str) {
        let resolved = {
            let mut counters = self.counters.lock().unwrap_or_else(PoisonError::into_inner);
            counters.skipped += 1;
            counters.resolved()
        };
        self.report(resolved, &format!("Skipped {label}: {reason}"));
    }

    pub fn mark_running(&self, name: &str) -> bool {
        self.transition(name, TaskState::Running, &format!("Analyzing {name}"))
    }

    pub fn mark_succeeded(&self, name: &str) {
        self.transition(name, TaskState::Succeeded, &format!("Analyzed {name}"));
    }

    pub fn mark_failed(&self, name: &str) {
        self.transition(name, TaskState::Failed, &format!("Failed {name}"));
    }

    pub fn record_event_error(&self) {
        self.counters.lock().unwrap_or_else(PoisonError::into_inner).event_errors += 1;
    }

    pub fn record_write_error(&self) {
        self.counters.lock().unwrap_or_else(PoisonError::into_inner).write_errors += 1;
    }

    /// Fails every task still `Running`, e.g. after its worker panicked.
    pub fn fail_unfinished(&self) -> Vec<String> {
        let unfinished: Vec<String> = self
            .counters
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .states
            .iter()
            .filter(|(_, state)| **state == TaskState::Running)
            .map(|(name, _)| name.clone())
            .collect();

        for name in &unfinished {
            self.mark_failed(name);
        }
        unfinished
    }

    pub fn counts(&self) -> RunCounts {
        let counters = self.counters.lock().unwrap_or_else(PoisonError::into_inner);
        RunCounts {
            succeeded: counters.succeeded,
            failed: counters.failed,
            skipped: counters.skipped,
            event_errors: counters.event_errors,
            write_errors: counters.write_errors,
            peak_running: counters.peak_running,
        }
    }

    fn transition(&self, name: &str, next: TaskState, status: &str) -> bool {
        let resolved = {
            let mut counters = self.counters.lock().unwrap_or_else(PoisonError::into_inner);
            let current = counters.states.get(name).copied();

            if !current.is_some_and(|state| state.can_transition_to(next)) {
                log::error!("Invalid task transition for {name}: {current:?} -> {next:?}");
                return false;
            }

            match next {
                TaskState::Running => {
                    counters.running += 1;
                    counters.peak_running = counters.peak_running.max(counters.running);
                }
                TaskState::Succeeded => {
                    counters.running -= 1;
                    counters.succeeded += 1;
                }
                TaskState::Failed => {
                    counters.running -= 1;
                    counters.failed += 1;
                }
                TaskState::Skipped => counters.skipped += 1,
                TaskState::Pending => {}
            }
            counters.states.insert(name.to_string(), next);
            counters.resolved()
        };

        self.report(resolved, status);
        true
    }

    fn report(&self, resolved: usize, status: &str) {
        let Some(progress) = &self.progress else {
            return;
        };

        if status.chars().count() > MAX_PROGRESS_STATUS_LEN {
            let truncated: String = status.chars().take(MAX_PROGRESS_STATUS_LEN).collect();
            progress(resolved, self.total, Some(&format!("{truncated}...")));
        } else {
            progress(resolved, self.total, Some(status));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_follow_transitions() {
        let coordinator = RunCoordinator::new(3, None);
        for name in ["a", "b", "c"] {
            assert!(coordinator.admit(name));
        }

        coordinator.mark_skipped("a", "fresh");
        assert!(coordinator.mark_running("b"));
        assert!(coordinator.mark_running("c"));
        coordinator.mark_succeeded("b");
        coordinator.mark_failed("c");

        let counts = coordinator.counts();
        assert_eq!((counts.succeeded, counts.failed, counts.skipped), (1, 1, 1));
        assert_eq!(counts.peak_running, 2);
        assert!(coordinator.fail_unfinished().is_empty());
    }

    #[test]
    fn test_second_admission_and_double_run_are_rejected() {
        let coordinator = RunCoordinator::new(1, None);

        assert!(coordinator.admit("a"));
        assert!(!coordinator.admit("a"));
        assert!(coordinator.mark_running("a"));
        assert!(!coordinator.mark_running("a"));
        assert_eq!(coordinator.counts().peak_running, 1);
    }

    #[test]
    fn test_progress_reports_every_transition() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let callback: ProgressCallback = Arc::new(move |done, total, status| {
            sink.lock().unwrap().push((done, total, status.map(ToString::to_string)));
        });
        let coordinator = RunCoordinator::new(2, Some(callback));
        coordinator.admit("a");

        coordinator.skip_unadmitted("<unnamed>", "missing name");
        coordinator.mark_running("a");
        coordinator.mark_succeeded("a");

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[1], (1, 2, Some("Analyzing a".to_string())));
        assert_eq!(seen[2].0, 2);
    }

    #[test]
    fn test_unfinished_tasks_are_failed() {
        let coordinator = RunCoordinator::new(1, None);
        coordinator.admit("stuck");
        coordinator.mark_running("stuck");

        assert_eq!(coordinator.fail_unfinished(), vec!["stuck".to_string()]);
        assert_eq!(coordinator.counts().failed, 1);
    }
}
