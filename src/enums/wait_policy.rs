use std::time::Duration;

/// What the rate limiter does when the required sleep would exceed `max_wait`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitPolicy {
    /// Always sleep for the full interval.
    Patient,
    /// Never sleep longer than `max_wait`.
    Capped { max_wait: Duration },
    /// Return `RateLimitExceeded` instead of sleeping longer than `max_wait`.
    FailFast { max_wait: Duration },
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self::Patient
    }
}
