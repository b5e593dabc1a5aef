use std::sync::Arc;
use std::time::Duration;
use dashmap::DashMap;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};
use crate::enums::wait_policy::WaitPolicy;
use crate::errors::{OrganizerError, OrganizerResult};
use crate::structs::rate_limit_stats::RateLimitStats;

#[derive(Debug, Default)]
struct LimiterState {
    last_call: Option<Instant>,
    total_calls: u64,
    total_waits: u64,
    wait_times: Vec<f64>,
}

#[derive(Debug)]
struct ServiceLimit {
    calls_per_minute: u32,
    interval: Duration,
    state: Mutex<LimiterState>,
}

impl ServiceLimit {
    fn new(calls_per_minute: u32) -> Self {
        let calls_per_minute = calls_per_minute.max(1);
        Self {
            calls_per_minute,
            interval: Duration::from_secs(60) / calls_per_minute,
            state: Mutex::new(LimiterState::default()),
        }
    }
}

/// Minimum-interval limiter keyed by external service name.
///
/// Each service has its own async mutex; it is held across the sleep so that
/// concurrent callers of one service queue up behind each other.
#[derive(Debug, Clone)]
pub struct ApiRateLimiter {
    services: Arc<DashMap<String, Arc<ServiceLimit>>>,
    policy: WaitPolicy,
}

impl Default for ApiRateLimiter {
    fn default() -> Self {
        Self::new(WaitPolicy::Patient)
    }
}

impl ApiRateLimiter {
    pub fn new(policy: WaitPolicy) -> Self {
        Self {
            services: Arc::new(DashMap::new()),
            policy,
        }
    }

    pub fn with_service(self, name: &str, calls_per_minute: u32) -> Self {
        self.add_service(name, calls_per_minute);
        self
    }

    /// Registers (or resets) the limit for `name`.
    pub fn add_service(&self, name: &str, calls_per_minute: u32) {
        self.services
            .insert(name.to_string(), Arc::new(ServiceLimit::new(calls_per_minute)));
    }

    /// Blocks until a call to `name` is allowed and returns the seconds spent waiting.
    pub async fn wait(&self, name: &str) -> OrganizerResult<f64> {
        let limit = self
            .services
            .get(name)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| {
                OrganizerError::config_error(
                    &format!("no rate limit configured for service '{name}'"),
                    Some("rate_limit_per_minute"),
                )
            })?;

        let mut state = limit.state.lock().await;

        let required = state
            .last_call
            .map_or(Duration::ZERO, |last| limit.interval.saturating_sub(last.elapsed()));

        let mut waited = Duration::ZERO;
        if !required.is_zero() {
            waited = match self.policy {
                WaitPolicy::Patient => required,
                WaitPolicy::Capped { max_wait } => required.min(max_wait),
                WaitPolicy::FailFast { max_wait } if required > max_wait => {
                    log::warn!(
                        "🚫 Rate limit for {name}: next slot in {:.2}s exceeds the {:.2}s limit",
                        required.as_secs_f64(),
                        max_wait.as_secs_f64()
                    );
                    return Err(OrganizerError::rate_limited(
                        name,
                        &format!(
                            "next call allowed in {:.2}s, more than the {:.2}s this run may wait",
                            required.as_secs_f64(),
                            max_wait.as_secs_f64()
                        ),
                    ));
                }
                WaitPolicy::FailFast { .. } => required,
            };

            log::debug!("⏳ Rate limit: waiting {:.2}s for {name} API", waited.as_secs_f64());
            sleep(waited).await;
            state.total_waits += 1;
            state.wait_times.push(waited.as_secs_f64());
        }

        state.last_call = Some(Instant::now());
        state.total_calls += 1;
        Ok(waited.as_secs_f64())
    }

    pub async fn stats(&self, name: &str) -> Option<RateLimitStats> {
        let limit = self.services.get(name).map(|entry| Arc::clone(entry.value()))?;
        let state = limit.state.lock().await;

        let total_wait_time: f64 = state.wait_times.iter().sum();
        let avg_wait_time = if state.wait_times.is_empty() {
            0.0
        } else {
            total_wait_time / state.wait_times.len() as f64
        };
        let pct_rate_limited = if state.total_calls == 0 {
            0.0
        } else {
            state.total_waits as f64 / state.total_calls as f64 * 100.0
        };

        Some(RateLimitStats {
            name: name.to_string(),
            calls_per_minute: limit.calls_per_minute,
            total_calls: state.total_calls,
            total_waits: state.total_waits,
            total_wait_time,
            avg_wait_time,
            pct_rate_limited,
        })
    }

    /// Stats for every registered service, ordered by name.
    pub async fn all_stats(&self) -> Vec<RateLimitStats> {
        let mut names: Vec<String> = self.services.iter().map(|e| e.key().clone()).collect();
        names.sort();

        let mut stats = Vec::with_capacity(names.len());
        for name in names {
            if let Some(s) = self.stats(&name).await {
                stats.push(s);
            }
        }
        stats
    }
}
