use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateLimitStats {
    pub name: String,
    pub calls_per_minute: u32,
    pub total_calls: u64,
    pub total_waits: u64,
    pub total_wait_time: f64,
    pub avg_wait_time: f64,
    pub pct_rate_limited: f64,
}

impl RateLimitStats {
    pub fn print_summary(&self) {
        log::info!(
            "⏳ {} API: {} calls, {} rate-limited ({:.1}%), waited {:.2}s total ({:.2}s avg)",
            self.name,
            self.total_calls,
            self.total_waits,
            self.pct_rate_limited,
            self.total_wait_time,
            self.avg_wait_time
        );
    }
}
