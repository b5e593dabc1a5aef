use serde::Serialize;
use crate::structs::recommended_analysis::RecommendedAnalysis;

/// What a scheduler run hands back to its caller.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub succeeded: Vec<RecommendedAnalysis>,
    pub failed_count: usize,
    pub skipped_count: usize,
    pub elapsed_seconds: f64,
    pub retries: u64,
    /// Event dispatches that returned a handler error.
    pub event_errors: usize,
    /// Report or summary writes that failed.
    pub write_errors: usize,
    /// Most analyses that were running at the same time.
    pub peak_workers: usize,
}

impl RunSummary {
    pub fn succeeded_count(&self) -> usize {
        self.succeeded.len()
    }

    pub fn print_summary(&self) {
        log::info!("{}", "=".repeat(60));
        log::info!("📊 Run summary");
        log::info!("{}", "=".repeat(60));
        log::info!("  ✅ Analyzed: {}", self.succeeded_count());
        log::info!("  ❌ Failed:   {}", self.failed_count);
        log::info!("  ⏭️ Skipped:  {}", self.skipped_count);
        log::info!("  🔄 Retries:  {}", self.retries);
        log::info!("  👷 Peak workers: {}", self.peak_workers);
        log::info!("  ⏱️ Duration: {:.2}s", self.elapsed_seconds);

        if self.event_errors > 0 || self.write_errors > 0 {
            log::warn!(
                "  ⚠️ {} event handler failures, {} failed writes",
                self.event_errors,
                self.write_errors
            );
        }
    }
}
