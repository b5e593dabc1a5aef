use std::sync::Arc;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use crate::structs::repository::Repository;
use crate::traits::report_store::ReportStore;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Decides whether a cached report can stand in for a fresh analysis.
pub struct FreshnessGate {
    store: Arc<dyn ReportStore>,
}

impl FreshnessGate {
    pub fn new(store: Arc<dyn ReportStore>) -> Self {
        Self { store }
    }

    /// `true` when the cached report was written at or after the repository's last update.
    ///
    /// A timestamp that cannot be parsed, or a report whose metadata cannot be read, counts as fresh.
    pub async fn should_skip(&self, repository: &Repository, force: bool) -> bool {
        if force {
            return false;
        }

        let modified = match self.store.last_modified(&repository.name).await {
            Ok(Some(modified)) => modified,
            Ok(None) => return false,
            Err(e) => {
                log::warn!("⚠️ Could not inspect cached report for {}, keeping it: {e}", repository.name);
                return true;
            }
        };

        let Some(raw) = repository.updated_at.as_deref() else {
            log::debug!("{} has no update timestamp, re-analyzing", repository.name);
            return false;
        };

        match parse_updated_at(raw) {
            Some(updated) => {
                let fresh = modified >= updated;
                if fresh {
                    log::info!("⏭️ Skipping {}: report is newer than last update ({raw})", repository.name);
                }
                fresh
            }
            None => {
                log::warn!(
                    "⚠️ Unparseable update time '{raw}' for {}, keeping cached report",
                    repository.name
                );
                true
            }
        }
    }
}

/// Parses a provider timestamp, reading offset-less values as UTC.
pub fn parse_updated_at(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }

    let stripped = trimmed.strip_suffix('Z').unwrap_or(trimmed);

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(stripped, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(stripped, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}
