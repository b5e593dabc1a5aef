use async_trait::async_trait;
use chrono::{DateTime, Utc};
use crate::errors::OrganizerResult;
use crate::structs::recommended_analysis::RecommendedAnalysis;
use crate::structs::repository::Repository;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// When the cached report for `repo_name` was last written, if there is one.
    async fn last_modified(&self, repo_name: &str) -> OrganizerResult<Option<DateTime<Utc>>>;

    async fn write_report(&self, repository: &Repository, report: &RecommendedAnalysis) -> OrganizerResult<()>;

    async fn write_summary(&self, reports: &[RecommendedAnalysis]) -> OrganizerResult<()>;
}
