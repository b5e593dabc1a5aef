use std::sync::Arc;
use chrono::{Duration, Utc};
use repo_organizer::enums::recommended_action::RecommendedAction;
use repo_organizer::services::freshness_gate::FreshnessGate;
use repo_organizer::services::report_writer::MarkdownReportStore;
use repo_organizer::structs::recommended_analysis::RecommendedAnalysis;
use repo_organizer::structs::repository::Repository;
use repo_organizer::traits::report_store::ReportStore;
use tempfile::TempDir;
use tokio_test::assert_ok;
use super::support::analysis;

fn updated(name: &str, at: chrono::DateTime<Utc>) -> Repository {
    Repository {
        updated_at: Some(at.to_rfc3339()),
        ..Repository::new(name)
    }
}

#[tokio::test]
async fn test_report_on_disk_drives_skip_decision() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(MarkdownReportStore::new(dir.path()));
    let gate = FreshnessGate::new(store.clone());
    let stale = updated("tool", Utc::now() - Duration::days(30));

    assert!(!gate.should_skip(&stale, false).await);

    let report = RecommendedAnalysis::new(
        Arc::new(analysis("tool", "medium")),
        RecommendedAction::Keep,
        "Still useful".to_string(),
    );
    assert_ok!(store.write_report(&stale, &report).await);

    assert!(gate.should_skip(&stale, false).await);
    assert!(!gate.should_skip(&stale, true).await);

    let pushed_later = updated("tool", Utc::now() + Duration::days(1));
    assert!(!gate.should_skip(&pushed_later, false).await);
}

#[tokio::test]
async fn test_missing_update_time_is_reanalyzed() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(MarkdownReportStore::new(dir.path()));
    let repository = Repository::new("tool");
    let report = RecommendedAnalysis::new(
        Arc::new(analysis("tool", "medium")),
        RecommendedAction::Keep,
        "Still useful".to_string(),
    );
    assert_ok!(store.write_report(&repository, &report).await);

    assert!(!FreshnessGate::new(store).should_skip(&repository, false).await);
}
