use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use chrono::Utc;
use repo_organizer::enums::event_kind::EventKind;
use repo_organizer::errors::OrganizerError;
use repo_organizer::services::analysis_scheduler::{ConcurrentAnalysisScheduler, SchedulerOptions};
use repo_organizer::services::event_bus::EventBus;
use repo_organizer::services::retry_executor::{RetryExecutor, RetryPolicy};
use repo_organizer::structs::repository::Repository;
use super::support::{analysis, fast_limiter, MemoryStore, RecordingHandler, ScriptedAnalyzer, StaticSource};

fn repository(name: &str, updated_at: Option<&str>) -> Repository {
    Repository {
        updated_at: updated_at.map(ToString::to_string),
        ..Repository::new(name)
    }
}

#[tokio::test(start_paused = true)]
async fn test_skip_retry_and_failure_in_one_run() {
    let repositories = vec![
        repository("archive-tool", Some("2020-01-01T00:00:00Z")),
        repository("flaky-api", None),
        repository("quota-bound", None),
    ];
    let analyzer = Arc::new(
        ScriptedAnalyzer::default()
            .script(
                "flaky-api",
                vec![
                    Err(OrganizerError::transient("llm", "overloaded")),
                    Err(OrganizerError::transient("llm", "overloaded")),
                    Ok(analysis("flaky-api", "high")),
                ],
            )
            .script("quota-bound", vec![Err(OrganizerError::rate_limited("llm", "quota"))]),
    );
    let store = Arc::new(MemoryStore::default().with_report("archive-tool", Utc::now()));
    let event_bus = Arc::new(EventBus::new());
    let recorder = RecordingHandler::new("recorder", false);
    event_bus.register(EventKind::Any, recorder.clone());

    let scheduler = ConcurrentAnalysisScheduler::new(
        Arc::new(StaticSource { repositories: Vec::new() }),
        analyzer.clone(),
        store.clone(),
        event_bus,
        fast_limiter(),
        Arc::new(RetryExecutor::new(RetryPolicy::default())),
        SchedulerOptions::default(),
    );

    let summary = scheduler.run(repositories, false).await;

    assert_eq!(summary.succeeded_count(), 1);
    assert_eq!(summary.failed_count, 1);
    assert_eq!(summary.skipped_count, 1);
    assert_eq!(summary.retries, 2);
    assert_eq!(summary.succeeded[0].repository(), "flaky-api");

    assert_eq!(recorder.count(EventKind::RepositoryAnalysisCompleted), 1);
    assert_eq!(recorder.count(EventKind::AnalysisError), 1);
    assert_eq!(recorder.count(EventKind::RepositoryActionRecommended), 1);

    assert_eq!(analyzer.calls("archive-tool"), 0);
    assert_eq!(analyzer.calls("flaky-api"), 3);
    assert_eq!(analyzer.calls("quota-bound"), 1);
    assert_eq!(*store.summaries.lock().unwrap(), vec![1]);
}

#[tokio::test(start_paused = true)]
async fn test_workers_bound_concurrency_and_never_share_a_repository() {
    let names = ["a", "b", "c", "d", "e", "f", "b", "a"];
    let repositories: Vec<Repository> = names.iter().map(|n| Repository::new(n)).collect();
    let analyzer = Arc::new(ScriptedAnalyzer::with_delay(Duration::from_secs(1)));
    let store = Arc::new(MemoryStore::default());

    let scheduler = ConcurrentAnalysisScheduler::new(
        Arc::new(StaticSource { repositories: Vec::new() }),
        analyzer.clone(),
        store.clone(),
        Arc::new(EventBus::new()),
        fast_limiter(),
        Arc::new(RetryExecutor::default()),
        SchedulerOptions {
            max_workers: 3,
            ..Default::default()
        },
    );

    let summary = scheduler.run(repositories, false).await;

    assert_eq!(summary.succeeded_count(), 6);
    assert_eq!(summary.skipped_count, 2);
    let peak = analyzer.peak_active.load(Ordering::SeqCst);
    assert!(peak > 1 && peak <= 3, "peak concurrency was {peak}");
    assert_eq!(analyzer.peak_per_repository.load(Ordering::SeqCst), 1);
    assert!(summary.peak_workers > 1 && summary.peak_workers <= 3, "peak workers was {}", summary.peak_workers);
    assert_eq!(store.written.lock().unwrap().len(), 6);
}

#[tokio::test(start_paused = true)]
async fn test_fetch_then_run_forced() {
    let repositories = vec![repository("site", Some("2020-01-01T00:00:00Z"))];
    let store = Arc::new(MemoryStore::default().with_report("site", Utc::now()));
    let scheduler = ConcurrentAnalysisScheduler::new(
        Arc::new(StaticSource { repositories }),
        Arc::new(ScriptedAnalyzer::default()),
        store,
        Arc::new(EventBus::new()),
        fast_limiter(),
        Arc::new(RetryExecutor::default()),
        SchedulerOptions::default(),
    );

    let fetched = scheduler.fetch_repositories("octocat", 10).await.unwrap();
    let summary = scheduler.run(fetched, true).await;

    assert_eq!(summary.succeeded_count(), 1);
    assert_eq!(summary.skipped_count, 0);
}

#[tokio::test(start_paused = true)]
async fn test_single_repository_honors_freshness_and_force() {
    let listed: Vec<Repository> = (0..250)
        .map(|i| repository(&format!("repo-{i}"), Some("2020-01-01T00:00:00Z")))
        .collect();
    let analyzer = Arc::new(ScriptedAnalyzer::default());
    let store = Arc::new(MemoryStore::default().with_report("repo-240", Utc::now()));
    let scheduler = ConcurrentAnalysisScheduler::new(
        Arc::new(StaticSource { repositories: listed }),
        analyzer.clone(),
        store,
        Arc::new(EventBus::new()),
        fast_limiter(),
        Arc::new(RetryExecutor::default()),
        SchedulerOptions::default(),
    );

    let fetched = scheduler.fetch_repositories("octocat", usize::MAX).await.unwrap();
    assert_eq!(fetched.len(), 250);
    let selected = ConcurrentAnalysisScheduler::select_single(fetched.clone(), "repo-240");
    assert_eq!(selected.len(), 1);

    let cached = scheduler.run(selected.clone(), false).await;
    assert_eq!(cached.skipped_count, 1);
    assert_eq!(analyzer.calls("repo-240"), 0);

    let forced = scheduler.run(selected, true).await;
    assert_eq!(forced.succeeded_count(), 1);
    assert_eq!(forced.succeeded[0].repository(), "repo-240");
    assert_eq!(analyzer.calls("repo-240"), 1);
    assert_eq!(analyzer.calls("repo-0"), 0);

    assert!(ConcurrentAnalysisScheduler::select_single(fetched, "missing").is_empty());
}
