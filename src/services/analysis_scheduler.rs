use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::Instant;
use crate::config::constants::{GITHUB_SERVICE, LLM_SERVICE};
use crate::errors::{OrganizerError, OrganizerResult};
use crate::helpers::analysis_record_builder::{AnalysisRecord, AnalysisRecordBuilder};
use crate::services::action_recommendation_engine::ActionRecommendationEngine;
use crate::services::event_bus::EventBus;
use crate::services::freshness_gate::FreshnessGate;
use crate::services::rate_limiter::ApiRateLimiter;
use crate::services::retry_executor::RetryExecutor;
use crate::services::run_coordinator::{ProgressCallback, RunCoordinator};
use crate::structs::analysis_result::AnalysisResult;
use crate::structs::config::config::Config;
use crate::structs::domain_event::DomainEvent;
use crate::structs::recommended_analysis::RecommendedAnalysis;
use crate::structs::repository::Repository;
use crate::structs::run_summary::RunSummary;
use crate::traits::analyzer_port::AnalyzerPort;
use crate::traits::report_store::ReportStore;
use crate::traits::source_control_port::SourceControlPort;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerOptions {
    pub max_workers: usize,
    pub commit_limit: usize,
    pub request_timeout: Option<Duration>,
}

impl Default for SchedulerOptions {
    fn default() -> Self {
        Self {
            max_workers: 5,
            commit_limit: 10,
            request_timeout: None,
        }
    }
}

impl From<&Config> for SchedulerOptions {
    fn from(config: &Config) -> Self {
        Self {
            max_workers: config.scheduler.max_workers,
            commit_limit: config.github.commit_limit,
            request_timeout: Some(Duration::from_secs(config.ai.request_timeout_secs)),
        }
    }
}

/// The collaborators every worker needs, shared across spawned tasks.
struct Workers {
    source: Arc<dyn SourceControlPort>,
    analyzer: Arc<dyn AnalyzerPort>,
    store: Arc<dyn ReportStore>,
    event_bus: Arc<EventBus>,
    engine: ActionRecommendationEngine,
    limiter: ApiRateLimiter,
    retry: Arc<RetryExecutor>,
    options: SchedulerOptions,
}

/// Runs one analysis per repository on a bounded worker pool.
///
/// Each repository name is submitted at most once per run, so no two workers ever
/// analyse the same repository concurrently. Failures of a single repository are
/// contained; only a failure to list repositories aborts a run.
pub struct ConcurrentAnalysisScheduler {
    workers: Arc<Workers>,
    freshness: FreshnessGate,
    progress: Option<ProgressCallback>,
}

impl ConcurrentAnalysisScheduler {
    pub fn new(
        source: Arc<dyn SourceControlPort>,
        analyzer: Arc<dyn AnalyzerPort>,
        store: Arc<dyn ReportStore>,
        event_bus: Arc<EventBus>,
        limiter: ApiRateLimiter,
        retry: Arc<RetryExecutor>,
        options: SchedulerOptions,
    ) -> Self {
        let workers = Workers {
            source,
            analyzer,
            store: Arc::clone(&store),
            engine: ActionRecommendationEngine::new(Arc::clone(&event_bus)),
            event_bus,
            limiter,
            retry,
            options: SchedulerOptions {
                max_workers: options.max_workers.max(1),
                ..options
            },
        };

        Self {
            workers: Arc::new(workers),
            freshness: FreshnessGate::new(store),
            progress: None,
        }
    }

    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Lists the owner's repositories. Any failure here is fatal for the run.
    pub async fn fetch_repositories(&self, owner: &str, limit: usize) -> OrganizerResult<Vec<Repository>> {
        let workers: &Workers = &self.workers;
        log::info!("📥 Fetching up to {limit} repositories for {owner}");

        let repositories = workers
            .retry
            .execute(
                &format!("list repositories of {owner}"),
                || async move {
                    workers.limiter.wait(GITHUB_SERVICE).await?;
                    workers.source.list_repositories(owner, limit).await
                },
                OrganizerError::is_retryable,
            )
            .await
            .map_err(|e| OrganizerError::SourceUnavailable {
                owner: owner.to_string(),
                reason: e.to_string(),
            })?;

        log::info!("✅ Fetched {} repositories", repositories.len());
        Ok(repositories)
    }

    /// Narrows a listing to the one repository named `name`; empty when it is not listed.
    pub fn select_single(repositories: Vec<Repository>, name: &str) -> Vec<Repository> {
        let listed = repositories.len();
        let available: Vec<String> = repositories.iter().take(10).map(|r| r.name.clone()).collect();

        let matching: Vec<Repository> = repositories.into_iter().filter(|r| r.name == name).take(1).collect();
        if matching.is_empty() {
            log::error!("❌ Repository '{name}' not found in {listed} repositories");
            if !available.is_empty() {
                log::error!("   Available repositories: {}...", available.join(", "));
            }
        }
        matching
    }

    /// Analyses every repository that is not skipped and returns once all of them have
    /// resolved and the summary report has been written.
    pub async fn run(&self, repositories: Vec<Repository>, force: bool) -> RunSummary {
        let started = Instant::now();
        let retries_before = self.workers.retry.retry_count();
        let coordinator = Arc::new(RunCoordinator::new(repositories.len(), self.progress.clone()));

        log::info!(
            "🚀 Analyzing {} repositories with {} workers",
            repositories.len(),
            self.workers.options.max_workers
        );

        let mut pending = Vec::new();
        let mut seen = HashSet::new();
        for repository in repositories {
            if !repository.has_name() {
                log::warn!("⚠️ Skipping repository without a name");
                coordinator.skip_unadmitted("<unnamed>", "missing name");
            } else if !seen.insert(repository.name.clone()) {
                log::warn!("⚠️ {} listed more than once, analyzing it once", repository.name);
                coordinator.skip_unadmitted(&repository.name, "duplicate");
            } else {
                coordinator.admit(&repository.name);
                if self.freshness.should_skip(&repository, force).await {
                    coordinator.mark_skipped(&repository.name, "report up to date");
                } else {
                    pending.push(repository);
                }
            }
        }

        let semaphore = Arc::new(Semaphore::new(self.workers.options.max_workers));
        let mut join_set: JoinSet<Option<RecommendedAnalysis>> = JoinSet::new();

        for repository in pending {
            let workers = Arc::clone(&self.workers);
            let coordinator = Arc::clone(&coordinator);
            let permit = Arc::clone(&semaphore);

            join_set.spawn(async move {
                let Ok(_permit) = permit.acquire().await else {
                    log::error!("❌ Worker pool closed before {} could start", repository.name);
                    return None;
                };
                workers.analyze_repository(repository, &coordinator).await
            });
        }

        let mut succeeded = Vec::new();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok(Some(report)) => succeeded.push(report),
                Ok(None) => {}
                Err(e) => log::error!("❌ Analysis worker crashed: {e}"),
            }
        }

        for name in coordinator.fail_unfinished() {
            log::error!("❌ {name} never finished, counting it as failed");
        }

        if let Err(e) = self.workers.store.write_summary(&succeeded).await {
            log::error!("❌ Could not write summary report: {e}");
            coordinator.record_write_error();
        }

        for stats in self.workers.limiter.all_stats().await {
            stats.print_summary();
        }

        let counts = coordinator.counts();
        RunSummary {
            succeeded,
            failed_count: counts.failed,
            skipped_count: counts.skipped,
            elapsed_seconds: started.elapsed().as_secs_f64(),
            retries: self.workers.retry.retry_count().saturating_sub(retries_before),
            event_errors: counts.event_errors,
            write_errors: counts.write_errors,
            peak_workers: counts.peak_running,
        }
    }
}

impl Workers {
    async fn analyze_repository(
        &self,
        repository: Repository,
        coordinator: &RunCoordinator,
    ) -> Option<RecommendedAnalysis> {
        if !coordinator.mark_running(&repository.name) {
            return None;
        }
        log::info!("🔍 Analyzing {}", repository.name);

        let (repository, record) = self.gather(repository).await;

        let outcome = self
            .retry
            .execute(
                &format!("analyze {}", repository.name),
                || self.analyze_once(&repository, &record),
                OrganizerError::is_retryable,
            )
            .await;

        match outcome {
            Ok(analysis) if !analysis.is_error() => {
                let analysis = Arc::new(analysis.for_repository(&repository.name));
                Some(self.complete(&repository, analysis, coordinator).await)
            }
            Ok(analysis) => {
                self.fail(&repository, &analysis.summary, coordinator).await;
                None
            }
            Err(e) => {
                self.fail(&repository, &e.to_string(), coordinator).await;
                None
            }
        }
    }

    /// Collects languages, commits and contributors; each lookup degrades to nothing.
    async fn gather(&self, repository: Repository) -> (Repository, AnalysisRecord) {
        let name = repository.name.clone();

        let languages = self
            .auxiliary(&name, "languages", || self.source.fetch_languages(&repository))
            .await;
        let commits = self
            .auxiliary(&name, "recent commits", || {
                self.source.recent_commits(&repository, self.options.commit_limit)
            })
            .await;
        let contributors = self
            .auxiliary(&name, "contributors", || self.source.contributors(&repository))
            .await;

        let repository = match languages {
            Some(languages) if !languages.is_empty() => repository.with_languages(languages),
            _ => repository,
        };

        let record = AnalysisRecordBuilder::new(&repository)
            .commits(commits.as_deref().unwrap_or_default())
            .contributors(contributors.as_deref().unwrap_or_default())
            .build();

        (repository, record)
    }

    /// Retries transient failures ("computing stats" included), then degrades to nothing.
    async fn auxiliary<T, F, Fut>(&self, name: &str, what: &str, lookup: F) -> Option<Vec<T>>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = OrganizerResult<Vec<T>>>,
    {
        let limiter = &self.limiter;
        let lookup = &lookup;

        let outcome = self
            .retry
            .execute(
                &format!("fetch {what} for {name}"),
                || async move {
                    limiter.wait(GITHUB_SERVICE).await?;
                    lookup().await
                },
                OrganizerError::is_retryable,
            )
            .await;

        match outcome {
            Ok(items) => Some(items),
            Err(e) => {
                log::warn!("⚠️ Could not fetch {what} for {name}: {e}");
                None
            }
        }
    }

    async fn analyze_once(&self, repository: &Repository, record: &AnalysisRecord) -> OrganizerResult<AnalysisResult> {
        self.limiter.wait(LLM_SERVICE).await?;

        match self.options.request_timeout {
            Some(limit) => tokio::time::timeout(limit, self.analyzer.analyze(record))
                .await
                .map_err(|_| {
                    log::warn!("⏱️ Analysis of {} timed out", repository.name);
                    OrganizerError::Timeout {
                        service: LLM_SERVICE.to_string(),
                        seconds: limit.as_secs_f64(),
                    }
                })?,
            None => self.analyzer.analyze(record).await,
        }
    }

    async fn complete(
        &self,
        repository: &Repository,
        analysis: Arc<AnalysisResult>,
        coordinator: &RunCoordinator,
    ) -> RecommendedAnalysis {
        if let Err(e) = self
            .event_bus
            .dispatch(&DomainEvent::analysis_completed(Arc::clone(&analysis)))
            .await
        {
            log::error!("❌ Completion handlers failed for {}: {e}", repository.name);
            coordinator.record_event_error();
        }

        let report = match self.engine.recommend(repository, Arc::clone(&analysis)).await {
            Ok(report) => report,
            Err(e) => {
                log::error!("❌ Recommendation handlers failed for {}: {e}", repository.name);
                coordinator.record_event_error();
                let (action, reasoning) = ActionRecommendationEngine::decide(repository, &analysis);
                RecommendedAnalysis::new(analysis, action, reasoning)
            }
        };

        self.persist(repository, &report, coordinator).await;
        coordinator.mark_succeeded(&repository.name);
        log::info!("✅ {}: {}", repository.name, report.recommended_action);
        report
    }

    async fn fail(&self, repository: &Repository, message: &str, coordinator: &RunCoordinator) {
        log::error!("❌ Analysis failed for {}: {message}", repository.name);
        let placeholder = Arc::new(AnalysisResult::failed(&repository.name, message));

        if let Err(e) = self
            .event_bus
            .dispatch(&DomainEvent::analysis_error(&repository.name, message))
            .await
        {
            log::error!("❌ Error handlers failed for {}: {e}", repository.name);
            coordinator.record_event_error();
        }

        let reasoning = placeholder.action_reasoning.clone();
        let action = placeholder.recommended_action;
        let report = RecommendedAnalysis::new(placeholder, action, reasoning);
        self.persist(repository, &report, coordinator).await;
        coordinator.mark_failed(&repository.name);
    }

    async fn persist(&self, repository: &Repository, report: &RecommendedAnalysis, coordinator: &RunCoordinator) {
        if let Err(e) = self.store.write_report(repository, report).await {
            log::error!("❌ Could not save report for {}: {e}", repository.name);
            coordinator.record_write_error();
        }
    }
}
