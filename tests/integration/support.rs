use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use repo_organizer::config::constants::{GITHUB_SERVICE, LLM_SERVICE};
use repo_organizer::enums::event_kind::EventKind;
use repo_organizer::errors::OrganizerResult;
use repo_organizer::helpers::analysis_record_builder::AnalysisRecord;
use repo_organizer::services::rate_limiter::ApiRateLimiter;
use repo_organizer::structs::analysis_result::{AnalysisResult, DEFAULT_ACTION_REASONING};
use repo_organizer::structs::commit::Commit;
use repo_organizer::structs::contributor::Contributor;
use repo_organizer::structs::domain_event::DomainEvent;
use repo_organizer::structs::recommended_analysis::RecommendedAnalysis;
use repo_organizer::structs::repository::{LanguageShare, Repository};
use repo_organizer::traits::analyzer_port::AnalyzerPort;
use repo_organizer::traits::event_handler::EventHandler;
use repo_organizer::traits::report_store::ReportStore;
use repo_organizer::traits::source_control_port::SourceControlPort;

pub fn analysis(name: &str, value: &str) -> AnalysisResult {
    AnalysisResult {
        repository: name.to_string(),
        summary: format!("{name} does one thing well"),
        strengths: vec!["Small surface".to_string()],
        weaknesses: vec!["Sparse docs".to_string()],
        recommendations: Vec::new(),
        activity_assessment: "medium".to_string(),
        estimated_value: value.to_string(),
        tags: ["tool".to_string()].into_iter().collect(),
        recommended_action: Default::default(),
        action_reasoning: DEFAULT_ACTION_REASONING.to_string(),
    }
}

pub fn fast_limiter() -> ApiRateLimiter {
    ApiRateLimiter::default()
        .with_service(GITHUB_SERVICE, 6000)
        .with_service(LLM_SERVICE, 6000)
}

/// Source whose auxiliary lookups always come back empty.
pub struct StaticSource {
    pub repositories: Vec<Repository>,
}

#[async_trait]
impl SourceControlPort for StaticSource {
    async fn list_repositories(&self, _owner: &str, limit: usize) -> OrganizerResult<Vec<Repository>> {
        Ok(self.repositories.iter().take(limit).cloned().collect())
    }

    async fn fetch_languages(&self, _repository: &Repository) -> OrganizerResult<Vec<LanguageShare>> {
        Ok(Vec::new())
    }

    async fn recent_commits(&self, _repository: &Repository, _limit: usize) -> OrganizerResult<Vec<Commit>> {
        Ok(Vec::new())
    }

    async fn contributors(&self, _repository: &Repository) -> OrganizerResult<Vec<Contributor>> {
        Ok(Vec::new())
    }
}

/// Analyzer that replays a per-repository script, then succeeds.
///
/// Tracks how many analyses are in flight overall and per repository.
#[derive(Default)]
pub struct ScriptedAnalyzer {
    scripts: Mutex<HashMap<String, VecDeque<OrganizerResult<AnalysisResult>>>>,
    delay: Option<Duration>,
    calls: Mutex<HashMap<String, usize>>,
    in_flight: Mutex<HashMap<String, usize>>,
    active: AtomicUsize,
    pub peak_active: AtomicUsize,
    pub peak_per_repository: AtomicUsize,
}

impl ScriptedAnalyzer {
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn script(self, name: &str, outcomes: Vec<OrganizerResult<AnalysisResult>>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(name.to_string(), outcomes.into_iter().collect());
        self
    }

    pub fn calls(&self, name: &str) -> usize {
        self.calls.lock().unwrap().get(name).copied().unwrap_or(0)
    }

    fn enter(&self, name: &str) {
        let running = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_active.fetch_max(running, Ordering::SeqCst);

        let mut in_flight = self.in_flight.lock().unwrap();
        let for_name = in_flight.entry(name.to_string()).or_insert(0);
        *for_name += 1;
        self.peak_per_repository.fetch_max(*for_name, Ordering::SeqCst);
        *self.calls.lock().unwrap().entry(name.to_string()).or_insert(0) += 1;
    }

    fn leave(&self, name: &str) {
        self.active.fetch_sub(1, Ordering::SeqCst);
        if let Some(for_name) = self.in_flight.lock().unwrap().get_mut(name) {
            *for_name -= 1;
        }
    }
}

#[async_trait]
impl AnalyzerPort for ScriptedAnalyzer {
    async fn analyze(&self, record: &AnalysisRecord) -> OrganizerResult<AnalysisResult> {
        let name = record["repo_name"].as_str().unwrap_or_default().to_string();
        self.enter(&name);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let next = self.scripts.lock().unwrap().get_mut(&name).and_then(VecDeque::pop_front);

        self.leave(&name);
        next.unwrap_or_else(|| Ok(analysis(&name, "medium")))
    }
}

/// In-memory report store with preset modification times.
#[derive(Default)]
pub struct MemoryStore {
    modified: HashMap<String, DateTime<Utc>>,
    pub written: Mutex<Vec<String>>,
    pub summaries: Mutex<Vec<usize>>,
}

impl MemoryStore {
    pub fn with_report(mut self, name: &str, modified: DateTime<Utc>) -> Self {
        self.modified.insert(name.to_string(), modified);
        self
    }
}

#[async_trait]
impl ReportStore for MemoryStore {
    async fn last_modified(&self, repo_name: &str) -> OrganizerResult<Option<DateTime<Utc>>> {
        Ok(self.modified.get(repo_name).copied())
    }

    async fn write_report(&self, repository: &Repository, _report: &RecommendedAnalysis) -> OrganizerResult<()> {
        self.written.lock().unwrap().push(repository.name.clone());
        Ok(())
    }

    async fn write_summary(&self, reports: &[RecommendedAnalysis]) -> OrganizerResult<()> {
        self.summaries.lock().unwrap().push(reports.len());
        Ok(())
    }
}

/// Records the kind of every event it receives.
pub struct RecordingHandler {
    name: String,
    deferred: bool,
    pub seen: Mutex<Vec<EventKind>>,
}

impl RecordingHandler {
    pub fn new(name: &str, deferred: bool) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            deferred,
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn count(&self, kind: EventKind) -> usize {
        self.seen.lock().unwrap().iter().filter(|k| **k == kind).count()
    }
}

#[async_trait]
impl EventHandler for RecordingHandler {
    fn name(&self) -> &str {
        &self.name
    }

    async fn handle(&self, event: &DomainEvent) -> OrganizerResult<()> {
        if self.deferred {
            tokio::task::yield_now().await;
        }
        self.seen.lock().unwrap().push(event.kind());
        Ok(())
    }

    fn is_deferred(&self) -> bool {
        self.deferred
    }
}
