use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use crate::config::config_manager::ConfigManager;
use crate::config::constants::{EVENTS_LOG_FILE, GITHUB_SERVICE, LLM_SERVICE};
use crate::enums::commands::Commands;
use crate::enums::event_kind::EventKind;
use crate::errors::{OrganizerError, OrganizerResult};
use crate::logger::event_audit_logger::EventAuditLogger;
use crate::logger::progress_logger::ProgressLogger;
use crate::services::ai_providers::anthropic::AnthropicAnalyzer;
use crate::services::analysis_scheduler::{ConcurrentAnalysisScheduler, SchedulerOptions};
use crate::services::event_bus::EventBus;
use crate::services::github_source_control::GitHubSourceControl;
use crate::services::rate_limiter::ApiRateLimiter;
use crate::services::report_writer::MarkdownReportStore;
use crate::services::retry_executor::{RetryExecutor, RetryPolicy};
use crate::structs::config::config::Config;
use crate::traits::report_store::ReportStore;

pub struct CommandRunner {
    start_time: Option<Instant>,
}

impl Default for CommandRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner {
    pub const fn new() -> Self {
        Self { start_time: None }
    }

    pub async fn run_command(&mut self, command: Commands) -> OrganizerResult<()> {
        self.start_time = Some(Instant::now());

        let result = match command {
            Commands::Init => Self::init_command(),
            Commands::Validate => Self::validate_command(),
            Commands::Analyze { owner, limit, force, workers, single_repo } => {
                Self::analyze_command(owner, limit, force, workers, single_repo).await
            }
        };

        if let Some(start) = self.start_time {
            log::info!("⏱️  Command completed in {:.2}s", start.elapsed().as_secs_f64());
        }

        result
    }

    fn init_command() -> OrganizerResult<()> {
        log::info!("🚀 Initializing repo-organizer configuration...");

        let path = ConfigManager::create_sample_config()?;
        log::info!("📝 Edit {} and export your tokens.", path.display());
        log::info!("🔧 Run 'repo-organizer validate' to check your configuration.");
        Ok(())
    }

    fn validate_command() -> OrganizerResult<()> {
        let config = ConfigManager::load()?;
        Self::ensure_valid(&config)?;
        log::info!("✅ Configuration is valid");
        Ok(())
    }

    fn ensure_valid(config: &Config) -> OrganizerResult<()> {
        if let Err(problems) = ConfigManager::validate_config(config) {
            for problem in &problems {
                log::error!("  ❌ {problem}");
            }
            log::error!("💡 Run 'repo-organizer init' to create a configuration file.");
            return Err(OrganizerError::config_error(
                &format!("{} configuration problem(s)", problems.len()),
                None,
            ));
        }
        Ok(())
    }

    async fn analyze_command(
        owner: Option<String>,
        limit: Option<usize>,
        force: bool,
        workers: Option<usize>,
        single_repo: Option<String>,
    ) -> OrganizerResult<()> {
        let mut config = ConfigManager::load()?;
        if let Some(owner) = owner {
            config.github.owner = owner;
        }
        if let Some(limit) = limit {
            config.github.max_repos = limit;
        }
        if let Some(workers) = workers {
            config.scheduler.max_workers = workers;
        }
        Self::ensure_valid(&config)?;

        let output_dir = PathBuf::from(&config.output.output_dir);
        let limiter = ApiRateLimiter::new(ConfigManager::wait_policy(&config)?)
            .with_service(GITHUB_SERVICE, config.github.rate_limit_per_minute)
            .with_service(LLM_SERVICE, config.ai.rate_limit_per_minute);
        let retry = Arc::new(RetryExecutor::new(RetryPolicy::from(&config.scheduler)));

        let event_bus = Arc::new(EventBus::new());
        let audit_logger = if config.output.audit_events {
            EventAuditLogger::with_audit_file(output_dir.join(EVENTS_LOG_FILE))
        } else {
            EventAuditLogger::log_only()
        };
        event_bus.register(EventKind::Any, Arc::new(audit_logger));

        let source = Arc::new(
            GitHubSourceControl::new(&config.github, &config.github.owner)?.with_rate_limiter(limiter.clone()),
        );
        let analyzer = Arc::new(AnthropicAnalyzer::new(&config.ai)?);
        let store = Arc::new(MarkdownReportStore::new(&output_dir));

        let mut progress = ProgressLogger::new("🔍 Analyzing repositories");
        let scheduler = ConcurrentAnalysisScheduler::new(
            source,
            analyzer,
            Arc::clone(&store) as Arc<dyn ReportStore>,
            event_bus,
            limiter,
            retry,
            SchedulerOptions::from(&config),
        )
        .with_progress(progress.callback());

        if let Some(name) = &single_repo {
            log::info!("🎯 Single repository mode: only {name} will be processed");
        }
        let fetch_limit = if single_repo.is_some() { usize::MAX } else { config.github.max_repos };

        progress.start();
        let repositories = match scheduler.fetch_repositories(&config.github.owner, fetch_limit).await {
            Ok(repositories) => repositories,
            Err(e) => {
                progress.error(&format!("Could not list repositories for {}", config.github.owner)).await;
                return Err(e);
            }
        };
        let repositories = match &single_repo {
            Some(name) => ConcurrentAnalysisScheduler::select_single(repositories, name),
            None => repositories,
        };
        if repositories.is_empty() {
            progress.error(&format!("No repositories to analyze for {}", config.github.owner)).await;
            return Ok(());
        }

        let summary = scheduler.run(repositories, force).await;
        if summary.succeeded_count() == 0 && summary.failed_count > 0 {
            progress.error(&format!("All {} analyses failed", summary.failed_count)).await;
        } else {
            progress
                .stop(&format!("Analyzed {} repositories", summary.succeeded_count()))
                .await;
        }

        summary.print_summary();
        log::info!("📁 Reports written to {}", store.output_dir().display());
        Ok(())
    }
}
