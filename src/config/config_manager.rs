use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use crate::config::constants::{CONFIG_DIR_NAME, CONFIG_FILE_NAME};
use crate::enums::wait_policy::WaitPolicy;
use crate::errors::{OrganizerError, OrganizerResult};
use crate::structs::config::config::Config;

pub struct ConfigManager;

impl ConfigManager {

    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
    }

    /// Loads the TOML config (all defaults when absent) and applies environment overrides.
    pub fn load() -> OrganizerResult<Config> {
        let config_path = Self::config_path();

        let mut config = if config_path.exists() {
            log::info!("📋 Loading config from: {}", config_path.display());
            let content = fs::read_to_string(&config_path)?;
            Self::parse(&content)?
        } else {
            log::debug!("No config file at {}, using defaults", config_path.display());
            Config::default()
        };

        Self::apply_env_overrides(&mut config, |key| env::var(key).ok());
        Ok(config)
    }

    pub fn parse(content: &str) -> OrganizerResult<Config> {
        Ok(toml::from_str(content)?)
    }

    pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        config.github.token = lookup(&config.github.token_env).filter(|t| !t.is_empty());
        config.ai.api_key = lookup(&config.ai.api_key_env).filter(|k| !k.is_empty());

        if let Some(owner) = lookup("GITHUB_USERNAME") {
            config.github.owner = owner;
        }
        if let Some(dir) = lookup("OUTPUT_DIR") {
            config.output.output_dir = dir;
        }
        if let Some(model) = lookup("LLM_MODEL") {
            config.ai.model = model;
        }
        if let Some(value) = lookup("MAX_REPOS").and_then(|v| v.parse().ok()) {
            config.github.max_repos = value;
        }
        if let Some(value) = lookup("MAX_WORKERS").and_then(|v| v.parse().ok()) {
            config.scheduler.max_workers = value;
        }
        if let Some(value) = lookup("GITHUB_RATE_LIMIT").and_then(|v| v.parse().ok()) {
            config.github.rate_limit_per_minute = value;
        }
        if let Some(value) = lookup("LLM_RATE_LIMIT").and_then(|v| v.parse().ok()) {
            config.ai.rate_limit_per_minute = value;
        }
    }

    pub fn wait_policy(config: &Config) -> OrganizerResult<WaitPolicy> {
        let max_wait = config.scheduler.max_rate_limit_wait_secs.map(Duration::from_secs);

        match (config.scheduler.rate_limit_policy.as_str(), max_wait) {
            ("patient", _) => Ok(WaitPolicy::Patient),
            ("capped", Some(max_wait)) => Ok(WaitPolicy::Capped { max_wait }),
            ("fail_fast", Some(max_wait)) => Ok(WaitPolicy::FailFast { max_wait }),
            ("capped" | "fail_fast", None) => Err(OrganizerError::config_error(
                "rate_limit_policy requires max_rate_limit_wait_secs",
                Some("scheduler.max_rate_limit_wait_secs"),
            )),
            (other, _) => Err(OrganizerError::config_error(
                &format!("unknown rate_limit_policy '{other}' (expected patient, capped or fail_fast)"),
                Some("scheduler.rate_limit_policy"),
            )),
        }
    }

    pub fn create_sample_config() -> OrganizerResult<PathBuf> {
        let sample_config = r#"# Repo Organizer configuration

[github]
# GitHub user whose repositories are analyzed (GITHUB_USERNAME overrides)
owner = "your-github-username"
# Environment variable holding the personal access token
token_env = "GITHUB_TOKEN"
rate_limit_per_minute = 30
max_repos = 100
commit_limit = 10

[ai]
model = "claude-3-7-sonnet-latest"
max_tokens = 4096
temperature = 0.2
api_key_env = "ANTHROPIC_API_KEY"
rate_limit_per_minute = 10
request_timeout_secs = 120

[scheduler]
max_workers = 5
max_retries = 3
base_delay_ms = 1000
max_delay_ms = 60000
# "patient" always waits; "capped" and "fail_fast" need max_rate_limit_wait_secs
rate_limit_policy = "patient"

[output]
output_dir = ".out/repos"
audit_events = true
"#;
        let config_file_path = Self::config_path();
        if let Some(parent) = config_file_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&config_file_path, sample_config)?;
        log::info!("✅ Created sample config at: {}", config_file_path.display());
        Ok(config_file_path)
    }

    pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if config.github.owner.trim().is_empty() {
            errors.push("github.owner is empty (set it in the config or GITHUB_USERNAME)".to_string());
        }
        if config.github.token.is_none() {
            errors.push(format!("GitHub token missing: set {}", config.github.token_env));
        }
        if config.ai.api_key.is_none() {
            errors.push(format!("LLM API key missing: set {}", config.ai.api_key_env));
        }
        if config.scheduler.max_workers == 0 {
            errors.push("scheduler.max_workers must be at least 1".to_string());
        }
        if config.github.rate_limit_per_minute == 0 {
            errors.push("github.rate_limit_per_minute must be at least 1".to_string());
        }
        if config.ai.rate_limit_per_minute == 0 {
            errors.push("ai.rate_limit_per_minute must be at least 1".to_string());
        }
        if config.scheduler.max_delay_ms < config.scheduler.base_delay_ms {
            errors.push("scheduler.max_delay_ms must not be smaller than base_delay_ms".to_string());
        }
        if let Err(e) = Self::wait_policy(config) {
            errors.push(e.to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
