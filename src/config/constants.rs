pub const GITHUB_SERVICE: &str = "github";
pub const LLM_SERVICE: &str = "llm";

pub const CONFIG_DIR_NAME: &str = "repo-organizer";
pub const CONFIG_FILE_NAME: &str = "config.toml";

pub const SUMMARY_REPORT_FILE: &str = "repositories_report.md";
pub const EVENTS_LOG_FILE: &str = "events.jsonl";
pub const REPORT_EXTENSION: &str = "md";

pub const GITHUB_PAGE_SIZE: usize = 100;
pub const ANTHROPIC_VERSION: &str = "2023-06-01";
pub const USER_AGENT: &str = concat!("repo-organizer/", env!("CARGO_PKG_VERSION"));

pub const MAX_PROGRESS_STATUS_LEN: usize = 50;
