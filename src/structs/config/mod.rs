pub mod ai_config;
pub mod config;
pub mod github_config;
pub mod output_config;
pub mod scheduler_config;
