pub mod ai;
pub mod analysis_result;
pub mod cli;
pub mod commit;
pub mod config;
pub mod contributor;
pub mod domain_event;
pub mod rate_limit_stats;
pub mod recommendation;
pub mod recommended_analysis;
pub mod repository;
pub mod run_summary;
