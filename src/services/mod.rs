pub mod action_recommendation_engine;
pub mod ai_providers;
pub mod analysis_parser;
pub mod analysis_scheduler;
pub mod event_bus;
pub mod freshness_gate;
pub mod github_source_control;
pub mod rate_limiter;
pub mod report_writer;
pub mod retry_executor;
pub mod run_coordinator;
