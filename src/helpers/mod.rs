pub mod analysis_record_builder;
pub mod config_helper;
