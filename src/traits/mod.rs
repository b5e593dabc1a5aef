pub mod analyzer_port;
pub mod event_handler;
pub mod report_store;
pub mod source_control_port;
