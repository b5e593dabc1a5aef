pub mod event_audit_logger;
pub mod progress_logger;
