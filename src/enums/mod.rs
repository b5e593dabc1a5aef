pub mod activity_level;
pub mod commands;
pub mod event_kind;
pub mod priority;
pub mod recommended_action;
pub mod task_state;
pub mod value_level;
pub mod wait_policy;
