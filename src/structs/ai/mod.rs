pub mod anthropic;
pub mod api_error;
