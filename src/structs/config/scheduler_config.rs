use serde::{Deserialize, Serialize};
use crate::helpers::config_helper::ConfigHelper;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SchedulerConfig {
    #[serde(default = "ConfigHelper::default_max_workers")]
    pub max_workers: usize,

    #[serde(default = "ConfigHelper::default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "ConfigHelper::default_base_delay_ms")]
    pub base_delay_ms: u64,

    #[serde(default = "ConfigHelper::default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// "patient", "capped" or "fail_fast"
    #[serde(default = "ConfigHelper::default_wait_policy")]
    pub rate_limit_policy: String,

    #[serde(default)]
    pub max_rate_limit_wait_secs: Option<u64>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_workers: ConfigHelper::default_max_workers(),
            max_retries: ConfigHelper::default_max_retries(),
            base_delay_ms: ConfigHelper::default_base_delay_ms(),
            max_delay_ms: ConfigHelper::default_max_delay_ms(),
            rate_limit_policy: ConfigHelper::default_wait_policy(),
            max_rate_limit_wait_secs: None,
        }
    }
}
