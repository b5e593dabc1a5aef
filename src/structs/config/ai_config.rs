use serde::{Deserialize, Serialize};
use crate::helpers::config_helper::ConfigHelper;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AiConfig {
    #[serde(default = "ConfigHelper::default_model")]
    pub model: String,

    #[serde(default = "ConfigHelper::default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "ConfigHelper::default_temperature")]
    pub temperature: f32,

    #[serde(default = "ConfigHelper::default_api_key_env")]
    pub api_key_env: String,

    #[serde(skip)]
    pub api_key: Option<String>,

    #[serde(default = "ConfigHelper::default_anthropic_api_url")]
    pub api_url: String,

    #[serde(default = "ConfigHelper::default_llm_rate_limit")]
    pub rate_limit_per_minute: u32,

    #[serde(default = "ConfigHelper::default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            model: ConfigHelper::default_model(),
            max_tokens: ConfigHelper::default_max_tokens(),
            temperature: ConfigHelper::default_temperature(),
            api_key_env: ConfigHelper::default_api_key_env(),
            api_key: None,
            api_url: ConfigHelper::default_anthropic_api_url(),
            rate_limit_per_minute: ConfigHelper::default_llm_rate_limit(),
            request_timeout_secs: ConfigHelper::default_request_timeout_secs(),
        }
    }
}
