use serde::{Deserialize, Serialize};
use crate::helpers::config_helper::ConfigHelper;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GithubConfig {
    #[serde(default)]
    pub owner: String,

    #[serde(default = "ConfigHelper::default_github_token_env")]
    pub token_env: String,

    #[serde(skip)]
    pub token: Option<String>,

    #[serde(default = "ConfigHelper::default_github_api_url")]
    pub api_url: String,

    #[serde(default = "ConfigHelper::default_github_rate_limit")]
    pub rate_limit_per_minute: u32,

    #[serde(default = "ConfigHelper::default_max_repos")]
    pub max_repos: usize,

    #[serde(default = "ConfigHelper::default_commit_limit")]
    pub commit_limit: usize,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            owner: String::new(),
            token_env: ConfigHelper::default_github_token_env(),
            token: None,
            api_url: ConfigHelper::default_github_api_url(),
            rate_limit_per_minute: ConfigHelper::default_github_rate_limit(),
            max_repos: ConfigHelper::default_max_repos(),
            commit_limit: ConfigHelper::default_commit_limit(),
        }
    }
}
