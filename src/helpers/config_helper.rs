pub struct ConfigHelper;

impl ConfigHelper {
    pub fn default_github_token_env() -> String {
        "GITHUB_TOKEN".to_string()
    }

    pub fn default_github_api_url() -> String {
        "https://api.github.com".to_string()
    }

    pub fn default_github_rate_limit() -> u32 {
        30
    }

    pub fn default_max_repos() -> usize {
        100
    }

    pub fn default_commit_limit() -> usize {
        10
    }

    pub fn default_model() -> String {
        "claude-3-7-sonnet-latest".to_string()
    }

    pub fn default_max_tokens() -> u32 {
        4096
    }

    pub fn default_temperature() -> f32 {
        0.2
    }

    pub fn default_api_key_env() -> String {
        "ANTHROPIC_API_KEY".to_string()
    }

    pub fn default_anthropic_api_url() -> String {
        "https://api.anthropic.com/v1".to_string()
    }

    pub fn default_llm_rate_limit() -> u32 {
        10
    }

    pub fn default_request_timeout_secs() -> u64 {
        120
    }

    pub fn default_max_workers() -> usize {
        5
    }

    pub fn default_max_retries() -> u32 {
        3
    }

    pub fn default_base_delay_ms() -> u64 {
        1_000
    }

    pub fn default_max_delay_ms() -> u64 {
        60_000
    }

    pub fn default_wait_policy() -> String {
        "patient".to_string()
    }

    pub fn default_output_dir() -> String {
        ".out/repos".to_string()
    }

    pub fn default_audit_events() -> bool {
        true
    }
}
