use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client;
use crate::config::constants::{ANTHROPIC_VERSION, USER_AGENT};
use crate::errors::{OrganizerError, OrganizerResult};
use crate::helpers::analysis_record_builder::AnalysisRecord;
use crate::prompts::repository_analysis_prompt::{repository_analysis_prompt, REPOSITORY_ANALYSIS_SYSTEM_PROMPT};
use crate::services::analysis_parser::AnalysisParser;
use crate::structs::ai::anthropic::anthropic_message::AnthropicMessage;
use crate::structs::ai::anthropic::anthropic_message_request::AnthropicMessageRequest;
use crate::structs::ai::anthropic::anthropic_message_response::AnthropicMessageResponse;
use crate::structs::ai::api_error::ApiErrorEnvelope;
use crate::structs::analysis_result::AnalysisResult;
use crate::structs::config::ai_config::AiConfig;
use crate::traits::analyzer_port::AnalyzerPort;

const SERVICE: &str = "anthropic";

/// `AnalyzerPort` backed by the Anthropic Messages API.
#[derive(Clone)]
pub struct AnthropicAnalyzer {
    api_key: String,
    base_url: String,
    client: Client,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl AnthropicAnalyzer {
    pub fn new(config: &AiConfig) -> OrganizerResult<Self> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            OrganizerError::config_error(
                &format!("LLM API key missing: set {}", config.api_key_env),
                Some("ai.api_key_env"),
            )
        })?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            api_key,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            client,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    fn get_request(&self, record: &AnalysisRecord) -> AnthropicMessageRequest {
        AnthropicMessageRequest {
            model: self.model.clone(),
            system: REPOSITORY_ANALYSIS_SYSTEM_PROMPT.trim().to_string(),
            max_tokens: self.max_tokens,
            temperature: Some(self.temperature),
            messages: vec![AnthropicMessage::user(repository_analysis_prompt(record))],
        }
    }

    async fn make_request(&self, request_body: &AnthropicMessageRequest) -> OrganizerResult<reqwest::Response> {
        log::debug!("📦 Request model: {}", request_body.model);

        Ok(self
            .client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("Content-Type", "application/json")
            .json(request_body)
            .send()
            .await?)
    }

    /// Maps a non-success status to the error taxonomy the retry logic understands.
    pub fn error_for_status(status: u16, body: &str) -> OrganizerError {
        let reason = serde_json::from_str::<ApiErrorEnvelope>(body)
            .map(|e| format!("{}: {}", e.error.error_type, e.error.message))
            .unwrap_or_else(|_| format!("HTTP {status}: {body}"));

        match status {
            401 | 403 => OrganizerError::Authentication {
                service: SERVICE.to_string(),
                reason,
            },
            429 => OrganizerError::rate_limited(SERVICE, &reason),
            408 | 500..=599 => OrganizerError::transient(SERVICE, &reason),
            _ => OrganizerError::Network {
                operation: "Anthropic messages request".to_string(),
                status_code: Some(status),
                reason,
            },
        }
    }
}

#[async_trait]
impl AnalyzerPort for AnthropicAnalyzer {
    async fn analyze(&self, record: &AnalysisRecord) -> OrganizerResult<AnalysisResult> {
        let repo_name = record
            .get("repo_name")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        let request_body = self.get_request(record);
        let response = self.make_request(&request_body).await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(Self::error_for_status(status.as_u16(), &error_text));
        }

        let message: AnthropicMessageResponse = response.json().await?;
        if message.stop_reason.as_deref() == Some("max_tokens") {
            log::warn!("⚠️ Analysis of {repo_name} hit the token limit, output may be truncated");
        }

        AnalysisParser::parse(&message.text(), &repo_name).map_err(|e| {
            OrganizerError::analysis_error(&repo_name, "parsing model output", &e.to_string())
        })
    }
}
