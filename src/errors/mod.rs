use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum OrganizerError {
    // Configuration errors
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        field: Option<String>,
    },

    // Network/API errors
    #[error("Network error during {operation}: {reason}")]
    Network {
        operation: String,
        status_code: Option<u16>,
        reason: String,
    },
    #[error("Transient error from {service}: {reason}")]
    Transient {
        service: String,
        reason: String,
    },
    #[error("Rate limit exceeded for {service}: {reason}")]
    RateLimitExceeded {
        service: String,
        reason: String,
    },
    #[error("Request to {service} timed out after {seconds:.1}s")]
    Timeout {
        service: String,
        seconds: f64,
    },
    #[error("Authentication failed for {service}: {reason}")]
    Authentication {
        service: String,
        reason: String,
    },

    // Parser errors
    #[error("Parse error in {content_type}: {reason}")]
    Parse {
        content_type: String,
        reason: String,
    },

    // Analysis errors
    #[error("Analysis of '{repository}' failed during {stage}: {reason}")]
    Analysis {
        repository: String,
        stage: String,
        reason: String,
    },
    #[error("Giving up after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        attempts: u32,
        last_error: Box<OrganizerError>,
    },
    #[error("Failed to fetch repository list for '{owner}': {reason}")]
    SourceUnavailable {
        owner: String,
        reason: String,
    },

    // Event dispatch errors
    #[error("Event handler '{handler}' failed on {event_type}: {reason}")]
    EventHandler {
        handler: String,
        event_type: String,
        reason: String,
    },

    // System errors
    #[error("I/O error during {operation}: {reason}")]
    Io {
        operation: String,
        reason: String,
    },
}

impl OrganizerError {
    pub fn config_error(message: &str, field: Option<&str>) -> Self {
        Self::Configuration {
            message: message.to_string(),
            field: field.map(ToString::to_string),
        }
    }

    pub fn transient(service: &str, reason: &str) -> Self {
        Self::Transient {
            service: service.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn rate_limited(service: &str, reason: &str) -> Self {
        Self::RateLimitExceeded {
            service: service.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn parse_error(content_type: &str, reason: &str) -> Self {
        Self::Parse {
            content_type: content_type.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn analysis_error(repository: &str, stage: &str, reason: &str) -> Self {
        Self::Analysis {
            repository: repository.to_string(),
            stage: stage.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn io_error(operation: &str, reason: &str) -> Self {
        Self::Io {
            operation: operation.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Transient failures are safe to re-attempt; an explicit rate-limit signal is not.
    /// A network error carrying a client-error status is not transient either.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network { status_code, .. } => {
                status_code.map_or(true, |code| code == 408 || code >= 500)
            }
            Self::Transient { .. } | Self::Timeout { .. } => true,
            Self::RetriesExhausted { .. }
            | Self::RateLimitExceeded { .. }
            | Self::Configuration { .. }
            | Self::Authentication { .. }
            | Self::Parse { .. }
            | Self::Analysis { .. }
            | Self::SourceUnavailable { .. }
            | Self::EventHandler { .. }
            | Self::Io { .. } => false,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::SourceUnavailable { .. } => ErrorSeverity::Critical,
            Self::Authentication { .. } | Self::Configuration { .. } | Self::Io { .. } => {
                ErrorSeverity::High
            }
            Self::Analysis { .. }
            | Self::RetriesExhausted { .. }
            | Self::RateLimitExceeded { .. }
            | Self::EventHandler { .. } => ErrorSeverity::Medium,
            Self::Network { .. }
            | Self::Transient { .. }
            | Self::Timeout { .. }
            | Self::Parse { .. } => ErrorSeverity::Low,
        }
    }

    /// The error that actually ended a retried operation.
    pub fn root_cause(&self) -> &Self {
        match self {
            Self::RetriesExhausted { last_error, .. } => last_error.root_cause(),
            other => other,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    pub const fn emoji(self) -> &'static str {
        match self {
            Self::Low => "🟢",
            Self::Medium => "🟡",
            Self::High => "🟠",
            Self::Critical => "🔴",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

/// Result type alias for repo-organizer operations
pub type OrganizerResult<T> = Result<T, OrganizerError>;

/// Error handler for consistent error reporting at the CLI boundary
pub struct ErrorHandler;

impl ErrorHandler {
    pub fn handle_error(error: &OrganizerError) {
        let severity = error.severity();
        log::error!("{} [{}] {}", severity.emoji(), severity.name(), error);

        if error.is_retryable() {
            log::error!("🔄 This error is transient - running the command again may succeed");
        }
    }
}

impl From<std::io::Error> for OrganizerError {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            operation: "I/O operation".to_string(),
            reason: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for OrganizerError {
    fn from(error: serde_json::Error) -> Self {
        Self::Parse {
            content_type: "JSON".to_string(),
            reason: error.to_string(),
        }
    }
}

impl From<toml::de::Error> for OrganizerError {
    fn from(error: toml::de::Error) -> Self {
        Self::Parse {
            content_type: "TOML".to_string(),
            reason: error.message().to_string(),
        }
    }
}

impl From<reqwest::Error> for OrganizerError {
    fn from(error: reqwest::Error) -> Self {
        let operation = error
            .url()
            .map_or_else(|| "HTTP request".to_string(), |u| format!("HTTP request to {u}"));

        Self::Network {
            operation,
            status_code: error.status().map(|s| s.as_u16()),
            reason: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(OrganizerError::transient("github", "computing stats").is_retryable());
        assert!(OrganizerError::Timeout { service: "llm".into(), seconds: 1.0 }.is_retryable());
        assert!(!OrganizerError::rate_limited("llm", "quota").is_retryable());
        assert!(!OrganizerError::parse_error("JSON", "bad").is_retryable());
    }

    #[test]
    fn test_network_errors_retry_unless_client_status() {
        let network = |status_code| OrganizerError::Network {
            operation: "GET /repos".into(),
            status_code,
            reason: "failed".into(),
        };

        assert!(network(None).is_retryable());
        assert!(network(Some(502)).is_retryable());
        assert!(!network(Some(404)).is_retryable());
    }

    #[test]
    fn test_root_cause_unwraps_exhausted_retries() {
        let error = OrganizerError::RetriesExhausted {
            attempts: 4,
            last_error: Box::new(OrganizerError::transient("llm", "503")),
        };

        assert!(matches!(error.root_cause(), OrganizerError::Transient { .. }));
        assert!(!error.is_retryable());
        assert!(error.to_string().contains("4 attempts"));
    }
}
