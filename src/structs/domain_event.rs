use std::sync::Arc;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use uuid::Uuid;
use crate::enums::event_kind::EventKind;
use crate::enums::recommended_action::RecommendedAction;
use crate::structs::analysis_result::AnalysisResult;
use crate::structs::recommendation::Recommendation;

#[derive(Debug, Clone, PartialEq)]
pub enum EventPayload {
    RepositoryAnalysisCompleted {
        analysis: Arc<AnalysisResult>,
    },
    RepositoryActionRecommended {
        repo_name: String,
        action: RecommendedAction,
        reasoning: String,
    },
    HighPriorityIssueIdentified {
        repo_name: String,
        issue: Recommendation,
    },
    AnalysisError {
        repo_name: String,
        error_message: String,
    },
}

impl EventPayload {
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::RepositoryAnalysisCompleted { .. } => EventKind::RepositoryAnalysisCompleted,
            Self::RepositoryActionRecommended { .. } => EventKind::RepositoryActionRecommended,
            Self::HighPriorityIssueIdentified { .. } => EventKind::HighPriorityIssueIdentified,
            Self::AnalysisError { .. } => EventKind::AnalysisError,
        }
    }

    fn data(&self) -> Map<String, Value> {
        let value = match self {
            Self::RepositoryAnalysisCompleted { analysis } => json!({
                "repo_name": analysis.repository,
                "summary": analysis.summary,
                "action": analysis.recommended_action.as_str(),
                "value": analysis.estimated_value,
                "activity": analysis.activity_assessment,
            }),
            Self::RepositoryActionRecommended { repo_name, action, reasoning } => json!({
                "repo_name": repo_name,
                "action": action.as_str(),
                "reasoning": reasoning,
            }),
            Self::HighPriorityIssueIdentified { repo_name, issue } => json!({
                "repo_name": repo_name,
                "recommendation": issue.text,
                "reason": issue.reason,
                "priority": issue.priority.to_string(),
            }),
            Self::AnalysisError { repo_name, error_message } => json!({
                "repo_name": repo_name,
                "error": error_message,
            }),
        };

        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }
}

/// Immutable record of something significant that happened to a repository.
///
/// Identity and timestamp are assigned at construction and never change.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainEvent {
    event_id: Uuid,
    aggregate_id: String,
    timestamp: DateTime<Utc>,
    payload: EventPayload,
}

impl DomainEvent {
    pub fn new(aggregate_id: &str, payload: EventPayload) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            aggregate_id: aggregate_id.to_string(),
            timestamp: Utc::now(),
            payload,
        }
    }

    pub fn analysis_completed(analysis: Arc<AnalysisResult>) -> Self {
        let aggregate_id = analysis.repository.clone();
        Self::new(&aggregate_id, EventPayload::RepositoryAnalysisCompleted { analysis })
    }

    pub fn action_recommended(repo_name: &str, action: RecommendedAction, reasoning: &str) -> Self {
        Self::new(
            repo_name,
            EventPayload::RepositoryActionRecommended {
                repo_name: repo_name.to_string(),
                action,
                reasoning: reasoning.to_string(),
            },
        )
    }

    pub fn high_priority_issue(repo_name: &str, issue: Recommendation) -> Self {
        Self::new(
            repo_name,
            EventPayload::HighPriorityIssueIdentified {
                repo_name: repo_name.to_string(),
                issue,
            },
        )
    }

    pub fn analysis_error(repo_name: &str, error_message: &str) -> Self {
        Self::new(
            repo_name,
            EventPayload::AnalysisError {
                repo_name: repo_name.to_string(),
                error_message: error_message.to_string(),
            },
        )
    }

    pub const fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn aggregate_id(&self) -> &str {
        &self.aggregate_id
    }

    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub const fn payload(&self) -> &EventPayload {
        &self.payload
    }

    pub const fn kind(&self) -> EventKind {
        self.payload.kind()
    }

    pub fn to_record(&self) -> EventRecord {
        EventRecord {
            event_id: self.event_id.to_string(),
            event_type: self.kind().as_str().to_string(),
            timestamp: self.timestamp.to_rfc3339_opts(SecondsFormat::Micros, true),
            aggregate_id: self.aggregate_id.clone(),
            data: self.payload.data(),
        }
    }
}

/// Flat, serializable form of a `DomainEvent` for logging and auditing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub event_id: String,
    pub event_type: String,
    pub timestamp: String,
    pub aggregate_id: String,
    pub data: Map<String, Value>,
}
