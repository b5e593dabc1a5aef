use std::collections::BTreeSet;
use serde::{Deserialize, Serialize};
use crate::enums::activity_level::ActivityLevel;
use crate::enums::recommended_action::RecommendedAction;
use crate::enums::value_level::ValueLevel;
use crate::structs::recommendation::Recommendation;

pub const ERROR_TAG: &str = "error";
pub const ANALYSIS_FAILED_TAG: &str = "analysis-failed";
pub const DEFAULT_ACTION_REASONING: &str = "No specific reasoning provided";

/// Outcome of analysing one repository. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub repository: String,
    pub summary: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub recommendations: Vec<Recommendation>,
    pub activity_assessment: String,
    pub estimated_value: String,
    pub tags: BTreeSet<String>,
    pub recommended_action: RecommendedAction,
    pub action_reasoning: String,
}

impl AnalysisResult {
    /// Placeholder standing in for a repository whose analysis failed.
    pub fn failed(repository: &str, error_message: &str) -> Self {
        Self {
            repository: repository.to_string(),
            summary: format!("Error analyzing repository: {error_message}"),
            strengths: vec!["Analysis failed".to_string()],
            weaknesses: vec!["Analysis failed".to_string()],
            recommendations: Vec::new(),
            activity_assessment: "Unknown (analysis failed)".to_string(),
            estimated_value: "Unknown (analysis failed)".to_string(),
            tags: [ERROR_TAG, ANALYSIS_FAILED_TAG].iter().map(ToString::to_string).collect(),
            recommended_action: RecommendedAction::Keep,
            action_reasoning: DEFAULT_ACTION_REASONING.to_string(),
        }
    }

    /// Error-tagged results are excluded from recommendations and summaries.
    pub fn is_error(&self) -> bool {
        self.tags.contains(ERROR_TAG) || self.tags.contains(ANALYSIS_FAILED_TAG)
    }

    pub fn activity_level(&self) -> ActivityLevel {
        ActivityLevel::from_label(&self.activity_assessment)
    }

    pub fn value_level(&self) -> ValueLevel {
        ValueLevel::from_label(&self.estimated_value)
    }

    pub fn has_custom_reasoning(&self) -> bool {
        let reasoning = self.action_reasoning.trim();
        !reasoning.is_empty() && reasoning != DEFAULT_ACTION_REASONING
    }

    /// Re-keys the result under the repository's authoritative name.
    pub fn for_repository(self, repository: &str) -> Self {
        Self {
            repository: repository.to_string(),
            ..self
        }
    }
}
