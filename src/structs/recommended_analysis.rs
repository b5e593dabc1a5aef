use std::sync::Arc;
use serde::Serialize;
use crate::enums::recommended_action::RecommendedAction;
use crate::structs::analysis_result::AnalysisResult;

/// An analysis paired with the action the recommendation engine settled on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendedAnalysis {
    pub analysis: Arc<AnalysisResult>,
    pub recommended_action: RecommendedAction,
    pub reasoning: String,
}

impl RecommendedAnalysis {
    pub fn new(analysis: Arc<AnalysisResult>, recommended_action: RecommendedAction, reasoning: String) -> Self {
        Self {
            analysis,
            recommended_action,
            reasoning,
        }
    }

    pub fn repository(&self) -> &str {
        &self.analysis.repository
    }
}
