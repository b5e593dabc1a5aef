use serde::Deserialize;
use crate::enums::priority::Priority;
use crate::enums::recommended_action::RecommendedAction;
use crate::errors::{OrganizerError, OrganizerResult};
use crate::structs::analysis_result::{AnalysisResult, DEFAULT_ACTION_REASONING};
use crate::structs::recommendation::Recommendation;

const NO_SUMMARY: &str = "No summary provided";
const UNKNOWN_ASSESSMENT: &str = "Unknown";

#[derive(Debug, Deserialize)]
struct RawRecommendation {
    #[serde(alias = "text")]
    recommendation: String,
    #[serde(default)]
    reason: String,
    #[serde(default)]
    priority: String,
}

#[derive(Debug, Deserialize)]
struct RawAnalysis {
    #[serde(default)]
    repo_name: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    strengths: Vec<String>,
    #[serde(default)]
    weaknesses: Vec<String>,
    #[serde(default)]
    recommendations: Vec<RawRecommendation>,
    #[serde(default)]
    activity_assessment: String,
    #[serde(default)]
    estimated_value: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    recommended_action: String,
    #[serde(default)]
    action_reasoning: String,
}

/// Reads the single JSON object a model was asked to produce.
///
/// Prose or code fences around the object are ignored and absent fields get defaults.
pub struct AnalysisParser;

impl AnalysisParser {
    pub fn parse(response: &str, repo_name: &str) -> OrganizerResult<AnalysisResult> {
        let json = Self::extract_object(response).ok_or_else(|| {
            OrganizerError::parse_error("analysis", "response does not contain a JSON object")
        })?;

        let raw: RawAnalysis = serde_json::from_str(json)
            .map_err(|e| OrganizerError::parse_error("analysis JSON", &e.to_string()))?;

        Ok(Self::into_result(raw, repo_name))
    }

    /// The first balanced `{...}` in `text`, skipping braces inside string literals.
    pub fn extract_object(text: &str) -> Option<&str> {
        let start = text.find('{')?;
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escaped = false;

        for (offset, ch) in text[start..].char_indices() {
            if in_string {
                match ch {
                    _ if escaped => escaped = false,
                    '\\' => escaped = true,
                    '"' => in_string = false,
                    _ => {}
                }
                continue;
            }

            match ch {
                '"' => in_string = true,
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(&text[start..=start + offset]);
                    }
                }
                _ => {}
            }
        }

        None
    }

    fn into_result(raw: RawAnalysis, repo_name: &str) -> AnalysisResult {
        let repository = if raw.repo_name.trim().is_empty() {
            repo_name.to_string()
        } else {
            raw.repo_name
        };

        let recommendations = raw
            .recommendations
            .into_iter()
            .filter(|r| !r.recommendation.trim().is_empty())
            .map(|r| Recommendation::new(&r.recommendation, &r.reason, Priority::from_label(&r.priority)))
            .collect();

        AnalysisResult {
            repository,
            summary: non_empty_or(raw.summary, NO_SUMMARY),
            strengths: raw.strengths,
            weaknesses: raw.weaknesses,
            recommendations,
            activity_assessment: non_empty_or(raw.activity_assessment, UNKNOWN_ASSESSMENT),
            estimated_value: non_empty_or(raw.estimated_value, UNKNOWN_ASSESSMENT),
            tags: raw.tags.into_iter().map(|t| t.trim().to_lowercase()).filter(|t| !t.is_empty()).collect(),
            recommended_action: RecommendedAction::from_label(&raw.recommended_action),
            action_reasoning: non_empty_or(raw.action_reasoning, DEFAULT_ACTION_REASONING),
        }
    }
}

fn non_empty_or(value: String, default: &str) -> String {
    if value.trim().is_empty() {
        default.to_string()
    } else {
        value
    }
}
