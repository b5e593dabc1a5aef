use serde_json::Value;
use crate::helpers::analysis_record_builder::AnalysisRecord;

pub const REPOSITORY_ANALYSIS_SYSTEM_PROMPT: &str = r#"
You are an assistant that reviews GitHub repositories and decides what their owner should do with each one.

Evaluate the repository you are given and produce:
1. A brief summary of the repository's purpose and function.
2. Key strengths.
3. Areas for improvement (weaknesses).
4. Specific recommendations, each with a reason and a priority of High, Medium or Low.
5. An assessment of the repository's activity level (High, Medium, Low or Inactive).
6. The estimated value or importance of the repository (High, Medium or Low).
7. Suggested tags or categories.
8. A recommended action, one of DELETE, ARCHIVE, EXTRACT, KEEP or PIN, with reasoning.

OUTPUT FORMAT REQUIREMENTS:
- Your output MUST be a single JSON object and nothing else.
- Do NOT wrap the object in markdown.
- Every field below MUST be present at the top level.

{
  "repo_name": "<repository name>",
  "summary": "<one paragraph>",
  "strengths": ["<strength>"],
  "weaknesses": ["<weakness>"],
  "recommendations": [
    {"recommendation": "<what to do>", "reason": "<why>", "priority": "High|Medium|Low"}
  ],
  "activity_assessment": "<High|Medium|Low|Inactive> - <short justification>",
  "estimated_value": "<High|Medium|Low>",
  "tags": ["<tag>"],
  "recommended_action": "DELETE|ARCHIVE|EXTRACT|KEEP|PIN",
  "action_reasoning": "<why this action>"
}
"#;

fn field(record: &AnalysisRecord, key: &str) -> String {
    match record.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => "Unknown".to_string(),
        Some(other) => other.to_string(),
    }
}

pub fn repository_analysis_prompt(record: &AnalysisRecord) -> String {
    format!(
        "Repository Information:\n\
         - Name: {}\n\
         - Description: {}\n\
         - URL: {}\n\
         - Last Updated: {}\n\
         - Archived on GitHub: {}\n\
         - Stars: {}\n\
         - Forks: {}\n\
         - Programming Languages: {}\n\
         \n\
         Activity Information:\n\
         - Recent Commits ({}):\n{}\n\
         - Contributors: {}\n",
        field(record, "repo_name"),
        field(record, "repo_desc"),
        field(record, "repo_url"),
        field(record, "updated_at"),
        field(record, "is_archived"),
        field(record, "stars"),
        field(record, "forks"),
        field(record, "languages"),
        field(record, "recent_commits_count"),
        field(record, "recent_commits"),
        field(record, "contributor_summary"),
    )
}
