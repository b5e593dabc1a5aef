use std::path::{Path, PathBuf};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::fs;
use crate::config::constants::{REPORT_EXTENSION, SUMMARY_REPORT_FILE};
use crate::enums::value_level::ValueLevel;
use crate::errors::{OrganizerError, OrganizerResult};
use crate::services::action_recommendation_engine::ActionRecommendationEngine;
use crate::structs::recommended_analysis::RecommendedAnalysis;
use crate::structs::repository::Repository;
use crate::traits::report_store::ReportStore;

/// Writes one markdown file per repository plus a summary, all under `output_dir`.
pub struct MarkdownReportStore {
    output_dir: PathBuf,
}

impl MarkdownReportStore {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn report_path(&self, repo_name: &str) -> PathBuf {
        let file_name: String = repo_name
            .chars()
            .map(|c| if matches!(c, '/' | '\\' | ':') { '_' } else { c })
            .collect();
        self.output_dir.join(format!("{file_name}.{REPORT_EXTENSION}"))
    }

    async fn write_file(&self, path: &Path, content: &str) -> OrganizerResult<()> {
        fs::create_dir_all(&self.output_dir).await.map_err(|e| {
            OrganizerError::io_error(&format!("create {}", self.output_dir.display()), &e.to_string())
        })?;
        fs::write(path, content)
            .await
            .map_err(|e| OrganizerError::io_error(&format!("write {}", path.display()), &e.to_string()))
    }

    pub fn render_report(repository: &Repository, report: &RecommendedAnalysis) -> String {
        let analysis = &report.analysis;
        let mut out = String::new();

        out.push_str(&format!("# {}\n\n", repository.name));

        out.push_str("## Basic Information\n\n");
        let url = repository.url.as_deref().unwrap_or_default();
        out.push_str(&format!("- **URL**: [{url}]({url})\n"));
        out.push_str(&format!(
            "- **Description**: {}\n",
            repository.description.as_deref().unwrap_or("No description")
        ));
        let updated = repository
            .updated_at
            .as_deref()
            .and_then(|u| u.split('T').next())
            .unwrap_or("Unknown");
        out.push_str(&format!("- **Last Updated**: {updated}\n"));
        out.push_str(&format!("- **Archived**: {}\n", repository.is_archived));
        out.push_str(&format!("- **Stars**: {}\n", repository.stars));
        out.push_str(&format!("- **Forks**: {}\n", repository.forks));
        if let Some(languages) = repository.languages.as_ref().filter(|l| !l.is_empty()) {
            let listed: Vec<String> = languages
                .iter()
                .map(|l| format!("{} ({:.1}%)", l.language, l.percentage))
                .collect();
            out.push_str(&format!("- **Languages**: {}\n", listed.join(", ")));
        }
        out.push('\n');

        out.push_str("## Analysis Summary\n\n");
        out.push_str(&format!("{}\n\n", analysis.summary));

        out.push_str("### Strengths\n\n");
        for strength in &analysis.strengths {
            out.push_str(&format!("- {strength}\n"));
        }
        out.push('\n');

        out.push_str("### Areas for Improvement\n\n");
        for weakness in &analysis.weaknesses {
            out.push_str(&format!("- {weakness}\n"));
        }
        out.push('\n');

        out.push_str("### Recommendations\n\n");
        for recommendation in &analysis.recommendations {
            out.push_str(&format!(
                "- **{}** ({} Priority)  \n  *Reason: {}*\n",
                recommendation.text, recommendation.priority, recommendation.reason
            ));
        }
        out.push('\n');

        out.push_str("### Assessment\n\n");
        out.push_str(&format!("- **Activity Level**: {}\n", analysis.activity_assessment));
        out.push_str(&format!("- **Estimated Value**: {}\n", analysis.estimated_value));
        let tags: Vec<&str> = analysis.tags.iter().map(String::as_str).collect();
        out.push_str(&format!("- **Tags**: {}\n\n", tags.join(", ")));

        out.push_str("## Recommended Action\n\n");
        out.push_str(&format!("**{}**: {}\n", report.recommended_action, report.reasoning));

        out
    }

    pub fn render_summary(reports: &[RecommendedAnalysis], generated_at: DateTime<Utc>) -> String {
        let reports: Vec<RecommendedAnalysis> = reports.iter().filter(|r| !r.analysis.is_error()).cloned().collect();
        let mut out = String::new();

        out.push_str("# GitHub Repositories Summary Report\n\n");
        out.push_str(&format!("Generated on: {}\n\n", generated_at.format("%Y-%m-%d")));

        let groups = [
            (ValueLevel::High, "High-Value Repositories", "No high-value repositories found."),
            (ValueLevel::Medium, "Medium-Value Repositories", "No medium-value repositories found."),
            (ValueLevel::Low, "Low-Value Repositories", "No low-value repositories found."),
        ];
        let mut counts = Vec::new();

        for (level, heading, empty) in groups {
            let members: Vec<&RecommendedAnalysis> =
                reports.iter().filter(|r| r.analysis.value_level() == level).collect();
            counts.push((level, members.len()));

            out.push_str(&format!("## {heading}\n\n"));
            if members.is_empty() {
                out.push_str(&format!("{empty}\n\n"));
            }
            for report in members {
                let name = report.repository();
                let tags: Vec<&str> = report.analysis.tags.iter().map(String::as_str).collect();
                out.push_str(&format!("### [{name}]({name}.{REPORT_EXTENSION})\n\n"));
                out.push_str(&format!("{}\n\n", report.analysis.summary));
                out.push_str(&format!("**Action**: {}  \n", report.recommended_action));
                out.push_str(&format!("**Tags**: {}\n\n", tags.join(", ")));
            }
        }

        out.push_str("## Recommended Actions\n\n");
        for (action, members) in ActionRecommendationEngine::categorize(&reports) {
            out.push_str(&format!("- {action}: {}\n", members.len()));
        }
        out.push('\n');

        out.push_str("## Repository Statistics\n\n");
        out.push_str(&format!("- Total repositories analyzed: {}\n", reports.len()));
        for (level, count) in counts {
            out.push_str(&format!("- {}-value repositories: {count}\n", capitalize(level.as_str())));
        }

        out
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
        .unwrap_or_default()
}

#[async_trait]
impl ReportStore for MarkdownReportStore {
    async fn last_modified(&self, repo_name: &str) -> OrganizerResult<Option<DateTime<Utc>>> {
        match fs::metadata(self.report_path(repo_name)).await {
            Ok(metadata) => Ok(Some(DateTime::<Utc>::from(metadata.modified()?))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_report(&self, repository: &Repository, report: &RecommendedAnalysis) -> OrganizerResult<()> {
        let path = self.report_path(&repository.name);
        log::debug!("💾 Saving report for {} to {}", repository.name, path.display());
        self.write_file(&path, &Self::render_report(repository, report)).await
    }

    async fn write_summary(&self, reports: &[RecommendedAnalysis]) -> OrganizerResult<()> {
        let path = self.output_dir.join(SUMMARY_REPORT_FILE);
        log::info!("📝 Generating summary report at {}", path.display());
        self.write_file(&path, &Self::render_summary(reports, Utc::now())).await
    }
}
