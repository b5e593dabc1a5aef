use serde_json::{json, Map, Value};
use crate::structs::commit::Commit;
use crate::structs::contributor::Contributor;
use crate::structs::repository::Repository;

/// Flat key/value input handed to an `AnalyzerPort`.
pub type AnalysisRecord = Map<String, Value>;

pub const UNKNOWN_REPOSITORY: &str = "Unknown Repository";
pub const NO_DESCRIPTION: &str = "No description available";
pub const NO_URL: &str = "No URL available";
pub const UNKNOWN_UPDATE: &str = "Unknown";
pub const NO_LANGUAGES: &str = "No language information available";
pub const NO_ACTIVITY: &str = "No activity data available";
pub const NO_CONTRIBUTORS: &str = "No contributor data available";

const MAX_LISTED_CONTRIBUTORS: usize = 5;

/// Builds the analyzer's input record, filling every absent field with a default so the
/// analyzer never sees a partial record.
#[derive(Debug, Default)]
pub struct AnalysisRecordBuilder<'a> {
    repository: Option<&'a Repository>,
    commits: &'a [Commit],
    contributors: &'a [Contributor],
}

impl<'a> AnalysisRecordBuilder<'a> {
    pub fn new(repository: &'a Repository) -> Self {
        Self {
            repository: Some(repository),
            commits: &[],
            contributors: &[],
        }
    }

    pub fn commits(mut self, commits: &'a [Commit]) -> Self {
        self.commits = commits;
        self
    }

    pub fn contributors(mut self, contributors: &'a [Contributor]) -> Self {
        self.contributors = contributors;
        self
    }

    pub fn build(&self) -> AnalysisRecord {
        let repo = self.repository;

        let name = repo
            .map(|r| r.name.trim())
            .filter(|n| !n.is_empty())
            .unwrap_or(UNKNOWN_REPOSITORY);
        let description = repo
            .and_then(|r| r.description.as_deref())
            .filter(|d| !d.trim().is_empty())
            .unwrap_or(NO_DESCRIPTION);
        let url = repo.and_then(|r| r.url.as_deref()).unwrap_or(NO_URL);
        let updated_at = repo
            .and_then(|r| r.updated_at.as_deref())
            .map(|u| u.split('T').next().unwrap_or(u))
            .filter(|u| !u.is_empty())
            .unwrap_or(UNKNOWN_UPDATE);

        let mut record = Map::new();
        record.insert("repo_name".into(), json!(name));
        record.insert("repo_desc".into(), json!(description));
        record.insert("repo_url".into(), json!(url));
        record.insert("updated_at".into(), json!(updated_at));
        record.insert("is_archived".into(), json!(repo.is_some_and(|r| r.is_archived)));
        record.insert("stars".into(), json!(repo.map_or(0, |r| r.stars)));
        record.insert("forks".into(), json!(repo.map_or(0, |r| r.forks)));
        record.insert("languages".into(), json!(self.languages_text()));
        record.insert("recent_commits".into(), json!(self.commits_text()));
        record.insert("recent_commits_count".into(), json!(self.commits.len()));
        record.insert("contributor_summary".into(), json!(self.contributors_text()));
        record
    }

    fn languages_text(&self) -> String {
        match self.repository.and_then(|r| r.languages.as_ref()) {
            Some(languages) if !languages.is_empty() => languages
                .iter()
                .map(|l| format!("{}: {:.1}%", l.language, l.percentage))
                .collect::<Vec<_>>()
                .join(", "),
            _ => NO_LANGUAGES.to_string(),
        }
    }

    fn commits_text(&self) -> String {
        if self.commits.is_empty() {
            return NO_ACTIVITY.to_string();
        }

        self.commits
            .iter()
            .map(|c| {
                let first_line = c.message.lines().next().unwrap_or_default();
                let date = c.date.split('T').next().unwrap_or(&c.date);
                format!("- {date} {first_line} ({})", c.author)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn contributors_text(&self) -> String {
        if self.contributors.is_empty() {
            return NO_CONTRIBUTORS.to_string();
        }

        let listed = self
            .contributors
            .iter()
            .take(MAX_LISTED_CONTRIBUTORS)
            .map(|c| format!("{} ({} commits)", c.name, c.commits))
            .collect::<Vec<_>>()
            .join(", ");

        let remaining = self.contributors.len().saturating_sub(MAX_LISTED_CONTRIBUTORS);
        if remaining > 0 {
            format!("{} contributors: {listed} and {remaining} more", self.contributors.len())
        } else {
            format!("{} contributors: {listed}", self.contributors.len())
        }
    }
}
