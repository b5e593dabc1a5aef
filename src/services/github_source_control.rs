use std::time::Duration;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use crate::config::constants::{GITHUB_PAGE_SIZE, GITHUB_SERVICE, USER_AGENT};
use crate::errors::{OrganizerError, OrganizerResult};
use crate::services::rate_limiter::ApiRateLimiter;
use crate::structs::commit::Commit;
use crate::structs::config::github_config::GithubConfig;
use crate::structs::contributor::Contributor;
use crate::structs::repository::{LanguageShare, Repository};
use crate::traits::source_control_port::SourceControlPort;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Deserialize)]
struct GithubRepo {
    name: String,
    description: Option<String>,
    html_url: Option<String>,
    updated_at: Option<String>,
    #[serde(default)]
    archived: bool,
    #[serde(default)]
    private: bool,
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    forks_count: u64,
}

impl From<GithubRepo> for Repository {
    fn from(repo: GithubRepo) -> Self {
        Self {
            name: repo.name,
            description: repo.description,
            url: repo.html_url,
            updated_at: repo.updated_at,
            is_archived: repo.archived,
            is_private: repo.private,
            stars: repo.stargazers_count,
            forks: repo.forks_count,
            languages: None,
        }
    }
}

#[derive(Deserialize)]
struct GithubCommitAuthor {
    name: Option<String>,
    date: Option<String>,
}

#[derive(Deserialize)]
struct GithubCommitDetail {
    message: String,
    author: Option<GithubCommitAuthor>,
}

#[derive(Deserialize)]
struct GithubCommit {
    sha: String,
    commit: GithubCommitDetail,
}

#[derive(Deserialize)]
struct GithubContributor {
    login: Option<String>,
    name: Option<String>,
    #[serde(default)]
    contributions: u64,
}

/// `SourceControlPort` over the GitHub REST v3 API.
///
/// Callers take one `github` limiter permit per port call. Listing may need several
/// pages; with a limiter attached, every page after the first takes its own permit.
pub struct GitHubSourceControl {
    client: Client,
    api_url: String,
    owner: String,
    token: Option<String>,
    limiter: Option<ApiRateLimiter>,
}

impl GitHubSourceControl {
    pub fn new(config: &GithubConfig, owner: &str) -> OrganizerResult<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            owner: owner.to_string(),
            token: config.token.clone(),
            limiter: None,
        })
    }

    pub fn with_rate_limiter(mut self, limiter: ApiRateLimiter) -> Self {
        self.limiter = Some(limiter);
        self
    }

    /// `Ok(None)` for statuses that mean "nothing here" (204, 404, 409 on an empty repository).
    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> OrganizerResult<Option<T>> {
        let url = format!("{}{path}", self.api_url);
        log::debug!("GET {url}");

        let mut request = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json")
            .query(query);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        if matches!(status, StatusCode::NO_CONTENT | StatusCode::NOT_FOUND | StatusCode::CONFLICT) {
            return Ok(None);
        }
        if status.is_success() && status != StatusCode::ACCEPTED {
            return Ok(Some(response.json().await?));
        }

        let quota_exhausted = response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == "0");
        let body = response.text().await.unwrap_or_default();
        Err(Self::error_for_status(status.as_u16(), quota_exhausted, &format!("GET {path}: {body}")))
    }

    pub fn error_for_status(status: u16, quota_exhausted: bool, reason: &str) -> OrganizerError {
        match status {
            202 => OrganizerError::transient(GITHUB_SERVICE, "GitHub is computing statistics, retry later"),
            429 => OrganizerError::rate_limited(GITHUB_SERVICE, reason),
            403 if quota_exhausted => OrganizerError::rate_limited(GITHUB_SERVICE, reason),
            401 | 403 => OrganizerError::Authentication {
                service: GITHUB_SERVICE.to_string(),
                reason: reason.to_string(),
            },
            500..=599 => OrganizerError::transient(GITHUB_SERVICE, reason),
            _ => OrganizerError::Network {
                operation: "GitHub API request".to_string(),
                status_code: Some(status),
                reason: reason.to_string(),
            },
        }
    }

    /// Byte counts per language as percentages, largest first.
    pub fn to_percentages(bytes: Vec<(String, u64)>) -> OrganizerResult<Vec<LanguageShare>> {
        let total: u64 = bytes.iter().map(|(_, b)| b).sum();
        if total == 0 {
            return Ok(Vec::new());
        }

        let mut shares = bytes
            .into_iter()
            .map(|(language, b)| LanguageShare::new(&language, b as f64 * 100.0 / total as f64))
            .collect::<OrganizerResult<Vec<_>>>()?;
        shares.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));
        Ok(shares)
    }
}

#[async_trait]
impl SourceControlPort for GitHubSourceControl {
    async fn list_repositories(&self, owner: &str, limit: usize) -> OrganizerResult<Vec<Repository>> {
        let mut repositories = Vec::new();
        let mut page = 1usize;

        // GitHub offsets pages by (page - 1) * per_page, so per_page must stay fixed.
        while repositories.len() < limit {
            if page > 1 {
                if let Some(limiter) = &self.limiter {
                    limiter.wait(GITHUB_SERVICE).await?;
                }
            }

            let batch: Vec<GithubRepo> = self
                .get_json(
                    &format!("/users/{owner}/repos"),
                    &[
                        ("per_page", GITHUB_PAGE_SIZE.to_string()),
                        ("page", page.to_string()),
                        ("sort", "updated".to_string()),
                        ("type", "owner".to_string()),
                    ],
                )
                .await?
                .ok_or_else(|| OrganizerError::Network {
                    operation: format!("list repositories of {owner}"),
                    status_code: Some(404),
                    reason: format!("GitHub user '{owner}' not found"),
                })?;

            let exhausted = batch.len() < GITHUB_PAGE_SIZE;
            repositories.extend(batch.into_iter().map(Repository::from));
            if exhausted {
                break;
            }
            page += 1;
        }

        repositories.truncate(limit);
        Ok(repositories)
    }

    async fn fetch_languages(&self, repository: &Repository) -> OrganizerResult<Vec<LanguageShare>> {
        let bytes: Option<serde_json::Map<String, serde_json::Value>> = self
            .get_json(&format!("/repos/{}/{}/languages", self.owner, repository.name), &[])
            .await?;

        let bytes = bytes
            .unwrap_or_default()
            .into_iter()
            .map(|(language, count)| (language, count.as_u64().unwrap_or(0)))
            .collect();
        Self::to_percentages(bytes)
    }

    async fn recent_commits(&self, repository: &Repository, limit: usize) -> OrganizerResult<Vec<Commit>> {
        let commits: Option<Vec<GithubCommit>> = self
            .get_json(
                &format!("/repos/{}/{}/commits", self.owner, repository.name),
                &[("per_page", limit.clamp(1, GITHUB_PAGE_SIZE).to_string())],
            )
            .await?;

        Ok(commits
            .unwrap_or_default()
            .into_iter()
            .take(limit)
            .map(|c| {
                let (author, date) = c
                    .commit
                    .author
                    .map(|a| (a.name.unwrap_or_default(), a.date.unwrap_or_default()))
                    .unwrap_or_default();
                Commit {
                    hash: c.sha,
                    message: c.commit.message,
                    author,
                    date,
                }
            })
            .collect())
    }

    async fn contributors(&self, repository: &Repository) -> OrganizerResult<Vec<Contributor>> {
        let contributors: Option<Vec<GithubContributor>> = self
            .get_json(
                &format!("/repos/{}/{}/contributors", self.owner, repository.name),
                &[("per_page", GITHUB_PAGE_SIZE.to_string())],
            )
            .await?;

        Ok(contributors
            .unwrap_or_default()
            .into_iter()
            .map(|c| Contributor {
                name: c.login.or(c.name).unwrap_or_else(|| "anonymous".to_string()),
                commits: c.contributions,
            })
            .collect())
    }
}
