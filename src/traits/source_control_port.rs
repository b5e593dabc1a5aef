use async_trait::async_trait;
use crate::errors::OrganizerResult;
use crate::structs::commit::Commit;
use crate::structs::contributor::Contributor;
use crate::structs::repository::{LanguageShare, Repository};

/// Read-only access to the repositories of one owner.
///
/// The auxiliary lookups (`fetch_languages`, `recent_commits`, `contributors`) may fail
/// independently; callers treat their errors as "no data" rather than aborting.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SourceControlPort: Send + Sync {
    async fn list_repositories(&self, owner: &str, limit: usize) -> OrganizerResult<Vec<Repository>>;

    async fn fetch_languages(&self, repository: &Repository) -> OrganizerResult<Vec<LanguageShare>>;

    async fn recent_commits(&self, repository: &Repository, limit: usize) -> OrganizerResult<Vec<Commit>>;

    async fn contributors(&self, repository: &Repository) -> OrganizerResult<Vec<Contributor>>;
}
