#[cfg(test)]
pub mod fake;
mod hosting;
mod session;
pub mod types;

use crate::model::Repository;
use crate::utils::DateError;
use chrono::{DateTime, Utc};
use gitea_sdk::error::TeatimeError;
use thiserror::Error;

pub use hosting::GiteaHosting;
pub use session::Session;
pub use types::{
    find_member, AssigneeFilter, CommitEntry, CommitFilter, Issue, IssueFilter, IssueState,
    Member, Milestone,
};

#[derive(Debug, Error)]
pub enum HostingError {
    #[error(transparent)]
    Api(#[from] TeatimeError),
    #[error("unreadable timestamp on {item}: {source}")]
    Timestamp {
        item: String,
        #[source]
        source: DateError,
    },
    #[error("repository `{0}` is not accessible to this account")]
    UnknownRepository(String),
}

/// Why a commit has no status timestamp to show.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StatusError {
    #[error("status request failed: {0}")]
    Request(String),
    #[error("commit has no status")]
    Missing,
    #[error(transparent)]
    Timestamp(#[from] DateError),
}

/// Queries a report needs from the hosting platform for one authenticated account.
pub trait HostingQuery {
    async fn current_login(&self) -> Result<String, HostingError>;

    async fn list_repositories(&self) -> Result<Vec<Repository>, HostingError>;

    async fn list_assignees(&self, repo: &Repository) -> Result<Vec<Member>, HostingError>;

    async fn list_issues(
        &self,
        repo: &Repository,
        filter: &IssueFilter,
    ) -> Result<Vec<Issue>, HostingError>;

    async fn list_milestones(&self, repo: &Repository) -> Result<Vec<Milestone>, HostingError>;

    async fn list_commits(
        &self,
        repo: &Repository,
        filter: &CommitFilter,
    ) -> Result<Vec<CommitEntry>, HostingError>;

    async fn commit_status_time(
        &self,
        repo: &Repository,
        sha: &str,
    ) -> Result<DateTime<Utc>, StatusError>;

    async fn find_repository(&self, name: &str) -> Result<Repository, HostingError> {
        self.list_repositories()
            .await?
            .into_iter()
            .find(|repo| repo.name == name || repo.full_name == name)
            .ok_or_else(|| HostingError::UnknownRepository(name.to_string()))
    }
}
