use crate::gitea::{
    AssigneeFilter, CommitEntry, CommitFilter, HostingError, HostingQuery, Issue, IssueFilter,
    IssueState, Member, Milestone, StatusError,
};
use crate::model::Repository;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::{HashMap, HashSet};

/// In-memory platform for report and aggregation tests.
#[derive(Default)]
pub struct FakeHosting {
    pub login: String,
    pub repos: Vec<Repository>,
    pub team: Vec<Member>,
    pub milestones: Vec<Milestone>,
    pub issues: HashMap<String, Vec<Issue>>,
    pub commits: HashMap<String, Vec<CommitEntry>>,
    pub statuses: HashMap<String, DateTime<Utc>>,
    pub broken_repos: HashSet<String>,
}

pub fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

pub fn issue(number: i64, title: &str, author: &str, assignees: &[&str], created: DateTime<Utc>) -> Issue {
    Issue {
        number,
        title: title.to_string(),
        author: author.to_string(),
        assignees: assignees.iter().map(|login| login.to_string()).collect(),
        labels: vec![],
        created_at: created,
        closed_at: None,
    }
}

pub fn commit(sha: &str, author: Option<&str>, message: &str, date: DateTime<Utc>) -> CommitEntry {
    CommitEntry {
        sha: sha.to_string(),
        author_login: author.map(str::to_string),
        author_name: author.unwrap_or("ghost").to_string(),
        message: message.to_string(),
        date,
    }
}

impl FakeHosting {
    fn check(&self, repo: &Repository) -> Result<(), HostingError> {
        if self.broken_repos.contains(&repo.full_name) {
            return Err(HostingError::UnknownRepository(repo.full_name.clone()));
        }
        Ok(())
    }
}

impl HostingQuery for FakeHosting {
    async fn current_login(&self) -> Result<String, HostingError> {
        Ok(self.login.clone())
    }

    async fn list_repositories(&self) -> Result<Vec<Repository>, HostingError> {
        Ok(self.repos.clone())
    }

    async fn list_assignees(&self, repo: &Repository) -> Result<Vec<Member>, HostingError> {
        self.check(repo)?;
        Ok(self.team.clone())
    }

    async fn list_issues(
        &self,
        repo: &Repository,
        filter: &IssueFilter,
    ) -> Result<Vec<Issue>, HostingError> {
        self.check(repo)?;
        let found = self
            .issues
            .get(&repo.full_name)
            .into_iter()
            .flatten()
            .filter(|issue| match filter.state {
                IssueState::Open => issue.closed_at.is_none(),
                IssueState::Closed => issue.closed_at.is_some(),
                IssueState::All => true,
            })
            .filter(|issue| match &filter.assignee {
                AssigneeFilter::Any => true,
                AssigneeFilter::Unassigned => issue.assignees.is_empty(),
                AssigneeFilter::Login(login) => issue.is_assigned_to(login),
            })
            .filter(|issue| {
                filter
                    .creator
                    .as_ref()
                    .map_or(true, |creator| issue.author.eq_ignore_ascii_case(creator))
            })
            .take(filter.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect();
        Ok(found)
    }

    async fn list_milestones(&self, repo: &Repository) -> Result<Vec<Milestone>, HostingError> {
        self.check(repo)?;
        Ok(self.milestones.clone())
    }

    async fn list_commits(
        &self,
        repo: &Repository,
        filter: &CommitFilter,
    ) -> Result<Vec<CommitEntry>, HostingError> {
        self.check(repo)?;
        let found = self
            .commits
            .get(&repo.full_name)
            .into_iter()
            .flatten()
            .filter(|commit| filter.accepts(commit.author_login.as_deref()))
            .take(filter.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect();
        Ok(found)
    }

    async fn commit_status_time(
        &self,
        _repo: &Repository,
        sha: &str,
    ) -> Result<DateTime<Utc>, StatusError> {
        self.statuses.get(sha).copied().ok_or(StatusError::Missing)
    }
}
