use crate::gitea::{
    AssigneeFilter, CommitEntry, CommitFilter, HostingError, HostingQuery, Issue, IssueFilter,
    IssueState, Member, Milestone, StatusError,
};
use crate::model::{Credential, GiteaRepository, Repository};
use crate::utils::date::parse_platform_timestamp;
use chrono::{DateTime, Utc};
use gitea_sdk::api::repos::commits::GetCommitsBuilder;
use gitea_sdk::{Auth, Client};
use itertools::Itertools;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::future::Future;
use tracing::debug;

pub type GiteaIssue = gitea_sdk::model::issues::Issue;
pub type GiteaCommit = gitea_sdk::model::repos::Commit;
pub type GiteaUser = gitea_sdk::model::user::User;
type ApiResult<T> = gitea_sdk::error::Result<T>;

const PAGE_SIZE: i64 = 50;

// Endpoints gitea-sdk has no builder for are read into these.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GiteaMilestone {
    id: i64,
    title: String,
    open_issues: i64,
    closed_issues: i64,
    due_on: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GiteaCommitStatus {
    created_at: String,
}

pub struct GiteaHosting {
    client: Client,
    url: String,
}

impl GiteaHosting {
    pub fn new(url: impl ToString, credential: &Credential) -> Self {
        let url = url.to_string();
        let auth = Auth::Basic(credential.user.as_str(), credential.secret.as_str());
        Self {
            client: Client::new(&url, auth),
            url,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn commits_page(&self, repo: &Repository, page: i64) -> GetCommitsBuilder {
        self.client
            .repos(&repo.owner, &repo.name)
            .get_commits()
            .stat(false)
            .verification(false)
            .files(false)
            .limit(PAGE_SIZE)
            .page(page)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: String,
        query: Vec<(&'static str, String)>,
    ) -> ApiResult<T> {
        debug!(%path, "GET");
        let req = self.client.get(path).query(&query).build()?;
        let res = self.client.make_request(req).await?;
        self.client.parse_response(res).await
    }
}

impl HostingQuery for GiteaHosting {
    async fn current_login(&self) -> Result<String, HostingError> {
        let user = self.client.user().current().send(&self.client).await?;
        Ok(user.login)
    }

    async fn list_repositories(&self) -> Result<Vec<Repository>, HostingError> {
        let client = &self.client;
        let repos = paginate(None, |_: &GiteaRepository| true, |page| {
            let request = client.user().list_repos().limit(PAGE_SIZE).page(page);
            async move { request.send(client).await }
        })
        .await?;
        Ok(repos.into_iter().map(Repository::from).collect())
    }

    async fn list_assignees(&self, repo: &Repository) -> Result<Vec<Member>, HostingError> {
        let path = format!("repos/{}/{}/assignees", repo.owner, repo.name);
        let users: Vec<GiteaUser> = self.get_json(path, vec![]).await?;
        Ok(users
            .into_iter()
            .map(|user| Member::new(user.login, user.full_name))
            .collect())
    }

    async fn list_issues(
        &self,
        repo: &Repository,
        filter: &IssueFilter,
    ) -> Result<Vec<Issue>, HostingError> {
        let path = issues_path(repo);
        let keep = |issue: &GiteaIssue| keeps_issue(filter, issue);
        let found = paginate(filter.limit, keep, |page| {
            self.get_json::<Vec<GiteaIssue>>(path.clone(), issue_query(filter, page))
        })
        .await?;
        found.into_iter().map(convert_issue).collect()
    }

    async fn list_milestones(&self, repo: &Repository) -> Result<Vec<Milestone>, HostingError> {
        let path = format!("repos/{}/{}/milestones", repo.owner, repo.name);
        let found: Vec<GiteaMilestone> = paginate(None, |_: &GiteaMilestone| true, |page| {
            self.get_json::<Vec<GiteaMilestone>>(path.clone(), milestone_query(page))
        })
        .await?;
        let milestones = found
            .into_iter()
            .map(convert_milestone)
            .collect::<Result<Vec<_>, _>>()?;
        // Earliest due date first, undated milestones last.
        Ok(milestones
            .into_iter()
            .sorted_by_key(|milestone| (milestone.due_on.is_none(), milestone.due_on))
            .collect())
    }

    async fn list_commits(
        &self,
        repo: &Repository,
        filter: &CommitFilter,
    ) -> Result<Vec<CommitEntry>, HostingError> {
        let client = &self.client;
        let keep = |commit: &GiteaCommit| {
            filter.accepts(commit.author.as_ref().map(|author| author.login.as_str()))
        };
        let found = paginate(filter.limit, keep, |page| {
            let request = self.commits_page(repo, page);
            async move { request.send(client).await }
        })
        .await?;
        found.into_iter().map(convert_commit).collect()
    }

    async fn commit_status_time(
        &self,
        repo: &Repository,
        sha: &str,
    ) -> Result<DateTime<Utc>, StatusError> {
        let path = format!("repos/{}/{}/commits/{}/statuses", repo.owner, repo.name, sha);
        let statuses: Vec<GiteaCommitStatus> = self
            .get_json(path, vec![("limit", "1".to_string())])
            .await
            .map_err(|err| StatusError::Request(err.to_string()))?;
        let status = statuses.into_iter().next().ok_or(StatusError::Missing)?;
        Ok(parse_platform_timestamp(&status.created_at)?)
    }
}

/// Walks pages until an empty one, keeping items that pass `keep`, up to `limit` of them.
async fn paginate<T, F, Fut>(
    limit: Option<usize>,
    keep: impl Fn(&T) -> bool,
    mut fetch: F,
) -> ApiResult<Vec<T>>
where
    F: FnMut(i64) -> Fut,
    Fut: Future<Output = ApiResult<Vec<T>>>,
{
    let mut items = Vec::new();
    let mut page = 1;
    loop {
        let batch = fetch(page).await?;
        if batch.is_empty() {
            break;
        }
        items.extend(batch.into_iter().filter(|item| keep(item)));
        if limit.is_some_and(|limit| items.len() >= limit) {
            break;
        }
        page += 1;
    }
    if let Some(limit) = limit {
        items.truncate(limit);
    }
    Ok(items)
}

fn issues_path(repo: &Repository) -> String {
    format!("repos/{}/{}/issues", repo.owner, repo.name)
}

fn issue_query(filter: &IssueFilter, page: i64) -> Vec<(&'static str, String)> {
    let state = match filter.state {
        IssueState::Open => "open",
        IssueState::Closed => "closed",
        IssueState::All => "all",
    };
    let mut query = vec![("type", "issues".to_string()), ("state", state.to_string())];
    // Gitea reads the plural key; `milestone` is silently ignored.
    if let Some(milestone) = &filter.milestone {
        query.push(("milestones", milestone.clone()));
    }
    if let AssigneeFilter::Login(login) = &filter.assignee {
        query.push(("assigned_by", login.clone()));
    }
    if let Some(creator) = &filter.creator {
        query.push(("created_by", creator.clone()));
    }
    query.push(("limit", PAGE_SIZE.to_string()));
    query.push(("page", page.to_string()));
    query
}

fn milestone_query(page: i64) -> Vec<(&'static str, String)> {
    vec![
        ("state", "open".to_string()),
        ("limit", PAGE_SIZE.to_string()),
        ("page", page.to_string()),
    ]
}

/// The API has no "nobody assigned" filter, so it is applied here.
fn keeps_issue(filter: &IssueFilter, issue: &GiteaIssue) -> bool {
    match filter.assignee {
        AssigneeFilter::Unassigned => assignee_logins(issue).is_empty(),
        _ => true,
    }
}

fn timestamp(raw: &str, item: &str) -> Result<DateTime<Utc>, HostingError> {
    parse_platform_timestamp(raw).map_err(|source| HostingError::Timestamp {
        item: item.to_string(),
        source,
    })
}

fn optional_timestamp(raw: Option<&str>, item: &str) -> Result<Option<DateTime<Utc>>, HostingError> {
    raw.filter(|raw| !raw.is_empty())
        .map(|raw| timestamp(raw, item))
        .transpose()
}

fn assignee_logins(issue: &GiteaIssue) -> Vec<String> {
    let mut logins = issue
        .assignees
        .iter()
        .flatten()
        .map(|user| user.login.clone())
        .collect::<Vec<_>>();
    if let Some(assignee) = &issue.assignee {
        if !logins.contains(&assignee.login) {
            logins.push(assignee.login.clone());
        }
    }
    logins
}

fn convert_issue(issue: GiteaIssue) -> Result<Issue, HostingError> {
    let item = format!("issue #{}", issue.number);
    let created_at = timestamp(&issue.created_at, &item)?;
    let closed_at = optional_timestamp(issue.closed_at.as_deref(), &item)?;
    let assignees = assignee_logins(&issue);
    Ok(Issue {
        number: issue.number,
        title: issue.title,
        author: issue.user.login,
        assignees,
        labels: issue.labels.into_iter().map(|label| label.name).collect(),
        created_at,
        closed_at,
    })
}

fn convert_milestone(milestone: GiteaMilestone) -> Result<Milestone, HostingError> {
    let item = format!("milestone `{}`", milestone.title);
    let due_on = optional_timestamp(milestone.due_on.as_deref(), &item)?;
    Ok(Milestone {
        id: milestone.id,
        title: milestone.title,
        open_issues: milestone.open_issues,
        closed_issues: milestone.closed_issues,
        due_on,
    })
}

fn convert_commit(commit: GiteaCommit) -> Result<CommitEntry, HostingError> {
    let item = format!("commit {}", commit.sha);
    let raw_date = if commit.commit.author.date.is_empty() {
        &commit.commit.committer.date
    } else {
        &commit.commit.author.date
    };
    let date = timestamp(raw_date, &item)?;
    Ok(CommitEntry {
        sha: commit.sha,
        author_login: commit.author.map(|author| author.login),
        author_name: commit.commit.author.name,
        message: commit.commit.message,
        date,
    })
}
