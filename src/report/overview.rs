use crate::gitea::{
    find_member, AssigneeFilter, CommitEntry, CommitFilter, HostingQuery, Issue, IssueFilter,
    IssueState, Member, Milestone, StatusError,
};
use crate::model::{Repository, Result};
use crate::utils::date::to_display_time;
use crate::utils::DateConfig;
use chrono::{DateTime, Utc};
use itertools::Itertools;
use std::io::Write;
use tracing::{debug, warn};

pub const CLOSED_ISSUES_SCANNED: usize = 50;
pub const MEMBER_COMMITS: usize = 15;
pub const TEAM_COMMITS: usize = 30;

const SEPARATOR: &str = "==========================";

/// What the overview is about: a member picked by name prefix, or the whole team.
#[derive(Debug, Clone, Default)]
pub struct OverviewRequest {
    pub user: Option<String>,
    pub milestone: usize,
}

pub struct Overview<'a, H: HostingQuery> {
    hosting: &'a H,
    repo: &'a Repository,
    config: &'a DateConfig,
}

impl<'a, H: HostingQuery> Overview<'a, H> {
    pub fn new(hosting: &'a H, repo: &'a Repository, config: &'a DateConfig) -> Self {
        Self {
            hosting,
            repo,
            config,
        }
    }

    pub async fn write(&self, request: &OverviewRequest, out: &mut impl Write) -> Result<()> {
        let milestones = self.hosting.list_milestones(self.repo).await?;
        let milestone = select_milestone(&milestones, request.milestone);
        for line in milestones.iter().map(|m| format_milestone(m, self.config)) {
            writeln!(out, "{line}")?;
        }

        let team = self.hosting.list_assignees(self.repo).await?;
        let member = request.user.as_deref().and_then(|prefix| {
            let found = find_member(&team, prefix);
            if found.is_none() {
                warn!("no team member matches `{prefix}`, showing the whole team");
            }
            found.map(|member| (prefix, member))
        });

        match member {
            Some((prefix, member)) => self.member(prefix, member, milestone, out).await,
            None => self.team(&team, milestone, out).await,
        }
    }

    async fn member(
        &self,
        prefix: &str,
        member: &Member,
        milestone: Option<&Milestone>,
        out: &mut impl Write,
    ) -> Result<()> {
        writeln!(
            out,
            "\n{prefix} -> {}, {} @ {}",
            member.login,
            member.name,
            self.milestone_heading(milestone)
        )?;
        let assignee = AssigneeFilter::Login(member.login.clone());
        self.open_issues(milestone, assignee, out).await?;
        self.closed_issues(member, out).await?;
        self.recent_commits(CommitFilter::by_author(&member.login).limit(MEMBER_COMMITS), out)
            .await
    }

    async fn team(
        &self,
        team: &[Member],
        milestone: Option<&Milestone>,
        out: &mut impl Write,
    ) -> Result<()> {
        writeln!(out, "\nTeam members are:\n")?;
        for member in team {
            writeln!(out, "     {:<18} {:<18}", member.login, member.name)?;
        }

        writeln!(
            out,
            "\n{SEPARATOR}\nUnassigned @ {}",
            self.milestone_heading(milestone)
        )?;
        self.open_issues(milestone, AssigneeFilter::Unassigned, out)
            .await?;

        for member in team {
            writeln!(out, "\n{SEPARATOR}\n>>>>>> {}, {}", member.login, member.name)?;
            let assignee = AssigneeFilter::Login(member.login.clone());
            self.open_issues(milestone, assignee, out).await?;
        }

        self.recent_commits(CommitFilter::latest(TEAM_COMMITS), out)
            .await
    }

    async fn open_issues(
        &self,
        milestone: Option<&Milestone>,
        assignee: AssigneeFilter,
        out: &mut impl Write,
    ) -> Result<()> {
        let mut filter = IssueFilter::with_state(IssueState::Open).assignee(assignee);
        if let Some(milestone) = milestone {
            filter = filter.milestone(milestone.id);
        }
        let issues = self.hosting.list_issues(self.repo, &filter).await?;
        if issues.is_empty() {
            writeln!(out, "\n## No Open Issues.")?;
            return Ok(());
        }
        writeln!(out, "\n## Open Issues: {}", issues.len())?;
        for issue in &issues {
            writeln!(out, "{}", format_issue(issue, self.config))?;
        }
        Ok(())
    }

    async fn closed_issues(&self, member: &Member, out: &mut impl Write) -> Result<()> {
        writeln!(out, "\n## Recently Closed Issues:")?;
        let filter = IssueFilter::with_state(IssueState::Closed).limit(CLOSED_ISSUES_SCANNED);
        let issues = self.hosting.list_issues(self.repo, &filter).await?;
        for issue in issues.iter().filter(|issue| issue.is_assigned_to(&member.login)) {
            writeln!(out, "{}", format_issue(issue, self.config))?;
        }
        Ok(())
    }

    async fn recent_commits(&self, filter: CommitFilter, out: &mut impl Write) -> Result<()> {
        writeln!(out, "\n## Recent commits:")?;
        let commits = self.hosting.list_commits(self.repo, &filter).await?;
        for commit in &commits {
            let status = self.hosting.commit_status_time(self.repo, &commit.sha).await;
            if let Err(err) = &status {
                warn!("commit {}: {err}", commit.sha);
            }
            writeln!(out, "{}", format_commit(commit, &status, self.config))?;
        }
        Ok(())
    }

    fn milestone_heading(&self, milestone: Option<&Milestone>) -> String {
        match milestone {
            Some(milestone) => format!(
                "{} [Due on: {}]",
                milestone.title,
                due_on(milestone, self.config)
            ),
            None => "no milestone".to_string(),
        }
    }
}

/// The `index`-th milestone, or the current one when `index` runs past the end.
pub fn select_milestone(milestones: &[Milestone], index: usize) -> Option<&Milestone> {
    milestones.get(index).or_else(|| {
        if index > 0 {
            debug!(index, available = milestones.len(), "milestone index out of range");
        }
        milestones.first()
    })
}

fn due_on(milestone: &Milestone, config: &DateConfig) -> String {
    milestone
        .due_on
        .map(|due| to_display_time(&due, config))
        .unwrap_or_else(|| "-".to_string())
}

pub fn format_milestone(milestone: &Milestone, config: &DateConfig) -> String {
    format!(
        "       {:<20} [Due on: {}] Open: {:<3} Closed: {}",
        milestone.title,
        due_on(milestone, config),
        milestone.open_issues,
        milestone.closed_issues
    )
}

pub fn format_issue(issue: &Issue, config: &DateConfig) -> String {
    // Gitea does not say who closed an issue; the first assignee stands in.
    let closed = issue
        .closed_at
        .map(|closed_at| {
            let by = issue.assignees.first().map(String::as_str).unwrap_or("-");
            format!("{}  By: {:<18} ", to_display_time(&closed_at, config), by)
        })
        .unwrap_or_default();
    let labels = issue.labels.iter().map(|label| format!("<{label}>")).join(", ");
    format!("    {closed}#{:<3} {:<50}   {labels}", issue.number, issue.title)
        .trim_end()
        .to_string()
}

pub fn format_commit(
    commit: &CommitEntry,
    status: &std::result::Result<DateTime<Utc>, StatusError>,
    config: &DateConfig,
) -> String {
    match status {
        Ok(time) => format!(
            "    {}  By: {:<18} {}",
            to_display_time(time, config),
            commit.author(),
            commit.summary()
        ),
        Err(_) => format!("    (no status) {:.8}  {}", commit.sha, commit.summary()),
    }
}
