use chrono::{DateTime, Utc};

const SUMMARY_WIDTH: usize = 80;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub login: String,
    pub name: String,
}

impl Member {
    pub fn new(login: impl ToString, name: impl ToString) -> Self {
        Self {
            login: login.to_string(),
            name: name.to_string(),
        }
    }

    pub fn matches_prefix(&self, prefix: &str) -> bool {
        let prefix = prefix.to_lowercase();
        self.login.to_lowercase().starts_with(&prefix)
            || (!self.name.is_empty() && self.name.to_lowercase().starts_with(&prefix))
    }
}

/// First team member whose login or display name starts with `prefix`, ignoring case.
pub fn find_member<'a>(team: &'a [Member], prefix: &str) -> Option<&'a Member> {
    let prefix = prefix.trim();
    if prefix.is_empty() {
        return None;
    }
    team.iter().find(|member| member.matches_prefix(prefix))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub number: i64,
    pub title: String,
    pub author: String,
    pub assignees: Vec<String>,
    pub labels: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

impl Issue {
    pub fn is_assigned_to(&self, login: &str) -> bool {
        self.assignees
            .iter()
            .any(|assignee| assignee.eq_ignore_ascii_case(login))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Milestone {
    pub id: i64,
    pub title: String,
    pub open_issues: i64,
    pub closed_issues: i64,
    pub due_on: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitEntry {
    pub sha: String,
    pub author_login: Option<String>,
    pub author_name: String,
    pub message: String,
    pub date: DateTime<Utc>,
}

impl CommitEntry {
    pub fn author(&self) -> &str {
        self.author_login.as_deref().unwrap_or(&self.author_name)
    }

    /// First line of the message, cut to the report width.
    pub fn summary(&self) -> String {
        self.message
            .lines()
            .next()
            .unwrap_or_default()
            .chars()
            .take(SUMMARY_WIDTH)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IssueState {
    Open,
    Closed,
    #[default]
    All,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AssigneeFilter {
    #[default]
    Any,
    Unassigned,
    Login(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IssueFilter {
    pub state: IssueState,
    pub milestone: Option<String>,
    pub assignee: AssigneeFilter,
    pub creator: Option<String>,
    pub limit: Option<usize>,
}

impl IssueFilter {
    pub fn with_state(state: IssueState) -> Self {
        Self {
            state,
            ..Default::default()
        }
    }

    pub fn milestone(mut self, milestone: impl ToString) -> Self {
        self.milestone = Some(milestone.to_string());
        self
    }

    pub fn assignee(mut self, assignee: AssigneeFilter) -> Self {
        self.assignee = assignee;
        self
    }

    pub fn creator(mut self, login: impl ToString) -> Self {
        self.creator = Some(login.to_string());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommitFilter {
    pub author: Option<String>,
    pub limit: Option<usize>,
}

impl CommitFilter {
    pub fn latest(limit: usize) -> Self {
        Self {
            author: None,
            limit: Some(limit),
        }
    }

    pub fn by_author(login: impl ToString) -> Self {
        Self {
            author: Some(login.to_string()),
            limit: None,
        }
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn accepts(&self, author_login: Option<&str>) -> bool {
        match (&self.author, author_login) {
            (None, _) => true,
            (Some(wanted), Some(login)) => wanted.eq_ignore_ascii_case(login),
            (Some(_), None) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team() -> Vec<Member> {
        vec![
            Member::new("appledore", "Apple Dore"),
            Member::new("bjorn", ""),
            Member::new("cat42", "Appleton Cat"),
        ]
    }

    #[test]
    fn prefix_matches_login_ignoring_case() {
        let team = team();
        assert_eq!(find_member(&team, "APP").map(|m| m.login.as_str()), Some("appledore"));
        assert_eq!(find_member(&team, "bj").map(|m| m.login.as_str()), Some("bjorn"));
    }

    #[test]
    fn prefix_matches_display_name() {
        let team = team();
        assert_eq!(find_member(&team, "appleton").map(|m| m.login.as_str()), Some("cat42"));
    }

    #[test]
    fn prefix_without_match_or_empty() {
        let team = team();
        assert_eq!(find_member(&team, "zed"), None);
        assert_eq!(find_member(&team, "  "), None);
    }

    #[test]
    fn commit_summary_is_first_line_truncated() {
        let commit = CommitEntry {
            sha: "abc".to_string(),
            author_login: None,
            author_name: "Apple Dore".to_string(),
            message: format!("{}\n\nbody", "x".repeat(100)),
            date: DateTime::<Utc>::default(),
        };
        assert_eq!(commit.summary(), "x".repeat(80));
        assert_eq!(commit.author(), "Apple Dore");
    }

    #[test]
    fn commit_filter_by_author() {
        let filter = CommitFilter::by_author("Appledore");
        assert!(filter.accepts(Some("appledore")));
        assert!(!filter.accepts(Some("bjorn")));
        assert!(!filter.accepts(None));
        assert!(CommitFilter::latest(5).accepts(None));
    }
}
