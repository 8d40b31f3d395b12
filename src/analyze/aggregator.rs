use crate::analyze::{AccountActivity, ActivityKind, ActivityRecord};
use crate::gitea::{CommitFilter, HostingError, HostingQuery, IssueFilter, IssueState};
use crate::model::Repository;
use indicatif::ProgressBar;
use tracing::{debug, warn};

/// Every commit and issue authored by `login` across the repositories the account can see.
///
/// A repository that fails to answer is skipped with a warning; only a failure
/// to list the repositories themselves aborts.
pub async fn collect_activity<H: HostingQuery>(
    hosting: &H,
    login: &str,
    pb: &ProgressBar,
) -> Result<AccountActivity, HostingError> {
    let repos = hosting.list_repositories().await?;
    let mut activity = AccountActivity::new();
    for repo in repos.iter().filter(|repo| !repo.empty) {
        pb.set_message(repo.full_name.clone());
        match repo_activity(hosting, repo, login).await {
            Ok(records) => {
                debug!(repo = %repo.full_name, records = records.len(), "collected");
                activity.extend(records);
            }
            Err(err) => warn!("skipping `{}`: {err}", repo.full_name),
        }
        pb.set_position(activity.len() as u64);
    }
    Ok(activity)
}

async fn repo_activity<H: HostingQuery>(
    hosting: &H,
    repo: &Repository,
    login: &str,
) -> Result<AccountActivity, HostingError> {
    let commits = hosting
        .list_commits(repo, &CommitFilter::by_author(login))
        .await?;
    let issues = hosting
        .list_issues(repo, &IssueFilter::with_state(IssueState::All).creator(login))
        .await?;

    let commits = commits.into_iter().map(|commit| {
        ActivityRecord::new(
            &repo.full_name,
            commit.date,
            commit.author(),
            commit.summary(),
            ActivityKind::Commit,
        )
    });
    let issues = issues.into_iter().map(|issue| {
        ActivityRecord::new(
            &repo.full_name,
            issue.created_at,
            &issue.author,
            format!("#{} {}", issue.number, issue.title),
            ActivityKind::Issue,
        )
    });
    Ok(commits.chain(issues).collect())
}

/// Union of several accounts' activity, each account's order kept.
pub fn merge_accounts(accounts: impl IntoIterator<Item = AccountActivity>) -> AccountActivity {
    accounts.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::daily::count_daily;
    use crate::analyze::DailyCount;
    use crate::gitea::fake::{at, commit, issue, FakeHosting};
    use crate::utils::{DateConfig, Zone};

    fn utc() -> DateConfig {
        DateConfig::new(Zone::Named(chrono_tz::UTC), "%Y-%m-%d")
    }

    fn repo(name: &str) -> Repository {
        Repository::new(name, "appledore")
    }

    fn hosting() -> FakeHosting {
        let mut empty = repo("scratch");
        empty.empty = true;
        let mut hosting = FakeHosting {
            login: "appledore".to_string(),
            repos: vec![repo("chipmunk"), repo("burrow"), empty],
            ..Default::default()
        };
        hosting.commits.insert(
            "appledore/chipmunk".to_string(),
            vec![
                commit("a1", Some("appledore"), "Add feed\n\ndetails", at(2015, 9, 1, 10)),
                commit("b1", Some("bjorn"), "Fix typo", at(2015, 9, 1, 11)),
                commit("a2", None, "Imported", at(2015, 9, 2, 9)),
            ],
        );
        hosting.issues.insert(
            "appledore/chipmunk".to_string(),
            vec![
                issue(7, "Crash on start", "appledore", &[], at(2015, 9, 3, 8)),
                issue(8, "Slow feed", "bjorn", &["appledore"], at(2015, 9, 3, 9)),
            ],
        );
        hosting.commits.insert(
            "appledore/burrow".to_string(),
            vec![commit("c1", Some("appledore"), "Init", at(2015, 9, 3, 12))],
        );
        hosting
    }

    #[tokio::test]
    async fn collects_own_commits_and_issues() {
        let activity = collect_activity(&hosting(), "appledore", &ProgressBar::hidden())
            .await
            .unwrap();

        let summary = activity
            .iter()
            .map(|record| (record.kind, record.description.as_str()))
            .collect::<Vec<_>>();
        assert_eq!(
            summary,
            vec![
                (ActivityKind::Commit, "Add feed"),
                (ActivityKind::Issue, "#7 Crash on start"),
                (ActivityKind::Commit, "Init"),
            ]
        );
        assert_eq!(activity[2].source_repository, "appledore/burrow");
    }

    #[tokio::test]
    async fn broken_repository_is_skipped() {
        let mut hosting = hosting();
        hosting.broken_repos.insert("appledore/chipmunk".to_string());

        let activity = collect_activity(&hosting, "appledore", &ProgressBar::hidden())
            .await
            .unwrap();

        assert_eq!(activity.len(), 1);
        assert_eq!(activity[0].description, "Init");
    }

    #[test]
    fn merged_accounts_add_up_per_day() {
        let record = |h| {
            ActivityRecord::new("r", at(2015, 9, 1, h), "x", "", ActivityKind::Commit)
        };
        let first = vec![record(1)];
        let second = vec![
            record(2),
            record(3),
            ActivityRecord::new("r", at(2015, 9, 2, 1), "y", "", ActivityKind::Issue),
        ];

        let merged = merge_accounts([first, second]);
        let counts = count_daily(&merged, &utc());

        let expected = DailyCount::from([
            ("2015-09-01".to_string(), 3),
            ("2015-09-02".to_string(), 1),
        ]);
        assert_eq!(counts, expected);
        assert_eq!(merged[0].date, at(2015, 9, 1, 1));
    }
}
