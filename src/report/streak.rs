use crate::analyze::{
    build_daily_log, total_count, AccountActivity, ActivityKind, DailyCount, StreakError,
    StreakResult,
};
use crate::model::Result;
use crate::utils::date::date_key;
use crate::utils::DateConfig;
use chrono::NaiveDate;
use itertools::Itertools;
use std::io::Write;

/// Contribution totals for one logged-in account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSummary {
    pub name: String,
    pub login: String,
    pub commits: usize,
    pub issues: usize,
    pub repositories: usize,
}

impl AccountSummary {
    pub fn from_activity(name: impl ToString, login: impl ToString, activity: &AccountActivity) -> Self {
        let (commits, issues) = activity.iter().fold((0, 0), |(commits, issues), record| {
            match record.kind {
                ActivityKind::Commit => (commits + 1, issues),
                ActivityKind::Issue => (commits, issues + 1),
            }
        });
        Self {
            name: name.to_string(),
            login: login.to_string(),
            commits,
            issues,
            repositories: activity
                .iter()
                .map(|record| &record.source_repository)
                .unique()
                .count(),
        }
    }

    pub fn total(&self) -> usize {
        self.commits + self.issues
    }
}

pub struct StreakReport<'a> {
    pub accounts: &'a [AccountSummary],
    pub counts: &'a DailyCount,
    pub start: NaiveDate,
    pub today: NaiveDate,
    pub show_log: bool,
}

impl StreakReport<'_> {
    pub fn write(&self, config: &DateConfig, out: &mut impl Write) -> Result<()> {
        writeln!(out, "Contributions")?;
        for account in self.accounts {
            writeln!(
                out,
                "    {:<12} {:<18} {:>6}  ({} commits, {} issues in {} repositories)",
                account.name,
                account.login,
                account.total(),
                account.commits,
                account.issues,
                account.repositories
            )?;
        }
        writeln!(out, "    {:<12} {:<18} {:>6}", "total", "", total_count(self.counts))?;

        let log = match build_daily_log(self.counts, self.start, &config.format) {
            Ok(log) => log,
            Err(StreakError::EmptyInput) => {
                writeln!(out, "\nNo data.")?;
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };

        let active = log.iter().filter(|entry| entry.count > 0);
        let (Some(first), Some(last)) = (active.clone().next(), active.last()) else {
            let since = date_key(&self.start, &config.format);
            writeln!(out, "\nNo activity since {since}.")?;
            return Ok(());
        };

        let streak = StreakResult::from_log(&log);
        let idle = (self.today - last.date).num_days();
        writeln!(out, "\nFirst active day: {}", date_key(&first.date, &config.format))?;
        writeln!(
            out,
            "Last active day:  {} ({idle} days ago)",
            date_key(&last.date, &config.format)
        )?;
        writeln!(out, "Current streak:   {} days", streak.current)?;
        writeln!(out, "Longest streak:   {} days", streak.longest)?;

        if self.show_log {
            writeln!(out, "\nDaily log:")?;
            for entry in &log {
                writeln!(out, "    {}  {}", date_key(&entry.date, &config.format), entry.count)?;
            }
        }
        Ok(())
    }
}
