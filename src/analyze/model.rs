use crate::utils::DateError;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashMap;
use std::fmt::{self, Display};
use thiserror::Error;

/// Display-formatted date → number of records on that day.
pub type DailyCount = HashMap<String, usize>;
pub type DailyLog = Vec<DailyEntry>;
pub type AccountActivity = Vec<ActivityRecord>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityKind {
    Commit,
    Issue,
}

impl Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivityKind::Commit => write!(f, "commit"),
            ActivityKind::Issue => write!(f, "issue"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityRecord {
    pub source_repository: String,
    pub date: DateTime<Utc>,
    pub actor: String,
    pub description: String,
    pub kind: ActivityKind,
}

impl ActivityRecord {
    pub fn new(
        source_repository: impl ToString,
        date: DateTime<Utc>,
        actor: impl ToString,
        description: impl ToString,
        kind: ActivityKind,
    ) -> Self {
        Self {
            source_repository: source_repository.to_string(),
            date,
            actor: actor.to_string(),
            description: description.to_string(),
            kind,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyEntry {
    pub date: NaiveDate,
    pub count: usize,
}

impl DailyEntry {
    pub fn new(date: NaiveDate, count: usize) -> Self {
        Self { date, count }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StreakResult {
    pub current: usize,
    pub longest: usize,
}

impl StreakResult {
    pub fn new(current: usize, longest: usize) -> Self {
        Self { current, longest }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StreakError {
    #[error("no activity to build a daily log from")]
    EmptyInput,
    #[error(transparent)]
    Date(#[from] DateError),
}
