use crate::analyze::{ActivityRecord, DailyCount, DailyEntry, DailyLog, StreakError};
use crate::utils::date::{parse_display_string, to_display_string};
use crate::utils::DateConfig;
use chrono::NaiveDate;
use itertools::{Itertools, MinMaxResult};
use std::collections::HashMap;

/// First day of the dense log unless the activity starts later.
pub const DEFAULT_START: &str = "2015-08-30";

pub fn count_daily<'a>(
    records: impl IntoIterator<Item = &'a ActivityRecord>,
    config: &DateConfig,
) -> DailyCount {
    records
        .into_iter()
        .fold(DailyCount::new(), |mut counts, record| {
            *counts
                .entry(to_display_string(&record.date, config))
                .or_default() += 1;
            counts
        })
}

/// Dense day-by-day series from `max(start, first active day)` through the last active day.
///
/// Days before `start` are dropped from the series even though they still count
/// towards totals computed from `counts`.
pub fn build_daily_log(
    counts: &DailyCount,
    start: NaiveDate,
    format: &str,
) -> Result<DailyLog, StreakError> {
    let mut by_date: HashMap<NaiveDate, usize> = HashMap::with_capacity(counts.len());
    for (key, count) in counts {
        *by_date.entry(parse_display_string(key, format)?).or_default() += count;
    }

    let (first, last) = match by_date.keys().copied().minmax() {
        MinMaxResult::NoElements => return Err(StreakError::EmptyInput),
        MinMaxResult::OneElement(day) => (day, day),
        MinMaxResult::MinMax(first, last) => (first, last),
    };

    // No leading zero days before the first active one.
    let log = start
        .max(first)
        .iter_days()
        .take_while(|day| *day <= last)
        .map(|day| DailyEntry::new(day, by_date.get(&day).copied().unwrap_or(0)))
        .collect();
    Ok(log)
}

pub fn total_count(counts: &DailyCount) -> usize {
    counts.values().sum()
}
