use crate::analyze::{DailyLog, StreakResult};

pub fn calculate_streak(counts: impl IntoIterator<Item = usize>) -> StreakResult {
    let (current, longest) = counts
        .into_iter()
        .fold((0usize, 0usize), |(current, longest), count| {
            let current = if count == 0 { 0 } else { current + 1 };
            (current, longest.max(current))
        });
    StreakResult::new(current, longest)
}

impl StreakResult {
    pub fn from_log(log: &DailyLog) -> Self {
        calculate_streak(log.iter().map(|entry| entry.count))
    }
}
