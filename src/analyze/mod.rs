pub mod aggregator;
pub mod daily;
mod model;
pub mod streak;

pub use aggregator::{collect_activity, merge_accounts};
pub use daily::{build_daily_log, count_daily, total_count, DEFAULT_START};
pub use model::{
    AccountActivity, ActivityKind, ActivityRecord, DailyCount, DailyEntry, DailyLog,
    StreakError, StreakResult,
};
