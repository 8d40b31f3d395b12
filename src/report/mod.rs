pub mod overview;
pub mod streak;

pub use overview::{Overview, OverviewRequest};
pub use streak::{AccountSummary, StreakReport};
