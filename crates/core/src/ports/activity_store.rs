use crate::domain::{CoreError, DailyActivity, LearnerId};
use async_trait::async_trait;

/// Persistent per-learner streak and daily-goal counters.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ActivityStore: Send + Sync {
    /// Returns the learner's activity row, or a fresh zero-state if none exists.
    async fn get(&self, learner_id: &LearnerId) -> Result<DailyActivity, CoreError>;

    /// Total replacement (upsert).
    async fn save(&self, activity: DailyActivity) -> Result<DailyActivity, CoreError>;
}
