use crate::domain::{CoreError, LearnerId};
use async_trait::async_trait;

/// Cross-cutting learner deletion. Kept as its own port (rather than a method
/// on `ProgressStore`/`PlacementSessionStore`/`ActivityStore`) because it must
/// remove rows across all three stores' tables in one storage-level
/// transaction -- an implementation backed by three independently-committing
/// repositories cannot offer that guarantee.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait LearnerAdmin: Send + Sync {
    /// Removes all progress entries, placement sessions, and activity
    /// counters for `learner_id`, atomically: either every row across the
    /// three tables is gone, or (on failure) none of them are.
    async fn delete_learner(&self, learner_id: &LearnerId) -> Result<(), CoreError>;
}
