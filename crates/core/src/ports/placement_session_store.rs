use crate::domain::{CoreError, LearnerId, PlacementSession};
use async_trait::async_trait;

/// Persistent per-learner placement session state. At most one active session
/// per learner.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PlacementSessionStore: Send + Sync {
    async fn get_active(&self, learner_id: &LearnerId) -> Result<Option<PlacementSession>, CoreError>;

    /// Atomic: if an active session already exists for the learner, returns it
    /// unchanged; otherwise inserts `session` and returns it.
    async fn create_active(
        &self,
        session: PlacementSession,
    ) -> Result<PlacementSession, CoreError>;

    /// Compare-and-swap on `expected_question_count`: the update applies only
    /// if the stored session's question_count still matches. Zero rows
    /// affected is reported as `CoreError::Conflict` so the caller can retry.
    async fn save(
        &self,
        session: PlacementSession,
        expected_question_count: u32,
    ) -> Result<PlacementSession, CoreError>;
}
