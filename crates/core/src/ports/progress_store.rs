use crate::domain::{CoreError, LearnerId, ProgressEntry, ProgressStatus, WordId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Statuses a `query_due` / unit-scoped query should include.
pub type DueFilter = Vec<ProgressStatus>;

/// Persistent mapping (learner, word) -> Progress Entry.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Atomic: if an entry exists, returns it unchanged; otherwise inserts one
    /// in `initial_status` and returns it. Must be safe under concurrent
    /// first access to the same pair (unique index on the pair).
    async fn get_or_create(
        &self,
        learner_id: &LearnerId,
        word_id: WordId,
        initial: ProgressEntry,
    ) -> Result<ProgressEntry, CoreError>;

    async fn get(&self, learner_id: &LearnerId, word_id: WordId) -> Result<Option<ProgressEntry>, CoreError>;

    /// The existing progress entries among `word_ids` for the learner; words
    /// with no entry yet are simply absent from the result (callers treat
    /// absence as implicit `New`).
    async fn get_many(
        &self,
        learner_id: &LearnerId,
        word_ids: &[WordId],
    ) -> Result<Vec<ProgressEntry>, CoreError>;

    /// Total replacement of mutable fields. Fails with `NotFound` if no entry
    /// exists for the pair. Must be serializable with respect to concurrent
    /// updates on the same pair.
    async fn update(&self, entry: ProgressEntry) -> Result<ProgressEntry, CoreError>;

    /// Up to `limit` entries for the learner where status is in `filter` and
    /// (status = New, or next_review_at <= at_time). Ordered by status
    /// priority (Learning > Review > New > Mastered), then ascending
    /// next_review_at, then ascending word id.
    async fn query_due(
        &self,
        learner_id: &LearnerId,
        at_time: DateTime<Utc>,
        limit: u32,
        filter: &DueFilter,
    ) -> Result<Vec<ProgressEntry>, CoreError>;

    /// Aggregate counts of {Review, Mastered} entries per unit, joined against
    /// the catalog.
    async fn count_by_unit(&self, learner_id: &LearnerId) -> Result<Vec<(i64, i64)>, CoreError>;
}
