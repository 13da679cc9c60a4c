use crate::domain::{CoreError, Word, WordId};
use async_trait::async_trait;

/// Read-only view over the word inventory. Immutable at request granularity;
/// implementations may cache it in-process with bounded memory.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait WordCatalog: Send + Sync {
    async fn get(&self, word_id: WordId) -> Result<Word, CoreError>;

    /// Samples the word whose difficulty rank is closest to `target_rank`,
    /// optionally restricted to `unit` and excluding `exclude`. Ties broken by
    /// lowest word id. Returns `CoreError::Exhausted` if no candidate remains --
    /// this is the placement engine's candidate sampler, so running out of
    /// words here means the placement session has no question left to ask,
    /// not that a known entity is missing.
    async fn sample_near(
        &self,
        target_rank: i64,
        unit: Option<i64>,
        exclude: &[WordId],
    ) -> Result<Word, CoreError>;

    /// All words in `unit`, used by the Session Assembler's unit-scoped modes.
    async fn words_in_unit(&self, unit: i64) -> Result<Vec<Word>, CoreError>;

    /// Words whose difficulty rank falls within `target_rank +/- band`,
    /// excluding `exclude`, ordered by ascending distance from `target_rank`
    /// then ascending word id. Used by distractor generation's widening search.
    async fn words_within_band(
        &self,
        target_rank: i64,
        band: i64,
        exclude: &[WordId],
    ) -> Result<Vec<Word>, CoreError>;

    /// Count of distinct units in the catalog (for `stats.by_unit`'s `total_count`
    /// denominators and iteration).
    async fn units(&self) -> Result<Vec<i64>, CoreError>;
}
