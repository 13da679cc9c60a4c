use crate::domain::{CoreError, LearnerId, ProgressStatus, Word};
use crate::ports::{ProgressStore, WordCatalog};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// A catalog word paired with the learner's lifecycle status for it.
/// SM-2 internals (EF, interval, repetition count) are deliberately not
/// exposed here -- callers only ever see `status`.
#[derive(Debug, Clone, PartialEq)]
pub struct WordWithStatus {
    pub word: Word,
    pub status: ProgressStatus,
}

const DEFAULT_LIMIT: u32 = 20;

/// Review session: due Learning/Review entries, Learning before Review,
/// earliest `next_review_at` first within each group.
pub async fn review_session(
    progress: &dyn ProgressStore,
    catalog: &dyn WordCatalog,
    learner_id: &LearnerId,
    now: DateTime<Utc>,
    limit: Option<u32>,
) -> Result<Vec<WordWithStatus>, CoreError> {
    let filter = vec![ProgressStatus::Learning, ProgressStatus::Review];
    let entries = progress
        .query_due(learner_id, now, limit.unwrap_or(DEFAULT_LIMIT), &filter)
        .await?;

    let mut out = Vec::with_capacity(entries.len());
    for entry in entries {
        let word = catalog.get(entry.word_id).await?;
        out.push(WordWithStatus { word, status: entry.status });
    }
    Ok(out)
}

/// Unit filter: words of `unit` not yet Mastered (absent/New/Learning),
/// ordered by ascending difficulty rank then word id. Used by the triage UI.
pub async fn unit_filter_session(
    progress: &dyn ProgressStore,
    catalog: &dyn WordCatalog,
    learner_id: &LearnerId,
    unit: i64,
) -> Result<Vec<WordWithStatus>, CoreError> {
    let words = catalog.words_in_unit(unit).await?;
    let status_by_word = status_map(progress, learner_id, &words).await?;

    let mut rows: Vec<WordWithStatus> = words
        .into_iter()
        .filter_map(|word| {
            let status = status_by_word
                .get(&word.id)
                .copied()
                .unwrap_or(ProgressStatus::New);
            (status != ProgressStatus::Mastered).then_some(WordWithStatus { word, status })
        })
        .collect();

    rows.sort_by_key(|row| (row.word.difficulty_rank, row.word.id));
    Ok(rows)
}

/// Learned-words pool: words of `unit` with status in {Review, Mastered},
/// used to seed quiz questions. Same deterministic ordering as unit_filter.
pub async fn unit_learned_pool(
    progress: &dyn ProgressStore,
    catalog: &dyn WordCatalog,
    learner_id: &LearnerId,
    unit: i64,
) -> Result<Vec<WordWithStatus>, CoreError> {
    let words = catalog.words_in_unit(unit).await?;
    let status_by_word = status_map(progress, learner_id, &words).await?;

    let mut rows: Vec<WordWithStatus> = words
        .into_iter()
        .filter_map(|word| {
            let status = status_by_word.get(&word.id).copied()?;
            matches!(status, ProgressStatus::Review | ProgressStatus::Mastered)
                .then_some(WordWithStatus { word, status })
        })
        .collect();

    rows.sort_by_key(|row| (row.word.difficulty_rank, row.word.id));
    Ok(rows)
}

async fn status_map(
    progress: &dyn ProgressStore,
    learner_id: &LearnerId,
    words: &[Word],
) -> Result<HashMap<i64, ProgressStatus>, CoreError> {
    let ids: Vec<i64> = words.iter().map(|w| w.id).collect();
    let entries = progress.get_many(learner_id, &ids).await?;
    Ok(entries.into_iter().map(|e| (e.word_id, e.status)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProgressEntry;
    use crate::ports::{MockProgressStore, MockWordCatalog};

    fn word(id: i64, unit: i64, rank: i64) -> Word {
        Word {
            id,
            unit,
            difficulty_rank: rank,
            source_form: format!("s{id}"),
            target_form: format!("t{id}"),
            audio_ref: None,
        }
    }

    #[tokio::test]
    async fn scenario_f_unit_filter_ordering() {
        let mut catalog = MockWordCatalog::new();
        catalog.expect_words_in_unit().returning(|_| {
            Ok(vec![word(100, 1, 3), word(200, 1, 17), word(150, 1, 17), word(75, 1, 42)])
        });

        let mut progress = MockProgressStore::new();
        progress.expect_get_many().returning(|_, _| Ok(vec![]));

        let rows = unit_filter_session(&progress, &catalog, &"learner-1".to_string(), 1)
            .await
            .unwrap();

        let ids: Vec<i64> = rows.iter().map(|r| r.word.id).collect();
        assert_eq!(ids, vec![100, 150, 200, 75]);
    }

    #[tokio::test]
    async fn unit_filter_excludes_mastered() {
        let mut catalog = MockWordCatalog::new();
        catalog
            .expect_words_in_unit()
            .returning(|_| Ok(vec![word(1, 1, 10), word(2, 1, 20)]));

        let mut progress = MockProgressStore::new();
        progress.expect_get_many().returning(|learner_id, _| {
            Ok(vec![ProgressEntry {
                learner_id: learner_id.clone(),
                word_id: 1,
                status: ProgressStatus::Mastered,
                repetition_number: 1,
                easiness_factor: 2.5,
                interval_days: 21,
                next_review_at: None,
                last_reviewed_at: None,
            }])
        });

        let rows = unit_filter_session(&progress, &catalog, &"learner-1".to_string(), 1)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].word.id, 2);
    }
}
