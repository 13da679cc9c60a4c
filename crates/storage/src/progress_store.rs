use crate::error::StorageError;
use crate::models::{status_to_str, ProgressRow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use vocab_core::{CoreError, DueFilter, LearnerId, ProgressEntry, ProgressStore, WordId};

pub struct SqliteProgressStore {
    pool: SqlitePool,
}

impl SqliteProgressStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn sqlx_err(err: sqlx::Error) -> CoreError {
    CoreError::from(StorageError::from(err))
}

fn status_placeholders(filter: &DueFilter) -> (String, Vec<&'static str>) {
    let strs: Vec<&'static str> = filter.iter().map(|s| status_to_str(*s)).collect();
    let placeholders = strs.iter().map(|_| "?").collect::<Vec<_>>().join(", ");
    (placeholders, strs)
}

#[async_trait]
impl ProgressStore for SqliteProgressStore {
    async fn get_or_create(
        &self,
        learner_id: &LearnerId,
        word_id: WordId,
        initial: ProgressEntry,
    ) -> Result<ProgressEntry, CoreError> {
        let mut tx = self.pool.begin().await.map_err(sqlx_err)?;

        sqlx::query(
            "INSERT INTO progress
             (learner_id, word_id, status, repetition_number, easiness_factor, interval_days, next_review_at, last_reviewed_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(learner_id, word_id) DO NOTHING",
        )
        .bind(learner_id)
        .bind(word_id)
        .bind(status_to_str(initial.status))
        .bind(initial.repetition_number as i64)
        .bind(initial.easiness_factor)
        .bind(initial.interval_days as i64)
        .bind(initial.next_review_at.map(|t| t.timestamp_millis()))
        .bind(initial.last_reviewed_at.map(|t| t.timestamp_millis()))
        .execute(&mut *tx)
        .await
        .map_err(sqlx_err)?;

        let row = sqlx::query_as::<_, ProgressRow>(
            "SELECT * FROM progress WHERE learner_id = ? AND word_id = ?",
        )
        .bind(learner_id)
        .bind(word_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(sqlx_err)?;

        tx.commit().await.map_err(sqlx_err)?;
        Ok(row.into())
    }

    async fn get(&self, learner_id: &LearnerId, word_id: WordId) -> Result<Option<ProgressEntry>, CoreError> {
        let row = sqlx::query_as::<_, ProgressRow>(
            "SELECT * FROM progress WHERE learner_id = ? AND word_id = ?",
        )
        .bind(learner_id)
        .bind(word_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(sqlx_err)?;

        Ok(row.map(Into::into))
    }

    async fn get_many(
        &self,
        learner_id: &LearnerId,
        word_ids: &[WordId],
    ) -> Result<Vec<ProgressEntry>, CoreError> {
        if word_ids.is_empty() {
            return Ok(Vec::new());
        }
        let placeholders = word_ids.iter().map(|_| "?").collect::<Vec<_>>().join(", ");
        let sql = format!(
            "SELECT * FROM progress WHERE learner_id = ? AND word_id IN ({placeholders})"
        );
        let mut query = sqlx::query_as::<_, ProgressRow>(&sql).bind(learner_id);
        for id in word_ids {
            query = query.bind(id);
        }
        let rows = query.fetch_all(&self.pool).await.map_err(sqlx_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(&self, entry: ProgressEntry) -> Result<ProgressEntry, CoreError> {
        let result = sqlx::query(
            "UPDATE progress SET
                status = ?, repetition_number = ?, easiness_factor = ?, interval_days = ?,
                next_review_at = ?, last_reviewed_at = ?
             WHERE learner_id = ? AND word_id = ?",
        )
        .bind(status_to_str(entry.status))
        .bind(entry.repetition_number as i64)
        .bind(entry.easiness_factor)
        .bind(entry.interval_days as i64)
        .bind(entry.next_review_at.map(|t| t.timestamp_millis()))
        .bind(entry.last_reviewed_at.map(|t| t.timestamp_millis()))
        .bind(&entry.learner_id)
        .bind(entry.word_id)
        .execute(&self.pool)
        .await
        .map_err(sqlx_err)?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(format!(
                "progress entry ({}, {})",
                entry.learner_id, entry.word_id
            )));
        }
        Ok(entry)
    }

    async fn query_due(
        &self,
        learner_id: &LearnerId,
        at_time: DateTime<Utc>,
        limit: u32,
        filter: &DueFilter,
    ) -> Result<Vec<ProgressEntry>, CoreError> {
        if filter.is_empty() {
            return Ok(Vec::new());
        }
        let (placeholders, strs) = status_placeholders(filter);
        let sql = format!(
            "SELECT * FROM progress
             WHERE learner_id = ?
             AND status IN ({placeholders})
             AND (status = 'new' OR next_review_at <= ?)
             ORDER BY
                CASE status WHEN 'learning' THEN 0 WHEN 'review' THEN 1 WHEN 'new' THEN 2 ELSE 3 END ASC,
                COALESCE(next_review_at, 0) ASC,
                word_id ASC
             LIMIT ?"
        );

        let mut query = sqlx::query_as::<_, ProgressRow>(&sql).bind(learner_id);
        for status in &strs {
            query = query.bind(*status);
        }
        query = query.bind(at_time.timestamp_millis()).bind(limit as i64);

        let rows = query.fetch_all(&self.pool).await.map_err(sqlx_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count_by_unit(&self, learner_id: &LearnerId) -> Result<Vec<(i64, i64)>, CoreError> {
        let rows: Vec<(i64, i64)> = sqlx::query_as(
            "SELECT w.unit, COUNT(*) FROM progress p
             JOIN words w ON w.id = p.word_id
             WHERE p.learner_id = ? AND p.status IN ('review', 'mastered')
             GROUP BY w.unit",
        )
        .bind(learner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(sqlx_err)?;

        Ok(rows)
    }
}
