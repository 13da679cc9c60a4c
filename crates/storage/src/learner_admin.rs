use crate::error::StorageError;
use async_trait::async_trait;
use sqlx::SqlitePool;
use vocab_core::{CoreError, LearnerAdmin, LearnerId};

pub struct SqliteLearnerAdmin {
    pool: SqlitePool,
}

impl SqliteLearnerAdmin {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn sqlx_err(err: sqlx::Error) -> CoreError {
    CoreError::from(StorageError::from(err))
}

#[async_trait]
impl LearnerAdmin for SqliteLearnerAdmin {
    /// Mirrors the teacher's `save_review_atomic`: one transaction, several
    /// statements, commit or nothing. Rolls back automatically if dropped
    /// before `commit` (e.g. on an early `?` return).
    async fn delete_learner(&self, learner_id: &LearnerId) -> Result<(), CoreError> {
        let mut tx = self.pool.begin().await.map_err(sqlx_err)?;

        sqlx::query("DELETE FROM progress WHERE learner_id = ?")
            .bind(learner_id)
            .execute(&mut *tx)
            .await
            .map_err(sqlx_err)?;

        sqlx::query("DELETE FROM placement_sessions WHERE learner_id = ?")
            .bind(learner_id)
            .execute(&mut *tx)
            .await
            .map_err(sqlx_err)?;

        sqlx::query("DELETE FROM daily_activity WHERE learner_id = ?")
            .bind(learner_id)
            .execute(&mut *tx)
            .await
            .map_err(sqlx_err)?;

        tx.commit().await.map_err(sqlx_err)?;
        Ok(())
    }
}
