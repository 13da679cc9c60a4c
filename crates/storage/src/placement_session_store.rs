use crate::error::StorageError;
use crate::models::PlacementSessionRow;
use async_trait::async_trait;
use sqlx::error::DatabaseError;
use sqlx::SqlitePool;
use vocab_core::{CoreError, LearnerId, PlacementSession, PlacementSessionStore};

pub struct SqlitePlacementSessionStore {
    pool: SqlitePool,
}

impl SqlitePlacementSessionStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn sqlx_err(err: sqlx::Error) -> CoreError {
    CoreError::from(StorageError::from(err))
}

fn decode_err(err: serde_json::Error) -> CoreError {
    CoreError::Internal(err.into())
}

#[async_trait]
impl PlacementSessionStore for SqlitePlacementSessionStore {
    async fn get_active(&self, learner_id: &LearnerId) -> Result<Option<PlacementSession>, CoreError> {
        let row = sqlx::query_as::<_, PlacementSessionRow>(
            "SELECT * FROM placement_sessions WHERE learner_id = ? AND is_active = 1",
        )
        .bind(learner_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(sqlx_err)?;

        row.map(|r| r.into_domain().map_err(decode_err)).transpose()
    }

    async fn create_active(&self, session: PlacementSession) -> Result<PlacementSession, CoreError> {
        let log = serde_json::to_string(&session.log).map_err(decode_err)?;

        let result = sqlx::query(
            "INSERT INTO placement_sessions
             (id, learner_id, current_min, current_max, question_count, is_active, final_level, log, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&session.id)
        .bind(&session.learner_id)
        .bind(session.current_min)
        .bind(session.current_max)
        .bind(session.question_count as i64)
        .bind(session.is_active as i64)
        .bind(session.final_level)
        .bind(&log)
        .bind(session.created_at.timestamp_millis())
        .bind(session.updated_at.timestamp_millis())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(session),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => self
                .get_active(&session.learner_id)
                .await?
                .ok_or_else(|| CoreError::Internal(anyhow::anyhow!("active session vanished after conflict"))),
            Err(e) => Err(sqlx_err(e)),
        }
    }

    async fn save(
        &self,
        session: PlacementSession,
        expected_question_count: u32,
    ) -> Result<PlacementSession, CoreError> {
        let log = serde_json::to_string(&session.log).map_err(decode_err)?;

        let result = sqlx::query(
            "UPDATE placement_sessions SET
                current_min = ?, current_max = ?, question_count = ?, is_active = ?,
                final_level = ?, log = ?, updated_at = ?
             WHERE id = ? AND question_count = ?",
        )
        .bind(session.current_min)
        .bind(session.current_max)
        .bind(session.question_count as i64)
        .bind(session.is_active as i64)
        .bind(session.final_level)
        .bind(&log)
        .bind(session.updated_at.timestamp_millis())
        .bind(&session.id)
        .bind(expected_question_count as i64)
        .execute(&self.pool)
        .await
        .map_err(sqlx_err)?;

        if result.rows_affected() == 0 {
            return Err(CoreError::Conflict(format!(
                "placement session {} was modified concurrently",
                session.id
            )));
        }
        Ok(session)
    }
}
