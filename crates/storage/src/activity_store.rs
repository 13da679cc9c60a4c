use crate::error::StorageError;
use crate::models::DailyActivityRow;
use async_trait::async_trait;
use sqlx::SqlitePool;
use vocab_core::{ActivityStore, CoreError, DailyActivity, LearnerId};

pub struct SqliteActivityStore {
    pool: SqlitePool,
}

impl SqliteActivityStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn sqlx_err(err: sqlx::Error) -> CoreError {
    CoreError::from(StorageError::from(err))
}

#[async_trait]
impl ActivityStore for SqliteActivityStore {
    async fn get(&self, learner_id: &LearnerId) -> Result<DailyActivity, CoreError> {
        let row = sqlx::query_as::<_, DailyActivityRow>(
            "SELECT * FROM daily_activity WHERE learner_id = ?",
        )
        .bind(learner_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(sqlx_err)?;

        Ok(row.map(DailyActivityRow::into_domain).unwrap_or_else(|| DailyActivity::new(learner_id.clone())))
    }

    async fn save(&self, activity: DailyActivity) -> Result<DailyActivity, CoreError> {
        sqlx::query(
            "INSERT INTO daily_activity (learner_id, streak, last_active_day, today_count, today_day)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT(learner_id) DO UPDATE SET
                streak = excluded.streak,
                last_active_day = excluded.last_active_day,
                today_count = excluded.today_count,
                today_day = excluded.today_day",
        )
        .bind(&activity.learner_id)
        .bind(activity.streak as i64)
        .bind(activity.last_active_day.map(|d| d.to_string()))
        .bind(activity.today_count as i64)
        .bind(activity.today_day.map(|d| d.to_string()))
        .execute(&self.pool)
        .await
        .map_err(sqlx_err)?;

        Ok(activity)
    }
}
