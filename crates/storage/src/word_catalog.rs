use crate::error::StorageError;
use crate::models::WordRow;
use async_trait::async_trait;
use sqlx::SqlitePool;
use std::collections::HashSet;
use vocab_core::{CoreError, Word, WordCatalog, WordId};

pub struct SqliteWordCatalog {
    pool: SqlitePool,
}

impl SqliteWordCatalog {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch_unit_or_all(&self, unit: Option<i64>) -> Result<Vec<WordRow>, CoreError> {
        let rows = match unit {
            Some(unit) => {
                sqlx::query_as::<_, WordRow>("SELECT * FROM words WHERE unit = ?")
                    .bind(unit)
                    .fetch_all(&self.pool)
                    .await
            }
            None => {
                sqlx::query_as::<_, WordRow>("SELECT * FROM words")
                    .fetch_all(&self.pool)
                    .await
            }
        }
        .map_err(sqlx_err)?;
        Ok(rows)
    }
}

fn sqlx_err(err: sqlx::Error) -> CoreError {
    CoreError::from(StorageError::from(err))
}

#[async_trait]
impl WordCatalog for SqliteWordCatalog {
    async fn get(&self, word_id: WordId) -> Result<Word, CoreError> {
        let row = sqlx::query_as::<_, WordRow>("SELECT * FROM words WHERE id = ?")
            .bind(word_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(sqlx_err)?;

        row.map(Word::from)
            .ok_or_else(|| CoreError::NotFound(format!("word {word_id}")))
    }

    async fn sample_near(
        &self,
        target_rank: i64,
        unit: Option<i64>,
        exclude: &[WordId],
    ) -> Result<Word, CoreError> {
        let rows = self.fetch_unit_or_all(unit).await?;
        let excluded: HashSet<WordId> = exclude.iter().copied().collect();

        rows.into_iter()
            .map(Word::from)
            .filter(|w| !excluded.contains(&w.id))
            .min_by_key(|w| ((w.difficulty_rank - target_rank).abs(), w.id))
            .ok_or_else(|| CoreError::Exhausted(format!("no remaining candidate word near rank {target_rank}")))
    }

    async fn words_in_unit(&self, unit: i64) -> Result<Vec<Word>, CoreError> {
        let rows = sqlx::query_as::<_, WordRow>(
            "SELECT * FROM words WHERE unit = ? ORDER BY difficulty_rank ASC, id ASC",
        )
        .bind(unit)
        .fetch_all(&self.pool)
        .await
        .map_err(sqlx_err)?;

        Ok(rows.into_iter().map(Word::from).collect())
    }

    async fn units(&self) -> Result<Vec<i64>, CoreError> {
        let rows: Vec<(i64,)> =
            sqlx::query_as("SELECT DISTINCT unit FROM words ORDER BY unit ASC")
                .fetch_all(&self.pool)
                .await
                .map_err(sqlx_err)?;

        Ok(rows.into_iter().map(|(unit,)| unit).collect())
    }

    async fn words_within_band(
        &self,
        target_rank: i64,
        band: i64,
        exclude: &[WordId],
    ) -> Result<Vec<Word>, CoreError> {
        let rows = self.fetch_unit_or_all(None).await?;
        let excluded: HashSet<WordId> = exclude.iter().copied().collect();

        let mut candidates: Vec<Word> = rows
            .into_iter()
            .map(Word::from)
            .filter(|w| !excluded.contains(&w.id))
            .filter(|w| (w.difficulty_rank - target_rank).abs() <= band)
            .collect();

        candidates.sort_by_key(|w| ((w.difficulty_rank - target_rank).abs(), w.id));
        Ok(candidates)
    }
}
