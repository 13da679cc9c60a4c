pub mod activity_store;
pub mod error;
pub mod learner_admin;
pub mod models;
pub mod placement_session_store;
pub mod progress_store;
pub mod word_catalog;

pub use activity_store::SqliteActivityStore;
pub use error::StorageError;
pub use learner_admin::SqliteLearnerAdmin;
pub use placement_session_store::SqlitePlacementSessionStore;
pub use progress_store::SqliteProgressStore;
pub use word_catalog::SqliteWordCatalog;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Opens (creating if necessary) the SQLite database at `database_url` and
/// runs pending migrations. `database_url` accepts anything `sqlx::sqlite`
/// understands, including `sqlite::memory:` for ephemeral test databases.
pub async fn init_db(database_url: &str) -> Result<SqlitePool, StorageError> {
    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(StorageError::Database)?
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .map_err(StorageError::Database)?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn init_db_runs_migrations_against_in_memory_sqlite() {
        let pool = init_db("sqlite::memory:").await.unwrap();
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM words")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(row.0, 0);
    }
}
