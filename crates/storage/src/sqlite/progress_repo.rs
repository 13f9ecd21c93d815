use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;

use crate::repository::{ProgressRepository, StorageError};
use dscode_core::model::{ProblemId, ProgressSnapshot};

use super::SqliteRepository;

#[async_trait]
impl ProgressRepository for SqliteRepository {
    async fn save_snapshot(&self, snapshot: &ProgressSnapshot) -> Result<(), StorageError> {
        let ids = serde_json::to_string(&snapshot.completed_problems)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;

        sqlx::query(
            r"
            INSERT INTO progress_snapshot (id, completed_problems, last_updated)
            VALUES (1, ?1, ?2)
            ON CONFLICT(id) DO UPDATE SET
                completed_problems = excluded.completed_problems,
                last_updated = excluded.last_updated
            ",
        )
        .bind(ids)
        .bind(snapshot.last_updated.to_rfc3339())
        .execute(self.pool())
        .await
        .map_err(|err| StorageError::Unavailable(err.to_string()))?;

        Ok(())
    }

    async fn load_snapshot(&self) -> Result<Option<ProgressSnapshot>, StorageError> {
        let row = sqlx::query(
            "SELECT completed_problems, last_updated FROM progress_snapshot WHERE id = 1",
        )
        .fetch_optional(self.pool())
        .await
        .map_err(|err| StorageError::Unavailable(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let ids_json: String = row
            .try_get("completed_problems")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        let last_updated_raw: String = row
            .try_get("last_updated")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;

        // A payload that no longer parses is treated as absent, not fatal:
        // the set starts empty and the next save overwrites the bad row.
        let Ok(completed_problems) = serde_json::from_str::<Vec<ProblemId>>(&ids_json) else {
            tracing::warn!("stored progress payload is malformed; treating as absent");
            return Ok(None);
        };
        let Ok(last_updated) = DateTime::parse_from_rfc3339(&last_updated_raw) else {
            tracing::warn!("stored progress timestamp is malformed; treating as absent");
            return Ok(None);
        };

        Ok(Some(ProgressSnapshot {
            completed_problems,
            last_updated: last_updated.with_timezone(&Utc),
        }))
    }

    async fn clear_snapshot(&self) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM progress_snapshot WHERE id = 1")
            .execute(self.pool())
            .await
            .map_err(|err| StorageError::Unavailable(err.to_string()))?;
        Ok(())
    }
}
