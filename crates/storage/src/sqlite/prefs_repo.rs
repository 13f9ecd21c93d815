use async_trait::async_trait;
use sqlx::Row;

use crate::repository::{PrefsRepository, StorageError};
use dscode_core::model::{TopicId, UiPrefs};

use super::SqliteRepository;

#[async_trait]
impl PrefsRepository for SqliteRepository {
    async fn save_prefs(&self, prefs: &UiPrefs) -> Result<(), StorageError> {
        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(|err| StorageError::Unavailable(err.to_string()))?;

        sqlx::query(
            r"
            INSERT INTO ui_prefs (id, dark_mode)
            VALUES (1, ?1)
            ON CONFLICT(id) DO UPDATE SET dark_mode = excluded.dark_mode
            ",
        )
        .bind(i64::from(prefs.dark_mode))
        .execute(&mut *tx)
        .await
        .map_err(|err| StorageError::Unavailable(err.to_string()))?;

        // Collapse flags are replaced wholesale; absent rows mean expanded.
        sqlx::query("DELETE FROM topic_prefs")
            .execute(&mut *tx)
            .await
            .map_err(|err| StorageError::Unavailable(err.to_string()))?;

        for topic in prefs.collapsed_topics() {
            sqlx::query("INSERT INTO topic_prefs (topic, collapsed) VALUES (?1, 1)")
                .bind(topic.as_str())
                .execute(&mut *tx)
                .await
                .map_err(|err| StorageError::Unavailable(err.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|err| StorageError::Unavailable(err.to_string()))?;
        Ok(())
    }

    async fn load_prefs(&self) -> Result<Option<UiPrefs>, StorageError> {
        let row = sqlx::query("SELECT dark_mode FROM ui_prefs WHERE id = 1")
            .fetch_optional(self.pool())
            .await
            .map_err(|err| StorageError::Unavailable(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let dark_mode: i64 = row
            .try_get("dark_mode")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;

        let topic_rows = sqlx::query("SELECT topic FROM topic_prefs WHERE collapsed = 1")
            .fetch_all(self.pool())
            .await
            .map_err(|err| StorageError::Unavailable(err.to_string()))?;

        let mut collapsed = Vec::with_capacity(topic_rows.len());
        for topic_row in topic_rows {
            let topic: String = topic_row
                .try_get("topic")
                .map_err(|err| StorageError::Serialization(err.to_string()))?;
            collapsed.push(TopicId::new(topic));
        }

        Ok(Some(UiPrefs::new(dark_mode != 0, collapsed)))
    }
}
