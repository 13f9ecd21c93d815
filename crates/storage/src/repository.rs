use async_trait::async_trait;
use dscode_core::model::{ProgressSnapshot, UiPrefs};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
///
/// None of these are fatal to the app: the progress service logs and
/// swallows them, keeping the in-memory set as the source of truth for the
/// rest of the session.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    /// The storage medium could not be read or written.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Repository contract for the persisted progress snapshot.
///
/// One snapshot per store (the relational rendition of a single key-value
/// entry). Saves overwrite unconditionally.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Persist the snapshot, replacing whatever was stored before.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the snapshot cannot be stored.
    async fn save_snapshot(&self, snapshot: &ProgressSnapshot) -> Result<(), StorageError>;

    /// Fetch the stored snapshot.
    ///
    /// Returns `Ok(None)` when nothing is stored or when the stored payload
    /// no longer parses: malformed storage is treated as absent, never as
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Unavailable` only when the medium itself
    /// cannot be read.
    async fn load_snapshot(&self) -> Result<Option<ProgressSnapshot>, StorageError>;

    /// Erase the stored snapshot. A no-op when nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the deletion cannot be performed.
    async fn clear_snapshot(&self) -> Result<(), StorageError>;
}

/// Repository contract for cosmetic UI preferences.
#[async_trait]
pub trait PrefsRepository: Send + Sync {
    /// Persist the full preference state.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the preferences cannot be stored.
    async fn save_prefs(&self, prefs: &UiPrefs) -> Result<(), StorageError>;

    /// Fetch preferences, `Ok(None)` when never saved.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the medium cannot be read.
    async fn load_prefs(&self) -> Result<Option<UiPrefs>, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    snapshot: Arc<Mutex<Option<ProgressSnapshot>>>,
    prefs: Arc<Mutex<Option<UiPrefs>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn save_snapshot(&self, snapshot: &ProgressSnapshot) -> Result<(), StorageError> {
        let mut guard = self
            .snapshot
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        *guard = Some(snapshot.clone());
        Ok(())
    }

    async fn load_snapshot(&self) -> Result<Option<ProgressSnapshot>, StorageError> {
        let guard = self
            .snapshot
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn clear_snapshot(&self) -> Result<(), StorageError> {
        let mut guard = self
            .snapshot
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        *guard = None;
        Ok(())
    }
}

#[async_trait]
impl PrefsRepository for InMemoryRepository {
    async fn save_prefs(&self, prefs: &UiPrefs) -> Result<(), StorageError> {
        let mut guard = self
            .prefs
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        *guard = Some(prefs.clone());
        Ok(())
    }

    async fn load_prefs(&self) -> Result<Option<UiPrefs>, StorageError> {
        let guard = self
            .prefs
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Ok(guard.clone())
    }
}

/// Aggregates the repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn ProgressRepository>,
    pub prefs: Arc<dyn PrefsRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let progress: Arc<dyn ProgressRepository> = Arc::new(repo.clone());
        let prefs: Arc<dyn PrefsRepository> = Arc::new(repo);
        Self { progress, prefs }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dscode_core::model::{ProblemId, Progress};
    use dscode_core::time::fixed_now;

    #[tokio::test]
    async fn in_memory_snapshot_round_trip() {
        let storage = Storage::in_memory();
        assert!(storage.progress.load_snapshot().await.unwrap().is_none());

        let progress = Progress::from_completed([ProblemId::new("py1"), ProblemId::new("ml2")]);
        let snapshot = ProgressSnapshot::capture(&progress, fixed_now());
        storage.progress.save_snapshot(&snapshot).await.unwrap();

        let loaded = storage.progress.load_snapshot().await.unwrap().unwrap();
        assert_eq!(loaded, snapshot);

        storage.progress.clear_snapshot().await.unwrap();
        assert!(storage.progress.load_snapshot().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn in_memory_prefs_round_trip() {
        let storage = Storage::in_memory();
        assert!(storage.prefs.load_prefs().await.unwrap().is_none());

        let prefs = UiPrefs::new(true, [dscode_core::model::TopicId::new("numpy")]);
        storage.prefs.save_prefs(&prefs).await.unwrap();
        let loaded = storage.prefs.load_prefs().await.unwrap().unwrap();
        assert_eq!(loaded, prefs);
    }
}
