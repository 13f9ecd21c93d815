use std::sync::Arc;

use thiserror::Error;

use dscode_core::Clock;
use dscode_core::model::Catalog;
use storage::repository::Storage;
use storage::sqlite::SqliteInitError;

use crate::auth_service::{AuthProvider, AuthService};
use crate::prefs_service::PrefsService;
use crate::progress_service::ProgressService;
use crate::sync_service::{RemoteStore, SyncService};

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}

/// Composition root for the service layer.
#[derive(Clone)]
pub struct AppServices {
    pub catalog: Arc<Catalog>,
    pub progress: ProgressService,
    pub prefs: PrefsService,
    pub sync: SyncService,
    pub auth: AuthService,
}

impl AppServices {
    /// Wires services over explicit backends.
    #[must_use]
    pub fn from_parts(
        clock: Clock,
        catalog: Arc<Catalog>,
        storage: &Storage,
        remote: Arc<dyn RemoteStore>,
        auth_provider: Arc<dyn AuthProvider>,
    ) -> Self {
        let progress = ProgressService::new(
            clock,
            Arc::clone(&catalog),
            Arc::clone(&storage.progress),
        );
        let prefs = PrefsService::new(Arc::clone(&storage.prefs));
        let sync = SyncService::new(remote, progress.clone());
        let auth = AuthService::new(auth_provider, sync.clone());
        Self {
            catalog,
            progress,
            prefs,
            sync,
            auth,
        }
    }

    /// Builds services over a `SQLite` store and hydrates state from it.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the database cannot be opened or
    /// migrated.
    pub async fn sqlite(
        database_url: &str,
        remote: Arc<dyn RemoteStore>,
        auth_provider: Arc<dyn AuthProvider>,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(database_url).await?;
        let services = Self::from_parts(
            Clock::default_clock(),
            Arc::new(Catalog::builtin()),
            &storage,
            remote,
            auth_provider,
        );
        services.hydrate().await;
        Ok(services)
    }

    /// Loads persisted progress and preferences into memory.
    pub async fn hydrate(&self) {
        self.progress.hydrate().await;
        self.prefs.hydrate().await;
    }
}
