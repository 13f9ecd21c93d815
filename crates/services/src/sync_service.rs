use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use dscode_core::model::{AccountId, ProgressSnapshot};

use crate::error::SyncError;
use crate::progress_service::ProgressService;

/// The per-account document kept in the remote store.
///
/// Pushes merge at field level (a push without `email` leaves the stored
/// email alone); there is no version vector, so the last write wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<ProgressSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Contract for the remote per-account document store.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Field-level merge of `record` into the account's document.
    ///
    /// # Errors
    ///
    /// Returns `SyncError` when the remote call fails.
    async fn merge_record(&self, account: &AccountId, record: &RemoteRecord)
    -> Result<(), SyncError>;

    /// Fetches the account's document; `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns `SyncError` when the remote call fails.
    async fn fetch_record(&self, account: &AccountId) -> Result<Option<RemoteRecord>, SyncError>;
}

/// Remote store over a plain per-account document REST endpoint.
#[derive(Clone)]
pub struct HttpRemoteStore {
    client: Client,
    base_url: String,
}

impl HttpRemoteStore {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    fn document_url(&self, account: &AccountId) -> String {
        format!("{}/users/{}", self.base_url.trim_end_matches('/'), account)
    }
}

#[async_trait]
impl RemoteStore for HttpRemoteStore {
    async fn merge_record(
        &self,
        account: &AccountId,
        record: &RemoteRecord,
    ) -> Result<(), SyncError> {
        let response = self
            .client
            .patch(self.document_url(account))
            .json(record)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(SyncError::HttpStatus(response.status()));
        }
        Ok(())
    }

    async fn fetch_record(&self, account: &AccountId) -> Result<Option<RemoteRecord>, SyncError> {
        let response = self.client.get(self.document_url(account)).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(SyncError::HttpStatus(response.status()));
        }
        let record: RemoteRecord = response.json().await?;
        Ok(Some(record))
    }
}

/// In-memory remote store for tests and offline development.
#[derive(Clone, Default)]
pub struct InMemoryRemoteStore {
    records: Arc<Mutex<HashMap<AccountId, RemoteRecord>>>,
}

impl InMemoryRemoteStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Test hook: read a record without going through the trait.
    #[must_use]
    pub fn record(&self, account: &AccountId) -> Option<RemoteRecord> {
        self.lock().get(account).cloned()
    }

    /// Test hook: seed a record directly.
    pub fn seed(&self, account: AccountId, record: RemoteRecord) {
        self.lock().insert(account, record);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<AccountId, RemoteRecord>> {
        self.records
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl RemoteStore for InMemoryRemoteStore {
    async fn merge_record(
        &self,
        account: &AccountId,
        record: &RemoteRecord,
    ) -> Result<(), SyncError> {
        let mut records = self.lock();
        let entry = records.entry(account.clone()).or_default();
        if let Some(progress) = &record.progress {
            entry.progress = Some(progress.clone());
        }
        if let Some(email) = &record.email {
            entry.email = Some(email.clone());
        }
        Ok(())
    }

    async fn fetch_record(&self, account: &AccountId) -> Result<Option<RemoteRecord>, SyncError> {
        Ok(self.lock().get(account).cloned())
    }
}

/// Best-effort cloud sync for the progress snapshot.
///
/// The sole failure policy on this path is: log it, move on. No retries, no
/// queueing, no user-facing errors. A push superseded by a later mutation is
/// not cancelled; both land, last response wins.
#[derive(Clone)]
pub struct SyncService {
    remote: Arc<dyn RemoteStore>,
    progress: ProgressService,
}

impl SyncService {
    #[must_use]
    pub fn new(remote: Arc<dyn RemoteStore>, progress: ProgressService) -> Self {
        Self { remote, progress }
    }

    /// Pushes the current snapshot (and the account email) to the remote
    /// record. Fire-and-forget: failures are logged, never returned.
    pub async fn push_current(&self, account: &AccountId, email: &str) {
        let record = RemoteRecord {
            progress: Some(self.progress.snapshot()),
            email: Some(email.to_string()),
        };
        if let Err(err) = self.remote.merge_record(account, &record).await {
            tracing::warn!(account = %account, error = %err, "progress sync failed");
        }
    }

    /// Pulls the remote snapshot and adopts it when it is newer than local
    /// state. Returns `true` when remote progress replaced local progress.
    pub async fn pull_and_adopt(&self, account: &AccountId) -> bool {
        let record = match self.remote.fetch_record(account).await {
            Ok(Some(record)) => record,
            Ok(None) => return false,
            Err(err) => {
                tracing::warn!(account = %account, error = %err, "progress load failed");
                return false;
            }
        };
        // A record without the nested progress field counts as absent.
        let Some(snapshot) = record.progress else {
            return false;
        };
        self.progress.adopt_remote_snapshot(snapshot).await
    }

    /// Sign-in handshake: reconcile with the remote record, then push the
    /// winning state back so the record carries the account's email.
    pub async fn handle_sign_in(&self, account: &AccountId, email: &str) {
        self.pull_and_adopt(account).await;
        self.push_current(account, email).await;
    }
}
