use std::sync::{Arc, Mutex};

use dscode_core::model::{TopicId, UiPrefs};
use storage::repository::PrefsRepository;

/// Write-through holder for cosmetic UI preferences (dark mode, per-topic
/// collapse). Persistence failures are logged and swallowed: losing a
/// cosmetic flag is never worth surfacing.
#[derive(Clone)]
pub struct PrefsService {
    repo: Arc<dyn PrefsRepository>,
    state: Arc<Mutex<UiPrefs>>,
}

impl PrefsService {
    #[must_use]
    pub fn new(repo: Arc<dyn PrefsRepository>) -> Self {
        Self {
            repo,
            state: Arc::new(Mutex::new(UiPrefs::default())),
        }
    }

    /// Loads persisted preferences (or keeps defaults if missing).
    pub async fn hydrate(&self) {
        match self.repo.load_prefs().await {
            Ok(Some(prefs)) => *self.lock_state() = prefs,
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(error = %err, "could not load UI preferences; using defaults");
            }
        }
    }

    #[must_use]
    pub fn dark_mode(&self) -> bool {
        self.lock_state().dark_mode
    }

    pub async fn set_dark_mode(&self, enabled: bool) {
        let prefs = {
            let mut state = self.lock_state();
            state.dark_mode = enabled;
            state.clone()
        };
        self.save(&prefs).await;
    }

    #[must_use]
    pub fn is_collapsed(&self, topic: &TopicId) -> bool {
        self.lock_state().is_collapsed(topic)
    }

    pub async fn set_collapsed(&self, topic: TopicId, collapsed: bool) {
        let prefs = {
            let mut state = self.lock_state();
            if !state.set_collapsed(topic, collapsed) {
                return;
            }
            state.clone()
        };
        self.save(&prefs).await;
    }

    #[must_use]
    pub fn current(&self) -> UiPrefs {
        self.lock_state().clone()
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, UiPrefs> {
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    async fn save(&self, prefs: &UiPrefs) {
        if let Err(err) = self.repo.save_prefs(prefs).await {
            tracing::warn!(error = %err, "could not persist UI preferences");
        }
    }
}
