use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use dscode_core::Clock;
use dscode_core::model::{
    Catalog, CompletionBreakdown, DifficultyFilter, ExportFile, ImportError, Problem, ProblemFilter,
    ProblemId, Progress, ProgressSnapshot, ProgressStats, TopicId, completion_breakdown,
    global_stats, parse_import, topic_stats,
};
use storage::repository::ProgressRepository;

/// Mutable core state: the completed set, the transient filter, and the
/// timestamp of the snapshot the set was last reconciled with.
#[derive(Debug, Default)]
struct ProgressState {
    progress: Progress,
    filter: ProblemFilter,
    last_saved_at: Option<DateTime<Utc>>,
}

/// The progress state manager.
///
/// Owns the in-memory completed set and filter; every mutation is followed
/// by a full snapshot write. A failed write is logged and swallowed: the
/// in-memory set stays authoritative for the rest of the session and the
/// next successful write catches up. All mutations run on discrete UI (or
/// CLI) events, so the mutex is never contended in practice.
#[derive(Clone)]
pub struct ProgressService {
    clock: Clock,
    catalog: Arc<Catalog>,
    repo: Arc<dyn ProgressRepository>,
    state: Arc<Mutex<ProgressState>>,
}

impl ProgressService {
    #[must_use]
    pub fn new(clock: Clock, catalog: Arc<Catalog>, repo: Arc<dyn ProgressRepository>) -> Self {
        Self {
            clock,
            catalog,
            repo,
            state: Arc::new(Mutex::new(ProgressState::default())),
        }
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<Catalog> {
        Arc::clone(&self.catalog)
    }

    /// Hydrates the set from local storage. Called once at startup.
    ///
    /// A missing or malformed snapshot leaves the set empty; a medium
    /// failure is logged and treated the same way.
    pub async fn hydrate(&self) {
        match self.repo.load_snapshot().await {
            Ok(Some(snapshot)) => {
                let mut state = self.lock_state();
                state.last_saved_at = Some(snapshot.last_updated);
                state.progress = snapshot.into_progress();
            }
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(error = %err, "could not load progress; starting empty");
            }
        }
    }

    /// Adopts a remote snapshot if it is newer than what this instance has
    /// saved (or if nothing was ever saved locally). Returns `true` when the
    /// remote side won.
    ///
    /// Pushes stay unconditional last-write-wins; only the pull direction
    /// compares timestamps.
    pub async fn adopt_remote_snapshot(&self, snapshot: ProgressSnapshot) -> bool {
        {
            let mut state = self.lock_state();
            let local_is_current = state
                .last_saved_at
                .is_some_and(|saved| saved >= snapshot.last_updated);
            if local_is_current {
                return false;
            }
            state.last_saved_at = Some(snapshot.last_updated);
            state.progress = snapshot.clone().into_progress();
        }
        self.save(snapshot).await;
        true
    }

    /// Marks a problem completed or not. No-op when already in the requested
    /// state; otherwise persists the new snapshot before returning.
    ///
    /// Unknown ids are accepted; the UI only emits catalog ids, but the
    /// contract does not require validation.
    pub async fn toggle_completion(&self, id: ProblemId, completed: bool) -> bool {
        let snapshot = {
            let mut state = self.lock_state();
            if !state.progress.toggle(id, completed) {
                return false;
            }
            self.capture(&mut state)
        };
        self.save(snapshot).await;
        true
    }

    /// Clears all progress and erases the persisted snapshot.
    ///
    /// Destructive and irreversible; confirmation gates live in the callers.
    pub async fn reset(&self) {
        {
            let mut state = self.lock_state();
            state.progress.clear();
            state.last_saved_at = None;
        }
        if let Err(err) = self.repo.clear_snapshot().await {
            tracing::warn!(error = %err, "could not erase stored progress");
        }
    }

    #[must_use]
    pub fn is_completed(&self, id: &ProblemId) -> bool {
        self.lock_state().progress.contains(id)
    }

    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.lock_state().progress.len()
    }

    /// A copy of the current completed set, for view-model mapping.
    #[must_use]
    pub fn current_progress(&self) -> Progress {
        self.lock_state().progress.clone()
    }

    // ─── Filtering ─────────────────────────────────────────────────────────

    /// Replaces the filter state wholesale.
    pub fn set_filter(&self, difficulty: DifficultyFilter, search: impl Into<String>) {
        let mut state = self.lock_state();
        state.filter = ProblemFilter::new(difficulty, search);
    }

    #[must_use]
    pub fn filter(&self) -> ProblemFilter {
        self.lock_state().filter.clone()
    }

    /// The visibility predicate for one problem under the current filter.
    #[must_use]
    pub fn is_visible(&self, problem: &Problem) -> bool {
        self.lock_state().filter.matches(problem)
    }

    /// A topic is visible iff at least one of its problems is visible.
    #[must_use]
    pub fn is_topic_visible(&self, topic: &TopicId) -> bool {
        let filter = self.filter();
        self.catalog
            .problems_for_topic(topic)
            .any(|p| filter.matches(p))
    }

    // ─── Statistics ────────────────────────────────────────────────────────

    #[must_use]
    pub fn global_stats(&self) -> ProgressStats {
        let state = self.lock_state();
        global_stats(&self.catalog, &state.progress)
    }

    #[must_use]
    pub fn topic_stats(&self, topic: &TopicId) -> ProgressStats {
        let state = self.lock_state();
        topic_stats(&self.catalog, topic, &state.progress)
    }

    #[must_use]
    pub fn breakdown(&self) -> CompletionBreakdown {
        let state = self.lock_state();
        completion_breakdown(&self.catalog, &state.progress)
    }

    // ─── Snapshots, export, import ─────────────────────────────────────────

    /// The current set in persisted form, stamped with the clock's now.
    #[must_use]
    pub fn snapshot(&self) -> ProgressSnapshot {
        let state = self.lock_state();
        ProgressSnapshot::capture(&state.progress, self.clock.now())
    }

    /// Produces the downloadable export document.
    #[must_use]
    pub fn export_file(&self) -> ExportFile {
        let state = self.lock_state();
        ExportFile::capture(&state.progress, self.clock.now())
    }

    /// Pretty-printed JSON form of the export document.
    #[must_use]
    pub fn export_json(&self) -> String {
        // ExportFile is a plain data struct; serialization cannot fail.
        serde_json::to_string_pretty(&self.export_file())
            .unwrap_or_else(|_| String::from("{}"))
    }

    /// Replaces the set with the contents of an imported document and
    /// persists the result. The existing set is untouched on failure.
    ///
    /// # Errors
    ///
    /// Returns `ImportError::MalformedSchema` when the payload does not
    /// carry a well-formed `completedProblems` array.
    pub async fn import_json(&self, payload: &str) -> Result<(), ImportError> {
        let ids = parse_import(payload)?;
        let snapshot = {
            let mut state = self.lock_state();
            state.progress.replace(ids);
            self.capture(&mut state)
        };
        self.save(snapshot).await;
        Ok(())
    }

    // ─── Internals ─────────────────────────────────────────────────────────

    fn lock_state(&self) -> std::sync::MutexGuard<'_, ProgressState> {
        // A poisoned mutex means a panic mid-mutation on this single-writer
        // state; the set itself is still coherent, so keep going.
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn capture(&self, state: &mut ProgressState) -> ProgressSnapshot {
        let snapshot = ProgressSnapshot::capture(&state.progress, self.clock.now());
        state.last_saved_at = Some(snapshot.last_updated);
        snapshot
    }

    async fn save(&self, snapshot: ProgressSnapshot) {
        if let Err(err) = self.repo.save_snapshot(&snapshot).await {
            // Degrade to in-memory-only for this cycle.
            tracing::warn!(error = %err, "could not persist progress");
        }
    }
}
