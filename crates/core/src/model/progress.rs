use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::ProblemId;

/// The set of completed problems, the sole mutable core state.
///
/// Membership is the only semantics: no timestamps, no per-item metadata.
/// Ids of problems that have since left the catalog may linger here; they are
/// harmless and deliberately not pruned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Progress {
    completed: HashSet<ProblemId>,
}

impl Progress {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds progress from an iterator of completed ids.
    #[must_use]
    pub fn from_completed(ids: impl IntoIterator<Item = ProblemId>) -> Self {
        Self {
            completed: ids.into_iter().collect(),
        }
    }

    /// Marks `id` completed or not completed.
    ///
    /// Returns `true` if the set changed; toggling to the current state is a
    /// no-op. Unknown ids are accepted; validation against the catalog is
    /// the caller's concern, and deliberately not required.
    pub fn toggle(&mut self, id: ProblemId, completed: bool) -> bool {
        if completed {
            self.completed.insert(id)
        } else {
            self.completed.remove(&id)
        }
    }

    /// Empties the set.
    pub fn clear(&mut self) {
        self.completed.clear();
    }

    /// Replaces the whole set (import semantics: no merge).
    pub fn replace(&mut self, ids: impl IntoIterator<Item = ProblemId>) {
        self.completed = ids.into_iter().collect();
    }

    #[must_use]
    pub fn contains(&self, id: &ProblemId) -> bool {
        self.completed.contains(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.completed.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.completed.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProblemId> {
        self.completed.iter()
    }
}

/// Serialized projection of [`Progress`] plus provenance metadata.
///
/// This is the shape written to local storage, pushed to the remote account
/// record, and compared during hydration (`last_updated` decides which side
/// wins; see the sync service).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    pub completed_problems: Vec<ProblemId>,
    pub last_updated: DateTime<Utc>,
}

impl ProgressSnapshot {
    /// Projects the in-memory set into its persisted form.
    ///
    /// Ids are sorted so snapshots of equal sets compare equal.
    #[must_use]
    pub fn capture(progress: &Progress, at: DateTime<Utc>) -> Self {
        let mut completed_problems: Vec<ProblemId> = progress.iter().cloned().collect();
        completed_problems.sort();
        Self {
            completed_problems,
            last_updated: at,
        }
    }

    /// Rebuilds the in-memory set from this snapshot.
    #[must_use]
    pub fn into_progress(self) -> Progress {
        Progress::from_completed(self.completed_problems)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn id(s: &str) -> ProblemId {
        ProblemId::new(s)
    }

    #[test]
    fn toggle_is_idempotent_per_id() {
        let mut progress = Progress::new();
        assert!(progress.toggle(id("py1"), true));
        assert!(!progress.toggle(id("py1"), true));
        assert_eq!(progress.len(), 1);
        assert!(progress.toggle(id("py1"), false));
        assert!(!progress.toggle(id("py1"), false));
        assert!(progress.is_empty());
    }

    #[test]
    fn replay_of_toggles_yields_final_membership() {
        // Order-independent final membership: whatever was last toggled true
        // and not later toggled false.
        let mut progress = Progress::new();
        progress.toggle(id("a"), true);
        progress.toggle(id("b"), true);
        progress.toggle(id("c"), true);
        progress.toggle(id("b"), false);
        progress.toggle(id("c"), false);
        progress.toggle(id("c"), true);

        assert!(progress.contains(&id("a")));
        assert!(!progress.contains(&id("b")));
        assert!(progress.contains(&id("c")));
        assert_eq!(progress.len(), 2);
    }

    #[test]
    fn snapshot_round_trips_the_set() {
        let progress = Progress::from_completed([id("np2"), id("py1"), id("ml4")]);
        let snapshot = ProgressSnapshot::capture(&progress, fixed_now());
        assert_eq!(snapshot.completed_problems.len(), 3);
        // Sorted projection.
        assert_eq!(snapshot.completed_problems[0], id("ml4"));
        assert_eq!(snapshot.into_progress(), progress);
    }

    #[test]
    fn snapshot_serializes_with_camel_case_keys() {
        let snapshot = ProgressSnapshot::capture(&Progress::from_completed([id("py1")]), fixed_now());
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["completedProblems"][0], "py1");
        assert!(json["lastUpdated"].is_string());
    }
}
