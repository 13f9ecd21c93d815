use std::sync::Arc;

use async_trait::async_trait;

use dscode_core::model::{
    Catalog, Difficulty, DifficultyFilter, ImportError, ProblemId, ProgressSnapshot, TopicId,
};
use dscode_core::time::fixed_clock;
use services::ProgressService;
use storage::repository::{ProgressRepository, Storage, StorageError};

async fn sqlite_service(name: &str) -> (ProgressService, Storage) {
    let url = format!("sqlite:file:{name}?mode=memory&cache=shared");
    let storage = Storage::sqlite(&url).await.expect("connect sqlite");
    let service = ProgressService::new(
        fixed_clock(),
        Arc::new(Catalog::builtin()),
        Arc::clone(&storage.progress),
    );
    (service, storage)
}

#[tokio::test]
async fn toggles_persist_across_restarts() {
    let (service, storage) = sqlite_service("memdb_toggle_persist").await;

    service.toggle_completion(ProblemId::new("py1"), true).await;
    service.toggle_completion(ProblemId::new("np2"), true).await;
    service.toggle_completion(ProblemId::new("py1"), false).await;

    // A fresh service over the same store sees exactly the surviving state.
    let restarted = ProgressService::new(
        fixed_clock(),
        Arc::new(Catalog::builtin()),
        Arc::clone(&storage.progress),
    );
    restarted.hydrate().await;
    assert!(!restarted.is_completed(&ProblemId::new("py1")));
    assert!(restarted.is_completed(&ProblemId::new("np2")));
    assert_eq!(restarted.completed_count(), 1);
}

#[tokio::test]
async fn reset_erases_memory_and_store() {
    let (service, storage) = sqlite_service("memdb_reset").await;

    service.toggle_completion(ProblemId::new("ml1"), true).await;
    assert!(storage.progress.load_snapshot().await.unwrap().is_some());

    service.reset().await;
    assert_eq!(service.completed_count(), 0);
    assert!(storage.progress.load_snapshot().await.unwrap().is_none());

    let restarted = ProgressService::new(
        fixed_clock(),
        Arc::new(Catalog::builtin()),
        Arc::clone(&storage.progress),
    );
    restarted.hydrate().await;
    assert_eq!(restarted.completed_count(), 0);
}

#[tokio::test]
async fn import_replaces_wholesale_and_round_trips() {
    let (service, _storage) = sqlite_service("memdb_import_roundtrip").await;

    // Pre-existing state must not survive an import.
    service.toggle_completion(ProblemId::new("cv1"), true).await;

    let payload = r#"{
        "completedProblems": ["py1", "sql2", "rag3"],
        "exportDate": "2024-02-01T00:00:00Z",
        "version": "1.0"
    }"#;
    service.import_json(payload).await.expect("import");

    assert!(!service.is_completed(&ProblemId::new("cv1")));
    assert_eq!(service.completed_count(), 3);

    // Round-trip law: export carries exactly the imported set.
    let exported = service.export_file();
    let mut ids: Vec<&str> = exported
        .completed_problems
        .iter()
        .map(dscode_core::model::ProblemId::as_str)
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, ["py1", "rag3", "sql2"]);
}

#[tokio::test]
async fn malformed_import_leaves_state_unchanged() {
    let (service, _storage) = sqlite_service("memdb_import_bad").await;
    service.toggle_completion(ProblemId::new("dl2"), true).await;

    for payload in ["{not json", r#"{"problems": []}"#, r#"{"completedProblems": [1]}"#] {
        let err = service.import_json(payload).await.unwrap_err();
        assert_eq!(err, ImportError::MalformedSchema);
    }

    assert!(service.is_completed(&ProblemId::new("dl2")));
    assert_eq!(service.completed_count(), 1);
}

#[tokio::test]
async fn medium_filter_hides_every_other_tier() {
    let (service, _storage) = sqlite_service("memdb_filter_medium").await;
    service.set_filter(DifficultyFilter::Only(Difficulty::Medium), "");

    let catalog = service.catalog();
    for problem in catalog.problems() {
        assert_eq!(
            service.is_visible(problem),
            problem.difficulty() == Difficulty::Medium,
            "visibility mismatch for {}",
            problem.id()
        );
    }
}

#[tokio::test]
async fn search_filter_matches_titles_case_insensitively() {
    let (service, _storage) = sqlite_service("memdb_filter_search").await;
    service.set_filter(DifficultyFilter::All, "GRAPH");

    let catalog = service.catalog();
    let visible: Vec<&str> = catalog
        .problems()
        .iter()
        .filter(|p| service.is_visible(p))
        .map(|p| p.id().as_str())
        .collect();
    // "Planning with Graph Traversal" only.
    assert_eq!(visible, ["ag2"]);
    assert!(service.is_topic_visible(&TopicId::new("agents")));
    assert!(!service.is_topic_visible(&TopicId::new("python")));
}

/// Repository whose backing store is permanently down.
struct OutageRepository;

#[async_trait]
impl ProgressRepository for OutageRepository {
    async fn save_snapshot(&self, _snapshot: &ProgressSnapshot) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("database is locked".into()))
    }

    async fn load_snapshot(&self) -> Result<Option<ProgressSnapshot>, StorageError> {
        Err(StorageError::Unavailable("database is locked".into()))
    }

    async fn clear_snapshot(&self) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("database is locked".into()))
    }
}

#[tokio::test]
async fn storage_outage_degrades_to_in_memory_only() {
    let service = ProgressService::new(
        fixed_clock(),
        Arc::new(Catalog::builtin()),
        Arc::new(OutageRepository),
    );

    // A failing load starts the session empty without panicking.
    service.hydrate().await;
    assert_eq!(service.completed_count(), 0);

    // Mutations still apply: the in-memory set stays authoritative while
    // every write fails underneath.
    assert!(service.toggle_completion(ProblemId::new("py1"), true).await);
    assert!(service.is_completed(&ProblemId::new("py1")));
    assert!(!service.toggle_completion(ProblemId::new("py1"), true).await);
    assert_eq!(service.completed_count(), 1);
    assert_eq!(service.global_stats().completed, 1);

    // Reset clears memory even though erasing the stored snapshot fails.
    service.reset().await;
    assert_eq!(service.completed_count(), 0);
}

#[tokio::test]
async fn global_stats_track_completion() {
    let (service, _storage) = sqlite_service("memdb_stats").await;
    for id in ["py1", "py2", "ml1"] {
        service.toggle_completion(ProblemId::new(id), true).await;
    }

    let stats = service.global_stats();
    assert_eq!(stats.completed, 3);
    assert_eq!(stats.total, service.catalog().len());
    assert_eq!(stats.remaining(), stats.total - 3);

    let breakdown = service.breakdown();
    assert_eq!(breakdown.global, stats);
    let python = breakdown
        .by_topic
        .iter()
        .find(|slice| slice.topic.as_str() == "python")
        .expect("python slice");
    assert_eq!(python.stats.completed, 2);
    assert_eq!(python.stats.percentage, 50);
}
