use dscode_core::model::{ProblemId, Progress, ProgressSnapshot, TopicId, UiPrefs};
use dscode_core::time::fixed_now;
use storage::repository::{PrefsRepository, ProgressRepository};
use storage::sqlite::SqliteRepository;

async fn connect(name: &str) -> SqliteRepository {
    let url = format!("sqlite:file:{name}?mode=memory&cache=shared");
    let repo = SqliteRepository::connect(&url).await.expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

#[tokio::test]
async fn sqlite_snapshot_round_trip_and_clear() {
    let repo = connect("memdb_snapshot_roundtrip").await;

    assert!(repo.load_snapshot().await.expect("load empty").is_none());

    let progress = Progress::from_completed([
        ProblemId::new("py1"),
        ProblemId::new("np3"),
        ProblemId::new("sql2"),
    ]);
    let snapshot = ProgressSnapshot::capture(&progress, fixed_now());
    repo.save_snapshot(&snapshot).await.expect("save");

    let loaded = repo.load_snapshot().await.expect("load").expect("present");
    assert_eq!(loaded, snapshot);

    // Second save overwrites, never appends.
    let smaller = ProgressSnapshot::capture(
        &Progress::from_completed([ProblemId::new("py1")]),
        fixed_now(),
    );
    repo.save_snapshot(&smaller).await.expect("save again");
    let loaded = repo.load_snapshot().await.expect("load").expect("present");
    assert_eq!(loaded.completed_problems.len(), 1);

    repo.clear_snapshot().await.expect("clear");
    assert!(repo.load_snapshot().await.expect("load cleared").is_none());
}

#[tokio::test]
async fn malformed_stored_payload_loads_as_absent() {
    let repo = connect("memdb_malformed_payload").await;

    sqlx::query(
        "INSERT INTO progress_snapshot (id, completed_problems, last_updated) VALUES (1, ?1, ?2)",
    )
    .bind("{not json")
    .bind(fixed_now().to_rfc3339())
    .execute(repo.pool())
    .await
    .expect("insert bad row");

    // Malformed storage never throws; it reads as if nothing was stored.
    assert!(repo.load_snapshot().await.expect("load").is_none());
}

#[tokio::test]
async fn malformed_stored_timestamp_loads_as_absent() {
    let repo = connect("memdb_malformed_timestamp").await;

    sqlx::query(
        "INSERT INTO progress_snapshot (id, completed_problems, last_updated) VALUES (1, ?1, ?2)",
    )
    .bind(r#"["py1"]"#)
    .bind("yesterday-ish")
    .execute(repo.pool())
    .await
    .expect("insert bad row");

    assert!(repo.load_snapshot().await.expect("load").is_none());
}

#[tokio::test]
async fn sqlite_prefs_round_trip() {
    let repo = connect("memdb_prefs_roundtrip").await;

    assert!(repo.load_prefs().await.expect("load empty").is_none());

    let prefs = UiPrefs::new(true, [TopicId::new("numpy"), TopicId::new("stats")]);
    repo.save_prefs(&prefs).await.expect("save");
    let loaded = repo.load_prefs().await.expect("load").expect("present");
    assert_eq!(loaded, prefs);

    // Expanding a topic drops its row on the next save.
    let mut updated = loaded;
    updated.set_collapsed(TopicId::new("stats"), false);
    updated.dark_mode = false;
    repo.save_prefs(&updated).await.expect("save updated");
    let loaded = repo.load_prefs().await.expect("load").expect("present");
    assert!(!loaded.dark_mode);
    assert!(loaded.is_collapsed(&TopicId::new("numpy")));
    assert!(!loaded.is_collapsed(&TopicId::new("stats")));
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let repo = connect("memdb_migrate_twice").await;
    repo.migrate().await.expect("migrate again");
    assert!(repo.load_snapshot().await.expect("load").is_none());
}
