use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;

use dscode_core::model::{AccountId, Catalog, ProblemId, Progress, ProgressSnapshot};
use dscode_core::time::{fixed_clock, fixed_now};
use services::{
    AuthError, AuthProvider, AuthService, AuthSession, InMemoryRemoteStore, ProgressService,
    RemoteRecord, RemoteStore, SyncService,
};
use storage::repository::Storage;

struct FakeAuthProvider;

#[async_trait]
impl AuthProvider for FakeAuthProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        if password == "wrong" {
            return Err(AuthError::InvalidCredentials);
        }
        Ok(AuthSession {
            account_id: AccountId::new(format!("uid-{email}")),
            email: email.to_string(),
        })
    }

    async fn sign_up(&self, email: &str, _password: &str) -> Result<AuthSession, AuthError> {
        Ok(AuthSession {
            account_id: AccountId::new(format!("uid-{email}")),
            email: email.to_string(),
        })
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        Ok(())
    }
}

fn build_stack() -> (ProgressService, InMemoryRemoteStore, AuthService) {
    let storage = Storage::in_memory();
    let progress = ProgressService::new(
        fixed_clock(),
        Arc::new(Catalog::builtin()),
        storage.progress,
    );
    let remote = InMemoryRemoteStore::new();
    let sync = SyncService::new(Arc::new(remote.clone()), progress.clone());
    let auth = AuthService::new(Arc::new(FakeAuthProvider), sync);
    (progress, remote, auth)
}

#[tokio::test]
async fn sign_in_adopts_newer_remote_progress() {
    let (progress, remote, auth) = build_stack();
    let account = AccountId::new("uid-ada@example.com");

    // Remote carries a snapshot newer than anything local.
    let cloud = ProgressSnapshot::capture(
        &Progress::from_completed([ProblemId::new("ml1"), ProblemId::new("ml2")]),
        fixed_now() + Duration::hours(1),
    );
    remote.seed(
        account.clone(),
        RemoteRecord {
            progress: Some(cloud),
            email: None,
        },
    );

    let session = auth.sign_in("ada@example.com", "secret1").await.expect("sign in");
    assert_eq!(session.account_id, account);

    assert!(progress.is_completed(&ProblemId::new("ml1")));
    assert!(progress.is_completed(&ProblemId::new("ml2")));

    // The handshake pushes the winner back along with the email.
    let record = remote.record(&account).expect("record exists");
    assert_eq!(record.email.as_deref(), Some("ada@example.com"));
}

#[tokio::test]
async fn local_progress_survives_stale_remote() {
    let (progress, remote, auth) = build_stack();
    let account = AccountId::new("uid-ada@example.com");

    progress.toggle_completion(ProblemId::new("py1"), true).await;

    // Remote snapshot is older than the local save (fixed clock == equal
    // timestamps count as local-current).
    let cloud = ProgressSnapshot::capture(
        &Progress::from_completed([ProblemId::new("sql1")]),
        fixed_now() - Duration::hours(1),
    );
    remote.seed(
        account.clone(),
        RemoteRecord {
            progress: Some(cloud),
            email: None,
        },
    );

    auth.sign_in("ada@example.com", "secret1").await.expect("sign in");

    assert!(progress.is_completed(&ProblemId::new("py1")));
    assert!(!progress.is_completed(&ProblemId::new("sql1")));

    // Push direction stays last-write-wins: remote now mirrors local.
    let record = remote.record(&account).expect("record exists");
    let pushed = record.progress.expect("progress pushed");
    assert_eq!(pushed.completed_problems, vec![ProblemId::new("py1")]);
}

#[tokio::test]
async fn push_after_mutation_updates_remote_record() {
    let (progress, remote, auth) = build_stack();

    auth.sign_in("ada@example.com", "secret1").await.expect("sign in");
    progress.toggle_completion(ProblemId::new("cv2"), true).await;
    auth.push_if_signed_in().await;

    let record = remote
        .record(&AccountId::new("uid-ada@example.com"))
        .expect("record exists");
    let pushed = record.progress.expect("progress pushed");
    assert_eq!(pushed.completed_problems, vec![ProblemId::new("cv2")]);
}

#[tokio::test]
async fn sign_out_drops_session_and_stops_pushes() {
    let (progress, remote, auth) = build_stack();

    auth.sign_in("ada@example.com", "secret1").await.expect("sign in");
    auth.sign_out().await;
    assert!(auth.current_session().is_none());

    progress.toggle_completion(ProblemId::new("fe1"), true).await;
    auth.push_if_signed_in().await;

    let record = remote
        .record(&AccountId::new("uid-ada@example.com"))
        .expect("record from sign-in handshake");
    let pushed = record.progress.expect("progress pushed at sign-in");
    // The post-sign-out toggle never reached the cloud.
    assert!(pushed.completed_problems.is_empty());
}

#[tokio::test]
async fn credential_validation_happens_before_the_provider() {
    let (_progress, _remote, auth) = build_stack();

    assert!(matches!(
        auth.sign_in("", "secret1").await,
        Err(AuthError::EmptyCredentials)
    ));
    assert!(matches!(
        auth.sign_up("ada@example.com", "12345").await,
        Err(AuthError::WeakPassword)
    ));
    assert!(matches!(
        auth.sign_in("ada@example.com", "wrong").await,
        Err(AuthError::InvalidCredentials)
    ));
}

#[tokio::test]
async fn record_without_progress_field_counts_as_absent() {
    let (progress, remote, _auth) = build_stack();
    let account = AccountId::new("uid-bare");
    remote.seed(
        account.clone(),
        RemoteRecord {
            progress: None,
            email: Some("bare@example.com".into()),
        },
    );

    let sync = SyncService::new(Arc::new(remote), progress.clone());
    assert!(!sync.pull_and_adopt(&account).await);
    assert_eq!(progress.completed_count(), 0);
}
