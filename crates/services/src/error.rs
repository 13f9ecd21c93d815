//! Shared error types for the services crate.

use thiserror::Error;

/// Errors on the remote sync path.
///
/// These are never surfaced to the user: the sync service logs them and
/// moves on. No retries: the design accepts eventual-consistency gaps over
/// added complexity.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SyncError {
    #[error("remote store request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by the auth gateway.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error("please enter email and password")]
    EmptyCredentials,
    #[error("password must be at least 6 characters")]
    WeakPassword,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("auth request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}
