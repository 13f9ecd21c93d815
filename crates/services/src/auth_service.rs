use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use dscode_core::model::AccountId;

use crate::error::AuthError;
use crate::sync_service::SyncService;

/// An authenticated account, as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub account_id: AccountId,
    pub email: String,
}

impl AuthSession {
    /// Initials shown in the avatar badge (first letters of up to two words).
    #[must_use]
    pub fn initials(&self) -> String {
        self.email
            .split(['@', '.', ' '])
            .filter(|part| !part.is_empty())
            .take(2)
            .filter_map(|part| part.chars().next())
            .collect::<String>()
            .to_uppercase()
    }
}

/// Contract for the external identity provider.
///
/// The protocol itself is the provider's concern; this crate only consumes
/// the session it hands back.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// # Errors
    ///
    /// Returns `AuthError` when the credentials are rejected or the call
    /// fails.
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError>;

    /// # Errors
    ///
    /// Returns `AuthError` when the account cannot be created.
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthSession, AuthError>;

    /// # Errors
    ///
    /// Returns `AuthError` when the provider call fails.
    async fn sign_out(&self) -> Result<(), AuthError>;
}

/// Identity provider over a REST endpoint.
#[derive(Clone)]
pub struct HttpAuthProvider {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
struct CredentialsRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionResponse {
    account_id: String,
    email: String,
}

impl HttpAuthProvider {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    async fn request_session(
        &self,
        path: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, AuthError> {
        let url = format!("{}/{path}", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(url)
            .json(&CredentialsRequest { email, password })
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED
            || response.status() == reqwest::StatusCode::FORBIDDEN
        {
            return Err(AuthError::InvalidCredentials);
        }
        if !response.status().is_success() {
            return Err(AuthError::HttpStatus(response.status()));
        }

        let body: SessionResponse = response.json().await?;
        Ok(AuthSession {
            account_id: AccountId::new(body.account_id),
            email: body.email,
        })
    }
}

#[async_trait]
impl AuthProvider for HttpAuthProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        self.request_session("signIn", email, password).await
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        self.request_session("signUp", email, password).await
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        // Stateless tokens server-side; signing out is purely local.
        Ok(())
    }
}

/// The auth gateway: wraps the provider, holds the current session, and
/// drives the sync handshake on sign-in.
#[derive(Clone)]
pub struct AuthService {
    provider: Arc<dyn AuthProvider>,
    sync: SyncService,
    session: Arc<Mutex<Option<AuthSession>>>,
}

impl AuthService {
    #[must_use]
    pub fn new(provider: Arc<dyn AuthProvider>, sync: SyncService) -> Self {
        Self {
            provider,
            sync,
            session: Arc::new(Mutex::new(None)),
        }
    }

    #[must_use]
    pub fn current_session(&self) -> Option<AuthSession> {
        self.lock_session().clone()
    }

    /// Signs in and runs the cloud handshake (pull newer progress, push the
    /// winner back).
    ///
    /// # Errors
    ///
    /// Returns `AuthError` when credentials are empty or rejected. Sync
    /// failures do not fail the sign-in.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AuthError::EmptyCredentials);
        }
        let session = self.provider.sign_in(email, password).await?;
        *self.lock_session() = Some(session.clone());
        self.sync
            .handle_sign_in(&session.account_id, &session.email)
            .await;
        Ok(session)
    }

    /// Creates an account, then behaves like `sign_in`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` for empty credentials, a password shorter than
    /// six characters, or a provider failure.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AuthError::EmptyCredentials);
        }
        if password.len() < 6 {
            return Err(AuthError::WeakPassword);
        }
        let session = self.provider.sign_up(email, password).await?;
        *self.lock_session() = Some(session.clone());
        self.sync
            .handle_sign_in(&session.account_id, &session.email)
            .await;
        Ok(session)
    }

    /// Drops the session. Provider failures are logged, not surfaced; the
    /// local sign-out always succeeds.
    pub async fn sign_out(&self) {
        if let Err(err) = self.provider.sign_out().await {
            tracing::warn!(error = %err, "provider sign-out failed");
        }
        *self.lock_session() = None;
    }

    /// Best-effort push of the current snapshot when signed in. Called after
    /// local mutations so the cloud record tracks the latest state.
    pub async fn push_if_signed_in(&self) {
        let session = self.current_session();
        if let Some(session) = session {
            self.sync
                .push_current(&session.account_id, &session.email)
                .await;
        }
    }

    fn lock_session(&self) -> std::sync::MutexGuard<'_, Option<AuthSession>> {
        self.session
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initials_come_from_email_parts() {
        let session = AuthSession {
            account_id: AccountId::new("u1"),
            email: "ada.lovelace@example.com".into(),
        };
        assert_eq!(session.initials(), "AL");
    }
}
