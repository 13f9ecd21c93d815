#![forbid(unsafe_code)]

pub mod app_services;
pub mod auth_service;
pub mod error;
pub mod prefs_service;
pub mod progress_service;
pub mod sync_service;

pub use dscode_core::Clock;

pub use app_services::{AppServices, AppServicesError};
pub use auth_service::{AuthProvider, AuthService, AuthSession, HttpAuthProvider};
pub use error::{AuthError, SyncError};
pub use prefs_service::PrefsService;
pub use progress_service::ProgressService;
pub use sync_service::{
    HttpRemoteStore, InMemoryRemoteStore, RemoteRecord, RemoteStore, SyncService,
};
