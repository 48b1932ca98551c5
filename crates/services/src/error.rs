//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;
use studio_core::model::IdentityError;

/// Errors emitted by `ProgressStore` mutations.
///
/// Corrupt stored values never show up here; they are replaced by defaults
/// on load. Only failed writes do.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("failed to encode progress: {0}")]
    Encode(#[from] serde_json::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `SessionManager`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error(transparent)]
    Progress(#[from] ProgressError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `TutorConfig`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TutorConfigError {
    #[error("tutor API key is empty")]
    EmptyApiKey,
    #[error("invalid tutor base URL: {0}")]
    InvalidBaseUrl(String),
}

/// Errors emitted by `TutorService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TutorError {
    #[error("AI tutor is not configured")]
    Disabled,
    #[error("question is empty")]
    EmptyQuestion,
    #[error("AI tutor returned an empty response")]
    EmptyResponse,
    #[error("AI tutor request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    TutorConfig(#[from] TutorConfigError),
}
