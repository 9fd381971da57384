//! Shared error types for the services crate.

use thiserror::Error;

use spelling_core::model::{ProgressError, QuizError};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Internal failures of `ProgressStore`.
///
/// Public `ProgressStore` operations never return these; they are logged and
/// recovered into safe defaults at the operation boundary.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressStoreError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("malformed progress document: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error(transparent)]
    Progress(#[from] ProgressError),
}

/// Errors emitted by word generation and `WordSupplier`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GenerationError {
    #[error("word generation is not configured")]
    Disabled,
    #[error("word generator returned no words")]
    NoWords,
    #[error("word generator returned an empty response")]
    EmptyResponse,
    #[error("word generator response could not be parsed: {0}")]
    Parse(String),
    #[error("word generation failed: {0}")]
    Generator(String),
    #[error("word generation request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by `SpellingService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
