//! Error types for the cache and the reminder scheduler
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Errors raised synchronously by `EvictableCache` operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Key not found in cache
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Overwrite attempted with a value of a different runtime type
    #[error("Different type of cache item already owns key {key} (expected {expected}, got {found})")]
    TypeConflict {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    /// Negative lifetime, negative popularity threshold and similar misuse
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Explicit key that cannot be used for textual insertion
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Pop attempted on an empty cache
    #[error("Cache is empty")]
    Empty,
}

// == Scheduler Error Enum ==
/// Errors surfaced by the reminder scheduler.
#[derive(Error, Debug)]
pub enum SchedulerError {
    /// `start` called while the tick loop is running
    #[error("Scheduler is already running")]
    AlreadyRunning,

    /// `stop` called while the scheduler is stopped
    #[error("Scheduler is not running")]
    NotRunning,

    /// Snapshot could not be read, parsed or written
    #[error("Persistence failure: {0}")]
    PersistenceFailure(String),

    /// Reminder request rejected before reaching the schedule
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Underlying cache operation failed
    #[error(transparent)]
    Cache(#[from] CacheError),
}

impl From<std::io::Error> for SchedulerError {
    fn from(err: std::io::Error) -> Self {
        SchedulerError::PersistenceFailure(err.to_string())
    }
}

impl From<serde_json::Error> for SchedulerError {
    fn from(err: serde_json::Error) -> Self {
        SchedulerError::PersistenceFailure(err.to_string())
    }
}

// == IntoResponse Implementations ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::TypeConflict { .. } => StatusCode::CONFLICT,
            CacheError::InvalidConfiguration(_) | CacheError::InvalidKey(_) => {
                StatusCode::BAD_REQUEST
            }
            CacheError::Empty => StatusCode::NOT_FOUND,
        };

        error_response(status, self.to_string())
    }
}

impl IntoResponse for SchedulerError {
    fn into_response(self) -> Response {
        match self {
            SchedulerError::Cache(err) => err.into_response(),
            SchedulerError::AlreadyRunning | SchedulerError::NotRunning => {
                error_response(StatusCode::CONFLICT, self.to_string())
            }
            SchedulerError::InvalidRequest(_) => {
                error_response(StatusCode::BAD_REQUEST, self.to_string())
            }
            SchedulerError::PersistenceFailure(_) => {
                error_response(StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        }
    }
}

fn error_response(status: StatusCode, message: String) -> Response {
    let body = Json(json!({
        "error": message
    }));

    (status, body).into_response()
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
