//! Custom error types for the HR service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Custom error type for the HR service
///
/// `Authorization` and `NotFound` are deliberately distinct: a record that
/// exists but is outside the caller's scope is reported as forbidden, never
/// as absent.
#[derive(Error, Debug)]
pub enum HrError {
    /// Actor's role or department scope excludes the target
    #[error("Forbidden: {0}")]
    Authorization(String),

    /// Record does not exist regardless of scope
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Malformed or constraint-violating input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Attempted transition out of a terminal state
    #[error("Invalid state transition: {0}")]
    StateTransition(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal server error
    #[error("Internal server error")]
    Internal,
}

impl From<common::error::DatabaseError> for HrError {
    fn from(_: common::error::DatabaseError) -> Self {
        HrError::Internal
    }
}

impl IntoResponse for HrError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            HrError::Authorization(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            HrError::NotFound(what) => (StatusCode::NOT_FOUND, format!("{} not found", what)),
            HrError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            HrError::StateTransition(msg) => (StatusCode::CONFLICT, msg.clone()),
            HrError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                )
            }
            HrError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Type alias for HR results
pub type HrResult<T> = Result<T, HrError>;
