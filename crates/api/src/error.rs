use artlab_core::error::CoreError;
use artlab_db::BackendError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::workflow::WorkflowError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors, [`BackendError`] for direct
/// platform calls and [`WorkflowError`] for the artist workflows.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `artlab_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A platform call outside any workflow failed.
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// A workflow stopped at a named step.
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut fields: &[&'static str] = &[];

        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- Platform errors ---
            AppError::Backend(err) => {
                tracing::error!(error = %err, "Backend error");
                (StatusCode::BAD_GATEWAY, "BACKEND_ERROR", err.to_string())
            }

            // --- Workflow errors ---
            AppError::Workflow(err) => {
                let (status, code) = match err {
                    WorkflowError::Validation { fields: f, .. } => {
                        fields = f.as_slice();
                        (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
                    }
                    WorkflowError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
                    WorkflowError::Upload { .. } => (StatusCode::BAD_GATEWAY, "UPLOAD_ERROR"),
                    WorkflowError::Insert { .. } => (StatusCode::BAD_GATEWAY, "INSERT_ERROR"),
                    WorkflowError::Delete { .. } => (StatusCode::BAD_GATEWAY, "DELETE_ERROR"),
                    WorkflowError::Fetch { .. } => (StatusCode::BAD_GATEWAY, "FETCH_ERROR"),
                };
                if status == StatusCode::BAD_GATEWAY {
                    tracing::error!(error = %err, "Workflow step failed");
                }
                (status, code, err.to_string())
            }

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = if fields.is_empty() {
            json!({
                "error": message,
                "code": code,
            })
        } else {
            json!({
                "error": message,
                "code": code,
                "fields": fields,
            })
        };

        (status, axum::Json(body)).into_response()
    }
}
