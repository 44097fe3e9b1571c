use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use validator::ValidationErrors;

/// Error type returned by every handler.
///
/// Renders as `{ "error": ... }` with the matching status code. Internal
/// failures are logged and replaced with a generic message.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{message}")]
    Validation {
        message: &'static str,
        errors: ValidationErrors,
    },

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type AppResult<T> = Result<T, AppError>;

pub(crate) const INTERNAL_MESSAGE: &str = "Internal server error";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::NotFound(entity) => (
                StatusCode::NOT_FOUND,
                json!({ "error": format!("{entity} not found") }),
            ),
            AppError::Validation { message, errors } => (
                StatusCode::BAD_REQUEST,
                json!({ "error": message, "details": errors }),
            ),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, json!({ "error": msg })),
            AppError::Database(err) => {
                let (status, msg) = classify_sqlx_error(&err);
                (status, json!({ "error": msg }))
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Map a sqlx error onto a status code and the message shown to clients.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, String) {
    match err {
        sqlx::Error::RowNotFound => (StatusCode::NOT_FOUND, "Resource not found".to_string()),
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            tracing::debug!(error = %db_err, "unique constraint violated");
            (
                StatusCode::CONFLICT,
                "A record with that value already exists".to_string(),
            )
        }
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
            tracing::debug!(error = %db_err, "foreign key constraint violated");
            (StatusCode::NOT_FOUND, "User not found".to_string())
        }
        other => {
            tracing::error!(error = %other, "database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                INTERNAL_MESSAGE.to_string(),
            )
        }
    }
}
