use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::db::RepoError;

/// Every failure a handler can surface. Each variant maps to one status code
/// and a fixed JSON message; server-side causes are logged, not returned.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Email already exists")]
    Conflict,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unauthorized")]
    Unauthenticated,

    #[error("User not found")]
    NotFound,

    #[error("Error loading games")]
    CatalogUnavailable(#[source] anyhow::Error),

    #[error("Service unavailable")]
    StoreUnavailable(#[source] sqlx::Error),

    #[error("Server error")]
    Internal(#[source] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Conflict | AppError::InvalidCredentials => {
                StatusCode::BAD_REQUEST
            }
            AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::CatalogUnavailable(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Duplicate => AppError::Conflict,
            RepoError::Database(e) => AppError::StoreUnavailable(e),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::CatalogUnavailable(e) | AppError::Internal(e) => {
                error!(error = %e, "{}", self);
            }
            AppError::StoreUnavailable(e) => error!(error = %e, "database error"),
            _ => {}
        }
        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}
