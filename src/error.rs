/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - GuardError を統一的に変換
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::auth::GuardError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("authentication backend unavailable")]
    AuthBackend,
    #[error("internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "unauthenticated".into(),
            ),
            AppError::AuthBackend => (
                StatusCode::SERVICE_UNAVAILABLE,
                "AUTH_BACKEND_UNAVAILABLE",
                "authentication backend unavailable".into(),
            ),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_SERVER_ERROR",
                "internal server error".into(),
            ),
        };

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        (status, Json(body)).into_response()
    }
}

impl From<GuardError> for AppError {
    fn from(e: GuardError) -> Self {
        match e {
            // Stores are down: the request may be fine, we just cannot tell.
            GuardError::UserStore(_) | GuardError::Session(_) => {
                tracing::error!(error = %e, "guard backend failure");
                AppError::AuthBackend
            }
            // These indicate server-side config / programming errors
            GuardError::MissingGuards | GuardError::UnknownGuard(_) => {
                tracing::error!(error = %e, "guard misconfiguration");
                AppError::Internal
            }
        }
    }
}
