use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use crate::application::AppError;
use crate::domain::AmountError;

/// Maps application errors onto HTTP responses.
/// Request problems become 4xx; anything from the store becomes a 500.
#[derive(Debug)]
pub enum ApiError {
    App(AppError),
    /// The body could not be read as the expected JSON document.
    Request(JsonRejection),
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self::App(err)
    }
}

impl From<AmountError> for ApiError {
    fn from(err: AmountError) -> Self {
        Self::App(err.into())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Request(rejection)
    }
}

fn error_code(err: &AppError) -> &'static str {
    match err {
        AppError::InsufficientBalance { .. } => "insufficient_balance",
        AppError::InvalidAmount(_) => "invalid_amount",
        AppError::LedgerCorrupted(_) | AppError::Store(_) => "internal_error",
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::Request(rejection) => {
                (rejection.status(), "invalid_request", rejection.body_text())
            }
            ApiError::App(err) if err.is_client_error() => {
                (StatusCode::BAD_REQUEST, error_code(&err), err.to_string())
            }
            ApiError::App(err) => {
                error!(error = %err, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    error_code(&err),
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": code, "message": message }))).into_response()
    }
}
