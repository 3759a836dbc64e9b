use axum::Json;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::error::UploadError;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    /// An extractor or body read failed; keeps the status axum chose for it.
    Rejected(StatusCode, String),
    InternalServerError(String),
}

impl From<UploadError> for ApiError {
    fn from(error: UploadError) -> Self {
        ApiError::BadRequest(error.to_string())
    }
}

impl From<MultipartError> for ApiError {
    fn from(error: MultipartError) -> Self {
        ApiError::Rejected(error.status(), error.body_text())
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        ApiError::Rejected(rejection.status(), rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Rejected(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => {
                tracing::warn!(%message, "rejected request");
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            ApiError::Rejected(status, message) => {
                tracing::warn!(%status, %message, "rejected request");
                (status, Json(json!({ "error": message }))).into_response()
            }
            ApiError::InternalServerError(message) => {
                tracing::error!(%message, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}
