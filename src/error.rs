// src/error.rs
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::message::ChatResponse;
use crate::services::model::UpstreamError;

pub const MISSING_API_KEY_DETAIL: &str = "API Key not configured on server.";
pub const QUOTA_EXCEEDED_DETAIL: &str = "AI Quota exceeded. Please try again in 60 seconds.";

/// Every failure the HTTP layer can report. All of them are rendered as the
/// `{reply, status: "error"}` envelope with the matching status code.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{}", MISSING_API_KEY_DETAIL)]
    MissingApiKey,

    #[error("{}", QUOTA_EXCEEDED_DETAIL)]
    QuotaExceeded,

    #[error("Internal Server Error: {0}")]
    Upstream(String),

    #[error("{0}")]
    InvalidBody(#[from] JsonRejection),

    #[error("Not Found")]
    NotFound,

    #[error("Method Not Allowed")]
    MethodNotAllowed,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingApiKey | AppError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::QuotaExceeded => StatusCode::TOO_MANY_REQUESTS,
            AppError::InvalidBody(rejection) => rejection.status(),
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    /// Text placed after `Error: ` in the envelope.
    pub fn detail(&self) -> String {
        match self {
            AppError::InvalidBody(rejection) => rejection.body_text(),
            other => other.to_string(),
        }
    }
}

impl From<UpstreamError> for AppError {
    fn from(err: UpstreamError) -> Self {
        if err.is_quota_exhausted() {
            AppError::QuotaExceeded
        } else {
            AppError::Upstream(err.to_string())
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(ChatResponse::error(self.detail()))).into_response()
    }
}
