//! Mapping of domain errors onto HTTP responses

use super::types::ErrorResponse;
use axum::{
    http::{header::RETRY_AFTER, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
};
use repolens_core::{ErrorKind, ErrorStatusMode, RepolensError};

/// Error response carrying `{ "detail": message }`
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
    /// Sent as `Retry-After` when set
    pub retry_after_secs: Option<u64>,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
            retry_after_secs: None,
        }
    }

    /// The message is the error's display text in both modes. Only the typed
    /// mode forwards a rate-limit `Retry-After`.
    pub fn from_error(error: &RepolensError, mode: ErrorStatusMode) -> Self {
        let mut api_error = Self::new(status_for(error.kind(), mode), error.to_string());
        if mode == ErrorStatusMode::Typed {
            api_error.retry_after_secs = error.retry_after_secs();
        }
        api_error
    }
}

/// Status code for an error kind
pub fn status_for(kind: ErrorKind, mode: ErrorStatusMode) -> StatusCode {
    match mode {
        ErrorStatusMode::Legacy => StatusCode::BAD_REQUEST,
        ErrorStatusMode::Typed => match kind {
            ErrorKind::InvalidUrl => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ErrorKind::RemoteApi | ErrorKind::RepositoryFetch => StatusCode::BAD_GATEWAY,
            ErrorKind::Configuration => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        },
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = (
            self.status,
            Json(ErrorResponse {
                detail: self.detail,
            }),
        )
            .into_response();

        if let Some(seconds) = self.retry_after_secs {
            response
                .headers_mut()
                .insert(RETRY_AFTER, HeaderValue::from(seconds));
        }
        response
    }
}
