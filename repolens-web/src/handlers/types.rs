//! Request and response types used by the handlers

use super::error::ApiError;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use repolens_core::ErrorStatusMode;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of every analysis request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RepoRequest {
    /// Repository URL
    #[schema(example = "https://github.com/rust-lang/log")]
    pub url: String,
}

/// Error body
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "Invalid repository URL format")]
    pub detail: String,
}

/// Health check response
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    #[schema(example = "0.1.0")]
    pub version: String,
}

/// JSON body extractor whose rejection uses the `{detail}` error body
pub struct RepoJson<T>(pub T);

impl<T> FromRequest<AppState> for RepoJson<T>
where
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(rejection_error(rejection, state.status_mode())),
        }
    }
}

fn rejection_error(rejection: JsonRejection, mode: ErrorStatusMode) -> ApiError {
    tracing::debug!(error = %rejection.body_text(), "Rejected request body");

    let status = match mode {
        ErrorStatusMode::Legacy => axum::http::StatusCode::BAD_REQUEST,
        ErrorStatusMode::Typed => rejection.status(),
    };
    ApiError::new(status, rejection.body_text())
}
