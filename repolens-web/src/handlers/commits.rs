//! Repository commit statistics handler

use super::error::ApiError;
use super::types::{ErrorResponse, RepoJson, RepoRequest};
use crate::AppState;
use axum::{extract::State, response::Json};
use repolens_core::RepositoryStats;
use tracing::info;

/// Clone a repository and report its commit and author statistics
#[utoipa::path(
    post,
    path = "/api/v1/commits",
    tag = "Repository",
    summary = "Repository commit statistics",
    description = "Clone the repository, walk its full history and report per-author commit counts and every commit with its line delta. The clone is removed before the response is sent.",
    request_body = RepoRequest,
    responses(
        (status = 200, description = "Statistics of the repository", body = RepositoryStats),
        (status = 400, description = "The repository could not be analyzed", body = ErrorResponse)
    )
)]
pub async fn repository_commits(
    State(state): State<AppState>,
    RepoJson(request): RepoJson<RepoRequest>,
) -> Result<Json<RepositoryStats>, ApiError> {
    info!(url = %request.url, "Repository commit statistics requested");

    state
        .analyzer
        .analyze(&request.url)
        .await
        .map(Json)
        .map_err(|e| state.error_response(e))
}
