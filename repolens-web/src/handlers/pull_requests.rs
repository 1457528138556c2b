//! GitHub contribution handlers

use super::error::ApiError;
use super::types::{ErrorResponse, RepoJson, RepoRequest};
use crate::AppState;
use axum::{
    extract::{Path, State},
    response::Json,
};
use repolens_core::{PullRequestStats, UserActivityStats};
use tracing::info;

/// Report open and closed pull requests of a GitHub repository
#[utoipa::path(
    post,
    path = "/api/v1/pull-requests",
    tag = "Contributions",
    summary = "Pull request statistics",
    request_body = RepoRequest,
    responses(
        (status = 200, description = "Pull requests of the repository, newest number first", body = PullRequestStats),
        (status = 400, description = "Invalid URL, unknown repository or remote failure", body = ErrorResponse)
    )
)]
pub async fn pull_request_stats(
    State(state): State<AppState>,
    RepoJson(request): RepoJson<RepoRequest>,
) -> Result<Json<PullRequestStats>, ApiError> {
    info!(url = %request.url, "Pull request statistics requested");

    let contributions = state
        .contributions()
        .map_err(|e| state.error_response(e))?;

    contributions
        .get_pull_requests(&request.url)
        .await
        .map(Json)
        .map_err(|e| state.error_response(e))
}

/// Report commits and pull requests authored by one user
#[utoipa::path(
    post,
    path = "/api/v1/commits/{username}",
    tag = "Contributions",
    summary = "User activity",
    description = "Commits authored by the user with their line statistics, and pull requests opened by the user. The contribution summary sums commit statistics only.",
    params(
        ("username" = String, Path, description = "GitHub login, matched case-insensitively against pull request authors")
    ),
    request_body = RepoRequest,
    responses(
        (status = 200, description = "Activity of the user", body = UserActivityStats),
        (status = 400, description = "Invalid URL, unknown repository or remote failure", body = ErrorResponse)
    )
)]
pub async fn user_activity(
    State(state): State<AppState>,
    Path(username): Path<String>,
    RepoJson(request): RepoJson<RepoRequest>,
) -> Result<Json<UserActivityStats>, ApiError> {
    info!(url = %request.url, username = %username, "User activity requested");

    let contributions = state
        .contributions()
        .map_err(|e| state.error_response(e))?;

    contributions
        .get_user_activity(&request.url, &username)
        .await
        .map(Json)
        .map_err(|e| state.error_response(e))
}
