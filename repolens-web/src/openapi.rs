//! OpenAPI specification for the Repolens API

use axum::response::Json;
use utoipa::OpenApi;

use crate::handlers::{ErrorResponse, HealthResponse, RepoRequest};
use repolens_core::{
    AuthorStat, CommitRecord, ContributionSummary, PullRequestStats, PullRequestStatus,
    PullRequestSummary, RepositoryStats, UserActivityStats, UserCommitRecord, UserPullRequest,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Repolens API",
        version = "0.1.0",
        description = "Commit statistics of git repositories and contribution reports of GitHub repositories",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:8000", description = "Local development server")
    ),
    paths(
        crate::handlers::health_check,
        crate::handlers::repository_commits,
        crate::handlers::pull_request_stats,
        crate::handlers::user_activity,
    ),
    components(
        schemas(
            HealthResponse,
            RepoRequest,
            ErrorResponse,
            AuthorStat,
            CommitRecord,
            RepositoryStats,
            PullRequestStatus,
            PullRequestSummary,
            PullRequestStats,
            UserCommitRecord,
            UserPullRequest,
            ContributionSummary,
            UserActivityStats,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Repository", description = "Statistics computed from a local clone"),
        (name = "Contributions", description = "Statistics read from the GitHub API"),
    )
)]
pub struct ApiDoc;

/// Serve the OpenAPI document
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
