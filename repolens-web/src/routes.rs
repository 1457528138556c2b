//! Route definitions for the Repolens web server

use crate::{handlers, openapi, AppState};
use axum::{
    routing::{get, post},
    Router,
};

/// Create API routes, mounted under `/api`
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        .nest("/v1", v1_routes())
}

/// Version 1 of the statistics API
pub fn v1_routes() -> Router<AppState> {
    Router::new()
        // Repository analysis
        .route("/commits", post(handlers::repository_commits))
        // GitHub contributions
        .route("/commits/{username}", post(handlers::user_activity))
        .route("/pull-requests", post(handlers::pull_request_stats))
        // Documentation
        .route("/openapi.json", get(openapi::openapi_json))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use repolens_core::RepolensConfig;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health_check_route() {
        let state = AppState::new(RepolensConfig::default(), None).unwrap();
        let app = api_routes().with_state(state);

        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/health")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
