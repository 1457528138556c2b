//! Shared fixtures for the endpoint tests

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{TimeZone, Utc};
use git2::{Repository, Signature, Time};
use http_body_util::BodyExt;
use repolens_core::{ErrorStatusMode, RepolensConfig, RepolensError, RepolensResult};
use repolens_repo::api::{
    PullRequestDetails, PullRequestRecord, PullRequestState, RemoteApiClient, RemoteCommit,
    RemoteRepository,
};
use repolens_web::{create_app, AppState};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower::ServiceExt;

/// In-memory stand-in for the GitHub API
pub struct FakeGitHub;

fn record(number: u64, state: &str, login: &str) -> PullRequestRecord {
    PullRequestRecord {
        number,
        title: format!("PR {}", number),
        state: state.to_string(),
        created_at: Utc.with_ymd_and_hms(2024, 1, number as u32, 0, 0, 0).unwrap(),
        closed_at: (state == "closed").then(|| Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()),
        merged_at: None,
        author_login: login.to_string(),
        html_url: format!("https://github.com/octo/demo/pull/{}", number),
    }
}

#[async_trait]
impl RemoteApiClient for FakeGitHub {
    async fn get_repository(&self, owner: &str, name: &str) -> RepolensResult<RemoteRepository> {
        match owner {
            "missing" => Err(RepolensError::not_found(owner, name)),
            "limited" => Err(RepolensError::rate_limited(Some(30))),
            _ => Ok(RemoteRepository {
                owner: owner.to_string(),
                name: name.to_string(),
                full_name: format!("{}/{}", owner, name),
                html_url: format!("https://github.com/{}/{}", owner, name),
                default_branch: Some("main".to_string()),
            }),
        }
    }

    async fn list_pull_requests(
        &self,
        _repo: &RemoteRepository,
        state: PullRequestState,
    ) -> RepolensResult<Vec<PullRequestRecord>> {
        let open = vec![record(1, "open", "alice"), record(5, "open", "bob")];
        let closed = vec![record(3, "closed", "Alice")];
        Ok(match state {
            PullRequestState::Open => open,
            PullRequestState::Closed => closed,
            PullRequestState::All => open.into_iter().chain(closed).collect(),
        })
    }

    async fn get_pull_request(
        &self,
        _repo: &RemoteRepository,
        number: u64,
    ) -> RepolensResult<PullRequestDetails> {
        Ok(PullRequestDetails {
            number,
            merged: false,
            merged_at: None,
            additions: 10,
            deletions: 2,
            changed_files: 1,
        })
    }

    async fn list_commits(
        &self,
        _repo: &RemoteRepository,
        author_login: &str,
    ) -> RepolensResult<Vec<RemoteCommit>> {
        if author_login != "alice" {
            return Ok(Vec::new());
        }
        Ok(vec![RemoteCommit {
            sha: "a".repeat(40),
            message: "Fix parser".to_string(),
            date: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            html_url: "https://github.com/octo/demo/commit/aaa".to_string(),
            additions: 7,
            deletions: 3,
            total: 10,
        }])
    }
}

pub fn config_for(workspace: &Path, mode: ErrorStatusMode) -> RepolensConfig {
    let mut config = RepolensConfig::default();
    config.workspace.root_dir = workspace.to_path_buf();
    config.errors.status_mode = mode;
    config
}

/// Router backed by [`FakeGitHub`]
pub fn app_with_remote(workspace: &Path, mode: ErrorStatusMode) -> Router {
    let state = AppState::with_remote_client(config_for(workspace, mode), Arc::new(FakeGitHub));
    create_app(state)
}

/// Router without an access token
pub fn app_without_token(workspace: &Path, mode: ErrorStatusMode) -> Router {
    let state = AppState::new(config_for(workspace, mode), None).unwrap();
    create_app(state)
}

pub async fn post_json(app: Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

/// Two commits by Alice and one by Bob, committed at fixed times
pub fn create_sample_repository(root: &Path, name: &str) -> PathBuf {
    let path = root.join(name);
    let repo = Repository::init(&path).unwrap();

    let commits = [
        ("Alice", "alice@example.com", "a.txt", "one\n", "Initial commit"),
        ("Bob", "bob@example.com", "b.txt", "x\ny\n", "Add b"),
        ("Alice", "alice@example.com", "a.txt", "one\ntwo\n", "Extend a"),
    ];

    for (offset, (author, email, file, contents, message)) in commits.into_iter().enumerate() {
        std::fs::write(path.join(file), contents).unwrap();
        let mut index = repo.index().unwrap();
        index.add_path(Path::new(file)).unwrap();
        index.write().unwrap();
        let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();

        let time = Time::new(1_700_000_000 + offset as i64 * 60, 0);
        let signature = Signature::new(author, email, &time).unwrap();
        let parent = repo.head().ok().map(|head| head.peel_to_commit().unwrap());
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
            .unwrap();
    }

    path
}
