//! Repolens Repository - repository analysis and contribution reports
//!
//! Clones repositories into a disposable workspace and aggregates their commit
//! history, and queries the GitHub REST API for pull request and per-user
//! contribution statistics.

pub mod analyzer;
pub mod api;
pub mod commits;
pub mod contributions;
pub mod fetcher;
pub mod repo_url;

pub use analyzer::*;
pub use api::{ApiClientConfig, GitHubApiClient, PullRequestState, RemoteApiClient};
pub use commits::*;
pub use contributions::*;
pub use fetcher::*;
pub use repo_url::*;
