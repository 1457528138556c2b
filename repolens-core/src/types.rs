//! Core data type definitions
//!
//! Every report is built fresh for one request and serialized straight into the
//! response body; field names here are the JSON field names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Commit count for one author name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AuthorStat {
    #[cfg_attr(feature = "openapi", schema(example = "Ada Lovelace"))]
    pub name: String,
    /// Email last seen for this name during the history walk
    #[cfg_attr(feature = "openapi", schema(example = "ada@example.com"))]
    pub email: String,
    #[cfg_attr(feature = "openapi", schema(example = 42))]
    pub commit_count: u64,
}

/// One commit of a cloned repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CommitRecord {
    #[cfg_attr(
        feature = "openapi",
        schema(example = "9fceb02d0ae598e95dc970b74767f19372d61af8")
    )]
    pub hash: String,
    pub author_name: String,
    pub author_email: String,
    /// Commit (committer) time
    pub timestamp: DateTime<Utc>,
    /// Message with surrounding whitespace trimmed
    pub message: String,
    /// Inserted plus deleted lines against the first parent
    pub lines_changed: u64,
}

/// Result of `POST /api/v1/commits`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct RepositoryStats {
    pub repository_url: String,
    pub total_commits: usize,
    pub total_authors: usize,
    /// Sorted by commit count descending, then name (case-insensitive) ascending
    pub authors: Vec<AuthorStat>,
    /// Newest first, in history-walk order
    pub commits: Vec<CommitRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum PullRequestStatus {
    Open,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct PullRequestSummary {
    pub number: u64,
    pub title: String,
    pub status: PullRequestStatus,
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    /// Login of the pull request author
    pub author: String,
    pub url: String,
}

/// Result of `POST /api/v1/pull-requests`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct PullRequestStats {
    /// `owner/name`
    #[cfg_attr(feature = "openapi", schema(example = "rust-lang/rust"))]
    pub repository: String,
    pub total_pull_requests: usize,
    pub open_prs: usize,
    pub closed_prs: usize,
    /// Sorted by number descending
    pub pull_requests: Vec<PullRequestSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct UserCommitRecord {
    pub hash: String,
    pub message: String,
    pub date: DateTime<Utc>,
    pub url: String,
    pub additions: u64,
    pub deletions: u64,
    pub total_changes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct UserPullRequest {
    pub number: u64,
    pub title: String,
    /// State as reported by the hosting platform (`open` or `closed`)
    pub state: String,
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub merged: bool,
    pub merged_at: Option<DateTime<Utc>>,
    pub url: String,
    pub additions: u64,
    pub deletions: u64,
    pub changed_files: u64,
}

/// Line totals over a user's commits; pull request figures are not included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ContributionSummary {
    pub total_additions: u64,
    pub total_deletions: u64,
    pub total_changes: u64,
}

/// Result of `POST /api/v1/commits/{username}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct UserActivityStats {
    pub repository: String,
    pub username: String,
    pub total_commits: usize,
    pub total_pull_requests: usize,
    pub contribution_summary: ContributionSummary,
    /// Sorted by date descending
    pub commits: Vec<UserCommitRecord>,
    /// Sorted by creation time descending
    pub pull_requests: Vec<UserPullRequest>,
}
