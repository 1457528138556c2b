//! Contribution reports built from the remote API
//!
//! Pull request statistics for a repository, and per-user activity combining
//! authored commits with authored pull requests.

use crate::api::{PullRequestRecord, PullRequestState, RemoteApiClient, RemoteRepository};
use crate::repo_url::{parse_repository_url, RepositoryPath};
use repolens_core::{
    ContributionSummary, PullRequestStats, PullRequestStatus, PullRequestSummary, RepolensResult,
    UserActivityStats, UserCommitRecord, UserPullRequest,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Builds pull request and user activity reports
#[derive(Clone)]
pub struct ContributionAggregator {
    client: Arc<dyn RemoteApiClient>,
}

impl ContributionAggregator {
    pub fn new(client: Arc<dyn RemoteApiClient>) -> Self {
        Self { client }
    }

    /// Open and closed pull requests of the repository at `url`.
    ///
    /// Open and closed pull requests are fetched by two separate queries, so a
    /// pull request closed in between can appear in both lists.
    pub async fn get_pull_requests(&self, url: &str) -> RepolensResult<PullRequestStats> {
        let (path, repo) = self.resolve(url).await?;

        let open = self
            .client
            .list_pull_requests(&repo, PullRequestState::Open)
            .await?;
        let closed = self
            .client
            .list_pull_requests(&repo, PullRequestState::Closed)
            .await?;

        let mut pull_requests: Vec<PullRequestSummary> = open
            .into_iter()
            .map(|pr| summarize(pr, PullRequestStatus::Open))
            .chain(
                closed
                    .into_iter()
                    .map(|pr| summarize(pr, PullRequestStatus::Closed)),
            )
            .collect();
        pull_requests.sort_by(|a, b| b.number.cmp(&a.number));

        let open_prs = count_status(&pull_requests, PullRequestStatus::Open);
        let closed_prs = count_status(&pull_requests, PullRequestStatus::Closed);

        info!(
            repository = %path.full_name(),
            open = open_prs,
            closed = closed_prs,
            "Collected pull request statistics"
        );

        Ok(PullRequestStats {
            repository: path.full_name(),
            total_pull_requests: pull_requests.len(),
            open_prs,
            closed_prs,
            pull_requests,
        })
    }

    /// Commits and pull requests authored by `username` in the repository at `url`
    pub async fn get_user_activity(
        &self,
        url: &str,
        username: &str,
    ) -> RepolensResult<UserActivityStats> {
        let (path, repo) = self.resolve(url).await?;

        // A failed commit lookup reads as "no commits"; everything else propagates.
        let remote_commits = match self.client.list_commits(&repo, username).await {
            Ok(commits) => commits,
            Err(e) => {
                warn!(
                    repository = %path.full_name(),
                    username = %username,
                    error = %e,
                    "Commit lookup failed, reporting no commits"
                );
                Vec::new()
            }
        };

        let mut commits: Vec<UserCommitRecord> = remote_commits
            .into_iter()
            .map(|commit| UserCommitRecord {
                hash: commit.sha,
                message: commit.message,
                date: commit.date,
                url: commit.html_url,
                additions: commit.additions,
                deletions: commit.deletions,
                total_changes: commit.total,
            })
            .collect();
        commits.sort_by(|a, b| b.date.cmp(&a.date));

        let authored: Vec<PullRequestRecord> = self
            .client
            .list_pull_requests(&repo, PullRequestState::All)
            .await?
            .into_iter()
            .filter(|pr| pr.author_login.to_lowercase() == username.to_lowercase())
            .collect();

        let mut pull_requests = Vec::with_capacity(authored.len());
        for pr in authored {
            let details = self.client.get_pull_request(&repo, pr.number).await?;
            pull_requests.push(UserPullRequest {
                number: pr.number,
                title: pr.title,
                state: pr.state,
                created_at: pr.created_at,
                closed_at: pr.closed_at,
                merged: details.merged,
                merged_at: details.merged_at.or(pr.merged_at),
                url: pr.html_url,
                additions: details.additions,
                deletions: details.deletions,
                changed_files: details.changed_files,
            });
        }
        pull_requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let contribution_summary = summarize_commits(&commits);

        info!(
            repository = %path.full_name(),
            username = %username,
            commits = commits.len(),
            pull_requests = pull_requests.len(),
            "Collected user activity"
        );

        Ok(UserActivityStats {
            repository: path.full_name(),
            username: username.to_string(),
            total_commits: commits.len(),
            total_pull_requests: pull_requests.len(),
            contribution_summary,
            commits,
            pull_requests,
        })
    }

    /// Parse the URL, then look the repository up. A malformed URL never
    /// reaches the remote API.
    async fn resolve(&self, url: &str) -> RepolensResult<(RepositoryPath, RemoteRepository)> {
        let path = parse_repository_url(url)?;
        let repo = self.client.get_repository(&path.owner, &path.name).await?;
        Ok((path, repo))
    }
}

fn summarize(pr: PullRequestRecord, status: PullRequestStatus) -> PullRequestSummary {
    PullRequestSummary {
        number: pr.number,
        title: pr.title,
        status,
        created_at: pr.created_at,
        closed_at: match status {
            PullRequestStatus::Open => None,
            PullRequestStatus::Closed => pr.closed_at,
        },
        author: pr.author_login,
        url: pr.html_url,
    }
}

fn count_status(pull_requests: &[PullRequestSummary], status: PullRequestStatus) -> usize {
    pull_requests.iter().filter(|pr| pr.status == status).count()
}

/// Line totals over commits only
pub fn summarize_commits(commits: &[UserCommitRecord]) -> ContributionSummary {
    commits
        .iter()
        .fold(ContributionSummary::default(), |mut summary, commit| {
            summary.total_additions += commit.additions;
            summary.total_deletions += commit.deletions;
            summary.total_changes += commit.total_changes;
            summary
        })
}
