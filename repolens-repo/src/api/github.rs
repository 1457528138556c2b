//! GitHub API client implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use repolens_core::{RepolensError, RepolensResult};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info, warn};
use url::Url;

use super::{
    create_http_client, handle_response_error, next_page_url, ApiClientConfig, PullRequestDetails,
    PullRequestRecord, PullRequestState, RemoteApiClient, RemoteCommit, RemoteRepository,
};

/// Login GitHub shows for pull requests whose author account was deleted
const GHOST_LOGIN: &str = "ghost";

/// GitHub API client
pub struct GitHubApiClient {
    client: reqwest::Client,
    config: ApiClientConfig,
}

#[derive(Debug, Deserialize)]
struct GitHubUser {
    login: String,
}

#[derive(Debug, Deserialize)]
struct GitHubRepository {
    name: String,
    full_name: String,
    html_url: String,
    default_branch: Option<String>,
    owner: GitHubUser,
}

#[derive(Debug, Deserialize)]
struct GitHubPullRequest {
    number: u64,
    title: String,
    state: String,
    created_at: DateTime<Utc>,
    closed_at: Option<DateTime<Utc>>,
    merged_at: Option<DateTime<Utc>>,
    user: Option<GitHubUser>,
    html_url: String,
}

#[derive(Debug, Deserialize)]
struct GitHubPullRequestDetail {
    number: u64,
    #[serde(default)]
    merged: bool,
    merged_at: Option<DateTime<Utc>>,
    #[serde(default)]
    additions: u64,
    #[serde(default)]
    deletions: u64,
    #[serde(default)]
    changed_files: u64,
}

#[derive(Debug, Deserialize)]
struct GitHubCommit {
    sha: String,
    html_url: String,
    commit: GitHubCommitData,
    stats: Option<GitHubCommitStats>,
}

#[derive(Debug, Deserialize)]
struct GitHubCommitData {
    message: String,
    author: Option<GitHubGitActor>,
    committer: Option<GitHubGitActor>,
}

#[derive(Debug, Deserialize)]
struct GitHubGitActor {
    date: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
struct GitHubCommitStats {
    #[serde(default)]
    additions: u64,
    #[serde(default)]
    deletions: u64,
    #[serde(default)]
    total: u64,
}

impl GitHubApiClient {
    /// Create a new GitHub API client. An empty access token is rejected.
    pub fn new(config: ApiClientConfig) -> RepolensResult<Self> {
        if config.access_token.trim().is_empty() {
            return Err(RepolensError::missing_token(&config.token_env));
        }
        Url::parse(&config.base_url).map_err(|e| {
            RepolensError::configuration(format!(
                "Invalid GitHub API URL '{}': {}",
                config.base_url, e
            ))
        })?;

        let client = create_http_client(&config)?;

        info!("Created GitHub API client for {}", config.base_url);

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ApiClientConfig {
        &self.config
    }

    /// Build an endpoint URL from path segments, percent-encoding each one
    fn endpoint_url(&self, segments: &[&str], query: &[(&str, String)]) -> RepolensResult<Url> {
        let mut url = Url::parse(&self.config.base_url).map_err(|e| {
            RepolensError::configuration(format!("Invalid GitHub API URL: {}", e))
        })?;

        url.path_segments_mut()
            .map_err(|_| RepolensError::configuration("GitHub API URL cannot be a base"))?
            .pop_if_empty()
            .extend(segments);

        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }

    /// Make a GET request, mapping non-success statuses to errors
    async fn get_request(&self, url: Url, resource: &str) -> RepolensResult<reqwest::Response> {
        debug!("Making GitHub API request to: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(RepolensError::remote_transport)?;

        if !response.status().is_success() {
            return Err(handle_response_error(response, resource).await);
        }

        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, resource: &str) -> RepolensResult<T> {
        let response = self.get_request(url, resource).await?;
        response.json().await.map_err(RepolensError::remote_transport)
    }

    /// Fetch every page of a list endpoint, following `Link: rel="next"`
    async fn get_paginated<T: DeserializeOwned>(
        &self,
        first_page: Url,
        resource: &str,
    ) -> RepolensResult<Vec<T>> {
        let mut items = Vec::new();
        let mut next = Some(first_page);
        let mut pages = 0usize;

        while let Some(url) = next.take() {
            let current = url.to_string();
            let response = self.get_request(url, resource).await?;
            let following = next_page_url(response.headers());
            let page: Vec<T> = response.json().await.map_err(RepolensError::remote_transport)?;

            pages += 1;
            items.extend(page);

            next = match following {
                Some(link) if link != current => Some(Url::parse(&link).map_err(|e| {
                    RepolensError::remote_api(
                        None,
                        format!("Invalid pagination link '{}': {}", link, e),
                    )
                })?),
                Some(_) => {
                    warn!(url = %current, "Pagination link points at the current page, stopping");
                    None
                }
                None => None,
            };
        }

        debug!(resource = %resource, pages, items = items.len(), "Fetched paginated listing");
        Ok(items)
    }

    async fn get_commit(&self, repo: &RemoteRepository, sha: &str) -> RepolensResult<GitHubCommit> {
        let url = self.endpoint_url(
            &["repos", repo.owner.as_str(), repo.name.as_str(), "commits", sha],
            &[],
        )?;
        self.get_json(url, &repo.full_name).await
    }
}

#[async_trait]
impl RemoteApiClient for GitHubApiClient {
    async fn get_repository(&self, owner: &str, name: &str) -> RepolensResult<RemoteRepository> {
        info!("Fetching GitHub repository {}/{}", owner, name);

        let resource = format!("{}/{}", owner, name);
        let url = self.endpoint_url(&["repos", owner, name], &[])?;
        let repo: GitHubRepository = self.get_json(url, &resource).await?;

        Ok(RemoteRepository {
            owner: repo.owner.login,
            name: repo.name,
            full_name: repo.full_name,
            html_url: repo.html_url,
            default_branch: repo.default_branch,
        })
    }

    async fn list_pull_requests(
        &self,
        repo: &RemoteRepository,
        state: PullRequestState,
    ) -> RepolensResult<Vec<PullRequestRecord>> {
        info!(
            "Listing {} pull requests for {}",
            state.as_str(),
            repo.full_name
        );

        let url = self.endpoint_url(
            &["repos", repo.owner.as_str(), repo.name.as_str(), "pulls"],
            &[
                ("state", state.as_str().to_string()),
                ("per_page", self.config.per_page.to_string()),
            ],
        )?;
        let pulls: Vec<GitHubPullRequest> = self.get_paginated(url, &repo.full_name).await?;

        Ok(pulls
            .into_iter()
            .map(|pr| PullRequestRecord {
                number: pr.number,
                title: pr.title,
                state: pr.state,
                created_at: pr.created_at,
                closed_at: pr.closed_at,
                merged_at: pr.merged_at,
                author_login: pr
                    .user
                    .map(|user| user.login)
                    .unwrap_or_else(|| GHOST_LOGIN.to_string()),
                html_url: pr.html_url,
            })
            .collect())
    }

    async fn get_pull_request(
        &self,
        repo: &RemoteRepository,
        number: u64,
    ) -> RepolensResult<PullRequestDetails> {
        debug!("Fetching pull request #{} of {}", number, repo.full_name);

        let number_segment = number.to_string();
        let url = self.endpoint_url(
            &[
                "repos",
                repo.owner.as_str(),
                repo.name.as_str(),
                "pulls",
                number_segment.as_str(),
            ],
            &[],
        )?;
        let detail: GitHubPullRequestDetail = self.get_json(url, &repo.full_name).await?;

        Ok(PullRequestDetails {
            number: detail.number,
            merged: detail.merged,
            merged_at: detail.merged_at,
            additions: detail.additions,
            deletions: detail.deletions,
            changed_files: detail.changed_files,
        })
    }

    async fn list_commits(
        &self,
        repo: &RemoteRepository,
        author_login: &str,
    ) -> RepolensResult<Vec<RemoteCommit>> {
        info!("Listing commits by {} in {}", author_login, repo.full_name);

        let url = self.endpoint_url(
            &["repos", repo.owner.as_str(), repo.name.as_str(), "commits"],
            &[
                ("author", author_login.to_string()),
                ("per_page", self.config.per_page.to_string()),
            ],
        )?;
        let listing: Vec<GitHubCommit> = self.get_paginated(url, &repo.full_name).await?;

        // the listing carries no stats; each commit is fetched individually
        let mut commits = Vec::with_capacity(listing.len());
        for item in listing {
            let detail = self.get_commit(repo, &item.sha).await?;
            let stats = detail.stats.unwrap_or_default();
            let date = detail
                .commit
                .author
                .as_ref()
                .and_then(|actor| actor.date)
                .or_else(|| detail.commit.committer.as_ref().and_then(|actor| actor.date))
                .ok_or_else(|| {
                    RepolensError::remote_api(None, format!("commit {} has no date", detail.sha))
                })?;

            commits.push(RemoteCommit {
                sha: detail.sha,
                message: detail.commit.message,
                date,
                html_url: detail.html_url,
                additions: stats.additions,
                deletions: stats.deletions,
                total: stats.total,
            });
        }

        Ok(commits)
    }
}
