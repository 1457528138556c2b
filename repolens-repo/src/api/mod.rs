//! Remote API client for the hosted git platform
//!
//! The contribution reports only talk to [`RemoteApiClient`]; the GitHub REST
//! implementation lives in [`github`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use repolens_core::{
    GitHubConfig, RepolensError, RepolensResult, DEFAULT_GITHUB_API_URL, DEFAULT_TOKEN_ENV,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub mod github;

#[cfg(test)]
mod tests;

pub use github::GitHubApiClient;

/// Repository handle returned by [`RemoteApiClient::get_repository`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRepository {
    pub owner: String,
    pub name: String,
    /// `owner/name` as reported by the platform
    pub full_name: String,
    pub html_url: String,
    pub default_branch: Option<String>,
}

/// State filter for pull request listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullRequestState {
    Open,
    Closed,
    All,
}

impl PullRequestState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PullRequestState::Open => "open",
            PullRequestState::Closed => "closed",
            PullRequestState::All => "all",
        }
    }
}

/// One entry of a pull request listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestRecord {
    pub number: u64,
    pub title: String,
    /// `open` or `closed`
    pub state: String,
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub merged_at: Option<DateTime<Utc>>,
    pub author_login: String,
    pub html_url: String,
}

/// Fields only available from the single pull request endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestDetails {
    pub number: u64,
    pub merged: bool,
    pub merged_at: Option<DateTime<Utc>>,
    pub additions: u64,
    pub deletions: u64,
    pub changed_files: u64,
}

/// A commit with its line statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteCommit {
    pub sha: String,
    pub message: String,
    /// Author date
    pub date: DateTime<Utc>,
    pub html_url: String,
    pub additions: u64,
    pub deletions: u64,
    pub total: u64,
}

/// Configuration for API clients
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Access token for authentication
    pub access_token: String,
    /// Environment variable the token is read from, named in errors
    pub token_env: String,
    /// Request timeout in seconds, none by default
    pub timeout_seconds: Option<u64>,
    /// User agent string
    pub user_agent: String,
    /// Page size for list endpoints
    pub per_page: u32,
    /// Additional headers
    pub headers: HashMap<String, String>,
}

impl ApiClientConfig {
    /// Configuration for api.github.com
    pub fn github(access_token: impl Into<String>) -> Self {
        let defaults = GitHubConfig::default();
        Self {
            base_url: DEFAULT_GITHUB_API_URL.to_string(),
            access_token: access_token.into(),
            token_env: DEFAULT_TOKEN_ENV.to_string(),
            timeout_seconds: None,
            user_agent: defaults.user_agent,
            per_page: defaults.per_page,
            headers: HashMap::new(),
        }
    }

    /// Build from the `[github]` configuration section and a token.
    ///
    /// A missing token is a configuration error naming the expected variable.
    pub fn from_settings(settings: &GitHubConfig, token: Option<String>) -> RepolensResult<Self> {
        let access_token = token
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| RepolensError::missing_token(&settings.token_env))?;

        Ok(Self {
            base_url: settings.api_base_url.clone(),
            access_token,
            token_env: settings.token_env.clone(),
            timeout_seconds: settings.timeout_seconds,
            user_agent: settings.user_agent.clone(),
            per_page: settings.per_page,
            headers: HashMap::new(),
        })
    }

    /// Name of the variable the token came from
    pub fn with_token_env(mut self, token_env: impl Into<String>) -> Self {
        self.token_env = token_env.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set additional header
    pub fn with_header(mut self, key: String, value: String) -> Self {
        self.headers.insert(key, value);
        self
    }

    /// Set timeout
    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = Some(timeout_seconds);
        self
    }

    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }
}

/// Queries against a hosted git platform
#[async_trait]
pub trait RemoteApiClient: Send + Sync {
    /// Look up a repository.
    ///
    /// Fails with `NotFound` (404), `RateLimited` (403/429) or `RemoteApi`.
    async fn get_repository(&self, owner: &str, name: &str) -> RepolensResult<RemoteRepository>;

    /// All pull requests in `state`, every page fetched
    async fn list_pull_requests(
        &self,
        repo: &RemoteRepository,
        state: PullRequestState,
    ) -> RepolensResult<Vec<PullRequestRecord>>;

    /// Line and merge statistics of one pull request
    async fn get_pull_request(
        &self,
        repo: &RemoteRepository,
        number: u64,
    ) -> RepolensResult<PullRequestDetails>;

    /// Commits authored by `author_login`, filtered server-side, with stats
    async fn list_commits(
        &self,
        repo: &RemoteRepository,
        author_login: &str,
    ) -> RepolensResult<Vec<RemoteCommit>>;
}

/// Helper function to create HTTP client with common configuration
pub(crate) fn create_http_client(config: &ApiClientConfig) -> RepolensResult<reqwest::Client> {
    use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};

    let mut headers = HeaderMap::new();
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(&config.user_agent).map_err(|e| invalid("user agent", e))?,
    );
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/vnd.github+json"),
    );
    headers.insert(
        HeaderName::from_static("x-github-api-version"),
        HeaderValue::from_static("2022-11-28"),
    );

    let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.access_token))
        .map_err(|e| invalid("access token", e))?;
    auth.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth);

    // Add custom headers
    for (key, value) in &config.headers {
        let header_name =
            HeaderName::from_bytes(key.as_bytes()).map_err(|e| invalid("header name", e))?;
        let header_value = HeaderValue::from_str(value).map_err(|e| invalid("header value", e))?;
        headers.insert(header_name, header_value);
    }

    let mut builder = reqwest::Client::builder().default_headers(headers);
    if let Some(timeout) = config.timeout_seconds {
        builder = builder.timeout(std::time::Duration::from_secs(timeout));
    }

    builder
        .build()
        .map_err(|e| RepolensError::configuration(format!("Failed to create HTTP client: {}", e)))
}

fn invalid(what: &str, e: impl std::fmt::Display) -> RepolensError {
    RepolensError::configuration(format!("Invalid {}: {}", what, e))
}

/// Map a non-success response to the error taxonomy.
///
/// `resource` names what was requested (`owner/name`) for the not-found message.
pub(crate) async fn handle_response_error(
    response: reqwest::Response,
    resource: &str,
) -> RepolensError {
    let status = response.status();
    let retry_after = response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok());

    match status.as_u16() {
        404 => RepolensError::NotFound {
            resource: resource.to_string(),
        },
        403 | 429 => RepolensError::rate_limited(retry_after),
        code => {
            let body = response.text().await.unwrap_or_default();
            let detail = if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("Unknown error").to_string()
            } else {
                body
            };
            RepolensError::remote_api(Some(code), format!("{} {}", code, detail.trim()))
        }
    }
}

/// URL of the next page from a `Link` header, if any
pub(crate) fn next_page_url(headers: &reqwest::header::HeaderMap) -> Option<String> {
    let link = headers.get(reqwest::header::LINK)?.to_str().ok()?;

    link.split(',').find_map(|part| {
        let mut pieces = part.split(';');
        let target = pieces.next()?.trim();
        let is_next = pieces.any(|param| {
            let param = param.trim();
            param == "rel=\"next\"" || param == "rel=next"
        });

        if is_next {
            target
                .strip_prefix('<')
                .and_then(|t| t.strip_suffix('>'))
                .map(str::to_string)
        } else {
            None
        }
    })
}
