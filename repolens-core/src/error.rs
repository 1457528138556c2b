//! Unified error handling system
//!
//! One error type covers every failure the analysis and reporting paths can
//! produce. The display text of each variant is the message surfaced to API
//! callers, so it is kept stable.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

pub type RepolensResult<T> = Result<T, RepolensError>;

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// Coarse classification of an error, used by the HTTP boundary to pick a
/// status code without inspecting message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidUrl,
    NotFound,
    RateLimited,
    RemoteApi,
    RepositoryFetch,
    Configuration,
    Internal,
}

/// Main error type for Repolens
#[derive(Error, Debug)]
pub enum RepolensError {
    #[error("{message}")]
    InvalidUrl { message: String, url: String },

    #[error("Repository {resource} not found")]
    NotFound { resource: String },

    #[error("{message}")]
    RateLimited {
        message: String,
        retry_after_secs: Option<u64>,
    },

    #[error("GitHub API error: {message}")]
    RemoteApi {
        message: String,
        status: Option<u16>,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("Failed to clone {url}: {message}")]
    RepositoryFetch {
        url: String,
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("{message}")]
    Configuration { message: String },

    /// A `/commits` analysis failed; wraps whatever went wrong underneath.
    #[error("Error analyzing repository: {source}")]
    Analysis {
        #[source]
        source: Box<RepolensError>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl RepolensError {
    /// Owner/name could not be extracted from a repository URL
    pub fn invalid_url(url: impl Into<String>) -> Self {
        RepolensError::InvalidUrl {
            message: "Invalid repository URL format".to_string(),
            url: url.into(),
        }
    }

    pub fn not_found(owner: &str, name: &str) -> Self {
        RepolensError::NotFound {
            resource: format!("{}/{}", owner, name),
        }
    }

    pub fn rate_limited(retry_after_secs: Option<u64>) -> Self {
        RepolensError::RateLimited {
            message: "API rate limit exceeded. Please try again later".to_string(),
            retry_after_secs,
        }
    }

    pub fn remote_api(status: Option<u16>, message: impl Into<String>) -> Self {
        RepolensError::RemoteApi {
            message: message.into(),
            status,
            source: None,
        }
    }

    /// Transport-level failure talking to the remote API
    pub fn remote_transport<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        RepolensError::RemoteApi {
            message: source.to_string(),
            status: None,
            source: Some(Box::new(source)),
        }
    }

    pub fn repository_fetch<E>(url: &str, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        RepolensError::RepositoryFetch {
            url: url.to_string(),
            message: source.to_string(),
            source: Some(Box::new(source)),
        }
    }

    /// The environment variable holding the access token is unset or empty
    pub fn missing_token(variable: &str) -> Self {
        RepolensError::Configuration {
            message: format!("{} environment variable is not set", variable),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        RepolensError::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        RepolensError::Internal {
            message: message.into(),
        }
    }

    /// Wrap a failure of the repository analysis path
    pub fn analysis(source: RepolensError) -> Self {
        match source {
            // never nest the prefix twice
            already @ RepolensError::Analysis { .. } => already,
            other => RepolensError::Analysis {
                source: Box::new(other),
            },
        }
    }

    /// Classification of this error. `Analysis` reports the kind of its cause.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RepolensError::InvalidUrl { .. } => ErrorKind::InvalidUrl,
            RepolensError::NotFound { .. } => ErrorKind::NotFound,
            RepolensError::RateLimited { .. } => ErrorKind::RateLimited,
            RepolensError::RemoteApi { .. } => ErrorKind::RemoteApi,
            RepolensError::RepositoryFetch { .. } => ErrorKind::RepositoryFetch,
            RepolensError::Configuration { .. } => ErrorKind::Configuration,
            RepolensError::Analysis { source } => source.kind(),
            RepolensError::Io(_) | RepolensError::Serialization(_) | RepolensError::Internal { .. } => {
                ErrorKind::Internal
            }
        }
    }

    /// Seconds the remote asked callers to wait, for rate-limit errors
    pub fn retry_after_secs(&self) -> Option<u64> {
        match self {
            RepolensError::RateLimited {
                retry_after_secs, ..
            } => *retry_after_secs,
            RepolensError::Analysis { source } => source.retry_after_secs(),
            _ => None,
        }
    }

    /// Check if retrying the same request later may succeed
    pub fn is_recoverable(&self) -> bool {
        match self.kind() {
            ErrorKind::RateLimited | ErrorKind::RemoteApi | ErrorKind::RepositoryFetch => true,
            ErrorKind::InvalidUrl
            | ErrorKind::NotFound
            | ErrorKind::Configuration
            | ErrorKind::Internal => false,
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self.kind() {
            ErrorKind::Internal | ErrorKind::Configuration => {
                error!(kind = ?self.kind(), error = %self, "Request failed");
            }
            ErrorKind::RateLimited | ErrorKind::RemoteApi | ErrorKind::RepositoryFetch => {
                warn!(kind = ?self.kind(), error = %self, "Upstream failure (may be recoverable)");
            }
            ErrorKind::InvalidUrl | ErrorKind::NotFound => {
                warn!(kind = ?self.kind(), error = %self, "Request rejected");
            }
        }
    }
}
