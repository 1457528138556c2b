//! Application state shared by the handlers

use crate::handlers::ApiError;
use repolens_core::{ErrorStatusMode, RepolensConfig, RepolensError, RepolensResult};
use repolens_repo::{
    ApiClientConfig, ContributionAggregator, GitHubApiClient, RemoteApiClient, RepositoryAnalyzer,
};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState {
    /// Configuration
    pub config: Arc<RepolensConfig>,
    /// Clone-and-walk analysis for `/commits`
    pub analyzer: RepositoryAnalyzer,
    /// Remote reports; absent when no access token was configured
    pub contributions: Option<ContributionAggregator>,
}

impl AppState {
    /// Build the state, creating a GitHub client when `token` is present.
    ///
    /// A missing token is not fatal here: `/commits` does not need one, and the
    /// remote endpoints report the configuration error per request.
    pub fn new(config: RepolensConfig, token: Option<String>) -> RepolensResult<Self> {
        let contributions = match token {
            Some(token) => {
                let api_config = ApiClientConfig::from_settings(&config.github, Some(token))?;
                let client = GitHubApiClient::new(api_config)?;
                Some(ContributionAggregator::new(Arc::new(client)))
            }
            None => {
                warn!(
                    "{} is not set; pull request and user activity endpoints will fail",
                    config.github.token_env
                );
                None
            }
        };

        Ok(Self::assemble(config, contributions))
    }

    /// Build the state around an existing remote client
    pub fn with_remote_client(config: RepolensConfig, client: Arc<dyn RemoteApiClient>) -> Self {
        Self::assemble(config, Some(ContributionAggregator::new(client)))
    }

    fn assemble(config: RepolensConfig, contributions: Option<ContributionAggregator>) -> Self {
        let analyzer = RepositoryAnalyzer::new(&config.workspace.root_dir);

        info!(
            workspace = %config.workspace.root_dir.display(),
            remote = contributions.is_some(),
            status_mode = ?config.errors.status_mode,
            "Application state initialized"
        );

        Self {
            config: Arc::new(config),
            analyzer,
            contributions,
        }
    }

    pub fn status_mode(&self) -> ErrorStatusMode {
        self.config.errors.status_mode
    }

    /// The contribution aggregator, or the missing-token configuration error
    pub fn contributions(&self) -> RepolensResult<&ContributionAggregator> {
        self.contributions
            .as_ref()
            .ok_or_else(|| RepolensError::missing_token(&self.config.github.token_env))
    }

    /// Log `error` and convert it to a response under the configured status mode
    pub fn error_response(&self, error: RepolensError) -> ApiError {
        error.log();
        ApiError::from_error(&error, self.status_mode())
    }
}
