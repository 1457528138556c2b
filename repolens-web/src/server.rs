//! Repolens Web Server
//!
//! Main web server implementation using Axum.

use crate::{create_app, AppState, WebError, WebResult};
use axum::serve;
use repolens_core::{ErrorStatusMode, RepolensConfig};
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing::{error, info};

/// Main Repolens web server
pub struct RepolensServer {
    config: RepolensConfig,
    state: AppState,
}

impl RepolensServer {
    /// Create a server, reading the access token from the configured variable
    pub fn new(config: RepolensConfig) -> WebResult<Self> {
        let token = config.github.token();
        Self::with_token(config, token)
    }

    pub fn with_token(config: RepolensConfig, token: Option<String>) -> WebResult<Self> {
        config.validate()?;
        let state = AppState::new(config.clone(), token)?;

        Ok(Self { config, state })
    }

    /// Start the web server
    pub async fn start(self) -> WebResult<()> {
        let address = self.config.address();

        info!("Starting Repolens Web Server");
        info!("Server address: http://{}", address);
        info!(
            "Workspace directory: {}",
            self.config.workspace.root_dir.display()
        );

        // Create the application
        let app = create_app(self.state.clone());

        // Create TCP listener
        let listener = TcpListener::bind(&address)
            .await
            .map_err(WebError::Server)?;

        info!("Server listening on http://{}", address);

        // Start the server
        if let Err(e) = serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
        {
            error!("Server error: {}", e);
            return Err(WebError::Server(e));
        }

        info!("Server shut down");
        Ok(())
    }

    /// Get server configuration
    pub fn config(&self) -> &RepolensConfig {
        &self.config
    }

    /// Get application state
    pub fn state(&self) -> &AppState {
        &self.state
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Builder for RepolensServer
pub struct RepolensServerBuilder {
    config: RepolensConfig,
    token: Option<String>,
}

impl RepolensServerBuilder {
    /// Create a new server builder
    pub fn new() -> Self {
        Self::from_config(RepolensConfig::default())
    }

    /// Start from an already loaded configuration
    pub fn from_config(config: RepolensConfig) -> Self {
        let token = config.github.token();
        Self { config, token }
    }

    /// Set the server host
    pub fn host<S: Into<String>>(mut self, host: S) -> Self {
        self.config.server.host = host.into();
        self
    }

    /// Set the server port
    pub fn port(mut self, port: u16) -> Self {
        self.config.server.port = port;
        self
    }

    /// Set the directory clones are made in
    pub fn workspace_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.config.workspace.root_dir = dir.into();
        self
    }

    pub fn error_status_mode(mut self, mode: ErrorStatusMode) -> Self {
        self.config.errors.status_mode = mode;
        self
    }

    /// Override the access token taken from the environment
    pub fn token<S: Into<String>>(mut self, token: S) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Build the server
    pub fn build(self) -> WebResult<RepolensServer> {
        RepolensServer::with_token(self.config, self.token)
    }
}

impl Default for RepolensServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
