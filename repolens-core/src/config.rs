//! Configuration management
//!
//! Layering, lowest precedence first: built-in defaults, an optional TOML file,
//! then `REPOLENS_*` environment variables. The binary applies CLI flags last.

use crate::error::{RepolensError, RepolensResult};
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_TOKEN_ENV: &str = "GITHUB_TOKEN";
pub const DEFAULT_WORKSPACE_DIR: &str = "temp_repos";

/// How errors are turned into HTTP status codes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorStatusMode {
    /// Every failure is a 400 with the error message as detail
    #[default]
    Legacy,
    /// Each error kind gets its own status code
    Typed,
}

impl FromStr for ErrorStatusMode {
    type Err = RepolensError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(ErrorStatusMode::Legacy),
            "typed" => Ok(ErrorStatusMode::Typed),
            other => Err(RepolensError::configuration(format!(
                "Unknown error status mode '{}', expected 'legacy' or 'typed'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Directory that holds the transient clones, one subdirectory per request
    pub root_dir: PathBuf,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from(DEFAULT_WORKSPACE_DIR),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    pub api_base_url: String,
    /// Name of the environment variable holding the access token
    pub token_env: String,
    pub user_agent: String,
    /// Page size used for list endpoints (1..=100)
    pub per_page: u32,
    /// No timeout unless set
    pub timeout_seconds: Option<u64>,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_GITHUB_API_URL.to_string(),
            token_env: DEFAULT_TOKEN_ENV.to_string(),
            user_agent: format!("repolens/{}", env!("CARGO_PKG_VERSION")),
            per_page: 100,
            timeout_seconds: None,
        }
    }
}

impl GitHubConfig {
    /// Read the access token from the process environment
    pub fn token(&self) -> Option<String> {
        self.token_from(|key| std::env::var(key).ok())
    }

    pub fn token_from<F>(&self, lookup: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        lookup(&self.token_env)
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorConfig {
    pub status_mode: ErrorStatusMode,
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RepolensConfig {
    pub server: ServerConfig,
    pub workspace: WorkspaceConfig,
    pub github: GitHubConfig,
    pub errors: ErrorConfig,
    pub logging: LoggingConfig,
}

impl RepolensConfig {
    /// Load from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> RepolensResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            RepolensError::configuration(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        toml::from_str(&content).map_err(|e| {
            RepolensError::configuration(format!("Failed to parse config: {}", e))
        })
    }

    /// Defaults, then the optional file, then the process environment
    pub fn load(path: Option<&Path>) -> RepolensResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Override fields from `REPOLENS_*` variables supplied by `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> RepolensResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("REPOLENS_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("REPOLENS_PORT") {
            self.server.port = port.parse().map_err(|_| {
                RepolensError::configuration(format!("REPOLENS_PORT is not a valid port: {}", port))
            })?;
        }
        if let Some(dir) = lookup("REPOLENS_WORKSPACE_DIR") {
            self.workspace.root_dir = PathBuf::from(dir);
        }
        if let Some(url) = lookup("REPOLENS_GITHUB_API_URL") {
            self.github.api_base_url = url;
        }
        if let Some(mode) = lookup("REPOLENS_ERROR_STATUS_MODE") {
            self.errors.status_mode = mode.parse()?;
        }
        if let Some(level) = lookup("REPOLENS_LOG_LEVEL") {
            self.logging.level = level;
        }
        Ok(())
    }

    /// Save to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> RepolensResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| {
            RepolensError::configuration(format!("Failed to serialize config: {}", e))
        })?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> RepolensResult<()> {
        if self.workspace.root_dir.as_os_str().is_empty() {
            return Err(RepolensError::configuration(
                "workspace.root_dir must not be empty",
            ));
        }

        if !(1..=100).contains(&self.github.per_page) {
            return Err(RepolensError::configuration(
                "github.per_page must be between 1 and 100",
            ));
        }

        if self.github.api_base_url.trim().is_empty() {
            return Err(RepolensError::configuration(
                "github.api_base_url must not be empty",
            ));
        }

        Ok(())
    }

    /// Socket address the server binds to
    pub fn address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
