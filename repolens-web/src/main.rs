//! Repolens Web Server
//!
//! Serves commit statistics of git repositories and contribution reports of
//! GitHub repositories over HTTP.

use anyhow::Context;
use clap::Parser;
use repolens_core::{init_logging, ErrorStatusMode, RepolensConfig};
use repolens_web::RepolensServerBuilder;
use std::path::PathBuf;
use tracing::info;

/// Repolens Web Server - repository commit and contribution statistics
#[derive(Parser)]
#[command(name = "repolens-web")]
#[command(about = "HTTP API for repository commit and contribution statistics")]
#[command(version)]
struct Args {
    /// Server host to bind to
    #[arg(long)]
    host: Option<String>,

    /// Server port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory the repositories are cloned into
    #[arg(long)]
    workspace_dir: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,

    /// Error status mapping (legacy, typed)
    #[arg(long)]
    error_status_mode: Option<ErrorStatusMode>,
}

impl Args {
    /// Apply the flags on top of the loaded configuration
    fn apply(self, config: &mut RepolensConfig) {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(dir) = self.workspace_dir {
            config.workspace.root_dir = dir;
        }
        if let Some(level) = self.log_level {
            config.logging.level = level;
        }
        if let Some(mode) = self.error_status_mode {
            config.errors.status_mode = mode;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load environment variables
    dotenvy::dotenv().ok();

    let mut config =
        RepolensConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    args.apply(&mut config);

    init_logging(&config.logging)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!(
        host = %config.server.host,
        port = config.server.port,
        status_mode = ?config.errors.status_mode,
        "Starting Repolens"
    );

    let server = RepolensServerBuilder::from_config(config)
        .build()
        .context("Failed to build server")?;

    server.start().await.context("Server failed")?;

    Ok(())
}
