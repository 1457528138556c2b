//! Repository analyzer: clone, aggregate, clean up

use crate::commits::CommitAggregator;
use crate::fetcher::RepositoryFetcher;
use repolens_core::{
    log_operation_error, log_operation_start, log_operation_success, performance, RepolensError,
    RepolensResult, RepositoryStats,
};
use std::path::Path;

/// Produces [`RepositoryStats`] for a repository URL
#[derive(Debug, Clone)]
pub struct RepositoryAnalyzer {
    fetcher: RepositoryFetcher,
    aggregator: CommitAggregator,
}

impl RepositoryAnalyzer {
    pub fn new<P: AsRef<Path>>(workspace_root: P) -> Self {
        Self {
            fetcher: RepositoryFetcher::new(workspace_root),
            aggregator: CommitAggregator::new(),
        }
    }

    pub fn fetcher(&self) -> &RepositoryFetcher {
        &self.fetcher
    }

    /// Analyze `url` on a blocking worker thread.
    ///
    /// Every failure is reported as an analysis error wrapping its cause.
    pub async fn analyze(&self, url: &str) -> RepolensResult<RepositoryStats> {
        let analyzer = self.clone();
        let url = url.to_string();

        tokio::task::spawn_blocking(move || analyzer.analyze_blocking(&url))
            .await
            .map_err(|e| {
                RepolensError::analysis(RepolensError::internal(format!(
                    "analysis task failed: {}",
                    e
                )))
            })?
    }

    /// Clone, aggregate and remove the clone, on the calling thread
    pub fn analyze_blocking(&self, url: &str) -> RepolensResult<RepositoryStats> {
        log_operation_start!("analyze_repository", url = %url);

        let result = performance::measure_sync("analyze_repository", || {
            // dropping the working copy removes the clone on every path
            let working_copy = self.fetcher.fetch(url)?;
            self.aggregator.aggregate(&working_copy)
        });

        match result {
            Ok(stats) => {
                log_operation_success!(
                    "analyze_repository",
                    url = %url,
                    commits = stats.total_commits,
                    authors = stats.total_authors
                );
                Ok(stats)
            }
            Err(e) => {
                log_operation_error!("analyze_repository", e, url = %url);
                Err(RepolensError::analysis(e))
            }
        }
    }
}
