//! Repository fetcher
//!
//! Clones a remote repository (full history) into a directory under the
//! workspace root and hands back a [`WorkingCopy`] guard that deletes the
//! directory when dropped.
//!
//! Two concurrent fetches whose URLs end in the same repository name share a
//! clone directory and race on it; there is no locking.

use crate::repo_url::clone_dir_name;
use git2::build::RepoBuilder;
use repolens_core::{RepolensError, RepolensResult};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Clones repositories into a workspace directory
#[derive(Debug, Clone)]
pub struct RepositoryFetcher {
    workspace_root: PathBuf,
}

impl RepositoryFetcher {
    pub fn new<P: AsRef<Path>>(workspace_root: P) -> Self {
        Self {
            workspace_root: workspace_root.as_ref().to_path_buf(),
        }
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    /// Directory a clone of `url` is placed in
    pub fn clone_path(&self, url: &str) -> RepolensResult<PathBuf> {
        Ok(self.workspace_root.join(clone_dir_name(url)?))
    }

    /// Clone `url` with its entire history.
    ///
    /// Any leftover directory from an earlier crashed run is removed first. A
    /// failed clone leaves nothing behind.
    pub fn fetch(&self, url: &str) -> RepolensResult<WorkingCopy> {
        let target = self.clone_path(url)?;

        std::fs::create_dir_all(&self.workspace_root)?;
        if target.exists() {
            warn!(path = %target.display(), "Removing leftover clone directory");
            remove_dir_if_exists(&target)?;
        }

        info!(url = %url, target = %target.display(), "Cloning repository");

        match RepoBuilder::new().clone(url, &target) {
            Ok(_) => {
                info!(url = %url, "Repository cloned");
                Ok(WorkingCopy {
                    path: target,
                    url: url.to_string(),
                })
            }
            Err(e) => {
                if let Err(cleanup) = remove_dir_if_exists(&target) {
                    warn!(path = %target.display(), error = %cleanup, "Failed to remove partial clone");
                }
                Err(RepolensError::repository_fetch(url, e))
            }
        }
    }
}

/// A cloned repository on disk. The directory is removed on drop.
#[derive(Debug)]
pub struct WorkingCopy {
    path: PathBuf,
    url: String,
}

impl WorkingCopy {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// URL the working copy was cloned from
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Drop for WorkingCopy {
    fn drop(&mut self) {
        match remove_dir_if_exists(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Removed working copy"),
            Err(e) => warn!(path = %self.path.display(), error = %e, "Failed to remove working copy"),
        }
    }
}

fn remove_dir_if_exists(path: &Path) -> std::io::Result<()> {
    match std::fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}
