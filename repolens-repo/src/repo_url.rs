//! Repository URL handling
//!
//! Two derivations are needed: the `owner/name` pair used against the GitHub
//! API, and the directory name a clone is placed under.

use repolens_core::{RepolensError, RepolensResult};

/// Owner and repository name extracted from a URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryPath {
    pub owner: String,
    pub name: String,
}

impl RepositoryPath {
    /// `owner/name`
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

/// Extract owner and repository name from a repository URL.
///
/// Accepts `https://host/owner/name[.git]`, scp-like `git@host:owner/name.git`
/// and bare `owner/name`. The last two non-empty path segments win, so deeper
/// paths such as `https://host/group/owner/name` resolve to `owner/name`.
pub fn parse_repository_url(url: &str) -> RepolensResult<RepositoryPath> {
    let segments = path_segments(url);

    if segments.len() < 2 {
        return Err(RepolensError::invalid_url(url));
    }

    let owner = segments[segments.len() - 2];
    let raw_name = segments[segments.len() - 1];
    let name = raw_name.strip_suffix(".git").unwrap_or(raw_name);

    if name.is_empty() {
        return Err(RepolensError::invalid_url(url));
    }

    Ok(RepositoryPath {
        owner: owner.to_string(),
        name: name.to_string(),
    })
}

/// Directory name for a clone of `url`: the final path segment with one
/// trailing `.git` removed. Query and fragment are ignored.
pub fn clone_dir_name(url: &str) -> RepolensResult<String> {
    let without_query = url.trim().split(['?', '#']).next().unwrap_or_default();
    let trimmed = without_query.trim_end_matches('/');
    let last = trimmed.rsplit(['/', ':']).next().unwrap_or_default();
    let name = last.strip_suffix(".git").unwrap_or(last);

    if name.is_empty() || name == "." || name == ".." {
        return Err(RepolensError::invalid_url(url));
    }

    Ok(name.to_string())
}

/// Path segments of a URL, with scheme, credentials, host, query and fragment
/// removed.
fn path_segments(url: &str) -> Vec<&str> {
    let url = url.trim();
    let url = url.split(['?', '#']).next().unwrap_or_default();

    let path = if let Some((_, rest)) = url.split_once("://") {
        // drop the authority part
        rest.split_once('/').map(|(_, path)| path).unwrap_or_default()
    } else if let Some((authority, path)) = url.split_once(':') {
        if authority.contains('/') {
            url
        } else {
            path
        }
    } else {
        url
    };

    path.split('/').filter(|segment| !segment.is_empty()).collect()
}
