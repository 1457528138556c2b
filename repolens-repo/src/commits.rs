//! Commit aggregation over a cloned repository
//!
//! One pass over the history, newest first, collecting per-commit records and
//! per-author counts. Authors are keyed by name only, so one person committing
//! under several emails is reported with whichever email the walk saw last.

use crate::fetcher::WorkingCopy;
use chrono::{DateTime, Utc};
use git2::{Commit, Repository, Sort};
use repolens_core::{AuthorStat, CommitRecord, RepolensError, RepolensResult, RepositoryStats};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Walks commit history and produces [`RepositoryStats`]
#[derive(Debug, Clone, Default)]
pub struct CommitAggregator;

impl CommitAggregator {
    pub fn new() -> Self {
        Self
    }

    pub fn aggregate(&self, working_copy: &WorkingCopy) -> RepolensResult<RepositoryStats> {
        self.aggregate_path(working_copy.url(), working_copy.path())
    }

    /// Aggregate the repository at `path`, reporting it under `repository_url`
    pub fn aggregate_path(
        &self,
        repository_url: &str,
        path: &Path,
    ) -> RepolensResult<RepositoryStats> {
        let repo = Repository::open(path).map_err(history_error)?;
        let commits = walk_history(&repo)?;
        let authors = tally_authors(&commits);

        debug!(
            url = %repository_url,
            commits = commits.len(),
            authors = authors.len(),
            "Aggregated commit history"
        );

        Ok(RepositoryStats {
            repository_url: repository_url.to_string(),
            total_commits: commits.len(),
            total_authors: authors.len(),
            authors,
            commits,
        })
    }
}

/// Every commit reachable from HEAD, newest first. An empty repository yields
/// an empty list.
pub fn walk_history(repo: &Repository) -> RepolensResult<Vec<CommitRecord>> {
    if repo.is_empty().map_err(history_error)? {
        return Ok(Vec::new());
    }

    let mut revwalk = repo.revwalk().map_err(history_error)?;
    revwalk.set_sorting(Sort::TIME).map_err(history_error)?;
    revwalk.push_head().map_err(history_error)?;

    let mut records = Vec::new();
    for oid in revwalk {
        let commit = repo
            .find_commit(oid.map_err(history_error)?)
            .map_err(history_error)?;
        records.push(commit_record(repo, &commit)?);
    }

    Ok(records)
}

fn commit_record(repo: &Repository, commit: &Commit<'_>) -> RepolensResult<CommitRecord> {
    let author = commit.author();
    let seconds = commit.time().seconds();
    let timestamp = DateTime::<Utc>::from_timestamp(seconds, 0).ok_or_else(|| {
        RepolensError::internal(format!(
            "commit {} has an out-of-range timestamp {}",
            commit.id(),
            seconds
        ))
    })?;

    Ok(CommitRecord {
        hash: commit.id().to_string(),
        author_name: String::from_utf8_lossy(author.name_bytes()).into_owned(),
        author_email: String::from_utf8_lossy(author.email_bytes()).into_owned(),
        timestamp,
        message: String::from_utf8_lossy(commit.message_bytes())
            .trim()
            .to_string(),
        lines_changed: lines_changed(repo, commit).map_err(history_error)?,
    })
}

/// Inserted plus deleted lines against the first parent, or against the empty
/// tree for a root commit.
fn lines_changed(repo: &Repository, commit: &Commit<'_>) -> Result<u64, git2::Error> {
    let tree = commit.tree()?;
    let parent_tree = match commit.parent_count() {
        0 => None,
        _ => Some(commit.parent(0)?.tree()?),
    };

    let diff = repo.diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)?;
    let stats = diff.stats()?;
    Ok((stats.insertions() + stats.deletions()) as u64)
}

/// Count commits per author name, most active first.
///
/// Ties are broken by case-insensitive name, then by exact name so the order
/// never depends on hashing.
pub fn tally_authors(commits: &[CommitRecord]) -> Vec<AuthorStat> {
    let mut tally: HashMap<&str, AuthorStat> = HashMap::new();

    for commit in commits {
        let entry = tally
            .entry(commit.author_name.as_str())
            .or_insert_with(|| AuthorStat {
                name: commit.author_name.clone(),
                email: String::new(),
                commit_count: 0,
            });
        entry.commit_count += 1;
        entry.email = commit.author_email.clone();
    }

    let mut authors: Vec<AuthorStat> = tally.into_values().collect();
    authors.sort_by(|a, b| {
        b.commit_count
            .cmp(&a.commit_count)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            .then_with(|| a.name.cmp(&b.name))
    });
    authors
}

fn history_error(e: git2::Error) -> RepolensError {
    RepolensError::internal(format!("failed to read commit history: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(name: &str, email: &str) -> CommitRecord {
        CommitRecord {
            hash: "0".repeat(40),
            author_name: name.to_string(),
            author_email: email.to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            message: "msg".to_string(),
            lines_changed: 1,
        }
    }

    #[test]
    fn test_tally_orders_by_count_then_name() {
        let commits = vec![
            record("carol", "c@x"),
            record("Bob", "b@x"),
            record("alice", "a@x"),
            record("carol", "c@x"),
            record("Bob", "b@x"),
        ];

        let authors = tally_authors(&commits);
        let names: Vec<&str> = authors.iter().map(|a| a.name.as_str()).collect();

        assert_eq!(names, vec!["Bob", "carol", "alice"]);
        assert_eq!(authors[0].commit_count, 2);
        assert_eq!(authors[2].commit_count, 1);
    }

    #[test]
    fn test_last_seen_email_wins() {
        // newest first, so the oldest commit's email is seen last
        let commits = vec![
            record("dana", "new@x"),
            record("dana", "old@x"),
        ];

        let authors = tally_authors(&commits);
        assert_eq!(authors.len(), 1);
        assert_eq!(authors[0].email, "old@x");
        assert_eq!(authors[0].commit_count, 2);
    }

    #[test]
    fn test_same_email_different_names_are_separate_authors() {
        let commits = vec![record("Eve", "eve@x"), record("eve", "eve@x")];

        let authors = tally_authors(&commits);
        assert_eq!(authors.len(), 2);
        assert_eq!(authors[0].name, "Eve");
        assert_eq!(authors[1].name, "eve");
    }

    #[test]
    fn test_empty_repository() {
        let dir = tempfile::tempdir().unwrap();
        Repository::init(dir.path()).unwrap();

        let stats = CommitAggregator::new()
            .aggregate_path("file:///empty", dir.path())
            .unwrap();

        assert_eq!(stats.total_commits, 0);
        assert_eq!(stats.total_authors, 0);
        assert!(stats.authors.is_empty());
        assert!(stats.commits.is_empty());
    }

    #[test]
    fn test_not_a_repository() {
        let dir = tempfile::tempdir().unwrap();
        assert!(CommitAggregator::new()
            .aggregate_path("file:///nothing", dir.path())
            .is_err());
    }
}
