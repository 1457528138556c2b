//! Synthetic git repositories for tests

#![allow(dead_code)]

use git2::{Commit, Oid, Repository, Signature, Time};
use std::path::{Path, PathBuf};

pub const BASE_TIME: i64 = 1_700_000_000;

/// Write `contents` to `file` and commit it on HEAD with a fixed signature
pub fn commit_file(
    repo: &Repository,
    author: (&str, &str),
    time: i64,
    file: &str,
    contents: &str,
    message: &str,
) -> Oid {
    let workdir = repo.workdir().expect("non-bare repository");
    std::fs::write(workdir.join(file), contents).unwrap();

    let mut index = repo.index().unwrap();
    index.add_path(Path::new(file)).unwrap();
    index.write().unwrap();
    let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();

    let signature = Signature::new(author.0, author.1, &Time::new(time, 0)).unwrap();
    let parents: Vec<Commit<'_>> = match repo.head() {
        Ok(head) => vec![head.peel_to_commit().unwrap()],
        Err(_) => Vec::new(),
    };
    let parent_refs: Vec<&Commit<'_>> = parents.iter().collect();

    repo.commit(
        Some("HEAD"),
        &signature,
        &signature,
        message,
        &tree,
        &parent_refs,
    )
    .unwrap()
}

/// Three commits: Alice, Bob, Alice (oldest first)
pub fn create_sample_repository(root: &Path, name: &str) -> PathBuf {
    let path = root.join(name);
    let repo = Repository::init(&path).unwrap();

    commit_file(
        &repo,
        ("Alice", "alice@old.example.com"),
        BASE_TIME,
        "a.txt",
        "one\n",
        "Initial commit",
    );
    commit_file(
        &repo,
        ("Bob", "bob@example.com"),
        BASE_TIME + 100,
        "b.txt",
        "x\ny\n",
        "Add b",
    );
    commit_file(
        &repo,
        ("Alice", "alice@new.example.com"),
        BASE_TIME + 200,
        "a.txt",
        "one\ntwo\nthree\n",
        "  Add more lines \n\n",
    );

    path
}

/// Commit the current index onto `update_ref` with explicit parents
fn commit_index(
    repo: &Repository,
    update_ref: &str,
    author: (&str, &str),
    time: i64,
    message: &str,
    parents: &[&Commit<'_>],
) -> Oid {
    let mut index = repo.index().unwrap();
    index.write().unwrap();
    let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
    let signature = Signature::new(author.0, author.1, &Time::new(time, 0)).unwrap();
    repo.commit(Some(update_ref), &signature, &signature, message, &tree, parents)
        .unwrap()
}

fn stage(repo: &Repository, file: &str, contents: &str) {
    std::fs::write(repo.workdir().unwrap().join(file), contents).unwrap();
    let mut index = repo.index().unwrap();
    index.add_path(Path::new(file)).unwrap();
    index.write().unwrap();
}

/// History with a merge, newest first:
///
/// - merge (Alice): parents `main` then `side`, tree has the two-line `a.txt`
///   and the three-line `b.txt`
/// - main (Alice): `a.txt` grows to two lines
/// - side (Bob): adds the three-line `b.txt`
/// - root (Alice): one-line `a.txt`
pub fn create_merge_repository(root: &Path, name: &str) -> PathBuf {
    let path = root.join(name);
    let repo = Repository::init(&path).unwrap();
    let alice = ("Alice", "alice@example.com");

    stage(&repo, "a.txt", "one\n");
    let root_id = commit_index(&repo, "HEAD", alice, BASE_TIME, "Root", &[]);
    let root_commit = repo.find_commit(root_id).unwrap();

    stage(&repo, "b.txt", "x\ny\nz\n");
    let side_id = commit_index(
        &repo,
        "refs/heads/side",
        ("Bob", "bob@example.com"),
        BASE_TIME + 100,
        "Side",
        &[&root_commit],
    );
    let side_commit = repo.find_commit(side_id).unwrap();

    {
        let mut index = repo.index().unwrap();
        index.remove_path(Path::new("b.txt")).unwrap();
        index.write().unwrap();
    }
    stage(&repo, "a.txt", "one\ntwo\n");
    let main_id = commit_index(&repo, "HEAD", alice, BASE_TIME + 200, "Main", &[&root_commit]);
    let main_commit = repo.find_commit(main_id).unwrap();

    stage(&repo, "b.txt", "x\ny\nz\n");
    commit_index(
        &repo,
        "HEAD",
        alice,
        BASE_TIME + 300,
        "Merge side",
        &[&main_commit, &side_commit],
    );

    path
}
