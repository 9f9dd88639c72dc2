//! File discovery integration tests against real git repositories.
//!
//! Each test builds a throwaway repository in a temp directory and checks
//! the discovered file list. Tests are skipped silently when git is not
//! installed.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::process::Command;

use omnilint::{discovery, RunConfig};
use tempfile::TempDir;

fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

fn init_repo(dir: &Path) {
    git(dir, &["init", "-q", "-b", "main"]);
    git(dir, &["config", "user.email", "test@example.com"]);
    git(dir, &["config", "user.name", "Test"]);
    git(dir, &["config", "commit.gpgsign", "false"]);
}

fn commit_all(dir: &Path, message: &str) {
    git(dir, &["add", "-A"]);
    git(dir, &["commit", "-q", "-m", message]);
}

fn config_for(dir: &Path) -> RunConfig {
    RunConfig::new(dir.to_path_buf(), Some(2), None, HashMap::new())
}

#[test]
fn directory_walk_is_sorted_and_includes_hidden_files() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("2.txt"), "b").expect("write");
    fs::write(dir.path().join("1.txt"), "a").expect("write");
    fs::write(dir.path().join(".env"), "X=1").expect("write");
    fs::create_dir(dir.path().join("sub")).expect("mkdir");
    fs::write(dir.path().join("sub/4.txt"), "d").expect("write");

    let files = discovery::list_files(&config_for(dir.path()), false).expect("list");
    assert_eq!(files, vec![".env", "1.txt", "2.txt", "sub/4.txt"]);
}

#[test]
fn only_changed_outside_git_degrades_to_full_walk() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("a.txt"), "a").expect("write");

    let files = discovery::list_files(&config_for(dir.path()), true).expect("list");
    assert_eq!(files, vec!["a.txt"]);
}

#[test]
fn empty_repository_lists_nothing() {
    if !git_available() {
        return;
    }
    let dir = TempDir::new().expect("tempdir");
    init_repo(dir.path());

    let files = discovery::list_files(&config_for(dir.path()), false).expect("list");
    assert!(files.is_empty(), "{files:?}");
}

#[test]
fn untracked_file_in_fresh_repository_is_listed() {
    if !git_available() {
        return;
    }
    let dir = TempDir::new().expect("tempdir");
    init_repo(dir.path());
    fs::write(dir.path().join("foo.txt"), "x").expect("write");

    let files = discovery::list_files(&config_for(dir.path()), false).expect("list");
    assert_eq!(files, vec!["foo.txt"]);
}

#[test]
fn staged_file_before_first_commit_is_listed() {
    if !git_available() {
        return;
    }
    let dir = TempDir::new().expect("tempdir");
    init_repo(dir.path());
    fs::write(dir.path().join("a.txt"), "a").expect("write");
    git(dir.path(), &["add", "a.txt"]);

    let files = discovery::list_files(&config_for(dir.path()), false).expect("list");
    assert_eq!(files, vec!["a.txt"]);
}

#[test]
fn ignored_files_are_not_listed() {
    if !git_available() {
        return;
    }
    let dir = TempDir::new().expect("tempdir");
    init_repo(dir.path());
    fs::write(dir.path().join(".gitignore"), "*.log\n").expect("write");
    fs::write(dir.path().join("a.txt"), "a").expect("write");
    fs::write(dir.path().join("debug.log"), "noise").expect("write");

    let files = discovery::list_files(&config_for(dir.path()), false).expect("list");
    assert_eq!(files, vec![".gitignore", "a.txt"]);
}

#[test]
fn only_changed_in_empty_repository_falls_back_to_working_tree() {
    if !git_available() {
        return;
    }
    let dir = TempDir::new().expect("tempdir");
    init_repo(dir.path());
    fs::write(dir.path().join("wip.txt"), "wip").expect("write");

    // No commits means HEAD cannot be resolved; discovery must degrade to
    // the working-tree view instead of failing the run.
    let files = discovery::list_files(&config_for(dir.path()), true).expect("list");
    assert_eq!(files, vec!["wip.txt"]);
}

#[test]
fn staged_then_deleted_file_is_excluded() {
    if !git_available() {
        return;
    }
    let dir = TempDir::new().expect("tempdir");
    init_repo(dir.path());
    fs::write(dir.path().join("a.txt"), "a").expect("write");
    git(dir.path(), &["add", "a.txt"]);
    fs::remove_file(dir.path().join("a.txt")).expect("remove");

    let files = discovery::list_files(&config_for(dir.path()), false).expect("list");
    assert!(files.is_empty(), "{files:?}");
}

#[test]
fn file_deleted_from_worktree_is_excluded() {
    if !git_available() {
        return;
    }
    let dir = TempDir::new().expect("tempdir");
    init_repo(dir.path());
    fs::write(dir.path().join("a.txt"), "a").expect("write");
    fs::write(dir.path().join("b.txt"), "b").expect("write");
    commit_all(dir.path(), "add files");
    fs::remove_file(dir.path().join("b.txt")).expect("remove");

    let files = discovery::list_files(&config_for(dir.path()), false).expect("list");
    assert_eq!(files, vec!["a.txt"]);
}

#[test]
fn only_changed_restricts_to_branch_and_worktree_changes() {
    if !git_available() {
        return;
    }
    let dir = TempDir::new().expect("tempdir");
    init_repo(dir.path());
    fs::write(dir.path().join("base.txt"), "base").expect("write");
    commit_all(dir.path(), "base");

    git(dir.path(), &["checkout", "-q", "-b", "feature"]);
    fs::write(dir.path().join("feat.txt"), "feat").expect("write");
    commit_all(dir.path(), "feature work");
    fs::write(dir.path().join("untracked.txt"), "wip").expect("write");

    let files = discovery::list_files(&config_for(dir.path()), true).expect("list");
    assert_eq!(files, vec!["feat.txt", "untracked.txt"]);
}

#[test]
fn only_changed_on_child_branch_returns_only_its_commits() {
    if !git_available() {
        return;
    }
    let dir = TempDir::new().expect("tempdir");
    init_repo(dir.path());
    fs::write(dir.path().join("base.txt"), "base").expect("write");
    commit_all(dir.path(), "base");

    git(dir.path(), &["checkout", "-q", "-b", "feature"]);
    fs::write(dir.path().join("feat.txt"), "feat").expect("write");
    commit_all(dir.path(), "feature work");

    let files = discovery::list_files(&config_for(dir.path()), true).expect("list");
    assert_eq!(files, vec!["feat.txt"]);
}

#[test]
fn full_listing_includes_unchanged_branch_files() {
    if !git_available() {
        return;
    }
    let dir = TempDir::new().expect("tempdir");
    init_repo(dir.path());
    fs::write(dir.path().join("base.txt"), "base").expect("write");
    commit_all(dir.path(), "base");

    git(dir.path(), &["checkout", "-q", "-b", "feature"]);
    fs::write(dir.path().join("feat.txt"), "feat").expect("write");
    commit_all(dir.path(), "feature work");

    let files = discovery::list_files(&config_for(dir.path()), false).expect("list");
    assert_eq!(files, vec!["base.txt", "feat.txt"]);
}
