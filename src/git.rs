//! Git subprocess helpers.
//!
//! Discovery shells out to git rather than linking a libgit2 binding; the
//! queries involved (`ls-files`, `diff --name-only`, `branch --contains`)
//! are stable plumbing and subprocess calls keep maximum compatibility.

use std::path::Path;
use std::process::Command;

use crate::error::{OmnilintError, Result};

/// Run a git command in `cwd` and return trimmed stdout.
pub fn git_command(args: &[&str], cwd: &Path) -> Result<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .output()
        .map_err(|e| OmnilintError::Git {
            message: format!("Failed to execute git: {e}"),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(OmnilintError::Git {
            message: format!("git {} failed: {}", args.join(" "), stderr.trim()),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Run a git command, returning None if it fails (for optional queries).
pub fn git_command_optional(args: &[&str], cwd: &Path) -> Option<String> {
    git_command(args, cwd).ok()
}

/// Run a git query and split its output into non-empty lines.
pub fn git_lines(args: &[&str], cwd: &Path) -> Result<Vec<String>> {
    Ok(split_lines(&git_command(args, cwd)?))
}

/// Like [`git_lines`] but degrades to an empty list on failure. Used for
/// queries that legitimately fail, e.g. `diff HEAD` before the first commit.
pub fn git_lines_optional(args: &[&str], cwd: &Path) -> Vec<String> {
    git_command_optional(args, cwd)
        .map(|out| split_lines(&out))
        .unwrap_or_default()
}

fn split_lines(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Check whether `cwd` is inside a git work tree.
pub fn is_git_repo(cwd: &Path) -> bool {
    git_command_optional(&["rev-parse", "--is-inside-work-tree"], cwd)
        .map(|s| s == "true")
        .unwrap_or(false)
}

/// Current branch name; `HEAD` when detached.
pub fn current_branch(cwd: &Path) -> Result<String> {
    git_command(&["rev-parse", "--abbrev-ref", "HEAD"], cwd)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_lines_drops_blanks() {
        assert_eq!(
            split_lines("a.txt\n\nb/c.txt\n"),
            vec!["a.txt".to_string(), "b/c.txt".to_string()]
        );
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn is_git_repo_handles_non_repo() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(!is_git_repo(dir.path()));
    }
}
