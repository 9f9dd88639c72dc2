//! Project file discovery.
//!
//! Produces the FileSet for a run: an ordered, de-duplicated list of
//! project-relative paths, every one of which exists on disk and is not
//! marked deleted by git.
//!
//! In a git project no single query reports "every file a human would
//! consider part of the project right now", because committed history can
//! lag the working tree in either direction, so discovery unions four
//! complementary queries: tracked files, untracked-but-not-ignored files,
//! staged files, and files differing from `HEAD`.

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use ignore::WalkBuilder;
use tracing::{debug, warn};

use crate::config::RunConfig;
use crate::error::Result;
use crate::git;

/// Upper bound on the first-parent walk when searching for the divergence
/// point. A miss falls back to working-tree changes rather than hanging on
/// a pathological history.
const MAX_DIVERGENCE_WALK: usize = 1000;

/// List the project's candidate files.
///
/// `only_changed` restricts a git project to files touched since the
/// current branch diverged from a sibling branch, plus anything currently
/// staged, dirty, or untracked. Outside a git repository the refinement is
/// meaningless and degrades to the full walk with a warning.
pub fn list_files(config: &RunConfig, only_changed: bool) -> Result<Vec<String>> {
    let root = config.project_root();
    let is_git = git::is_git_repo(root);
    debug!(is_git, "project repository detection");

    if is_git {
        list_git_files(root, only_changed)
    } else {
        if only_changed {
            warn!("not a git repository, analyzing all files");
        }
        list_directory_files(root)
    }
}

/// Recursively enumerate regular files under `root`, hidden files included,
/// sorted lexicographically by relative path.
fn list_directory_files(root: &Path) -> Result<Vec<String>> {
    let mut files = BTreeSet::new();

    let walker = WalkBuilder::new(root)
        .hidden(false)
        .ignore(false)
        .parents(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .build();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("skipping unreadable entry: {e}");
                continue;
            }
        };
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }
        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        let relative = relative.to_string_lossy().replace('\\', "/");
        if relative.starts_with(".git/") {
            continue;
        }
        files.insert(relative);
    }

    Ok(files.into_iter().collect())
}

fn list_git_files(root: &Path, only_changed: bool) -> Result<Vec<String>> {
    let tracked = git::git_lines(&["ls-files"], root)?;
    let deleted: HashSet<String> = git::git_lines(&["ls-files", "--deleted"], root)?
        .into_iter()
        .collect();
    let untracked = git::git_lines(&["ls-files", "--others", "--exclude-standard"], root)?;
    // Both degrade to empty before the first commit.
    let staged = git::git_lines_optional(&["diff", "--name-only", "--cached"], root);
    let dirty = git::git_lines_optional(&["diff", "--name-only", "HEAD"], root);

    let mut files: BTreeSet<String> = tracked.into_iter().collect();
    files.extend(staged.iter().cloned());
    files.extend(dirty.iter().cloned());

    if only_changed {
        let mut changed: HashSet<String> = staged.into_iter().chain(dirty).collect();
        match divergence_commit(root) {
            Some(commit) => {
                debug!(commit = %commit, "found branch divergence point");
                let range = format!("{commit}..HEAD");
                changed.extend(git::git_lines(
                    &["log", "--name-only", "--pretty=format:", &range],
                    root,
                )?);
            }
            None => {
                warn!("could not determine parent branch, falling back to working tree changes");
            }
        }
        files.retain(|f| changed.contains(f));
    }

    // Untracked files are invisible to every history query but belong in
    // both the full and the only-changed output.
    files.extend(untracked);

    for path in &deleted {
        files.remove(path);
    }
    files.retain(|f| root.join(f).is_file());

    Ok(files.into_iter().collect())
}

/// Walk backwards from `HEAD` until reaching a commit that some other local
/// branch also contains: the nearest shared ancestor with a sibling branch,
/// which approximates where the current branch forked from its parent.
/// Returns `None` when the walk runs out of history, exceeds the search
/// bound, or `HEAD` cannot be resolved at all (a repository with no
/// commits); callers fall back to working-tree changes.
fn divergence_commit(root: &Path) -> Option<String> {
    let current = git::current_branch(root).ok()?;

    for i in 0..MAX_DIVERGENCE_WALK {
        let rev = format!("HEAD~{i}");
        let Some(output) = git::git_command_optional(
            &["branch", "--contains", &rev, "--format=%(refname:short)"],
            root,
        ) else {
            // Ran out of history without finding a shared ancestor.
            return None;
        };

        let has_sibling = output
            .lines()
            .map(str::trim)
            .any(|branch| !branch.is_empty() && branch != current);
        if has_sibling {
            return Some(rev);
        }
    }

    None
}
