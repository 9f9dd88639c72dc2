//! Tool scheduling and outcome aggregation.
//!
//! The scheduler walks the catalog in order, routes each discovered file to
//! the tools whose patterns match it, and turns every (tool, file) pair
//! into a job. Lint jobs are independent reads, so they run concurrently
//! under a semaphore-bounded budget. Fmt jobs rewrite files in place and
//! several tools touch the same file, so they run one at a time in catalog
//! order.
//!
//! Nothing a job does is a run-level error: a failing tool, a missing
//! binary, or a timeout just increments the found counter and is reported.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::config::RunConfig;
use crate::error::Result;
use crate::exec::{self, ExecutionResult};
use crate::git;
use crate::pattern;
use crate::report;
use crate::resolver;
use crate::tally::RunTally;
use crate::tool::{
    CommandSpec, CustomRoutine, Invocation, Mode, PreAllHook, PreFileHook, ToolSpec, Workdir,
};

/// Run every applicable (tool, file) job and return the final tally.
pub async fn run(
    mode: Mode,
    files: &[String],
    catalog: &[ToolSpec],
    config: &RunConfig,
) -> Result<RunTally> {
    let tally = Arc::new(RunTally::new());
    let config = Arc::new(config.clone());
    let semaphore = Arc::new(Semaphore::new(config.jobs()));
    let mut jobs: JoinSet<()> = JoinSet::new();

    for tool in catalog {
        if !config.tool_enabled(&tool.env_name) {
            report::tool_skipped(&tool.name, "disabled by environment");
            continue;
        }
        if tool.pre_all == Some(PreAllHook::RequireGitRepo)
            && !git::is_git_repo(config.project_root())
        {
            report::tool_skipped(&tool.name, "not a git repository");
            continue;
        }

        let invocation = match mode {
            Mode::Lint => Some(&tool.lint),
            // Lint-only tools have nothing to do in fmt mode.
            Mode::Fmt => tool.fmt.as_ref(),
        };
        let Some(invocation) = invocation else {
            continue;
        };

        let patterns = pattern::compile_all(&tool.file_match);
        for file in files {
            if !pattern::match_any(file, &patterns) {
                continue;
            }
            if tool.pre_file == Some(PreFileHook::SkipPrivatePackageJson)
                && is_private_package_json(config.project_root(), file)
            {
                report::file_skipped(&tool.name, file, "private package");
                continue;
            }

            let job = Job {
                tool_name: tool.name.clone(),
                invocation: invocation.clone(),
                mode,
                file: file.clone(),
                config: Arc::clone(&config),
                tally: Arc::clone(&tally),
            };
            match mode {
                Mode::Lint => {
                    let semaphore = Arc::clone(&semaphore);
                    jobs.spawn(async move {
                        let Ok(_permit) = semaphore.acquire_owned().await else {
                            return;
                        };
                        job.execute().await;
                    });
                }
                Mode::Fmt => job.execute().await,
            }
        }
    }

    while jobs.join_next().await.is_some() {}

    let tally = Arc::try_unwrap(tally)
        .unwrap_or_else(|shared| RunTally::from_counts(shared.found(), shared.fixed()));
    Ok(tally)
}

struct Job {
    tool_name: String,
    invocation: Invocation,
    mode: Mode,
    file: String,
    config: Arc<RunConfig>,
    tally: Arc<RunTally>,
}

impl Job {
    async fn execute(&self) {
        match &self.invocation {
            Invocation::Command(spec) => match self.mode {
                Mode::Lint => self.lint_command(spec).await,
                Mode::Fmt => self.fmt_command(spec).await,
            },
            Invocation::Custom(CustomRoutine::GitUntrackIgnored) => self.untrack_ignored().await,
        }
    }

    async fn lint_command(&self, spec: &CommandSpec) {
        let result = self.invoke(spec).await;
        if spec.success.accepts(result.exit_code) {
            report::lint_success(&self.tool_name, &self.file, &result);
        } else {
            self.tally.add_found();
            report::lint_fail(&self.tool_name, &self.file, &result);
        }
    }

    /// Fix outcomes are classified by content change, not by tool output:
    /// the file digest before and after the run decides whether a problem
    /// was found and fixed or the file was already clean.
    async fn fmt_command(&self, spec: &CommandSpec) {
        let path = self.config.project_root().join(&self.file);
        let before = exec::hash_file(&path).await.ok();
        let result = self.invoke(spec).await;

        if !spec.success.accepts(result.exit_code) {
            self.tally.add_found();
            report::fixing_error(&self.tool_name, &self.file, &result);
            return;
        }

        let after = exec::hash_file(&path).await.ok();
        match (before, after) {
            (Some(before), Some(after)) if before == after => {
                report::fixing_unchanged(&self.tool_name, &self.file);
            }
            (Some(_), Some(_)) => {
                self.tally.add_found();
                self.tally.add_fixed();
                report::fixing_success(&self.tool_name, &self.file);
            }
            // An unhashable file (unreadable before, or gone after the tool
            // ran) cannot be verified as fixed.
            _ => {
                self.tally.add_found();
                report::fixing_error(&self.tool_name, &self.file, &result);
            }
        }
    }

    /// A tracked-but-ignored file is the problem; `git rm --cached` is the
    /// fix. Exit code 0 from check-ignore means the file is ignored.
    async fn untrack_ignored(&self) {
        let root = self.config.project_root();
        let check = self
            .git(&["git", "check-ignore", "--no-index", &self.file], root)
            .await;
        if check.exit_code != Some(0) {
            report::fixing_unchanged(&self.tool_name, &self.file);
            return;
        }

        self.tally.add_found();
        let rm = self.git(&["git", "rm", "--cached", &self.file], root).await;
        if rm.exit_code == Some(0) {
            self.tally.add_fixed();
            report::fixing_success(&self.tool_name, &self.file);
        } else {
            report::fixing_error(&self.tool_name, &self.file, &rm);
        }
    }

    async fn git(&self, argv: &[&str], cwd: &Path) -> ExecutionResult {
        let argv: Vec<String> = argv.iter().map(|a| a.to_string()).collect();
        exec::run_command(&argv, cwd, &[], self.config.timeout()).await
    }

    /// Resolve config, prepare the working directory, substitute argv
    /// placeholders, and run.
    async fn invoke(&self, spec: &CommandSpec) -> ExecutionResult {
        let root = self.config.project_root();
        let config_args = match &spec.config {
            Some(query) => resolver::resolve(&self.config, query),
            None => Vec::new(),
        };

        // Scratch guards live until the command finishes.
        let mut workdir_guard = None;
        let (cwd, file, subst_root) = match spec.workdir {
            Workdir::ScratchCopy => match exec::scratch_copy(root, &self.file) {
                Ok((dir, name)) => {
                    let cwd = dir.path().to_path_buf();
                    let scratch_root = dir.path().to_path_buf();
                    workdir_guard = Some(dir);
                    (cwd, name, scratch_root)
                }
                Err(e) => return self.scratch_failure(spec, e),
            },
            Workdir::Scratch => match exec::scratch_dir() {
                Ok(dir) => {
                    let cwd = dir.path().to_path_buf();
                    workdir_guard = Some(dir);
                    (cwd, self.file.clone(), root.to_path_buf())
                }
                Err(e) => return self.scratch_failure(spec, e),
            },
            workdir => (
                exec::effective_cwd(workdir, root, &self.file),
                self.file.clone(),
                root.to_path_buf(),
            ),
        };

        let scratch_arg = if spec.argv.iter().any(|a| a.contains("#scratch#")) {
            match exec::scratch_dir() {
                Ok(dir) => Some(dir),
                Err(e) => return self.scratch_failure(spec, e),
            }
        } else {
            None
        };

        let argv = exec::substitute(
            &spec.argv,
            &file,
            &subst_root,
            &config_args,
            scratch_arg.as_ref().map(|d| d.path()),
        );
        let result = exec::run_command(&argv, &cwd, &spec.env, self.config.timeout()).await;
        drop(workdir_guard);
        result
    }

    fn scratch_failure(&self, spec: &CommandSpec, e: std::io::Error) -> ExecutionResult {
        ExecutionResult::infrastructure_failure(
            spec.argv.join(" "),
            format!("failed to prepare scratch directory: {e}"),
            Instant::now(),
        )
    }
}

/// A `package.json` marked `"private": true` is not meant for publishing,
/// so manifest validation does not apply. Unreadable or malformed files are
/// not skipped; the tool itself reports those.
fn is_private_package_json(root: &Path, file: &str) -> bool {
    let Ok(text) = std::fs::read_to_string(root.join(file)) else {
        return false;
    };
    let Ok(value) = serde_json::from_str::<serde_json::Value>(&text) else {
        return false;
    };
    value.get("private") == Some(&serde_json::Value::Bool(true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn private_package_json_detection() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("package.json"), r#"{"private": true}"#).expect("write");
        assert!(is_private_package_json(dir.path(), "package.json"));

        fs::write(dir.path().join("package.json"), r#"{"private": false}"#).expect("write");
        assert!(!is_private_package_json(dir.path(), "package.json"));

        fs::write(dir.path().join("package.json"), r#"{"name": "x"}"#).expect("write");
        assert!(!is_private_package_json(dir.path(), "package.json"));

        // Malformed JSON is the validator's business, not a skip.
        fs::write(dir.path().join("package.json"), "{oops").expect("write");
        assert!(!is_private_package_json(dir.path(), "package.json"));
    }
}
