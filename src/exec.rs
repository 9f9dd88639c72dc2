//! Subprocess execution and content hashing.
//!
//! Every tool invocation funnels through [`run_command`]: placeholder
//! substitution happens before, outcome classification happens after. A
//! spawn failure, timeout, or signal death is still an [`ExecutionResult`]
//! (with no exit code), so the scheduler can count it as a failure without
//! special-casing.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use serde::Serialize;
use sha2::{Digest, Sha256};
use tokio::process::Command;
use tokio::time::timeout;

/// Outcome of one subprocess invocation.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionResult {
    /// The command line, joined for logging.
    pub command: String,
    /// Exit code; `None` for spawn failures, timeouts, and signal deaths.
    pub exit_code: Option<i32>,
    /// Combined stdout and stderr.
    pub output: String,
    pub duration_ms: u64,
}

impl ExecutionResult {
    pub(crate) fn infrastructure_failure(command: String, message: String, started: Instant) -> Self {
        Self {
            command,
            exit_code: None,
            output: message,
            duration_ms: started.elapsed().as_millis() as u64,
        }
    }
}

/// Substitute argv placeholders for one (tool, file) pair.
///
/// `#config#` expands to the whole resolved config fragment, which may be
/// empty; the remaining placeholders are textual. `scratch` is the path
/// substituted for `#scratch#` when the command asked for one.
pub fn substitute(
    argv: &[String],
    file: &str,
    root: &Path,
    config_args: &[String],
    scratch: Option<&Path>,
) -> Vec<String> {
    let path = Path::new(file);
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| file.to_string());
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_string_lossy().to_string(),
        _ => ".".to_string(),
    };
    let abs_file = root.join(file).display().to_string();
    let abs_directory = root
        .join(file)
        .parent()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| root.display().to_string());
    let scratch_dir = scratch.map(|p| p.display().to_string()).unwrap_or_default();

    argv.iter()
        .flat_map(|arg| {
            if arg == "#config#" {
                config_args.to_vec()
            } else {
                vec![arg
                    .replace("#file[abs]#", &abs_file)
                    .replace("#directory[abs]#", &abs_directory)
                    .replace("#file#", file)
                    .replace("#filename#", &filename)
                    .replace("#directory#", &directory)
                    .replace("#scratch#", &scratch_dir)]
            }
        })
        .collect()
}

/// Run a command with merged output capture and a hard timeout.
pub async fn run_command(
    argv: &[String],
    cwd: &Path,
    env: &[(String, String)],
    limit: Duration,
) -> ExecutionResult {
    let started = Instant::now();
    let command_line = argv.join(" ");

    let Some((program, args)) = argv.split_first() else {
        return ExecutionResult::infrastructure_failure(
            command_line,
            "empty command line".to_string(),
            started,
        );
    };

    let mut cmd = Command::new(program);
    cmd.args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    for (key, value) in env {
        cmd.env(key, value);
    }

    let child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) => {
            return ExecutionResult::infrastructure_failure(
                command_line,
                format!("failed to start {program}: {e}"),
                started,
            );
        }
    };

    match timeout(limit, child.wait_with_output()).await {
        Ok(Ok(output)) => {
            let mut merged = String::from_utf8_lossy(&output.stdout).to_string();
            let stderr = String::from_utf8_lossy(&output.stderr);
            if !stderr.is_empty() {
                if !merged.is_empty() && !merged.ends_with('\n') {
                    merged.push('\n');
                }
                merged.push_str(&stderr);
            }
            ExecutionResult {
                command: command_line,
                exit_code: output.status.code(),
                output: merged,
                duration_ms: started.elapsed().as_millis() as u64,
            }
        }
        Ok(Err(e)) => ExecutionResult::infrastructure_failure(
            command_line,
            format!("failed to collect output: {e}"),
            started,
        ),
        // kill_on_drop reaps the child when the output future is dropped.
        Err(_) => ExecutionResult::infrastructure_failure(
            command_line,
            format!("timed out after {}s", limit.as_secs()),
            started,
        ),
    }
}

/// SHA-256 digest of a file's content. Fmt jobs compare digests before and
/// after the tool runs; only equality matters.
pub async fn hash_file(path: &Path) -> std::io::Result<[u8; 32]> {
    let content = tokio::fs::read(path).await?;
    Ok(Sha256::digest(&content).into())
}

/// Copy a file into a fresh scratch directory, returning the directory
/// guard and the project-relative name to substitute for `#file#`.
pub fn scratch_copy(root: &Path, file: &str) -> std::io::Result<(tempfile::TempDir, String)> {
    let dir = tempfile::tempdir()?;
    let filename = Path::new(file)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| file.to_string());
    std::fs::copy(root.join(file), dir.path().join(&filename))?;
    Ok((dir, filename))
}

/// Create an empty scratch directory for commands that only need somewhere
/// writable (e.g. a report output dir).
pub fn scratch_dir() -> std::io::Result<tempfile::TempDir> {
    tempfile::tempdir()
}

/// Resolve the effective working directory for a command.
pub fn effective_cwd(workdir: crate::tool::Workdir, root: &Path, file: &str) -> PathBuf {
    use crate::tool::Workdir;
    match workdir {
        Workdir::Project => root.to_path_buf(),
        Workdir::FileDir => root
            .join(file)
            .parent()
            .map(PathBuf::from)
            .unwrap_or_else(|| root.to_path_buf()),
        Workdir::FileParentDir => root
            .join(file)
            .parent()
            .and_then(Path::parent)
            .map(PathBuf::from)
            .unwrap_or_else(|| root.to_path_buf()),
        // Scratch dirs are handled by the caller, which owns the temp dir
        // guard.
        Workdir::Scratch | Workdir::ScratchCopy => root.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn substitutes_file_placeholders() {
        let args = argv(&["prettier", "--list-different", "#file#"]);
        let out = substitute(&args, "docs/readme.md", Path::new("/project"), &[], None);
        assert_eq!(out, argv(&["prettier", "--list-different", "docs/readme.md"]));
    }

    #[test]
    fn substitutes_name_and_directory_forms() {
        let args = argv(&["#filename#", "#directory#", "#file[abs]#", "#directory[abs]#"]);
        let out = substitute(&args, "docs/readme.md", Path::new("/project"), &[], None);
        assert_eq!(
            out,
            argv(&[
                "readme.md",
                "docs",
                "/project/docs/readme.md",
                "/project/docs",
            ])
        );
    }

    #[test]
    fn bare_filename_directory_is_dot() {
        let args = argv(&["#directory#"]);
        let out = substitute(&args, "Makefile", Path::new("/project"), &[], None);
        assert_eq!(out, argv(&["."]));
    }

    #[test]
    fn config_placeholder_expands_to_fragment() {
        let args = argv(&["yamllint", "--strict", "#config#", "#file#"]);
        let fragment = argv(&["--config-file", "/project/.yamllint"]);
        let out = substitute(&args, "ci.yml", Path::new("/project"), &fragment, None);
        assert_eq!(
            out,
            argv(&[
                "yamllint",
                "--strict",
                "--config-file",
                "/project/.yamllint",
                "ci.yml",
            ])
        );
    }

    #[test]
    fn config_placeholder_expands_to_nothing() {
        let args = argv(&["yamllint", "#config#", "#file#"]);
        let out = substitute(&args, "ci.yml", Path::new("/project"), &[], None);
        assert_eq!(out, argv(&["yamllint", "ci.yml"]));
    }

    #[tokio::test]
    async fn captures_exit_code_and_output() {
        let result = run_command(
            &argv(&["sh", "-c", "echo out; echo err >&2; exit 3"]),
            Path::new("."),
            &[],
            Duration::from_secs(10),
        )
        .await;
        assert_eq!(result.exit_code, Some(3));
        assert!(result.output.contains("out"));
        assert!(result.output.contains("err"));
    }

    #[tokio::test]
    async fn missing_binary_is_failure_without_exit_code() {
        let result = run_command(
            &argv(&["omnilint-test-no-such-binary"]),
            Path::new("."),
            &[],
            Duration::from_secs(10),
        )
        .await;
        assert_eq!(result.exit_code, None);
        assert!(result.output.contains("failed to start"));
    }

    #[tokio::test]
    async fn timeout_kills_and_reports_failure() {
        let result = run_command(
            &argv(&["sleep", "30"]),
            Path::new("."),
            &[],
            Duration::from_millis(100),
        )
        .await;
        assert_eq!(result.exit_code, None);
        assert!(result.output.contains("timed out"));
    }

    #[tokio::test]
    async fn hash_is_stable_and_content_sensitive() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("file.txt");
        tokio::fs::write(&path, "hello\n").await.expect("write");

        let first = hash_file(&path).await.expect("hash");
        let second = hash_file(&path).await.expect("hash");
        assert_eq!(first, second);

        tokio::fs::write(&path, "hello\nmore\n").await.expect("write");
        let third = hash_file(&path).await.expect("hash");
        assert_ne!(first, third);
    }

    #[test]
    fn scratch_copy_places_file_in_fresh_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir(dir.path().join("sub")).expect("mkdir");
        std::fs::write(dir.path().join("sub/composer.json"), "{}").expect("write");

        let (scratch, name) = scratch_copy(dir.path(), "sub/composer.json").expect("scratch");
        assert_eq!(name, "composer.json");
        assert!(scratch.path().join("composer.json").is_file());
    }
}
