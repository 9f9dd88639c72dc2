//! Run-wide configuration resolved once at startup.
//!
//! `RunConfig` is an immutable snapshot of everything the run needs from the
//! outside world: the project root, the job budget, the subprocess timeout,
//! and the environment variables that control per-tool skipping and config
//! file lookup. Components take it by parameter instead of reading the
//! process environment, so tests can construct arbitrary configurations.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Hard upper bound on a single tool subprocess.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Jobs are I/O-bound subprocess waits, so the default budget is a multiple
/// of the core count rather than the core count itself.
const JOBS_PER_CORE: usize = 10;

#[derive(Debug, Clone)]
pub struct RunConfig {
    project_root: PathBuf,
    jobs: usize,
    timeout: Duration,
    env: HashMap<String, String>,
}

impl RunConfig {
    /// Build a config from an explicit environment map. Tests use this
    /// directly; `from_env` is the production path.
    pub fn new(
        project_root: PathBuf,
        jobs: Option<usize>,
        timeout: Option<Duration>,
        env: HashMap<String, String>,
    ) -> Self {
        let default_jobs = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
            * JOBS_PER_CORE;

        Self {
            project_root,
            jobs: jobs.unwrap_or(default_jobs).max(1),
            timeout: timeout.unwrap_or(DEFAULT_TIMEOUT),
            env,
        }
    }

    /// Snapshot the process environment once.
    pub fn from_env(project_root: PathBuf, jobs: Option<usize>, timeout: Option<Duration>) -> Self {
        Self::new(project_root, jobs, timeout, std::env::vars().collect())
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn jobs(&self) -> usize {
        self.jobs
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Look up a variable from the startup snapshot.
    pub fn var(&self, name: &str) -> Option<&str> {
        self.env.get(name).map(String::as_str)
    }

    /// A tool is disabled only by the literal value `false` in its
    /// `VALIDATE_<TOOL>` switch; any other value (or absence) enables it.
    pub fn tool_enabled(&self, env_name: &str) -> bool {
        self.var(&format!("VALIDATE_{env_name}")) != Some("false")
    }

    /// Directories searched for a tool's configuration, in precedence order:
    /// the tool-specific `<TOOL>_CONFIG_DIR`, the global `CONFIG_DIR`, the
    /// project root, and a `.config/` subdirectory when one exists.
    /// Relative overrides are resolved against the project root.
    pub fn config_search_dirs(&self, tool_env: &str) -> Vec<PathBuf> {
        let mut dirs = Vec::new();

        if let Some(dir) = self.var(&format!("{tool_env}_CONFIG_DIR")) {
            dirs.push(self.project_root.join(dir));
        }
        if let Some(dir) = self.var("CONFIG_DIR") {
            dirs.push(self.project_root.join(dir));
        }
        dirs.push(self.project_root.clone());
        let dot_config = self.project_root.join(".config");
        if dot_config.is_dir() {
            dirs.push(dot_config);
        }

        dirs
    }
}
