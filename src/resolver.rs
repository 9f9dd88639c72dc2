//! Tool configuration file resolution.
//!
//! Most tools accept a `--config <path>` style argument. The resolver turns
//! a declarative [`ConfigQuery`] into an argv fragment: `[flag, path]` when
//! a config file is found, empty when none is. "No config" is a valid
//! outcome and the tool runs with its own defaults.

use std::fs;
use std::path::PathBuf;

use crate::config::RunConfig;

/// Whether the resolved argv fragment should name the config file itself or
/// its containing directory (some tools want a directory argument).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigMode {
    #[default]
    File,
    Directory,
}

/// Shared multi-tool config files (`pyproject.toml`, `setup.cfg`,
/// `tox.ini`) that only count when they actually contain the tool's
/// section.
#[derive(Debug, Clone)]
pub struct SharedConfig {
    /// Tool id as it appears in section headers, e.g. `isort`.
    pub tool: String,
    /// Candidate shared file names, in order.
    pub files: Vec<String>,
}

/// Declarative description of one tool's config lookup.
#[derive(Debug, Clone)]
pub struct ConfigQuery {
    /// Environment prefix for overrides (`<TOOL>_CONFIG_FILE`,
    /// `<TOOL>_CONFIG_DIR`).
    pub tool_env: String,
    /// The argument flag, e.g. `--config-file`.
    pub flag: String,
    /// Default candidate file names tried in order within each directory.
    pub candidates: Vec<String>,
    pub mode: ConfigMode,
    /// Python-style shared-file fallback, if the tool supports one.
    pub shared: Option<SharedConfig>,
}

impl ConfigQuery {
    pub fn new(tool_env: &str, flag: &str, candidates: &[&str]) -> Self {
        Self {
            tool_env: tool_env.to_string(),
            flag: flag.to_string(),
            candidates: candidates.iter().map(|c| c.to_string()).collect(),
            mode: ConfigMode::File,
            shared: None,
        }
    }

    pub fn directory(mut self) -> Self {
        self.mode = ConfigMode::Directory;
        self
    }

    /// Add the shared-file fallback used by most Python tools.
    pub fn with_shared(mut self, tool: &str, files: &[&str]) -> Self {
        self.shared = Some(SharedConfig {
            tool: tool.to_string(),
            files: files.iter().map(|f| f.to_string()).collect(),
        });
        self
    }
}

/// Resolve a query to an argv fragment.
pub fn resolve(config: &RunConfig, query: &ConfigQuery) -> Vec<String> {
    let Some(path) = locate(config, query) else {
        return Vec::new();
    };

    let path = match query.mode {
        ConfigMode::File => path,
        ConfigMode::Directory => path.parent().map(PathBuf::from).unwrap_or(path),
    };

    vec![query.flag.clone(), path.display().to_string()]
}

/// First match wins across search directories; within a directory an
/// explicit `<TOOL>_CONFIG_FILE` override beats every default candidate.
fn locate(config: &RunConfig, query: &ConfigQuery) -> Option<PathBuf> {
    let dirs = config.config_search_dirs(&query.tool_env);
    let explicit = config.var(&format!("{}_CONFIG_FILE", query.tool_env));

    for dir in &dirs {
        if let Some(name) = explicit {
            let path = dir.join(name);
            if path.is_file() {
                return Some(path);
            }
        }
        for candidate in &query.candidates {
            let path = dir.join(candidate);
            if path.is_file() {
                return Some(path);
            }
        }
    }

    let shared = query.shared.as_ref()?;
    // Best-effort presence check, not a real format parser: accept the
    // first shared file whose text contains the tool's section header.
    let sections = [
        format!("[{}]", shared.tool),
        format!("[tool.{}]", shared.tool),
        format!("[tool.{}.", shared.tool),
    ];
    for dir in &dirs {
        for file in &shared.files {
            let path = dir.join(file);
            if !path.is_file() {
                continue;
            }
            if let Ok(text) = fs::read_to_string(&path) {
                if sections.iter().any(|s| text.contains(s.as_str())) {
                    return Some(path);
                }
            }
        }
    }

    None
}
