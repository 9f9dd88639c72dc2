//! Declarative tool specifications.
//!
//! A [`ToolSpec`] describes one external lint/format capability: which
//! files it applies to, how to invoke it in lint mode, and optionally how
//! to invoke it in fmt mode. Specs are data, constructed once at startup
//! by the catalog and immutable thereafter.
//!
//! Invocations are a sum type: the common case is a declarative
//! [`CommandSpec`] (argv template plus success rule), and the handful of
//! tools that cannot be expressed that way are named [`CustomRoutine`]
//! variants, so the scheduler's dispatch stays a single exhaustive match.

use crate::resolver::ConfigQuery;

/// Run mode selected by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Report problems.
    Lint,
    /// Apply fixes and report what changed.
    Fmt,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Lint => "lint",
            Mode::Fmt => "fmt",
        }
    }
}

/// Maps a subprocess exit code to pass/fail. A missing exit code (spawn
/// failure, timeout, killed by signal) never passes.
#[derive(Debug, Clone)]
pub enum SuccessRule {
    /// Exit code 0 (the default).
    Zero,
    /// One fixed code (the git-ignore checker signals "clean" via 1).
    Code(i32),
    /// A set of acceptable codes.
    AnyOf(Vec<i32>),
    /// Arbitrary predicate.
    Predicate(fn(i32) -> bool),
}

impl SuccessRule {
    pub fn accepts(&self, exit_code: Option<i32>) -> bool {
        let Some(code) = exit_code else {
            return false;
        };
        match self {
            SuccessRule::Zero => code == 0,
            SuccessRule::Code(expected) => code == *expected,
            SuccessRule::AnyOf(codes) => codes.contains(&code),
            SuccessRule::Predicate(pred) => pred(code),
        }
    }
}

/// Working directory for a tool subprocess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Workdir {
    /// The project root (the default).
    #[default]
    Project,
    /// The directory containing the matched file.
    FileDir,
    /// The parent of the file's directory (e.g. the project root above a
    /// `.circleci/config.yml`).
    FileParentDir,
    /// A fresh, empty temp directory. The tool still addresses the project
    /// file through absolute placeholders; only the cwd moves somewhere
    /// writable.
    Scratch,
    /// A fresh temp directory holding a copy of the matched file, with file
    /// placeholders retargeted to the copy. Needed by package-manager
    /// dry-run tools because the project mount may be read-only.
    ScratchCopy,
}

/// Declarative subprocess invocation.
///
/// Argv entries may contain the placeholders `#file#`, `#filename#`,
/// `#directory#`, `#file[abs]#`, `#directory[abs]#`, and `#scratch#`; the
/// `#config#` entry expands to the resolved config argv fragment (possibly
/// nothing).
#[derive(Debug, Clone)]
pub struct CommandSpec {
    pub argv: Vec<String>,
    pub config: Option<ConfigQuery>,
    pub workdir: Workdir,
    pub env: Vec<(String, String)>,
    pub success: SuccessRule,
}

impl CommandSpec {
    pub fn new<I, S>(argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            argv: argv.into_iter().map(Into::into).collect(),
            config: None,
            workdir: Workdir::Project,
            env: Vec::new(),
            success: SuccessRule::Zero,
        }
    }

    pub fn with_config(mut self, query: ConfigQuery) -> Self {
        self.config = Some(query);
        self
    }

    pub fn with_workdir(mut self, workdir: Workdir) -> Self {
        self.workdir = workdir;
        self
    }

    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.env.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_success(mut self, success: SuccessRule) -> Self {
        self.success = success;
        self
    }
}

/// Named exceptions that do not fit the argv-template model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomRoutine {
    /// The git-ignore checker's fmt path: a tracked-but-ignored file is the
    /// problem, and `git rm --cached` is the fix.
    GitUntrackIgnored,
}

/// One way of invoking a tool (lint or fmt).
#[derive(Debug, Clone)]
pub enum Invocation {
    Command(CommandSpec),
    Custom(CustomRoutine),
}

/// Skip predicate evaluated once per tool per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreAllHook {
    /// Only run inside a git repository.
    RequireGitRepo,
}

/// Skip predicate evaluated per matched file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreFileHook {
    /// Skip a `package.json` whose `private` field is true.
    SkipPrivatePackageJson,
}

/// Declarative description of one lint/format capability.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    /// Unique id, used in log events.
    pub name: String,
    /// Environment prefix for the `VALIDATE_<X>` switch and config
    /// overrides.
    pub env_name: String,
    /// File-match patterns; a file is routed to this tool if any matches.
    pub file_match: Vec<String>,
    pub pre_all: Option<PreAllHook>,
    pub pre_file: Option<PreFileHook>,
    pub lint: Invocation,
    /// Tools without an fmt invocation are lint-only and are skipped in
    /// fmt mode.
    pub fmt: Option<Invocation>,
}

impl ToolSpec {
    pub fn new(name: &str, env_name: &str, file_match: &[&str], lint: Invocation) -> Self {
        Self {
            name: name.to_string(),
            env_name: env_name.to_string(),
            file_match: file_match.iter().map(|p| p.to_string()).collect(),
            pre_all: None,
            pre_file: None,
            lint,
            fmt: None,
        }
    }

    pub fn with_fmt(mut self, fmt: Invocation) -> Self {
        self.fmt = Some(fmt);
        self
    }

    pub fn with_pre_all(mut self, hook: PreAllHook) -> Self {
        self.pre_all = Some(hook);
        self
    }

    pub fn with_pre_file(mut self, hook: PreFileHook) -> Self {
        self.pre_file = Some(hook);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_rule_zero() {
        assert!(SuccessRule::Zero.accepts(Some(0)));
        assert!(!SuccessRule::Zero.accepts(Some(1)));
        assert!(!SuccessRule::Zero.accepts(None));
    }

    #[test]
    fn success_rule_fixed_nonzero_code() {
        // git check-ignore reports "clean" via exit code 1.
        let rule = SuccessRule::Code(1);
        assert!(rule.accepts(Some(1)));
        assert!(!rule.accepts(Some(0)));
        assert!(!rule.accepts(None));
    }

    #[test]
    fn success_rule_code_set() {
        let rule = SuccessRule::AnyOf(vec![0, 2]);
        assert!(rule.accepts(Some(0)));
        assert!(rule.accepts(Some(2)));
        assert!(!rule.accepts(Some(1)));
    }

    #[test]
    fn success_rule_predicate() {
        let rule = SuccessRule::Predicate(|code| code < 10);
        assert!(rule.accepts(Some(9)));
        assert!(!rule.accepts(Some(10)));
        assert!(!rule.accepts(None));
    }
}
