//! Omnilint: run every applicable linter and formatter over a project.
//!
//! The pipeline has four stages:
//!
//! 1. **Discovery**: enumerate candidate files, preferring git's view of
//!    the project (tracked + staged + modified + untracked, minus deleted)
//!    and falling back to a filesystem walk outside a repository.
//! 2. **Routing**: match each file against every catalog tool's glob-like
//!    patterns.
//! 3. **Execution**: run each (tool, file) job as a subprocess with
//!    resolved config arguments, under a bounded concurrency budget.
//! 4. **Aggregation**: fold job outcomes into found/fixed counters and a
//!    single pass/fail verdict.
//!
//! # Example
//!
//! ```ignore
//! use omnilint::{catalog, discovery, scheduler, tally, RunConfig, Mode};
//!
//! # async fn run() -> omnilint::Result<()> {
//! let config = RunConfig::from_env(std::path::PathBuf::from("."), None, None);
//! let files = discovery::list_files(&config, false)?;
//! let result = scheduler::run(Mode::Lint, &files, &catalog::CATALOG, &config).await?;
//! let passed = tally::finalize(Mode::Lint, &result);
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod exec;
pub mod git;
pub mod pattern;
pub mod report;
pub mod resolver;
pub mod scheduler;
pub mod tally;
pub mod tool;

// Re-export commonly used types
pub use cli::{Cli, Commands};
pub use config::RunConfig;
pub use error::{OmnilintError, Result};
pub use pattern::Pattern;
pub use tally::{RunTally, TallySnapshot};
pub use tool::{Invocation, Mode, SuccessRule, ToolSpec};
