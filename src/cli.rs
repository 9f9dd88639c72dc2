//! CLI argument definitions using clap with subcommand architecture

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use crate::tool::Mode;

/// Meta-linter that runs every applicable tool over a project
#[derive(Parser, Debug)]
#[command(name = "omnilint")]
#[command(about = "Run all applicable linters and formatters over a project")]
#[command(version)]
#[command(author)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute; defaults to `lint` over the current directory
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Only check files changed on the current branch
    #[arg(short = 'c', long, global = true)]
    pub only_changed: bool,

    /// Maximum number of concurrent lint jobs
    #[arg(short, long, global = true, env = "OMNILINT_JOBS")]
    pub jobs: Option<usize>,

    /// Per-tool timeout in seconds
    #[arg(long, global = true, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only report errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available subcommands for omnilint
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Report problems without modifying anything
    #[command(visible_alias = "l")]
    Lint(RunArgs),

    /// Apply fixes where tools support them
    #[command(visible_alias = "f")]
    Fmt(RunArgs),
}

/// Arguments shared by the lint and fmt commands
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Project directory to check
    #[arg(value_name = "DIR", default_value = ".")]
    pub dir: PathBuf,
}

impl Cli {
    /// Resolve the selected mode and project directory.
    pub fn mode_and_dir(&self) -> (Mode, PathBuf) {
        match &self.command {
            Some(Commands::Fmt(args)) => (Mode::Fmt, args.dir.clone()),
            Some(Commands::Lint(args)) => (Mode::Lint, args.dir.clone()),
            None => (Mode::Lint, PathBuf::from(".")),
        }
    }

    pub fn timeout_duration(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }

    /// Default tracing filter for the selected verbosity.
    pub fn log_filter(&self) -> &'static str {
        if self.quiet {
            return "omnilint=error";
        }
        match self.verbose {
            0 => "omnilint=info",
            1 => "omnilint=debug",
            _ => "omnilint=trace",
        }
    }
}
