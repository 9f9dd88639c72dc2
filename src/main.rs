//! Omnilint CLI entry point

use std::process::ExitCode;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use omnilint::{catalog, discovery, scheduler, tally, Cli, Mode, OmnilintError, RunConfig};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    }
}

async fn run(cli: &Cli) -> omnilint::Result<bool> {
    let (mode, dir) = cli.mode_and_dir();

    let project_root = dir.canonicalize().map_err(|_| OmnilintError::ProjectNotFound {
        path: dir.display().to_string(),
    })?;
    if !project_root.is_dir() {
        return Err(OmnilintError::ProjectNotFound {
            path: dir.display().to_string(),
        });
    }

    let config = RunConfig::from_env(project_root, cli.jobs, cli.timeout_duration());

    let files = discovery::list_files(&config, cli.only_changed)?;
    info!(files = files.len(), mode = mode.as_str(), "starting run");
    if files.is_empty() {
        info!("nothing to check");
        return Ok(true);
    }

    let result = scheduler::run(mode, &files, &catalog::CATALOG, &config).await?;
    info!("Found {} problems", result.found());
    if mode == Mode::Fmt {
        info!("Fixed {} problems", result.fixed());
    }

    Ok(tally::finalize(mode, &result))
}
