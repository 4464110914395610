mod cli;
mod columns;
mod commands;
mod paths;
mod table;

use std::fs::{self, File};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use shopdesk_lib::prefs::{PreferenceStore, SqliteBackend};
use simplelog::{Config, LevelFilter, WriteLogger};

use crate::cli::{Cli, Command};

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let store = open_store(cli.prefs_db).await?;
    match cli.command {
        Command::List(args) => commands::run_list(args, store).await,
        Command::Prefs(command) => commands::run_prefs(command, store).await,
        Command::Drafts(command) => commands::run_drafts(command, store).await,
    }
}

async fn open_store(path: Option<PathBuf>) -> Result<PreferenceStore> {
    let path = path
        .or_else(paths::preferences_db)
        .context("cannot determine a data directory; pass --prefs-db")?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    log::debug!("preferences database: {}", path.display());
    let backend = SqliteBackend::open(&path)
        .await
        .with_context(|| format!("failed to open {}", path.display()))?;
    Ok(PreferenceStore::new(backend))
}

/// Log to `latest.log` in the cache directory. Runs without a log file if
/// the directory is unavailable.
fn init_logging(verbose: bool) {
    let Some(log_path) = paths::log_file() else {
        return;
    };
    if let Some(dir) = log_path.parent()
        && fs::create_dir_all(dir).is_err()
    {
        return;
    }
    paths::rotate_logs();

    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    match File::create(&log_path) {
        Ok(file) => {
            let _ = WriteLogger::init(level, Config::default(), file);
        }
        Err(e) => eprintln!("warning: cannot write log file {}: {e}", log_path.display()),
    }
}
