//! CLI command definitions and dispatch.

mod build;
mod from_issue;
mod init;
mod migrate;
mod process;
mod sync;

use std::path::Path;

use clap::{Parser, Subcommand};
use imgsync_core::{BatchResult, Settings, SyncError};

/// imgsync - mirror public images into a private registry.
#[derive(Parser)]
#[command(name = "imgsync", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Command {
    /// Sync images from images.json or images.txt
    Sync(sync::SyncArgs),
    /// Sync every image of an enhanced JSON list
    Process(process::ProcessArgs),
    /// Build Dockerfiles and push them to the registry
    Build(build::BuildArgs),
    /// Convert images.txt into the enhanced JSON format
    Migrate(migrate::MigrateArgs),
    /// Convert an issue image list into a temporary JSON list
    FromIssue(from_issue::FromIssueArgs),
    /// Write example image lists in both JSON formats
    Init(init::InitArgs),
}

/// Dispatch a parsed CLI command to its handler.
pub async fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env();

    match cli.command {
        Command::Sync(args) => sync::execute(args, &settings).await,
        Command::Process(args) => process::execute(args, &settings).await,
        Command::Build(args) => build::execute(args, &settings).await,
        Command::Migrate(args) => migrate::execute(args).await,
        Command::FromIssue(args) => from_issue::execute(args).await,
        Command::Init(args) => init::execute(args).await,
    }
}

/// Turn a finished batch into the process outcome.
fn finish(result: &BatchResult) -> Result<(), Box<dyn std::error::Error>> {
    if result.is_success() {
        Ok(())
    } else {
        Err(SyncError::BatchFailed {
            failed: result.failed,
            total: result.total,
        }
        .into())
    }
}

/// Read an input list, mapping a missing file to a config error.
fn read_input(path: &Path) -> Result<String, SyncError> {
    if !path.is_file() {
        return Err(SyncError::ConfigNotFound(path.to_path_buf()));
    }
    Ok(std::fs::read_to_string(path)?)
}
