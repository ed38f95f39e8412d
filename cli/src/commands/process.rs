//! `imgsync process` command.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use imgsync_core::config::DEFAULT_SYNC_SCRIPT;
use imgsync_core::Settings;
use imgsync_runtime::{
    source, ProcessRunner, Report, ReportFormat, SyncMode, SyncOrchestrator, SYNC_COUNT_KEY,
};

use crate::output;

#[derive(Args)]
pub struct ProcessArgs {
    /// Enhanced JSON image list
    #[arg(short, long, default_value = "images.json")]
    pub config: PathBuf,

    /// Result file for CI
    #[arg(short, long, default_value = "sync-result.env")]
    pub output: PathBuf,

    /// Validate the list and print the spec strings
    #[arg(long)]
    pub validate: bool,

    /// Load and list the images without syncing
    #[arg(long)]
    pub check_only: bool,

    /// Script performing a single image sync
    #[arg(long, default_value = DEFAULT_SYNC_SCRIPT)]
    pub script: PathBuf,

    /// Encoding of the image lists in the result file (heredoc, escaped)
    #[arg(long, default_value = "heredoc")]
    pub format: ReportFormat,
}

pub async fn execute(
    args: ProcessArgs,
    settings: &Settings,
) -> Result<(), Box<dyn std::error::Error>> {
    let records = source::load(&args.config)?;

    if args.validate || args.check_only {
        println!("{}", output::records_table(&records));
        if args.validate {
            output::print_specs(&records);
        }
        println!("{} images in {}", records.len(), args.config.display());
        return Ok(());
    }

    let mut settings = settings.clone();
    settings.sync_script = args.script;

    let orchestrator = SyncOrchestrator::new(Arc::new(ProcessRunner), &settings, SyncMode::Force);
    let result = orchestrator.run(&records).await;

    Report::new(args.format, SYNC_COUNT_KEY).write(&result, &args.output)?;
    output::print_summary("Sync", &result);
    super::finish(&result)
}
