//! `imgsync sync` command.

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
pub struct SyncArgs {
    /// Image list (default: images.json, then images.txt)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Result file for CI
    #[arg(short, long, default_value = "sync-result.env")]
    pub output: PathBuf,

    /// Sync every image, even if already mirrored
    #[arg(short, long)]
    pub force: bool,

    /// Only sync images missing from the registry (default)
    #[arg(short, long)]
    pub smart: bool,

    /// Load and list the images without syncing
    #[arg(long)]
    pub check_only: bool,

    /// Script performing a single image sync
    #[arg(long, default_value = DEFAULT_SYNC_SCRIPT)]
    pub script: PathBuf,

    /// Encoding of the image lists in the result file (heredoc, escaped)
    #[arg(long, default_value = "escaped")]
    pub format: ReportFormat,
}

pub async fn execute(args: SyncArgs, settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let mode = SyncMode::from_flags(args.force, args.smart)?;
    let config = source::resolve(args.config.as_deref())?;
    let records = source::load(&config)?;

    if args.check_only {
        println!("{}", output::records_table(&records));
        println!("{} images in {}", records.len(), config.display());
        return Ok(());
    }

    let mut settings = settings.clone();
    settings.sync_script = args.script;

    tracing::info!("Sync mode: {}", mode);
    let orchestrator = SyncOrchestrator::new(Arc::new(ProcessRunner), &settings, mode);
    let result = orchestrator.run(&records).await;

    Report::new(args.format, SYNC_COUNT_KEY).write(&result, &args.output)?;
    output::print_summary("Sync", &result);
    super::finish(&result)
}
