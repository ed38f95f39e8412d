//! `imgsync init` command.

use std::path::PathBuf;

use clap::Args;
use imgsync_core::SyncError;
use imgsync_runtime::migrate::example_document;

#[derive(Args)]
pub struct InitArgs {
    /// Enhanced JSON list to write
    #[arg(short, long, default_value = "images.json")]
    pub output: PathBuf,

    /// Simple-format copy of the same list
    #[arg(long, default_value = "images_simple.json")]
    pub simple: PathBuf,

    /// Overwrite existing files
    #[arg(short, long)]
    pub force: bool,
}

pub async fn execute(args: InitArgs) -> Result<(), Box<dyn std::error::Error>> {
    if !args.force {
        if let Some(existing) = [&args.output, &args.simple].into_iter().find(|p| p.exists()) {
            return Err(SyncError::ConfigError(format!(
                "{} already exists (use --force to overwrite)",
                existing.display()
            ))
            .into());
        }
    }

    let document = example_document(chrono::Utc::now());
    document.write(&args.output)?;
    document.to_simple().write(&args.simple)?;

    println!(
        "Created {} and {} with {} example images",
        args.output.display(),
        args.simple.display(),
        document.images.len()
    );
    Ok(())
}
