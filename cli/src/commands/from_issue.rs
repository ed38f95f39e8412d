//! `imgsync from-issue` command.

use std::path::PathBuf;

use clap::Args;
use imgsync_runtime::migrate::from_issue_list;

#[derive(Args)]
pub struct FromIssueArgs {
    /// Image references extracted from an issue, one per line
    #[arg(short, long, default_value = "issue_images.txt")]
    pub input: PathBuf,

    /// Temporary JSON list to write
    #[arg(short, long, default_value = "issue_images.json")]
    pub output: PathBuf,
}

pub async fn execute(args: FromIssueArgs) -> Result<(), Box<dyn std::error::Error>> {
    let content = super::read_input(&args.input)?;

    let document = from_issue_list(&content, chrono::Utc::now());
    if document.images.is_empty() {
        tracing::warn!("No image references in {}", args.input.display());
    }
    document.write(&args.output)?;

    println!(
        "Created {} with {} images",
        args.output.display(),
        document.images.len()
    );
    Ok(())
}
