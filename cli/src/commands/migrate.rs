//! `imgsync migrate` command.

use std::path::PathBuf;

use clap::Args;
use imgsync_runtime::migrate::migrate_text;

#[derive(Args)]
pub struct MigrateArgs {
    /// Plain image list
    #[arg(short, long, default_value = "images.txt")]
    pub input: PathBuf,

    /// Enhanced JSON list to write
    #[arg(short, long, default_value = "images_migrated.json")]
    pub output: PathBuf,
}

pub async fn execute(args: MigrateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let content = super::read_input(&args.input)?;
    let origin = args.input.display().to_string();

    let document = migrate_text(&content, &origin, chrono::Utc::now());
    document.write(&args.output)?;

    println!(
        "Migrated {} images from {} to {}",
        document.images.len(),
        origin,
        args.output.display()
    );
    Ok(())
}
