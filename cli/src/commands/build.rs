//! `imgsync build` command.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use imgsync_core::{Settings, SyncError};
use imgsync_runtime::build::validate;
use imgsync_runtime::{
    load_dockerfile_list, BuildOrchestrator, ProcessRunner, Report, ReportFormat, BUILD_COUNT_KEY,
};

use crate::output;

#[derive(Args)]
pub struct BuildArgs {
    /// File listing Dockerfile paths, one per line
    #[arg(long)]
    pub files: PathBuf,

    /// Registry namespace (overrides ALIYUN_NAME_SPACE)
    #[arg(long)]
    pub namespace: Option<String>,

    /// Result file for CI
    #[arg(short, long, default_value = "build-result.env")]
    pub output: PathBuf,

    /// Only validate the Dockerfiles
    #[arg(long)]
    pub validate_only: bool,

    /// Encoding of the image lists in the result file (heredoc, escaped)
    #[arg(long, default_value = "escaped")]
    pub format: ReportFormat,
}

pub async fn execute(args: BuildArgs, settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let dockerfiles = load_dockerfile_list(&args.files)?;

    if args.validate_only {
        let mut invalid = 0;
        for dockerfile in &dockerfiles {
            match validate(dockerfile) {
                Ok(()) => println!("valid    {}", dockerfile.display()),
                Err(e) => {
                    invalid += 1;
                    println!("invalid  {} ({})", dockerfile.display(), e);
                }
            }
        }
        if invalid > 0 {
            return Err(SyncError::ConfigError(format!(
                "{} of {} Dockerfiles failed validation",
                invalid,
                dockerfiles.len()
            ))
            .into());
        }
        println!("{} Dockerfiles valid", dockerfiles.len());
        return Ok(());
    }

    let orchestrator = BuildOrchestrator::new(Arc::new(ProcessRunner), settings, args.namespace)?;
    let result = orchestrator.run(&dockerfiles).await;

    Report::new(args.format, BUILD_COUNT_KEY).write(&result, &args.output)?;
    output::print_summary("Build", &result);
    super::finish(&result)
}
