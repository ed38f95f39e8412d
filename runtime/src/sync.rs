//! Batch mirroring through the single-image sync script.
//!
//! Records run one at a time in ascending priority. Per record:
//! `Pending -> (Checking) -> Syncing -> Succeeded | Failed`, with `Checking`
//! only in [`SyncMode::Smart`]. A failure is recorded and the batch moves on.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use imgsync_core::config::Settings;
use imgsync_core::error::{Result, SyncError};
use imgsync_core::record::{sort_by_priority, ImageRecord};
use imgsync_core::result::BatchResult;
use imgsync_core::spec::ImageSpec;

use crate::exec::{CommandRunner, Invocation};
use crate::registry::ExistenceChecker;

/// Whether images already at the destination are transferred again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// Transfer every record.
    Force,
    /// Skip records already present at the destination.
    Smart,
}

impl SyncMode {
    /// Resolve the `--force` / `--smart` flags. Neither means smart.
    pub fn from_flags(force: bool, smart: bool) -> Result<Self> {
        match (force, smart) {
            (true, true) => Err(SyncError::ConfigError(
                "--force and --smart cannot be used together".to_string(),
            )),
            (true, false) => Ok(Self::Force),
            _ => Ok(Self::Smart),
        }
    }
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Force => write!(f, "force"),
            Self::Smart => write!(f, "smart"),
        }
    }
}

/// A bare file name refers to the working directory, not to `PATH`.
fn script_path(script: &Path) -> PathBuf {
    let bare = script.is_relative()
        && script
            .parent()
            .map_or(true, |parent| parent.as_os_str().is_empty());
    if bare {
        Path::new(".").join(script)
    } else {
        script.to_path_buf()
    }
}

/// Runs the sync script for each record of a batch.
pub struct SyncOrchestrator {
    runner: Arc<dyn CommandRunner>,
    checker: ExistenceChecker,
    script: PathBuf,
    timeout: Duration,
    mode: SyncMode,
}

impl SyncOrchestrator {
    pub fn new(runner: Arc<dyn CommandRunner>, settings: &Settings, mode: SyncMode) -> Self {
        Self {
            checker: ExistenceChecker::new(runner.clone(), settings),
            runner,
            script: script_path(&settings.sync_script),
            timeout: settings.timeouts.sync(),
            mode,
        }
    }

    /// Process every record; never fails as a whole.
    pub async fn run(&self, records: &[ImageRecord]) -> BatchResult {
        let mut ordered = records.to_vec();
        sort_by_priority(&mut ordered);

        let total = ordered.len();
        let mut result = BatchResult::new(total);
        tracing::info!("Syncing {} images ({} mode)", total, self.mode);

        for (i, record) in ordered.iter().enumerate() {
            let spec = ImageSpec::from(record);
            let spec_str = spec.to_string();
            tracing::info!("[{}/{}] {}: {}", i + 1, total, record.id(), spec_str);

            if self.mode == SyncMode::Smart && self.checker.exists(&spec).await {
                tracing::info!("Already mirrored, skipping: {}", spec.reference());
                result.record_skipped(record.id(), spec_str);
                continue;
            }

            match self.transfer(&spec_str).await {
                Ok(()) => {
                    tracing::info!("Synced {}", record.id());
                    result.record_success(record.id(), spec_str);
                }
                Err(e) => {
                    tracing::error!("Sync failed for {}: {}", record.id(), e);
                    result.record_failure(record.id(), spec_str, e.to_string());
                }
            }
        }

        result
    }

    async fn transfer(&self, spec: &str) -> Result<()> {
        if !self.script.is_file() {
            return Err(SyncError::ScriptNotFound(self.script.clone()));
        }

        let invocation =
            Invocation::new(self.script.to_string_lossy(), self.timeout).arg(spec);
        let output = self.runner.run(&invocation).await?;
        if !output.success() && !output.stderr.trim().is_empty() {
            tracing::warn!("{}", output.stderr.trim());
        }
        output.check(&invocation)?;
        Ok(())
    }
}
