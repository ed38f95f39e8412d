//! Destination registry existence checks.

use std::sync::Arc;
use std::time::Duration;

use imgsync_core::config::{RegistrySettings, Settings};
use imgsync_core::spec::ImageSpec;

use crate::exec::{CommandRunner, Invocation};

/// Decides whether an image is already mirrored.
///
/// Fails open: anything other than a successful `docker manifest inspect`
/// counts as "not present", so the image gets synced again.
pub struct ExistenceChecker {
    runner: Arc<dyn CommandRunner>,
    docker: String,
    registry: RegistrySettings,
    timeout: Duration,
}

impl ExistenceChecker {
    pub fn new(runner: Arc<dyn CommandRunner>, settings: &Settings) -> Self {
        Self {
            runner,
            docker: settings.docker.clone(),
            registry: settings.registry.clone(),
            timeout: settings.timeouts.check(),
        }
    }

    /// `<registry>/<namespace>/<basename>:<tag>` for a spec.
    pub fn target_reference(&self, spec: &ImageSpec) -> Option<String> {
        self.registry.qualify(spec.basename(), &spec.tag)
    }

    pub async fn exists(&self, spec: &ImageSpec) -> bool {
        let Some(target) = self.target_reference(spec) else {
            tracing::warn!(
                "Registry or namespace not configured; treating {} as absent",
                spec.reference()
            );
            return false;
        };

        let invocation = Invocation::new(&self.docker, self.timeout)
            .args(["manifest", "inspect"])
            .arg(&target);

        match self.runner.run(&invocation).await {
            Ok(output) if output.success() => {
                tracing::debug!("{} exists", target);
                true
            }
            Ok(output) => {
                tracing::debug!("{} not found ({})", target, output.exit_indicator());
                false
            }
            Err(e) => {
                tracing::debug!("Existence check for {} failed: {}", target, e);
                false
            }
        }
    }
}
