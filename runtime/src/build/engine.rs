//! Build-and-push orchestration.
//!
//! For each Dockerfile: validate, `docker build --no-cache`, `docker push`,
//! then a best-effort `docker rmi` of the local copy.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use imgsync_core::config::{Settings, Timeouts};
use imgsync_core::error::{Result, SyncError};
use imgsync_core::result::BatchResult;

use super::dockerfile::{image_name_from_path, validate};
use crate::exec::{CommandRunner, Invocation};

/// Builds Dockerfiles and pushes them to the destination registry.
pub struct BuildOrchestrator {
    runner: Arc<dyn CommandRunner>,
    docker: String,
    registry: String,
    namespace: String,
    timeouts: Timeouts,
}

impl BuildOrchestrator {
    /// Requires both registry and namespace; `namespace` overrides the settings.
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        settings: &Settings,
        namespace: Option<String>,
    ) -> Result<Self> {
        let namespace = namespace
            .filter(|n| !n.trim().is_empty())
            .or_else(|| settings.registry.namespace.clone())
            .ok_or_else(|| {
                SyncError::ConfigError(
                    "namespace not set; set ALIYUN_NAME_SPACE or pass --namespace".to_string(),
                )
            })?;
        let registry = settings.registry.registry.clone().ok_or_else(|| {
            SyncError::ConfigError("registry not set; set ALIYUN_REGISTRY".to_string())
        })?;

        Ok(Self {
            runner,
            docker: settings.docker.clone(),
            registry,
            namespace,
            timeouts: settings.timeouts.clone(),
        })
    }

    /// Fully-qualified destination name for a Dockerfile path.
    pub fn target_for(&self, dockerfile: &Path) -> String {
        let (name, tag) = image_name_from_path(&dockerfile.to_string_lossy());
        format!("{}/{}/{}:{}", self.registry, self.namespace, name, tag)
    }

    /// Process every Dockerfile; never fails as a whole.
    pub async fn run(&self, dockerfiles: &[PathBuf]) -> BatchResult {
        let total = dockerfiles.len();
        let mut result = BatchResult::new(total);
        if total == 0 {
            tracing::info!("No Dockerfiles to build");
            return result;
        }
        tracing::info!("Building {} images", total);

        for (i, dockerfile) in dockerfiles.iter().enumerate() {
            let id = dockerfile.display().to_string();
            let target = self.target_for(dockerfile);
            tracing::info!("[{}/{}] {} -> {}", i + 1, total, id, target);

            match self.build_one(dockerfile, &target).await {
                Ok(()) => {
                    tracing::info!("Built and pushed {}", target);
                    result.record_success(id, target);
                }
                Err(e) => {
                    tracing::error!("Build failed for {}: {}", id, e);
                    result.record_failure(id, target, e.to_string());
                }
            }
        }

        result
    }

    async fn build_one(&self, dockerfile: &Path, target: &str) -> Result<()> {
        validate(dockerfile)?;

        let context = dockerfile
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let build = Invocation::new(&self.docker, self.timeouts.build())
            .arg("build")
            .arg("-f")
            .arg(dockerfile.to_string_lossy())
            .arg("-t")
            .arg(target)
            .arg("--no-cache")
            .arg(context.to_string_lossy());
        self.run_checked(&build).await?;

        let push = Invocation::new(&self.docker, self.timeouts.push())
            .arg("push")
            .arg(target);
        self.run_checked(&push).await?;

        self.cleanup(target).await;
        Ok(())
    }

    async fn run_checked(&self, invocation: &Invocation) -> Result<()> {
        tracing::debug!("{}", invocation);
        let output = self.runner.run(invocation).await?;
        if !output.success() && !output.stderr.trim().is_empty() {
            tracing::warn!("{}", output.stderr.trim());
        }
        output.check(invocation)?;
        Ok(())
    }

    /// Remove the local copy; failures only get logged.
    async fn cleanup(&self, target: &str) {
        let rmi = Invocation::new(&self.docker, self.timeouts.cleanup())
            .arg("rmi")
            .arg(target);
        match self.runner.run(&rmi).await {
            Ok(output) if output.success() => tracing::debug!("Removed local image {}", target),
            Ok(output) => tracing::debug!(
                "Could not remove local image {} ({})",
                target,
                output.exit_indicator()
            ),
            Err(e) => tracing::debug!("Could not remove local image {}: {}", target, e),
        }
    }
}
