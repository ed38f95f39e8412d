//! Dockerfile build pipeline.

pub mod dockerfile;
pub mod engine;

use std::path::{Path, PathBuf};

use imgsync_core::error::Result;

pub use dockerfile::{image_name_from_path, validate, MAX_DOCKERFILE_SIZE};
pub use engine::BuildOrchestrator;

/// Read a list of Dockerfile paths, one per line.
///
/// Blank and `#` lines are ignored. Paths that are not existing files are
/// logged and dropped.
pub fn load_dockerfile_list(list: &Path) -> Result<Vec<PathBuf>> {
    let content = std::fs::read_to_string(list)?;

    let mut dockerfiles = Vec::new();
    for line in content.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let path = PathBuf::from(line);
        if path.is_file() {
            dockerfiles.push(path);
        } else {
            tracing::warn!("Dockerfile not found, skipping: {}", line);
        }
    }

    Ok(dockerfiles)
}
