//! Dockerfile checks and image naming.

use std::path::Path;

use imgsync_core::error::{Result, SyncError};
use imgsync_core::record::{split_reference, DEFAULT_TAG};

/// Dockerfiles above this size are rejected.
pub const MAX_DOCKERFILE_SIZE: u64 = 10 * 1024 * 1024;

/// Prefix stripped from Dockerfile paths when deriving image names.
pub const DOCKERFILES_PREFIX: &str = "dockerfiles/";

/// Check that `path` looks like a buildable Dockerfile.
///
/// The first line that is neither blank nor a comment must be a `FROM`
/// instruction (any case), and the file must not exceed
/// [`MAX_DOCKERFILE_SIZE`].
pub fn validate(path: &Path) -> Result<()> {
    let size = std::fs::metadata(path)
        .map_err(|e| SyncError::InvalidDockerfile(format!("{}: {}", path.display(), e)))?
        .len();
    if size > MAX_DOCKERFILE_SIZE {
        return Err(SyncError::InvalidDockerfile(format!(
            "{} is too large ({} bytes, limit {})",
            path.display(),
            size,
            MAX_DOCKERFILE_SIZE
        )));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| SyncError::InvalidDockerfile(format!("{}: {}", path.display(), e)))?;
    validate_content(&content)
        .map_err(|reason| SyncError::InvalidDockerfile(format!("{}: {}", path.display(), reason)))
}

fn validate_content(content: &str) -> std::result::Result<(), String> {
    let first = content
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with('#'))
        .ok_or_else(|| "no instructions".to_string())?;

    let keyword = first.split_whitespace().next().unwrap_or_default();
    if keyword.eq_ignore_ascii_case("FROM") {
        Ok(())
    } else {
        Err(format!("first instruction must be FROM, found '{}'", keyword))
    }
}

/// Derive `(image_name, tag)` from a Dockerfile path.
///
/// `dockerfiles/tools/base:1.0` → `("tools-base", "1.0")`. Separators become
/// `-`, the name is lowercased, and the tag defaults to `latest`.
pub fn image_name_from_path(path: &str) -> (String, String) {
    let relative = path.strip_prefix(DOCKERFILES_PREFIX).unwrap_or(path);
    let relative = relative.trim_start_matches('/');

    let (name, tag) = split_reference(relative);
    let tag = tag.filter(|t| !t.is_empty()).unwrap_or(DEFAULT_TAG);
    let name = name.replace(['/', '\\'], "-").to_lowercase();

    (name, tag.to_string())
}
