//! Image list loading.
//!
//! Formats:
//! - JSON (`*.json`): simple or enhanced records under an `images` array
//! - Text (anything else): one `[--platform=<p>] repository[:tag]` per line

pub mod json;
pub mod text;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use imgsync_core::error::{Result, SyncError};
use imgsync_core::record::ImageRecord;

/// Files looked for, in order, when no config path is given.
pub const DISCOVERY_ORDER: [&str; 2] = ["images.json", "images.txt"];

/// Image list format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Text,
}

impl ConfigFormat {
    /// Choose a format from the file extension.
    pub fn detect(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Find the first existing file of [`DISCOVERY_ORDER`] in `dir`.
pub fn discover(dir: &Path) -> Result<PathBuf> {
    DISCOVERY_ORDER
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
        .ok_or_else(|| SyncError::ConfigNotFound(dir.join(DISCOVERY_ORDER[0])))
}

/// Resolve an explicit path, or discover one in the working directory.
pub fn resolve(config: Option<&Path>) -> Result<PathBuf> {
    match config {
        Some(path) => Ok(path.to_path_buf()),
        None => discover(Path::new(".")),
    }
}

/// Load and normalize an image list.
pub fn load(path: &Path) -> Result<Vec<ImageRecord>> {
    if !path.is_file() {
        return Err(SyncError::ConfigNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let records = match ConfigFormat::detect(path) {
        ConfigFormat::Json => json::parse(&content, path)?,
        ConfigFormat::Text => text::parse(&content, &path.display().to_string()),
    };

    let mut seen = HashSet::new();
    for record in &records {
        if !seen.insert(record.id()) {
            tracing::warn!("Duplicate image id '{}' in {}", record.id(), path.display());
        }
    }

    tracing::info!(
        "Loaded {} image records from {}",
        records.len(),
        path.display()
    );
    Ok(records)
}
