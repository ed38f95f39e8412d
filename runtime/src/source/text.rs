//! Line-oriented image lists (`images.txt`).
//!
//! ```text
//! # comment
//! nginx
//! google/deepvariant:1.9.0-gpu
//! --platform=linux/arm64 xiaoyaliu/alist
//! --platform linux/amd64 alpine:3.18
//! ```

use imgsync_core::record::{split_reference, ImageRecord};

/// One parsed image line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEntry {
    pub platform: Option<String>,
    pub repository: String,
    pub tag: Option<String>,
}

/// Parse a single line. Blank and `#` lines yield `Ok(None)`.
pub fn parse_line(line: &str) -> std::result::Result<Option<TextEntry>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut tokens = line.split_whitespace();
    let first = tokens.next().unwrap_or_default();

    let (platform, image) = if let Some(platform) = first.strip_prefix("--platform=") {
        (Some(platform), tokens.next())
    } else if first == "--platform" {
        (tokens.next(), tokens.next())
    } else {
        (None, Some(first))
    };

    if platform.is_some_and(str::is_empty) || (first == "--platform" && platform.is_none()) {
        return Err("missing platform value".to_string());
    }
    let image = image.ok_or_else(|| "missing image after platform flag".to_string())?;

    let (repository, tag) = split_reference(image);
    if repository.is_empty() {
        return Err(format!("missing repository in '{}'", image));
    }
    Ok(Some(TextEntry {
        platform: platform.map(str::to_string),
        repository: repository.to_string(),
        tag: tag.map(str::to_string),
    }))
}

/// Parse a text image list; `origin` names the source in descriptions.
///
/// Priority is the 1-based line number, so file order is processing order.
pub fn parse(content: &str, origin: &str) -> Vec<ImageRecord> {
    let mut records = Vec::new();

    for (index, line) in content.lines().enumerate() {
        let line_no = index + 1;
        let entry = match parse_line(line) {
            Ok(Some(entry)) => entry,
            Ok(None) => continue,
            Err(e) => {
                tracing::warn!(line = line_no, "Skipping image line in {}: {}", origin, e);
                continue;
            }
        };

        let id = format!("migrated-{:03}", line_no);
        match ImageRecord::new(id, &entry.repository, entry.tag.as_deref()) {
            Ok(record) => records.push(
                record
                    .with_platform(entry.platform)
                    .with_priority(line_no as i64)
                    .with_description(Some(format!("{} line {}", origin, line_no))),
            ),
            Err(e) => tracing::warn!(line = line_no, "Skipping image line in {}: {}", origin, e),
        }
    }

    records
}
