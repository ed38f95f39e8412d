//! Normalized image records.
//!
//! Every config shape (simple JSON, enhanced JSON, text lines) ends up as an
//! [`ImageRecord`]. Records are validated on construction and never mutated
//! afterwards.

use crate::error::{Result, SyncError};

/// Tag applied when a source omits one.
pub const DEFAULT_TAG: &str = "latest";

/// Priority applied when a source omits one.
pub const DEFAULT_PRIORITY: i64 = 1;

/// One container image to mirror.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    id: String,
    repository: String,
    tag: String,
    platform: Option<String>,
    private_registry: bool,
    custom_name: Option<String>,
    description: Option<String>,
    priority: i64,
}

impl ImageRecord {
    /// Create a record with default attributes.
    ///
    /// Fails when `repository` is blank. A blank or missing tag becomes `latest`.
    pub fn new(id: impl Into<String>, repository: &str, tag: Option<&str>) -> Result<Self> {
        let id = id.into();
        let repository = repository.trim();
        if repository.is_empty() {
            return Err(SyncError::InvalidRecord {
                id,
                message: "missing repository".to_string(),
            });
        }

        let tag = tag
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_TAG);

        Ok(Self {
            id,
            repository: repository.to_string(),
            tag: tag.to_string(),
            platform: None,
            private_registry: false,
            custom_name: None,
            description: None,
            priority: DEFAULT_PRIORITY,
        })
    }

    pub fn with_platform(mut self, platform: Option<String>) -> Self {
        self.platform = non_empty(platform);
        self
    }

    pub fn with_private_registry(mut self, private_registry: bool) -> Self {
        self.private_registry = private_registry;
        self
    }

    pub fn with_custom_name(mut self, custom_name: Option<String>) -> Self {
        self.custom_name = non_empty(custom_name);
        self
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = non_empty(description);
        self
    }

    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn platform(&self) -> Option<&str> {
        self.platform.as_deref()
    }

    /// Informational only; no transfer logic consults it.
    pub fn private_registry(&self) -> bool {
        self.private_registry
    }

    pub fn custom_name(&self) -> Option<&str> {
        self.custom_name.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn priority(&self) -> i64 {
        self.priority
    }

    /// `repository:tag`, always with an explicit tag.
    pub fn reference(&self) -> String {
        format!("{}:{}", self.repository, self.tag)
    }

    /// Final path segment of the repository (`k8s.gcr.io/a/b` → `b`).
    pub fn basename(&self) -> &str {
        self.repository
            .rsplit('/')
            .next()
            .unwrap_or(&self.repository)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Sort records by ascending priority, keeping source order on ties.
pub fn sort_by_priority(records: &mut [ImageRecord]) {
    records.sort_by_key(|r| r.priority);
}

/// Split `repository[:tag]` into its parts.
///
/// The tag separator is the last `:` after the last `/`, so a registry port
/// (`localhost:5000/app`) is never mistaken for a tag.
pub fn split_reference(reference: &str) -> (&str, Option<&str>) {
    let name_start = reference.rfind('/').map(|i| i + 1).unwrap_or(0);
    match reference[name_start..].rfind(':') {
        Some(colon) => {
            let colon = name_start + colon;
            (&reference[..colon], Some(&reference[colon + 1..]))
        }
        None => (reference, None),
    }
}
