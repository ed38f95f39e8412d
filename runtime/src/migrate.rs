//! Conversion of plain image lists into enhanced JSON documents.
//!
//! Both `images.txt` files and issue-extracted lists become documents that
//! [`crate::source::json`] reads back.

use std::path::Path;

use chrono::{DateTime, Utc};
use imgsync_core::error::Result;
use imgsync_core::record::{split_reference, DEFAULT_TAG};
use serde::{Deserialize, Serialize};

use crate::source::text;

const DOCUMENT_VERSION: &str = "1.0";

/// Enhanced-format image list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigDocument {
    pub version: String,
    pub metadata: Metadata,
    pub images: Vec<DocumentImage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub description: String,
    pub created: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub migrated_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentImage {
    pub id: String,
    pub description: String,
    pub source: DocumentSource,
    pub options: DocumentOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSource {
    pub repository: String,
    pub tag: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentOptions {
    pub platform: Option<String>,
    pub private_registry: bool,
    pub skip_existing: bool,
    pub priority: i64,
}

impl ConfigDocument {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()? + "\n")?;
        tracing::info!(
            "Wrote {} images to {}",
            self.images.len(),
            path.display()
        );
        Ok(())
    }

    /// The same images in the simple `name`/`tag` shape.
    pub fn to_simple(&self) -> SimpleDocument {
        SimpleDocument {
            images: self
                .images
                .iter()
                .map(|image| SimpleImage {
                    name: image.source.repository.clone(),
                    tag: image.source.tag.clone(),
                    platform: image.options.platform.clone(),
                })
                .collect(),
        }
    }
}

/// Simple-format image list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleDocument {
    pub images: Vec<SimpleImage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleImage {
    pub name: String,
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
}

impl SimpleDocument {
    pub fn write(&self, path: &Path) -> Result<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)? + "\n")?;
        tracing::info!(
            "Wrote {} images to {}",
            self.images.len(),
            path.display()
        );
        Ok(())
    }
}

/// Starter list covering every option of the enhanced format.
pub fn example_document(created: DateTime<Utc>) -> ConfigDocument {
    let image = |id: &str,
                 description: &str,
                 reference: &str,
                 platform: Option<&str>,
                 priority: i64| {
        let (repository, tag) = split_reference(reference);
        DocumentImage {
            id: id.to_string(),
            description: description.to_string(),
            source: DocumentSource {
                repository: repository.to_string(),
                tag: tag.unwrap_or(DEFAULT_TAG).to_string(),
            },
            options: DocumentOptions {
                platform: platform.map(str::to_string),
                private_registry: looks_private(repository),
                skip_existing: true,
                priority,
            },
        }
    };

    ConfigDocument {
        version: DOCUMENT_VERSION.to_string(),
        metadata: Metadata {
            description: "image sync configuration".to_string(),
            created,
            migrated_from: None,
            source: None,
        },
        images: vec![
            image("nginx-latest", "Nginx web server", "nginx:latest", None, 1),
            image(
                "kube-state-metrics-v2",
                "Kubernetes state metrics exporter",
                "k8s.gcr.io/kube-state-metrics/kube-state-metrics:v2.0.0",
                None,
                2,
            ),
            image("alist-latest", "Alist file listing", "xhofe/alist:latest", None, 3),
            image(
                "alist-arm64",
                "Alist for ARM64",
                "xiaoyaliu/alist:latest",
                Some("linux/arm64"),
                3,
            ),
            image(
                "deepvariant-gpu-1.10.0",
                "DeepVariant GPU build",
                "google/deepvariant:1.10.0-beta-gpu",
                None,
                5,
            ),
            image(
                "deepvariant-gpu-1.9.0",
                "DeepVariant GPU build",
                "google/deepvariant:1.9.0-gpu",
                None,
                5,
            ),
        ],
    }
}

/// Images pulled from gcr.io mirrors are flagged as private.
fn looks_private(repository: &str) -> bool {
    repository.contains("gcr.io")
}

/// Convert a text image list. Ids and priorities follow line numbers.
pub fn migrate_text(content: &str, origin: &str, created: DateTime<Utc>) -> ConfigDocument {
    let mut images = Vec::new();

    for (index, line) in content.lines().enumerate() {
        let line_no = index + 1;
        let entry = match text::parse_line(line) {
            Ok(Some(entry)) => entry,
            Ok(None) => continue,
            Err(e) => {
                tracing::warn!(line = line_no, "Not migrating line from {}: {}", origin, e);
                continue;
            }
        };

        images.push(DocumentImage {
            id: format!("migrated-{:03}", line_no),
            description: format!("migrated from {} line {}", origin, line_no),
            options: DocumentOptions {
                platform: entry.platform,
                private_registry: looks_private(&entry.repository),
                skip_existing: true,
                priority: line_no as i64,
            },
            source: DocumentSource {
                repository: entry.repository,
                tag: entry
                    .tag
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| DEFAULT_TAG.to_string()),
            },
        });
    }

    ConfigDocument {
        version: DOCUMENT_VERSION.to_string(),
        metadata: Metadata {
            description: format!("migrated from {}", origin),
            created,
            migrated_from: Some(origin.to_string()),
            source: None,
        },
        images,
    }
}

/// Convert a list of `repository[:tag]` lines extracted from an issue.
pub fn from_issue_list(content: &str, created: DateTime<Utc>) -> ConfigDocument {
    let images = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(split_reference)
        .filter(|(repository, _)| {
            if repository.is_empty() {
                tracing::warn!("Skipping issue item without repository");
            }
            !repository.is_empty()
        })
        .enumerate()
        .map(|(index, (repository, tag))| {
            let position = index + 1;
            DocumentImage {
                id: format!("issue-{:03}", position),
                description: format!("issue item {}", position),
                source: DocumentSource {
                    repository: repository.to_string(),
                    tag: tag
                        .filter(|t| !t.is_empty())
                        .unwrap_or(DEFAULT_TAG)
                        .to_string(),
                },
                options: DocumentOptions {
                    platform: None,
                    private_registry: false,
                    skip_existing: true,
                    priority: position as i64,
                },
            }
        })
        .collect();

    ConfigDocument {
        version: DOCUMENT_VERSION.to_string(),
        metadata: Metadata {
            description: "temporary configuration created from an issue".to_string(),
            created,
            migrated_from: None,
            source: Some("GitHub Issue".to_string()),
        },
        images,
    }
}
