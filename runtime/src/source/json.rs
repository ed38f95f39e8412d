//! JSON image lists.
//!
//! The document must be an object with an `images` array. Each element is
//! one of the shapes in [`RecordShape`]; elements matching none are skipped.

use std::path::Path;

use imgsync_core::error::{Result, SyncError};
use imgsync_core::record::{ImageRecord, DEFAULT_PRIORITY};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accepted element shapes, tried in declaration order.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecordShape {
    /// `{ "name": "nginx", "tag": "latest" }`; both keys must be present.
    Simple { name: String, tag: Value },
    /// `{ "source": { "repository": "nginx", "tag": "1.25" } }`
    Enhanced { source: SourceRef },
}

#[derive(Debug, Deserialize)]
struct SourceRef {
    #[serde(default)]
    repository: String,
    #[serde(default, deserialize_with = "lenient_string")]
    tag: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawOptions {
    #[serde(default, deserialize_with = "lenient_string")]
    platform: Option<String>,
    #[serde(default, alias = "privateRegistry", deserialize_with = "lenient")]
    private_registry: Option<bool>,
    #[serde(default, alias = "customName", deserialize_with = "lenient_string")]
    custom_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    description: Option<String>,
    #[serde(default, deserialize_with = "lenient_priority")]
    priority: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
struct RawTarget {
    #[serde(default, alias = "customName", deserialize_with = "lenient_string")]
    custom_name: Option<String>,
}

/// One `images` element. Everything besides the shape is optional and
/// tolerates off-type values, which fall back to their defaults.
#[derive(Debug, Deserialize)]
struct RawEntry {
    #[serde(flatten)]
    shape: RecordShape,
    #[serde(default, deserialize_with = "lenient_string")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    platform: Option<String>,
    #[serde(default, alias = "privateRegistry", deserialize_with = "lenient")]
    private_registry: Option<bool>,
    #[serde(default, alias = "customName", deserialize_with = "lenient_string")]
    custom_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    description: Option<String>,
    #[serde(default, deserialize_with = "lenient_priority")]
    priority: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    options: Option<RawOptions>,
    #[serde(default, deserialize_with = "lenient")]
    target: Option<RawTarget>,
}

/// Strings and numbers become text; `null` is absent.
fn scalar_string(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        other => {
            tracing::warn!("Ignoring non-scalar image attribute: {}", other);
            None
        }
    }
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_string(Value::deserialize(deserializer)?))
}

/// Integers, or strings holding one.
fn lenient_priority<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let priority = match &value {
        Value::Null => return Ok(None),
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    if priority.is_none() {
        tracing::warn!("Ignoring invalid priority {}, using default", value);
    }
    Ok(priority)
}

/// Decode `T`, or fall back to `None` when the value has another type.
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    match serde_json::from_value(value) {
        Ok(decoded) => Ok(Some(decoded)),
        Err(e) => {
            tracing::warn!("Ignoring image attribute: {}", e);
            Ok(None)
        }
    }
}

impl RawEntry {
    fn into_record(self, index: usize) -> Result<ImageRecord> {
        let options = self.options.unwrap_or_default();
        let target = self.target.unwrap_or_default();

        let id = first_non_empty([self.id]).unwrap_or_else(|| format!("img-{:03}", index));

        let (repository, tag) = match self.shape {
            RecordShape::Simple { name, tag } => (name, scalar_string(tag)),
            RecordShape::Enhanced { source } => (source.repository, source.tag),
        };

        let record = ImageRecord::new(id, &repository, tag.as_deref())?
            .with_platform(first_non_empty([self.platform, options.platform]))
            .with_private_registry(
                self.private_registry
                    .or(options.private_registry)
                    .unwrap_or(false),
            )
            .with_custom_name(first_non_empty([
                self.custom_name,
                options.custom_name,
                target.custom_name,
            ]))
            .with_description(first_non_empty([self.description, options.description]))
            .with_priority(self.priority.or(options.priority).unwrap_or(DEFAULT_PRIORITY));

        Ok(record)
    }
}

fn first_non_empty<const N: usize>(candidates: [Option<String>; N]) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .find(|v| !v.trim().is_empty())
}

fn parse_error(path: &Path, message: impl Into<String>) -> SyncError {
    SyncError::ParseError {
        path: path.to_path_buf(),
        message: message.into(),
    }
}

/// Parse a JSON image list.
///
/// Syntax errors and a missing `images` array fail the load. Individual
/// elements that cannot be normalized are logged and skipped.
pub fn parse(content: &str, path: &Path) -> Result<Vec<ImageRecord>> {
    let mut document: Value =
        serde_json::from_str(content).map_err(|e| parse_error(path, e.to_string()))?;

    let images = match document.get_mut("images").map(Value::take) {
        Some(Value::Array(images)) => images,
        Some(_) => return Err(parse_error(path, "'images' must be an array")),
        None => return Err(parse_error(path, "missing 'images' field")),
    };

    let mut records = Vec::with_capacity(images.len());
    for (index, element) in images.into_iter().enumerate() {
        let entry = match serde_json::from_value::<RawEntry>(element) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(index, "Skipping image entry with unrecognized format: {}", e);
                continue;
            }
        };

        match entry.into_record(index) {
            Ok(record) => records.push(record),
            Err(e) => tracing::warn!(index, "Skipping image entry: {}", e),
        }
    }

    Ok(records)
}
