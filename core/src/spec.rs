//! Spec strings passed to the transfer command.
//!
//! Grammar: `[--platform=<platform> ]<repository>:<tag>`. The tag is always
//! present, `:latest` included.

use std::fmt;

use crate::record::ImageRecord;

/// Composed command argument for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSpec {
    pub repository: String,
    pub tag: String,
    pub platform: Option<String>,
}

impl ImageSpec {
    /// `repository:tag` without the platform flag.
    pub fn reference(&self) -> String {
        format!("{}:{}", self.repository, self.tag)
    }

    /// Final path segment of the repository.
    pub fn basename(&self) -> &str {
        self.repository
            .rsplit('/')
            .next()
            .unwrap_or(&self.repository)
    }
}

impl From<&ImageRecord> for ImageSpec {
    fn from(record: &ImageRecord) -> Self {
        Self {
            repository: record.repository().to_string(),
            tag: record.tag().to_string(),
            platform: record.platform().map(str::to_string),
        }
    }
}

impl fmt::Display for ImageSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(platform) = &self.platform {
            write!(f, "--platform={} ", platform)?;
        }
        write!(f, "{}:{}", self.repository, self.tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_without_platform() {
        let record = ImageRecord::new("img-000", "nginx", Some("latest")).unwrap();
        assert_eq!(ImageSpec::from(&record).to_string(), "nginx:latest");
    }

    #[test]
    fn test_spec_with_platform() {
        let record = ImageRecord::new("alist-arm64", "xiaoyaliu/alist", Some("latest"))
            .unwrap()
            .with_platform(Some("linux/arm64".to_string()));
        assert_eq!(
            ImageSpec::from(&record).to_string(),
            "--platform=linux/arm64 xiaoyaliu/alist:latest"
        );
    }

    #[test]
    fn test_spec_keeps_non_latest_tag() {
        let record = ImageRecord::new("t", "app/service", Some("v1.0"))
            .unwrap()
            .with_platform(Some("linux/amd64".to_string()));
        let spec = ImageSpec::from(&record);
        assert_eq!(spec.to_string(), "--platform=linux/amd64 app/service:v1.0");
        assert_eq!(spec.reference(), "app/service:v1.0");
        assert_eq!(spec.basename(), "service");
    }
}
