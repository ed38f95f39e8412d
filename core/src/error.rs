use std::path::PathBuf;

use thiserror::Error;

/// imgsync error types
#[derive(Error, Debug)]
pub enum SyncError {
    /// Invalid or conflicting configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// No image list could be located
    #[error("Configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    /// Image list could not be parsed
    #[error("Parse error: {} - {}", .path.display(), .message)]
    ParseError { path: PathBuf, message: String },

    /// A single image record is unusable
    #[error("Invalid image record {id}: {message}")]
    InvalidRecord { id: String, message: String },

    /// Dockerfile failed pre-build validation
    #[error("invalid Dockerfile: {0}")]
    InvalidDockerfile(String),

    /// External command exceeded its time budget
    #[error("timed out after {secs}s")]
    TimeoutError { command: String, secs: u64 },

    /// External command could not be started
    #[error("Command failed: {command} - {message}")]
    CommandFailed { command: String, message: String },

    /// External command ran but exited unsuccessfully
    #[error("{status}")]
    CommandExit { command: String, status: String },

    /// Sync script is missing on disk
    #[error("sync script not found: {}", .0.display())]
    ScriptNotFound(PathBuf),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// At least one record in the batch failed
    #[error("{failed} of {total} images failed")]
    BatchFailed { failed: usize, total: usize },
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        SyncError::SerializationError(err.to_string())
    }
}

/// Result type alias for imgsync operations
pub type Result<T> = std::result::Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let error = SyncError::ConfigError("--force and --smart are mutually exclusive".to_string());
        assert_eq!(
            error.to_string(),
            "Configuration error: --force and --smart are mutually exclusive"
        );
    }

    #[test]
    fn test_config_not_found_display() {
        let error = SyncError::ConfigNotFound(PathBuf::from("images.json"));
        assert_eq!(
            error.to_string(),
            "Configuration file not found: images.json"
        );
    }

    #[test]
    fn test_parse_error_display() {
        let error = SyncError::ParseError {
            path: PathBuf::from("images.json"),
            message: "missing 'images' field".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Parse error: images.json - missing 'images' field"
        );
    }

    #[test]
    fn test_invalid_record_display() {
        let error = SyncError::InvalidRecord {
            id: "img-003".to_string(),
            message: "empty repository".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid image record img-003: empty repository"
        );
    }

    #[test]
    fn test_timeout_error_display() {
        let error = SyncError::TimeoutError {
            command: "./scripts/sync_single_image.sh".to_string(),
            secs: 600,
        };
        assert_eq!(error.to_string(), "timed out after 600s");
    }

    #[test]
    fn test_script_not_found_display() {
        let error = SyncError::ScriptNotFound(PathBuf::from("./scripts/sync_single_image.sh"));
        assert_eq!(
            error.to_string(),
            "sync script not found: ./scripts/sync_single_image.sh"
        );
    }

    #[test]
    fn test_batch_failed_display() {
        let error = SyncError::BatchFailed { failed: 2, total: 3 };
        assert_eq!(error.to_string(), "2 of 3 images failed");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let sync_error: SyncError = io_error.into();
        assert!(matches!(sync_error, SyncError::IoError(_)));
        assert!(sync_error.to_string().contains("file not found"));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let result: std::result::Result<serde_json::Value, _> = serde_json::from_str("{ invalid");
        let sync_error: SyncError = result.unwrap_err().into();
        assert!(matches!(sync_error, SyncError::SerializationError(_)));
    }
}
