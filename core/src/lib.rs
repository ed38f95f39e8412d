//! imgsync Core - Shared Types
//!
//! Image records, spec strings, batch results, settings and the error type
//! used by the runtime and the CLI.

pub mod config;
pub mod error;
pub mod record;
pub mod result;
pub mod spec;

// Re-export commonly used types
pub use config::{RegistrySettings, Settings, Timeouts};
pub use error::{Result, SyncError};
pub use record::{ImageRecord, DEFAULT_PRIORITY, DEFAULT_TAG};
pub use result::{BatchResult, Outcome};
pub use spec::ImageSpec;
