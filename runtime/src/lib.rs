//! imgsync Runtime - image list parsing and batch execution.
//!
//! Loads image lists, checks the destination registry, drives the sync
//! script and docker builds, and writes CI result files.

pub mod build;
pub mod exec;
pub mod migrate;
pub mod registry;
pub mod report;
pub mod source;
pub mod sync;

// Re-export common types
pub use build::{load_dockerfile_list, BuildOrchestrator};
pub use exec::{CommandOutput, CommandRunner, Invocation, ProcessRunner};
pub use migrate::ConfigDocument;
pub use registry::ExistenceChecker;
pub use report::{Report, ReportFormat, BUILD_COUNT_KEY, SYNC_COUNT_KEY};
pub use sync::{SyncMode, SyncOrchestrator};
