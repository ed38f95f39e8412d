//! imgsync CLI - mirror and build container images into a private registry.

pub mod commands;
pub mod output;
