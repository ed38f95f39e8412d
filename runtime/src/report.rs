//! CI result files.
//!
//! A [`BatchResult`] becomes flat `KEY=VALUE` lines. Item lists are written
//! either as heredoc blocks or as one escaped line; CI consumers read both.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use imgsync_core::error::Result;
use imgsync_core::result::{BatchResult, Outcome};

/// Alias count key written by `sync` and `process`.
pub const SYNC_COUNT_KEY: &str = "SYNC_COUNT";

/// Alias count key written by `build`.
pub const BUILD_COUNT_KEY: &str = "BUILD_COUNT";

const HEREDOC_SENTINEL: &str = "EOF";

/// Encoding of the itemized lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// `KEY<<EOF` / items / `EOF`
    Heredoc,
    /// `KEY="item\nitem"`, sourceable by bash
    Escaped,
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Heredoc => write!(f, "heredoc"),
            Self::Escaped => write!(f, "escaped"),
        }
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "heredoc" => Ok(Self::Heredoc),
            "escaped" => Ok(Self::Escaped),
            _ => Err(format!(
                "unknown report format: '{}' (supported: heredoc, escaped)",
                s
            )),
        }
    }
}

/// Renders and writes result files.
#[derive(Debug, Clone, Copy)]
pub struct Report {
    format: ReportFormat,
    count_alias: &'static str,
}

impl Report {
    pub fn new(format: ReportFormat, count_alias: &'static str) -> Self {
        Self {
            format,
            count_alias,
        }
    }

    pub fn render(&self, result: &BatchResult) -> String {
        let mut out = format!(
            "TOTAL_COUNT={}\nSUCCESS_COUNT={}\nFAILED_COUNT={}\nSKIPPED_COUNT={}\n{}={}\n",
            result.total,
            result.success,
            result.failed,
            result.skipped,
            self.count_alias,
            result.total
        );

        let succeeded: Vec<String> = result.succeeded.iter().map(success_line).collect();
        let failed: Vec<String> = result.failures.iter().map(failure_line).collect();
        out.push_str(&self.render_list("SUCCESS_IMAGES", &succeeded));
        out.push_str(&self.render_list("FAILED_IMAGES", &failed));
        out
    }

    pub fn write(&self, result: &BatchResult, path: &Path) -> Result<()> {
        std::fs::write(path, self.render(result))?;
        tracing::info!("Results written to {}", path.display());
        Ok(())
    }

    fn render_list(&self, key: &str, items: &[String]) -> String {
        match self.format {
            ReportFormat::Heredoc => {
                let mut block = format!("{}<<{}\n", key, HEREDOC_SENTINEL);
                for item in items {
                    block.push_str(item);
                    block.push('\n');
                }
                block.push_str(HEREDOC_SENTINEL);
                block.push('\n');
                block
            }
            ReportFormat::Escaped => {
                let joined = items
                    .iter()
                    .map(|item| escape(item))
                    .collect::<Vec<_>>()
                    .join("\\n");
                format!("{}=\"{}\"\n", key, joined)
            }
        }
    }
}

fn success_line(outcome: &Outcome) -> String {
    format!("✅ {}: {}", outcome.id, outcome.spec)
}

fn failure_line(outcome: &Outcome) -> String {
    format!(
        "❌ {}: {} ({})",
        outcome.id,
        outcome.spec,
        outcome.error.as_deref().unwrap_or("unknown error")
    )
}

fn escape(item: &str) -> String {
    item.replace('\\', "\\\\").replace('"', "\\\"")
}
