//! Table and summary helpers for CLI output.

use comfy_table::{ContentArrangement, Table};
use imgsync_core::{BatchResult, ImageRecord, ImageSpec};

/// Create a styled table with the given headers.
pub fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.load_preset(comfy_table::presets::NOTHING);
    table.set_header(headers);
    table
}

/// Table of loaded image records, in load order.
pub fn records_table(records: &[ImageRecord]) -> Table {
    let mut table = new_table(&["ID", "IMAGE", "PLATFORM", "PRIORITY", "PRIVATE", "DESCRIPTION"]);
    for record in records {
        table.add_row(vec![
            record.id().to_string(),
            record.reference(),
            record.platform().unwrap_or("-").to_string(),
            record.priority().to_string(),
            yes_no(record.private_registry()).to_string(),
            truncate(record.description().unwrap_or(""), 48),
        ]);
    }
    table
}

/// Print the spec string each record would be synced with.
pub fn print_specs(records: &[ImageRecord]) {
    for record in records {
        println!("{}", ImageSpec::from(record));
    }
}

/// Print the final counts of a batch.
pub fn print_summary(title: &str, result: &BatchResult) {
    println!();
    println!("{title} summary:");
    println!("  Total:   {}", result.total);
    println!("  Success: {}", result.success);
    if result.skipped > 0 {
        println!("  Skipped: {} (already present)", result.skipped);
    }
    println!("  Failed:  {}", result.failed);
    for failure in &result.failures {
        println!(
            "    {}: {} ({})",
            failure.id,
            failure.spec,
            failure.error.as_deref().unwrap_or("unknown error")
        );
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

/// Truncate a string to `max` characters, appending "..." when cut.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}
