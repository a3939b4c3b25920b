//! Output formatting and display for pdfqueue.
//!
//! This module handles all user-facing console output:
//! - Formatted status messages
//! - Queue status lines
//! - Quiet and verbose modes
//!
//! Diagnostic logging goes through `tracing` instead and is configured by
//! the binary.

pub mod formatter;

pub use formatter::{MessageLevel, OutputFormatter, format_entry};

use std::path::PathBuf;

use crate::job::QueueEntry;
use crate::queue::RunSummary;

/// Print every entry followed by a one-line summary of the pass.
pub fn display_queue_report(
    formatter: &OutputFormatter,
    entries: &[QueueEntry],
    summary: &RunSummary,
) {
    formatter.section("Queue");
    for entry in entries {
        formatter.queue_entry(entry);
    }

    let line = format!(
        "Ran {} job(s): {} succeeded, {} failed",
        summary.total(),
        summary.succeeded,
        summary.failed
    );
    if summary.is_success() {
        formatter.success(&line);
    } else {
        formatter.warning(&line);
    }
}

/// Print the files a split produced.
pub fn display_written_files(formatter: &OutputFormatter, files: &[PathBuf]) {
    for (index, file) in files.iter().enumerate() {
        formatter.list_item(index + 1, &file.display().to_string());
    }
}
