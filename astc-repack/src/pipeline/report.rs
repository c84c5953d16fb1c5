//! Per-file and per-run outcome reporting.

use std::path::PathBuf;
use std::time::Duration;

/// Outcome of repacking one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    /// Source `.data` file.
    pub source: PathBuf,
    /// Written `.astc` container.
    pub output: PathBuf,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Whether the source carried alpha.
    pub has_alpha: bool,
    /// Container size in bytes, header included.
    pub bytes_written: usize,
    /// Wall-clock time spent on this file.
    pub elapsed: Duration,
}

/// Totals for a complete run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Source files found under the root.
    pub discovered: usize,
    /// Files converted successfully.
    pub converted: usize,
    /// Files that failed and were skipped.
    pub failed: usize,
    /// Wall-clock time for the whole run.
    pub elapsed: Duration,
}

impl RunSummary {
    /// No source files were found.
    pub fn is_empty(&self) -> bool {
        self.discovered == 0
    }

    /// Files were found but none converted.
    pub fn all_failed(&self) -> bool {
        self.discovered > 0 && self.converted == 0
    }

    /// Every discovered file converted.
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}
