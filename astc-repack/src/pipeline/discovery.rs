//! Source file discovery.

use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use tracing::{debug, warn};

use super::DiscoveryError;

/// Recursively find regular files under `root` with the given extension.
///
/// The extension is matched case-sensitively and without the leading dot.
/// Results are sorted so runs process files in a stable order. Entries that
/// cannot be read are logged and skipped.
///
/// # Errors
///
/// Returns `DiscoveryError` if the search pattern cannot be built. Patterns
/// are strings, so a root whose path is not valid UTF-8 is rejected with
/// [`DiscoveryError::NonUtf8Root`] before anything is read.
pub fn discover_sources(root: &Path, extension: &str) -> Result<Vec<PathBuf>, DiscoveryError> {
    let root_str = root
        .to_str()
        .ok_or_else(|| DiscoveryError::NonUtf8Root(root.to_path_buf()))?;
    let pattern = format!(
        "{}/**/*.{}",
        Pattern::escape(root_str.trim_end_matches(['/', '\\'])),
        Pattern::escape(extension)
    );

    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    };

    let mut sources = Vec::new();
    for entry in glob::glob_with(&pattern, options)? {
        match entry {
            Ok(path) if path.is_file() => sources.push(path),
            Ok(_) => {}
            Err(e) => {
                warn!(
                    path = %e.path().display(),
                    error = %e.error(),
                    "Skipping unreadable entry"
                );
            }
        }
    }
    sources.sort();

    debug!(
        root = %root.display(),
        extension,
        count = sources.len(),
        "Source discovery complete"
    );
    Ok(sources)
}
