//! Output path resolution and container file writing.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use super::{AstcHeader, ContainerError};

/// Extension given to every written container.
pub const OUTPUT_EXTENSION: &str = "astc";

/// Maps source files under a scan root onto container paths under an output root.
///
/// # Example
///
/// ```
/// use astc_repack::astc::OutputLayout;
/// use std::path::Path;
///
/// let layout = OutputLayout::new("/game/Content", "/tmp/out");
/// let path = layout
///     .output_path(Path::new("/game/Content/Graphics/Atlases/Gameplay0.data"))
///     .unwrap();
///
/// assert_eq!(path, Path::new("/tmp/out/Graphics/Atlases/Gameplay0.astc"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    source_root: PathBuf,
    output_root: PathBuf,
}

impl OutputLayout {
    /// Create a layout that mirrors `source_root` beneath `output_root`.
    pub fn new(source_root: impl Into<PathBuf>, output_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            output_root: output_root.into(),
        }
    }

    /// Create a layout that writes containers next to their sources.
    pub fn in_place(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            source_root: root.clone(),
            output_root: root,
        }
    }

    /// Root directory that was scanned for sources.
    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    /// Root directory containers are written under.
    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Resolve the container path for a source file.
    ///
    /// # Errors
    ///
    /// Returns `ContainerError::OutsideSourceRoot` if `input` is not located
    /// beneath the source root.
    pub fn output_path(&self, input: &Path) -> Result<PathBuf, ContainerError> {
        let relative =
            input
                .strip_prefix(&self.source_root)
                .map_err(|_| ContainerError::OutsideSourceRoot {
                    path: input.to_path_buf(),
                    root: self.source_root.clone(),
                })?;

        Ok(self
            .output_root
            .join(relative)
            .with_extension(OUTPUT_EXTENSION))
    }
}

/// Writes `.astc` containers according to an [`OutputLayout`].
///
/// Containers are staged in a temporary file inside the destination directory
/// and renamed into place once fully written, so a failed write never leaves
/// a truncated container behind. An existing container at the same path is
/// replaced.
#[derive(Debug, Clone)]
pub struct ContainerWriter {
    layout: OutputLayout,
}

impl ContainerWriter {
    /// Create a writer for the given layout.
    pub fn new(layout: OutputLayout) -> Self {
        Self { layout }
    }

    /// The layout used to resolve output paths.
    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    /// Write the container for `input` and return the path written.
    ///
    /// # Errors
    ///
    /// Returns `ContainerError` if the payload length disagrees with the
    /// header, the input lies outside the source root, or any directory or
    /// file operation fails.
    pub fn write(
        &self,
        input: &Path,
        header: &AstcHeader,
        payload: &[u8],
    ) -> Result<PathBuf, ContainerError> {
        check_payload(header, payload)?;

        let path = self.layout.output_path(input)?;
        let parent = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.layout.output_root.clone());

        fs::create_dir_all(&parent).map_err(|source| ContainerError::CreateDirectoryFailed {
            path: parent.clone(),
            source,
        })?;

        let write_failed = |source: std::io::Error| ContainerError::WriteFailed {
            path: path.clone(),
            source,
        };

        let staged = NamedTempFile::new_in(&parent).map_err(write_failed)?;
        let mut out = BufWriter::new(staged);
        encode(header, payload, &mut out).map_err(write_failed)?;
        let staged = out
            .into_inner()
            .map_err(|e| write_failed(e.into_error()))?;
        staged
            .persist(&path)
            .map_err(|e| write_failed(e.error))?;

        debug!(
            path = %path.display(),
            bytes = super::HEADER_LEN + payload.len(),
            "Wrote ASTC container"
        );
        Ok(path)
    }
}

/// Serialize a header and payload into `writer`.
pub fn encode<W: Write>(
    header: &AstcHeader,
    payload: &[u8],
    writer: &mut W,
) -> std::io::Result<()> {
    header.write_to(writer)?;
    writer.write_all(payload)?;
    writer.flush()
}

fn check_payload(header: &AstcHeader, payload: &[u8]) -> Result<(), ContainerError> {
    let expected = header.payload_len();
    if payload.len() != expected {
        return Err(ContainerError::PayloadMismatch {
            expected,
            actual: payload.len(),
        });
    }
    Ok(())
}
