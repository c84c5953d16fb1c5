//! Error types for `.astc` container output.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while building or writing an `.astc` container.
#[derive(Debug, Error)]
pub enum ContainerError {
    /// A dimension does not fit the 24-bit header field.
    #[error("image {axis} {value} is outside the header range 1..=16777215")]
    DimensionOutOfRange { axis: &'static str, value: u32 },

    /// Payload length disagrees with the header's block count.
    #[error("payload is {actual} bytes but the header describes {expected}")]
    PayloadMismatch { expected: usize, actual: usize },

    /// Header bytes do not start with the ASTC magic number.
    #[error("invalid magic {0:02X?}")]
    InvalidMagic([u8; 4]),

    /// Fewer than 16 header bytes were supplied.
    #[error("truncated header: {len} of 16 bytes")]
    TruncatedHeader { len: usize },

    /// Input file is not located under the scanned source root.
    #[error("{} is not under source root {}", path.display(), root.display())]
    OutsideSourceRoot { path: PathBuf, root: PathBuf },

    /// Failed to create the output directory.
    #[error("failed to create directory {}: {source}", path.display())]
    CreateDirectoryFailed { path: PathBuf, source: io::Error },

    /// Failed to write or commit the output file.
    #[error("failed to write {}: {source}", path.display())]
    WriteFailed { path: PathBuf, source: io::Error },
}
