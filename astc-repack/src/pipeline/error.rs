//! Error types for the repacking pipeline.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::astc::ContainerError;
use crate::encoder::EngineError;
use crate::raw::RawDecodeError;

/// Errors that abort source discovery, and with it the whole run.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The source root cannot be expressed as a search pattern.
    #[error("source root is not valid UTF-8: {}", .0.display())]
    NonUtf8Root(PathBuf),

    /// The search pattern was rejected.
    #[error("invalid search pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

/// Failure to repack a single source file.
///
/// These are recoverable: the driver reports them and moves on to the next
/// file.
#[derive(Debug, Error)]
pub enum RepackError {
    /// The source file could not be opened.
    #[error("failed to open {}: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },

    /// The source file is truncated or malformed.
    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        source: RawDecodeError,
    },

    /// The compression engine reported an error.
    #[error("failed to compress {}: {source}", path.display())]
    Compress { path: PathBuf, source: EngineError },

    /// The output container could not be written.
    #[error("failed to write container for {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: ContainerError,
    },
}

impl RepackError {
    /// Source file the error refers to.
    pub fn path(&self) -> &Path {
        match self {
            RepackError::Open { path, .. }
            | RepackError::Decode { path, .. }
            | RepackError::Compress { path, .. }
            | RepackError::Write { path, .. } => path.as_path(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_decode_error() {
        let err = RepackError::Decode {
            path: PathBuf::from("Gameplay0.data"),
            source: RawDecodeError::Truncated {
                decoded: 4,
                expected: 16,
            },
        };
        assert_eq!(
            err.to_string(),
            "failed to decode Gameplay0.data: stream ended after 4 of 16 pixel bytes"
        );
    }

    #[test]
    fn test_path_accessor() {
        let err = RepackError::Compress {
            path: PathBuf::from("a.data"),
            source: EngineError::ContextNotReset,
        };
        assert_eq!(err.path(), Path::new("a.data"));
    }

    #[test]
    fn test_display_non_utf8_root() {
        let err = DiscoveryError::NonUtf8Root(PathBuf::from("/games"));
        assert_eq!(err.to_string(), "source root is not valid UTF-8: /games");
    }
}
