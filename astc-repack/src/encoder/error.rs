//! Error types for block compression.

use thiserror::Error;

/// Failure reported by a [`BlockCompressor`] for one worker's share of an image.
///
/// [`BlockCompressor`]: super::BlockCompressor
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct CompressorError(pub String);

/// Errors that can occur while initializing or driving the compression engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration rejected at initialization.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The worker pool could not be created.
    #[error("failed to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    /// The context still holds state from an earlier image.
    #[error("context holds state from a previous image and must be reset")]
    ContextNotReset,

    /// Caller supplied a payload buffer of the wrong size.
    #[error("payload buffer is {actual} bytes, expected {expected}")]
    PayloadSize { expected: usize, actual: usize },

    /// A worker's compression call failed.
    #[error("worker {worker} failed: {source}")]
    WorkerFailed {
        worker: usize,
        #[source]
        source: CompressorError,
    },

    /// A worker panicked while compressing.
    #[error("worker {worker} panicked: {message}")]
    WorkerPanicked { worker: usize, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_worker_failed() {
        let err = EngineError::WorkerFailed {
            worker: 2,
            source: CompressorError("bad block".to_string()),
        };
        assert_eq!(err.to_string(), "worker 2 failed: bad block");
    }

    #[test]
    fn test_display_payload_size() {
        let err = EngineError::PayloadSize {
            expected: 64,
            actual: 48,
        };
        assert_eq!(err.to_string(), "payload buffer is 48 bytes, expected 64");
    }

    #[test]
    fn test_worker_failed_exposes_source() {
        use std::error::Error as _;

        let err = EngineError::WorkerFailed {
            worker: 0,
            source: CompressorError("inner".to_string()),
        };
        assert_eq!(err.source().map(|s| s.to_string()), Some("inner".to_string()));
    }
}
