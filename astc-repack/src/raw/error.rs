//! Error types for raw image decoding.

use std::io;

use thiserror::Error;

/// Errors that can occur while decoding a raw image container.
#[derive(Debug, Error)]
pub enum RawDecodeError {
    /// The stream ended before the fixed-size header was read.
    #[error("truncated header: expected {expected} bytes")]
    TruncatedHeader { expected: usize },

    /// The header declares a non-positive width or height.
    #[error("invalid dimensions {width}×{height}")]
    InvalidDimensions { width: i32, height: i32 },

    /// The declared dimensions exceed the 24-bit container range, or the
    /// pixel buffer cannot be allocated.
    #[error("image {width}×{height} is too large to decode")]
    TooLarge { width: u32, height: u32 },

    /// The stream ended before every pixel was produced.
    #[error("stream ended after {decoded} of {expected} pixel bytes")]
    Truncated { decoded: usize, expected: usize },

    /// A run would write past the end of the pixel buffer.
    #[error("run of {repeat} pixels at byte {offset} overflows the {expected}-byte image")]
    RunOverflow {
        repeat: u8,
        offset: usize,
        expected: usize,
    },

    /// Underlying read failure other than end-of-stream.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
