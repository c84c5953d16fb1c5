//! Run-length decoding into a flat pixel buffer.

use std::io::{self, Read};

use super::RawDecodeError;
use crate::astc::MAX_DIMENSION;

/// Size of the container header: width, height and the alpha flag.
pub const HEADER_LEN: usize = 9;

/// Bytes written per decoded pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// Alpha value used for every pixel when the container has no alpha channel.
pub const OPAQUE_ALPHA: u8 = 0xFF;

/// Upper bound on the pixel buffer reserved before any run has been read.
const INITIAL_RESERVE: usize = 1 << 20;

/// A fully decoded raw image.
///
/// The pixel buffer always holds exactly `width * height * 4` bytes, with each
/// pixel laid out as `b, g, r, a`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImage {
    width: u32,
    height: u32,
    has_alpha: bool,
    pixels: Vec<u8>,
}

impl RawImage {
    /// Decode a raw image container from a byte stream.
    ///
    /// Reads the header and then expands runs until every pixel of the
    /// declared image has been produced. The stream is not read past the
    /// final run.
    ///
    /// # Errors
    ///
    /// Returns `RawDecodeError` if:
    /// - The header is truncated or declares non-positive dimensions
    /// - A dimension exceeds [`MAX_DIMENSION`] or the pixels cannot be allocated
    /// - The stream ends before the image is complete
    /// - A run would emit more pixels than the image has room for
    pub fn decode<R: Read>(mut reader: R) -> Result<Self, RawDecodeError> {
        let mut header = [0u8; HEADER_LEN];
        reader.read_exact(&mut header).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => RawDecodeError::TruncatedHeader {
                expected: HEADER_LEN,
            },
            _ => RawDecodeError::Io(e),
        })?;

        let width = i32::from_le_bytes([header[0], header[1], header[2], header[3]]);
        let height = i32::from_le_bytes([header[4], header[5], header[6], header[7]]);
        let has_alpha = header[8] != 0;

        if width <= 0 || height <= 0 {
            return Err(RawDecodeError::InvalidDimensions { width, height });
        }
        let (width, height) = (width as u32, height as u32);
        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(RawDecodeError::TooLarge { width, height });
        }
        let expected = pixel_buffer_len(width, height)?;

        // The header is untrusted; the buffer grows as runs arrive.
        let mut pixels = Vec::with_capacity(expected.min(INITIAL_RESERVE));
        while pixels.len() < expected {
            let decoded = pixels.len();
            let mut read = |buf: &mut [u8]| read_run_bytes(&mut reader, buf, decoded, expected);

            let mut repeat = [0u8; 1];
            read(&mut repeat)?;
            let repeat = repeat[0];

            let alpha = if has_alpha {
                let mut alpha = [0u8; 1];
                read(&mut alpha)?;
                alpha[0]
            } else {
                OPAQUE_ALPHA
            };

            // Transparent runs carry no color payload.
            let mut rgb = [0u8; 3];
            if alpha > 0 {
                read(&mut rgb)?;
            }
            let [r, g, b] = rgb;

            let run_len = repeat as usize * BYTES_PER_PIXEL;
            if decoded + run_len > expected {
                return Err(RawDecodeError::RunOverflow {
                    repeat,
                    offset: decoded,
                    expected,
                });
            }

            pixels
                .try_reserve(run_len)
                .map_err(|_| RawDecodeError::TooLarge { width, height })?;
            for _ in 0..repeat {
                pixels.extend_from_slice(&[b, g, r, alpha]);
            }
        }

        Ok(Self {
            width,
            height,
            has_alpha,
            pixels,
        })
    }

    /// Build an image from an already expanded pixel buffer.
    ///
    /// Returns `None` if the dimensions are zero or the buffer length does
    /// not equal `width * height * 4`.
    pub fn from_pixels(
        width: u32,
        height: u32,
        has_alpha: bool,
        pixels: Vec<u8>,
    ) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        let expected = pixel_buffer_len(width, height).ok()?;
        (pixels.len() == expected).then_some(Self {
            width,
            height,
            has_alpha,
            pixels,
        })
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether the source container carried per-run alpha.
    pub fn has_alpha(&self) -> bool {
        self.has_alpha
    }

    /// Decoded pixels, 4 bytes each in `b, g, r, a` order.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Consume the image and return its pixel buffer.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }
}

fn pixel_buffer_len(width: u32, height: u32) -> Result<usize, RawDecodeError> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(BYTES_PER_PIXEL))
        .ok_or(RawDecodeError::TooLarge { width, height })
}

fn read_run_bytes<R: Read>(
    reader: &mut R,
    buf: &mut [u8],
    decoded: usize,
    expected: usize,
) -> Result<(), RawDecodeError> {
    reader.read_exact(buf).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => RawDecodeError::Truncated { decoded, expected },
        _ => RawDecodeError::Io(e),
    })
}
