//! Decoder for the run-length encoded raw image container.
//!
//! Source textures ship as a small header followed by a stream of pixel runs.
//! Decoding expands the runs into a flat 4-bytes-per-pixel buffer that the
//! compression engine consumes directly.
//!
//! # Container Layout
//!
//! ```text
//! ┌──────────┬──────────┬───────────┬──────────────────────────────┐
//! │ width    │ height   │ has_alpha │ runs...                      │
//! │ i32 LE   │ i32 LE   │ u8        │                              │
//! └──────────┴──────────┴───────────┴──────────────────────────────┘
//!
//! run := repeat:u8 [alpha:u8 if has_alpha] [r:u8 g:u8 b:u8 if alpha > 0]
//! ```
//!
//! Each run emits `repeat` pixels written as `b, g, r, a`. Fully transparent
//! runs carry no color bytes and expand to `(0, 0, 0, 0)`.
//!
//! # Example
//!
//! ```
//! use astc_repack::raw::RawImage;
//!
//! // 2×1 image, no alpha, a single run of two pixels.
//! let bytes = [2, 0, 0, 0, 1, 0, 0, 0, 0, 2, 10, 20, 30];
//! let image = RawImage::decode(&bytes[..]).unwrap();
//!
//! assert_eq!(image.width(), 2);
//! assert_eq!(image.pixels(), &[30, 20, 10, 255, 30, 20, 10, 255]);
//! ```

mod decoder;
mod error;

pub use decoder::{RawImage, BYTES_PER_PIXEL, HEADER_LEN, OPAQUE_ALPHA};
pub use error::RawDecodeError;
