//! `.astc` container output.
//!
//! An `.astc` file is a fixed 16-byte header followed by the block-compressed
//! payload, one 16-byte block per footprint-sized tile of the image.
//!
//! # Architecture
//!
//! ```text
//! RawImage dims ─┐
//! BlockFootprint ├──► AstcHeader ──┐
//!                │                 ├──► ContainerWriter ──► <output_root>/<rel>.astc
//! payload bytes ─┴─────────────────┘          ▲
//!                                             │
//!                                       OutputLayout
//! ```
//!
//! # Example
//!
//! ```
//! use astc_repack::astc::{AstcHeader, BlockFootprint};
//!
//! let header = AstcHeader::new(BlockFootprint::BLOCK_4X4, 300, 150).unwrap();
//! let bytes = header.to_bytes();
//!
//! assert_eq!(&bytes[7..10], &[0x2C, 0x01, 0x00]);
//! assert_eq!(&bytes[10..13], &[0x96, 0x00, 0x00]);
//! ```

mod error;
mod footprint;
mod header;
mod writer;

pub use error::ContainerError;
pub use footprint::{BlockFootprint, BLOCK_BYTES};
pub use header::{AstcHeader, ASTC_MAGIC, HEADER_LEN, MAX_DIMENSION};
pub use writer::{encode, ContainerWriter, OutputLayout, OUTPUT_EXTENSION};
