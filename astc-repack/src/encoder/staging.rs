//! Block-aligned copy of an image held by the engine while it is compressed.

use std::ops::Range;

use crate::astc::BlockFootprint;
use crate::raw::{RawImage, BYTES_PER_PIXEL};

/// An image padded out to whole blocks.
///
/// Pixels past the right and bottom edges replicate the nearest edge pixel,
/// so partial blocks encode the same colors the image actually contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedImage {
    width: u32,
    height: u32,
    source_width: u32,
    source_height: u32,
    has_alpha: bool,
    footprint: BlockFootprint,
    data: Vec<u8>,
}

impl StagedImage {
    /// Stage `image` for compression with the given footprint.
    pub fn new(image: &RawImage, footprint: BlockFootprint) -> Self {
        let (source_width, source_height) = (image.width(), image.height());
        let (blocks_x, blocks_y) = footprint.block_counts(source_width, source_height);
        let width = blocks_x * footprint.x as u32;
        let height = blocks_y * footprint.y as u32;

        let data = if width == source_width && height == source_height {
            image.pixels().to_vec()
        } else {
            pad_to_blocks(image.pixels(), source_width, source_height, width, height)
        };

        Self {
            width,
            height,
            source_width,
            source_height,
            has_alpha: image.has_alpha(),
            footprint,
            data,
        }
    }

    /// Padded width in pixels (a multiple of the block width).
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Padded height in pixels (a multiple of the block height).
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Dimensions of the original, unpadded image.
    pub fn source_dimensions(&self) -> (u32, u32) {
        (self.source_width, self.source_height)
    }

    /// Whether the source image carried alpha.
    pub fn has_alpha(&self) -> bool {
        self.has_alpha
    }

    /// Footprint the image was padded to.
    pub fn footprint(&self) -> BlockFootprint {
        self.footprint
    }

    /// Bytes per pixel row.
    pub fn stride(&self) -> u32 {
        self.width * BYTES_PER_PIXEL as u32
    }

    /// Number of blocks across one block row.
    pub fn blocks_per_row(&self) -> u32 {
        self.width / self.footprint.x as u32
    }

    /// Number of block rows.
    pub fn block_rows(&self) -> u32 {
        self.height / self.footprint.y as u32
    }

    /// Padded pixel data.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Pixel data covering the given range of block rows.
    pub fn band(&self, rows: Range<u32>) -> &[u8] {
        let row_bytes = self.stride() as usize * self.footprint.y as usize;
        &self.data[rows.start as usize * row_bytes..rows.end as usize * row_bytes]
    }
}

fn pad_to_blocks(
    pixels: &[u8],
    width: u32,
    height: u32,
    padded_width: u32,
    padded_height: u32,
) -> Vec<u8> {
    let row_len = width as usize * BYTES_PER_PIXEL;
    let pad_pixels = (padded_width - width) as usize;
    let padded_len = padded_width as usize * padded_height as usize * BYTES_PER_PIXEL;
    let mut data = Vec::with_capacity(padded_len);

    for y in 0..padded_height {
        let src_y = y.min(height - 1) as usize;
        let row = &pixels[src_y * row_len..(src_y + 1) * row_len];
        data.extend_from_slice(row);

        let edge = &row[row_len - BYTES_PER_PIXEL..];
        for _ in 0..pad_pixels {
            data.extend_from_slice(edge);
        }
    }

    data
}
