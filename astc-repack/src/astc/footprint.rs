//! Block footprint and payload sizing.

/// Bytes occupied by one encoded ASTC block, regardless of footprint.
pub const BLOCK_BYTES: usize = 16;

/// Dimensions of the pixel tile covered by one ASTC block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockFootprint {
    /// Block width in pixels.
    pub x: u8,
    /// Block height in pixels.
    pub y: u8,
    /// Block depth in pixels (1 for 2D textures).
    pub z: u8,
}

impl BlockFootprint {
    /// The 4×4 footprint used for all repacked textures.
    pub const BLOCK_4X4: Self = Self::new_2d(4, 4);

    /// Create a 2D footprint (depth 1).
    pub const fn new_2d(x: u8, y: u8) -> Self {
        Self { x, y, z: 1 }
    }

    /// Number of blocks needed to cover an image along each axis.
    pub fn block_counts(&self, width: u32, height: u32) -> (u32, u32) {
        (
            width.div_ceil(self.x as u32),
            height.div_ceil(self.y as u32),
        )
    }

    /// Length of the compressed payload for an image of the given size.
    ///
    /// One [`BLOCK_BYTES`] block per tile, partial tiles rounded up.
    pub fn payload_len(&self, width: u32, height: u32) -> usize {
        let (blocks_x, blocks_y) = self.block_counts(width, height);
        blocks_x as usize * blocks_y as usize * BLOCK_BYTES
    }
}

impl Default for BlockFootprint {
    fn default() -> Self {
        Self::BLOCK_4X4
    }
}
