//! Physical encoding of single-partition 4×4 LDR ASTC blocks.
//!
//! Every block this crate emits uses one of two layouts:
//!
//! ```text
//! bit 0      11   13     17                                  127
//!     ┌──────┬────┬──────┬──────────────────┬─────────┬──────────┐
//!     │ mode │ 00 │ CEM  │ endpoints (8 bit)│  zeros  │ weights  │
//!     └──────┴────┴──────┴──────────────────┴─────────┴──────────┘
//!                                             (weights stored bit-reversed)
//!
//! Rgb:  mode 0x053, CEM  8, 6 endpoint bytes, 16 × 3-bit weights
//! Rgba: mode 0x042, CEM 12, 8 endpoint bytes, 16 × 2-bit weights
//! ```
//!
//! Both layouts leave enough room above the endpoints that a decoder resolves
//! the endpoint range to 256 levels, so endpoints are stored as plain bytes.

use crate::astc::BLOCK_BYTES;

/// Texels in a 4×4 block.
pub const BLOCK_TEXELS: usize = 16;

/// One texel, four 8-bit channels.
pub type Texel = [u8; 4];

/// Endpoint format and weight precision of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockLayout {
    /// RGB endpoints, alpha decodes as 255, 8 weight levels.
    Rgb,
    /// RGBA endpoints, 4 weight levels.
    Rgba,
}

impl BlockLayout {
    /// Pick the layout for a block: alpha endpoints only when some texel
    /// is not fully opaque.
    pub fn for_texels(texels: &[Texel; BLOCK_TEXELS]) -> Self {
        if texels.iter().all(|t| t[3] == u8::MAX) {
            BlockLayout::Rgb
        } else {
            BlockLayout::Rgba
        }
    }

    /// Number of channels carried by the endpoints.
    pub fn channels(self) -> usize {
        match self {
            BlockLayout::Rgb => 3,
            BlockLayout::Rgba => 4,
        }
    }

    /// Unquantized weight for each weight index, in 0..=64.
    pub fn weight_levels(self) -> &'static [u8] {
        match self {
            BlockLayout::Rgb => &[0, 9, 18, 27, 37, 46, 55, 64],
            BlockLayout::Rgba => &[0, 21, 43, 64],
        }
    }

    fn block_mode(self) -> u128 {
        // 4×4 weight grid, single plane, 3-bit (0x053) or 2-bit (0x042) weights
        match self {
            BlockLayout::Rgb => 0x053,
            BlockLayout::Rgba => 0x042,
        }
    }

    fn color_endpoint_mode(self) -> u128 {
        match self {
            BlockLayout::Rgb => 8,
            BlockLayout::Rgba => 12,
        }
    }

    fn weight_bits(self) -> usize {
        match self {
            BlockLayout::Rgb => 3,
            BlockLayout::Rgba => 2,
        }
    }
}

/// Endpoints and per-texel weight indices for one block.
///
/// Construction orders the endpoints so that the second is at least as bright
/// (by RGB sum) as the first. Decoders apply blue contraction to blocks where
/// that does not hold, which this encoder never relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockParams {
    layout: BlockLayout,
    endpoints: [Texel; 2],
    weights: [u8; BLOCK_TEXELS],
}

impl BlockParams {
    /// Build a block, swapping the endpoints if needed.
    ///
    /// Weight indices are clamped to the layout's range. For
    /// [`BlockLayout::Rgb`] the endpoint alpha is forced to 255.
    pub fn new(layout: BlockLayout, endpoints: [Texel; 2], weights: [u8; BLOCK_TEXELS]) -> Self {
        let max_index = (layout.weight_levels().len() - 1) as u8;
        let mut endpoints = endpoints;
        let mut weights = weights.map(|w| w.min(max_index));

        if layout == BlockLayout::Rgb {
            endpoints[0][3] = u8::MAX;
            endpoints[1][3] = u8::MAX;
        }

        let brightness = |e: &Texel| e[..3].iter().map(|&c| u32::from(c)).sum::<u32>();
        if brightness(&endpoints[1]) < brightness(&endpoints[0]) {
            endpoints.swap(0, 1);
            for w in &mut weights {
                *w = max_index - *w;
            }
        }

        Self {
            layout,
            endpoints,
            weights,
        }
    }

    /// A block that decodes to `color` everywhere.
    pub fn solid(color: Texel) -> Self {
        let layout = if color[3] == u8::MAX {
            BlockLayout::Rgb
        } else {
            BlockLayout::Rgba
        };
        Self::new(layout, [color, color], [0; BLOCK_TEXELS])
    }

    pub fn layout(&self) -> BlockLayout {
        self.layout
    }

    pub fn endpoints(&self) -> &[Texel; 2] {
        &self.endpoints
    }

    pub fn weights(&self) -> &[u8; BLOCK_TEXELS] {
        &self.weights
    }

    /// Serialize to the 16-byte physical block.
    pub fn pack(&self) -> [u8; BLOCK_BYTES] {
        let layout = self.layout;
        let mut bits = layout.block_mode();
        // Partition count minus one stays zero at bits 11..13.
        bits |= layout.color_endpoint_mode() << 13;

        // Endpoint values interleave as c0 low, c0 high, c1 low, c1 high, ...
        let mut pos = 17;
        for channel in 0..layout.channels() {
            for endpoint in &self.endpoints {
                bits |= u128::from(endpoint[channel]) << pos;
                pos += 8;
            }
        }

        let width = layout.weight_bits();
        let mut weights = 0u128;
        for (i, &w) in self.weights.iter().enumerate() {
            weights |= u128::from(w) << (i * width);
        }
        bits |= weights.reverse_bits();

        bits.to_le_bytes()
    }

    /// Texels a conforming decoder produces for this block.
    pub fn decode(&self) -> [Texel; BLOCK_TEXELS] {
        let levels = self.layout.weight_levels();
        let [low, high] = self.endpoints;
        self.weights.map(|index| {
            let w = levels[index as usize];
            [
                interpolate(low[0], high[0], w),
                interpolate(low[1], high[1], w),
                interpolate(low[2], high[2], w),
                interpolate(low[3], high[3], w),
            ]
        })
    }
}

/// LDR interpolation between two 8-bit endpoints with a 0..=64 weight.
pub fn interpolate(low: u8, high: u8, weight: u8) -> u8 {
    let low = u32::from(low) * 257;
    let high = u32::from(high) * 257;
    let weight = u32::from(weight);
    let value = (low * (64 - weight) + high * weight + 32) >> 6;
    (value >> 8) as u8
}
