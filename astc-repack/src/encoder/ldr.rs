//! LDR ASTC 4×4 block compressor.

use std::ops::Range;

use super::block::{interpolate, BlockLayout, BlockParams, Texel, BLOCK_TEXELS};
use super::{BlockCompressor, CompressorError, EngineError, QualityPreset, StagedImage};
use crate::astc::{BlockFootprint, BLOCK_BYTES};

/// Endpoint refinement passes run by [`QualityPreset::Thorough`].
const REFINE_PASSES: usize = 2;

/// Power iterations used to find a block's principal color axis.
const AXIS_ITERATIONS: usize = 8;

/// Single-partition LDR ASTC encoder for 4×4 blocks.
///
/// Each block is fitted independently, so any split of block rows across
/// workers yields the same bytes. Pixel bytes are passed through unswizzled.
/// Fully opaque blocks use RGB endpoints with eight weight levels. Blocks
/// with any translucent texel carry alpha endpoints with four levels.
///
/// # Example
///
/// ```
/// use astc_repack::astc::BlockFootprint;
/// use astc_repack::encoder::{BlockCompressor, LdrAstcCompressor, QualityPreset};
///
/// let compressor =
///     LdrAstcCompressor::new(BlockFootprint::BLOCK_4X4, QualityPreset::Fast).unwrap();
/// assert_eq!(compressor.name(), "LDR ASTC 4x4 (fast)");
/// ```
#[derive(Debug, Clone)]
pub struct LdrAstcCompressor {
    quality: QualityPreset,
    name: String,
}

impl LdrAstcCompressor {
    /// Create a compressor for the given footprint and preset.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidConfig` for any footprint other than 4×4.
    pub fn new(footprint: BlockFootprint, quality: QualityPreset) -> Result<Self, EngineError> {
        if footprint != BlockFootprint::BLOCK_4X4 {
            return Err(EngineError::InvalidConfig(format!(
                "only 4x4 blocks are supported, got {}x{}x{}",
                footprint.x, footprint.y, footprint.z
            )));
        }

        Ok(Self {
            quality,
            name: format!("LDR ASTC 4x4 ({})", quality.name()),
        })
    }

    /// Quality preset.
    pub fn quality(&self) -> QualityPreset {
        self.quality
    }

    /// Encode one block of texels.
    pub fn encode_block(&self, texels: &[Texel; BLOCK_TEXELS]) -> [u8; BLOCK_BYTES] {
        fit_block(texels, self.quality).pack()
    }
}

impl BlockCompressor for LdrAstcCompressor {
    fn name(&self) -> &str {
        &self.name
    }

    fn footprint(&self) -> BlockFootprint {
        BlockFootprint::BLOCK_4X4
    }

    fn compress_blocks(
        &self,
        image: &StagedImage,
        worker: usize,
        rows: Range<u32>,
        out: &mut [u8],
    ) -> Result<(), CompressorError> {
        if image.footprint() != BlockFootprint::BLOCK_4X4 {
            return Err(CompressorError(format!(
                "image staged for {}x{} blocks, compressor encodes 4x4",
                image.footprint().x,
                image.footprint().y
            )));
        }

        let blocks_x = image.blocks_per_row() as usize;
        let row_count = rows.end.saturating_sub(rows.start) as usize;
        let expected = blocks_x * row_count * BLOCK_BYTES;
        if out.len() != expected {
            return Err(CompressorError(format!(
                "worker {} output is {} bytes, rows {:?} need {}",
                worker,
                out.len(),
                rows,
                expected
            )));
        }

        let stride = image.stride() as usize;
        let data = image.data();
        let blocks = rows.flat_map(|by| (0..blocks_x).map(move |bx| (bx, by as usize)));
        for ((bx, by), block) in blocks.zip(out.chunks_exact_mut(BLOCK_BYTES)) {
            let mut texels = [[0u8; 4]; BLOCK_TEXELS];
            for (i, texel) in texels.iter_mut().enumerate() {
                let (x, y) = (bx * 4 + i % 4, by * 4 + i / 4);
                let at = y * stride + x * 4;
                texel.copy_from_slice(&data[at..at + 4]);
            }
            block.copy_from_slice(&self.encode_block(&texels));
        }
        Ok(())
    }
}

/// Choose endpoints and weights for one block.
fn fit_block(texels: &[Texel; BLOCK_TEXELS], quality: QualityPreset) -> BlockParams {
    if texels.iter().all(|t| t == &texels[0]) {
        return BlockParams::solid(texels[0]);
    }

    let layout = BlockLayout::for_texels(texels);
    let mut best = with_best_weights(layout, principal_axis_endpoints(texels, layout), texels);

    if quality == QualityPreset::Thorough {
        let bounds = with_best_weights(layout, bounding_box_endpoints(texels), texels);
        if bounds.1 < best.1 {
            best = bounds;
        }
        for _ in 0..REFINE_PASSES {
            let Some(endpoints) = least_squares_endpoints(&best.0, texels) else {
                break;
            };
            let refined = with_best_weights(layout, endpoints, texels);
            if refined.1 >= best.1 {
                break;
            }
            best = refined;
        }
    }

    best.0
}

/// Pick the closest weight for every texel and report the block error.
fn with_best_weights(
    layout: BlockLayout,
    endpoints: [Texel; 2],
    texels: &[Texel; BLOCK_TEXELS],
) -> (BlockParams, u64) {
    let levels = layout.weight_levels();
    let channels = layout.channels();
    let mut weights = [0u8; BLOCK_TEXELS];

    for (texel, weight) in texels.iter().zip(weights.iter_mut()) {
        let mut best_error = u64::MAX;
        for (index, &level) in levels.iter().enumerate() {
            let error: u64 = (0..channels)
                .map(|c| {
                    let decoded = interpolate(endpoints[0][c], endpoints[1][c], level);
                    squared_difference(decoded, texel[c])
                })
                .sum();
            if error < best_error {
                best_error = error;
                *weight = index as u8;
            }
        }
    }

    let params = BlockParams::new(layout, endpoints, weights);
    let error = block_error(&params, texels);
    (params, error)
}

fn block_error(params: &BlockParams, texels: &[Texel; BLOCK_TEXELS]) -> u64 {
    params
        .decode()
        .iter()
        .zip(texels)
        .flat_map(|(decoded, texel)| decoded.iter().zip(texel))
        .map(|(&a, &b)| squared_difference(a, b))
        .sum()
}

fn squared_difference(a: u8, b: u8) -> u64 {
    let d = u64::from(a.abs_diff(b));
    d * d
}

/// Endpoints at the extremes of the texels projected onto their principal axis.
fn principal_axis_endpoints(texels: &[Texel; BLOCK_TEXELS], layout: BlockLayout) -> [Texel; 2] {
    let channels = layout.channels();
    let mut mean = [0f32; 4];
    for texel in texels {
        for c in 0..channels {
            mean[c] += f32::from(texel[c]);
        }
    }
    for m in &mut mean[..channels] {
        *m /= BLOCK_TEXELS as f32;
    }

    let mut covariance = [[0f32; 4]; 4];
    for texel in texels {
        let d = centered(texel, &mean, channels);
        for i in 0..channels {
            for j in 0..channels {
                covariance[i][j] += d[i] * d[j];
            }
        }
    }

    // Start from the row of the widest channel so the iteration cannot begin
    // orthogonal to every spread direction.
    let widest = (0..channels)
        .max_by(|&a, &b| covariance[a][a].total_cmp(&covariance[b][b]))
        .unwrap_or(0);
    let mut axis = covariance[widest];
    for _ in 0..AXIS_ITERATIONS {
        let mut next = [0f32; 4];
        for i in 0..channels {
            next[i] = (0..channels).map(|j| covariance[i][j] * axis[j]).sum();
        }
        let length = next.iter().map(|v| v * v).sum::<f32>().sqrt();
        if length <= f32::EPSILON {
            break;
        }
        axis = next.map(|v| v / length);
    }

    let (mut low, mut high) = (f32::MAX, f32::MIN);
    for texel in texels {
        let d = centered(texel, &mean, channels);
        let t: f32 = (0..channels).map(|c| d[c] * axis[c]).sum();
        low = low.min(t);
        high = high.max(t);
    }

    let point = |t: f32| {
        let mut endpoint = [u8::MAX; 4];
        for c in 0..channels {
            endpoint[c] = to_channel(mean[c] + axis[c] * t);
        }
        endpoint
    };
    [point(low), point(high)]
}

fn centered(texel: &Texel, mean: &[f32; 4], channels: usize) -> [f32; 4] {
    let mut d = [0f32; 4];
    for c in 0..channels {
        d[c] = f32::from(texel[c]) - mean[c];
    }
    d
}

/// Per-channel minimum and maximum.
fn bounding_box_endpoints(texels: &[Texel; BLOCK_TEXELS]) -> [Texel; 2] {
    let mut low = [u8::MAX; 4];
    let mut high = [0u8; 4];
    for texel in texels {
        for c in 0..4 {
            low[c] = low[c].min(texel[c]);
            high[c] = high[c].max(texel[c]);
        }
    }
    [low, high]
}

/// Re-solve the endpoints for the weights already chosen.
///
/// Returns `None` when every texel sits on the same weight and the system has
/// no unique solution.
fn least_squares_endpoints(
    params: &BlockParams,
    texels: &[Texel; BLOCK_TEXELS],
) -> Option<[Texel; 2]> {
    let levels = params.layout().weight_levels();
    let (mut aa, mut ab, mut bb) = (0f32, 0f32, 0f32);
    let mut ax = [0f32; 4];
    let mut bx = [0f32; 4];

    for (texel, &index) in texels.iter().zip(params.weights()) {
        let w = f32::from(levels[index as usize]) / 64.0;
        let (a, b) = (1.0 - w, w);
        aa += a * a;
        ab += a * b;
        bb += b * b;
        for c in 0..4 {
            ax[c] += a * f32::from(texel[c]);
            bx[c] += b * f32::from(texel[c]);
        }
    }

    let det = aa * bb - ab * ab;
    if det.abs() <= f32::EPSILON {
        return None;
    }

    let mut low = [0u8; 4];
    let mut high = [0u8; 4];
    for c in 0..4 {
        low[c] = to_channel((ax[c] * bb - bx[c] * ab) / det);
        high[c] = to_channel((bx[c] * aa - ax[c] * ab) / det);
    }
    Some([low, high])
}

fn to_channel(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::RawImage;

    fn gradient(width: u32, height: u32) -> RawImage {
        let pixels = (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .flat_map(|(x, y)| [(x * 7) as u8, (y * 5) as u8, ((x + y) * 3) as u8, 0xFF])
            .collect();
        RawImage::from_pixels(width, height, false, pixels).unwrap()
    }

    fn compressor(quality: QualityPreset) -> LdrAstcCompressor {
        LdrAstcCompressor::new(BlockFootprint::BLOCK_4X4, quality).unwrap()
    }

    fn max_channel_error(params: &BlockParams, texels: &[Texel; BLOCK_TEXELS]) -> u8 {
        params
            .decode()
            .iter()
            .zip(texels)
            .flat_map(|(decoded, texel)| decoded.iter().zip(texel))
            .map(|(&a, &b)| a.abs_diff(b))
            .max()
            .unwrap_or(0)
    }

    #[test]
    fn test_rejects_other_footprints() {
        for footprint in [
            BlockFootprint::new_2d(6, 6),
            BlockFootprint::new_2d(4, 8),
            BlockFootprint { x: 4, y: 4, z: 4 },
        ] {
            let err = LdrAstcCompressor::new(footprint, QualityPreset::Fast).unwrap_err();
            assert!(matches!(err, EngineError::InvalidConfig(_)));
        }
    }

    #[test]
    fn test_name_includes_quality() {
        assert_eq!(
            compressor(QualityPreset::Thorough).name(),
            "LDR ASTC 4x4 (thorough)"
        );
    }

    #[test]
    fn test_solid_block_is_exact() {
        let texels = [[40, 80, 120, 255]; BLOCK_TEXELS];
        let params = fit_block(&texels, QualityPreset::Fast);
        assert_eq!(max_channel_error(&params, &texels), 0);
    }

    #[test]
    fn test_two_color_block_is_exact() {
        let mut texels = [[250, 10, 30, 255]; BLOCK_TEXELS];
        for texel in texels.iter_mut().step_by(3) {
            *texel = [5, 200, 90, 255];
        }

        for quality in [QualityPreset::Fast, QualityPreset::Thorough] {
            let params = fit_block(&texels, quality);
            assert_eq!(params.layout(), BlockLayout::Rgb);
            assert_eq!(max_channel_error(&params, &texels), 0);
        }
    }

    #[test]
    fn test_translucent_block_keeps_alpha() {
        let mut texels = [[100, 100, 100, 255]; BLOCK_TEXELS];
        for texel in texels.iter_mut().take(8) {
            *texel = [0, 0, 0, 0];
        }

        let params = fit_block(&texels, QualityPreset::Fast);

        assert_eq!(params.layout(), BlockLayout::Rgba);
        assert_eq!(max_channel_error(&params, &texels), 0);
    }

    #[test]
    fn test_smooth_gradient_stays_close() {
        let mut texels = [[0u8; 4]; BLOCK_TEXELS];
        for (i, texel) in texels.iter_mut().enumerate() {
            let v = (i * 10) as u8;
            *texel = [v, v / 2, 255 - v, 255];
        }

        for quality in [QualityPreset::Fast, QualityPreset::Thorough] {
            let params = fit_block(&texels, quality);
            assert!(
                max_channel_error(&params, &texels) <= 20,
                "{:?} error too large",
                quality
            );
        }
    }

    #[test]
    fn test_thorough_is_never_worse_than_fast() {
        let mut texels = [[0u8; 4]; BLOCK_TEXELS];
        for (i, texel) in texels.iter_mut().enumerate() {
            let i = i as u8;
            *texel = [i.wrapping_mul(37), i.wrapping_mul(91), i.wrapping_mul(13), 255 - i];
        }

        let fast = fit_block(&texels, QualityPreset::Fast);
        let thorough = fit_block(&texels, QualityPreset::Thorough);

        assert!(block_error(&thorough, &texels) <= block_error(&fast, &texels));
    }

    #[test]
    fn test_empty_rows_write_nothing() {
        let staged = StagedImage::new(&gradient(8, 8), BlockFootprint::BLOCK_4X4);
        let result = compressor(QualityPreset::Fast).compress_blocks(&staged, 3, 2..2, &mut []);
        assert!(result.is_ok());
    }

    #[test]
    fn test_rejects_wrong_output_length() {
        let staged = StagedImage::new(&gradient(8, 8), BlockFootprint::BLOCK_4X4);
        let mut out = vec![0u8; 16];

        let result = compressor(QualityPreset::Fast).compress_blocks(&staged, 0, 0..2, &mut out);
        assert!(result.is_err());
    }

    #[test]
    fn test_blocks_are_written_in_row_major_order() {
        let staged = StagedImage::new(&gradient(8, 8), BlockFootprint::BLOCK_4X4);
        let compressor = compressor(QualityPreset::Fast);
        let mut out = vec![0u8; 4 * BLOCK_BYTES];

        compressor.compress_blocks(&staged, 0, 0..2, &mut out).unwrap();

        let stride = staged.stride() as usize;
        for (index, block) in out.chunks_exact(BLOCK_BYTES).enumerate() {
            let (bx, by) = (index % 2, index / 2);
            let mut texels = [[0u8; 4]; BLOCK_TEXELS];
            for (i, texel) in texels.iter_mut().enumerate() {
                let at = (by * 4 + i / 4) * stride + (bx * 4 + i % 4) * 4;
                texel.copy_from_slice(&staged.data()[at..at + 4]);
            }
            assert_eq!(block, compressor.encode_block(&texels));
        }
    }

    #[test]
    fn test_band_encoding_matches_whole_image() {
        let compressor = compressor(QualityPreset::Thorough);
        let staged = StagedImage::new(&gradient(16, 16), BlockFootprint::BLOCK_4X4);
        let row_bytes = 4 * BLOCK_BYTES;

        let mut whole = vec![0u8; 4 * row_bytes];
        compressor
            .compress_blocks(&staged, 0, 0..4, &mut whole)
            .unwrap();

        let mut banded = vec![0u8; 4 * row_bytes];
        let (top, bottom) = banded.split_at_mut(row_bytes);
        compressor.compress_blocks(&staged, 0, 0..1, top).unwrap();
        compressor.compress_blocks(&staged, 1, 1..4, bottom).unwrap();

        assert_eq!(whole, banded);
    }
}
