//! Block compressor abstraction.
//!
//! The [`BlockCompressor`] trait is the seam between the engine, which owns
//! scheduling and the per-image lifecycle, and the codec that turns pixel
//! tiles into encoded blocks.

use std::ops::Range;

use super::{CompressorError, StagedImage};
use crate::astc::BlockFootprint;

/// Encodes block rows of a staged image into ASTC blocks.
///
/// The engine calls [`compress_blocks`] once per worker per image, with
/// consecutive worker indices and disjoint row ranges. Implementations must be
/// thread-safe (`Send + Sync`) and deterministic: the same rows of the same
/// image always encode to the same bytes, whichever worker encodes them.
///
/// # Implementors
///
/// - [`LdrAstcCompressor`] - single-partition LDR ASTC 4×4 encoder
///
/// [`compress_blocks`]: BlockCompressor::compress_blocks
/// [`LdrAstcCompressor`]: super::LdrAstcCompressor
pub trait BlockCompressor: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// Footprint of the blocks this compressor produces.
    fn footprint(&self) -> BlockFootprint;

    /// Encode the block rows `rows` of `image` into `out`.
    ///
    /// # Arguments
    ///
    /// * `image` - Block-aligned image being compressed
    /// * `worker` - Index of the calling worker
    /// * `rows` - Block rows assigned to this worker (may be empty)
    /// * `out` - Output for exactly those rows, row-major, 16 bytes per block
    fn compress_blocks(
        &self,
        image: &StagedImage,
        worker: usize,
        rows: Range<u32>,
        out: &mut [u8],
    ) -> Result<(), CompressorError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct ZeroCompressor;

    impl BlockCompressor for ZeroCompressor {
        fn name(&self) -> &str {
            "zero"
        }

        fn footprint(&self) -> BlockFootprint {
            BlockFootprint::BLOCK_4X4
        }

        fn compress_blocks(
            &self,
            _image: &StagedImage,
            _worker: usize,
            _rows: Range<u32>,
            out: &mut [u8],
        ) -> Result<(), CompressorError> {
            out.fill(0);
            Ok(())
        }
    }

    #[test]
    fn test_trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn BlockCompressor>();
    }

    #[test]
    fn test_trait_object_creation() {
        let compressor: Arc<dyn BlockCompressor> = Arc::new(ZeroCompressor);
        assert_eq!(compressor.name(), "zero");
        assert_eq!(compressor.footprint(), BlockFootprint::BLOCK_4X4);
    }
}
