//! Compression engine configuration.

use std::num::NonZeroUsize;

use crate::astc::BlockFootprint;

/// Encoder quality preset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum QualityPreset {
    /// Endpoints from the principal color axis of each block.
    #[default]
    Fast,
    /// Also tries bounding-box endpoints and refines the best fit by least
    /// squares.
    Thorough,
}

impl QualityPreset {
    /// Lowercase name as accepted on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            QualityPreset::Fast => "fast",
            QualityPreset::Thorough => "thorough",
        }
    }
}

/// Configuration fixed for the lifetime of a [`CompressionEngine`].
///
/// The color profile is always low dynamic range.
///
/// [`CompressionEngine`]: super::CompressionEngine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    footprint: BlockFootprint,
    quality: QualityPreset,
    workers: usize,
}

impl EngineConfig {
    /// Create a 4×4 fast-preset configuration using every available core.
    pub fn new() -> Self {
        Self {
            footprint: BlockFootprint::BLOCK_4X4,
            quality: QualityPreset::default(),
            workers: default_workers(),
        }
    }

    /// Set the block footprint.
    pub fn with_footprint(mut self, footprint: BlockFootprint) -> Self {
        self.footprint = footprint;
        self
    }

    /// Set the quality preset.
    pub fn with_quality(mut self, quality: QualityPreset) -> Self {
        self.quality = quality;
        self
    }

    /// Set the number of workers each image is split across.
    ///
    /// Zero is rejected when the engine is initialized.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Block footprint.
    pub fn footprint(&self) -> BlockFootprint {
        self.footprint
    }

    /// Quality preset.
    pub fn quality(&self) -> QualityPreset {
        self.quality
    }

    /// Worker count.
    pub fn workers(&self) -> usize {
        self.workers
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Number of hardware execution units, at least 1.
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.footprint(), BlockFootprint::BLOCK_4X4);
        assert_eq!(config.quality(), QualityPreset::Fast);
        assert!(config.workers() >= 1);
    }

    #[test]
    fn test_builder() {
        let config = EngineConfig::new()
            .with_quality(QualityPreset::Thorough)
            .with_workers(3)
            .with_footprint(BlockFootprint::new_2d(6, 6));

        assert_eq!(config.quality(), QualityPreset::Thorough);
        assert_eq!(config.workers(), 3);
        assert_eq!(config.footprint(), BlockFootprint::new_2d(6, 6));
    }

    #[test]
    fn test_quality_names() {
        assert_eq!(QualityPreset::Fast.name(), "fast");
        assert_eq!(QualityPreset::Thorough.name(), "thorough");
    }
}
