//! The process-wide compression engine.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, info};

use super::{
    BlockCompressor, EngineConfig, EngineError, LdrAstcCompressor, StagedImage, WorkPartition,
};
use crate::astc::{BlockFootprint, BLOCK_BYTES};
use crate::raw::RawImage;

/// Reusable compression context.
///
/// Built once at startup, then used for every image in the run. Each call to
/// [`compress`](Self::compress) stages the image, fans the block rows out to
/// exactly `workers` tasks on the engine's own thread pool, joins them, and
/// resets the context before returning, whether or not compression succeeded.
///
/// Compression takes `&mut self`, so one engine never serves two images at
/// the same time.
///
/// # Example
///
/// ```
/// use astc_repack::encoder::{CompressionEngine, EngineConfig};
/// use astc_repack::raw::RawImage;
///
/// let mut engine = CompressionEngine::new(EngineConfig::new().with_workers(2)).unwrap();
/// let image = RawImage::from_pixels(5, 3, false, vec![0x80; 5 * 3 * 4]).unwrap();
///
/// let payload = engine.compress(&image).unwrap();
/// assert_eq!(payload.len(), 2 * 1 * 16);
/// assert!(engine.is_idle());
/// ```
pub struct CompressionEngine {
    config: EngineConfig,
    compressor: Arc<dyn BlockCompressor>,
    pool: ThreadPool,
    staged: Option<StagedImage>,
    images_compressed: u64,
}

impl CompressionEngine {
    /// Initialize an engine using the LDR ASTC compressor.
    ///
    /// # Errors
    ///
    /// Returns `EngineError` if the configuration is rejected or the worker
    /// pool cannot be created. No images can be processed without an engine.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let compressor = LdrAstcCompressor::new(config.footprint(), config.quality())?;
        Self::with_compressor(config, Arc::new(compressor))
    }

    /// Initialize an engine around a custom compressor.
    pub fn with_compressor(
        config: EngineConfig,
        compressor: Arc<dyn BlockCompressor>,
    ) -> Result<Self, EngineError> {
        if config.workers() == 0 {
            return Err(EngineError::InvalidConfig(
                "worker count must be at least 1".to_string(),
            ));
        }
        if compressor.footprint() != config.footprint() {
            return Err(EngineError::InvalidConfig(format!(
                "compressor '{}' encodes {:?}, configuration requires {:?}",
                compressor.name(),
                compressor.footprint(),
                config.footprint()
            )));
        }

        let pool = ThreadPoolBuilder::new()
            .num_threads(config.workers())
            .thread_name(|index| format!("astc-worker-{}", index))
            .build()?;

        info!(
            compressor = compressor.name(),
            workers = config.workers(),
            block_x = config.footprint().x,
            block_y = config.footprint().y,
            "Compression engine initialized"
        );

        Ok(Self {
            config,
            compressor,
            pool,
            staged: None,
            images_compressed: 0,
        })
    }

    /// Engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Block footprint of the produced payloads.
    pub fn footprint(&self) -> BlockFootprint {
        self.config.footprint()
    }

    /// Number of workers each image is split across.
    pub fn workers(&self) -> usize {
        self.config.workers()
    }

    /// Name of the underlying compressor.
    pub fn compressor_name(&self) -> &str {
        self.compressor.name()
    }

    /// Number of images successfully compressed so far.
    pub fn images_compressed(&self) -> u64 {
        self.images_compressed
    }

    /// Whether the context holds no per-image state.
    pub fn is_idle(&self) -> bool {
        self.staged.is_none()
    }

    /// Payload length for an image of the given size.
    pub fn payload_len(&self, width: u32, height: u32) -> usize {
        self.footprint().payload_len(width, height)
    }

    /// Compress an image into a newly allocated payload.
    pub fn compress(&mut self, image: &RawImage) -> Result<Vec<u8>, EngineError> {
        let mut payload = vec![0u8; self.payload_len(image.width(), image.height())];
        self.compress_into(image, &mut payload)?;
        Ok(payload)
    }

    /// Compress an image into a caller-provided payload buffer.
    ///
    /// The buffer must be exactly [`payload_len`](Self::payload_len) bytes.
    /// On error the buffer contents are unspecified and should be discarded.
    ///
    /// # Errors
    ///
    /// Returns `EngineError` if:
    /// - The context was left holding a previous image
    /// - The payload buffer has the wrong size
    /// - Any worker fails or panics
    pub fn compress_into(
        &mut self,
        image: &RawImage,
        payload: &mut [u8],
    ) -> Result<(), EngineError> {
        if !self.is_idle() {
            return Err(EngineError::ContextNotReset);
        }
        let expected = self.payload_len(image.width(), image.height());
        if payload.len() != expected {
            return Err(EngineError::PayloadSize {
                expected,
                actual: payload.len(),
            });
        }

        let staged = self
            .staged
            .insert(StagedImage::new(image, self.config.footprint()));
        let result = dispatch(
            &self.pool,
            self.compressor.as_ref(),
            staged,
            self.config.workers(),
            payload,
        );
        self.reset();

        if result.is_ok() {
            self.images_compressed += 1;
        }
        result
    }

    /// Release per-image state so the next image can be compressed.
    ///
    /// Called automatically at the end of every compression; calling it on an
    /// idle engine has no effect.
    pub fn reset(&mut self) {
        if let Some(staged) = self.staged.take() {
            let (width, height) = staged.source_dimensions();
            debug!(width, height, "Compression context reset");
        }
    }
}

impl std::fmt::Debug for CompressionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompressionEngine")
            .field("config", &self.config)
            .field("compressor", &self.compressor.name())
            .field("idle", &self.is_idle())
            .field("images_compressed", &self.images_compressed)
            .finish()
    }
}

/// Run exactly `workers` compression tasks over `staged` and join them.
///
/// Returns the error of the lowest-indexed failing worker, if any.
fn dispatch(
    pool: &ThreadPool,
    compressor: &dyn BlockCompressor,
    staged: &StagedImage,
    workers: usize,
    payload: &mut [u8],
) -> Result<(), EngineError> {
    let partition = WorkPartition::new(staged.block_rows(), workers);
    let row_bytes = staged.blocks_per_row() as usize * BLOCK_BYTES;
    let slices = partition.split_mut(payload, row_bytes);
    let mut outcomes: Vec<Result<(), EngineError>> = (0..slices.len()).map(|_| Ok(())).collect();

    pool.scope(|scope| {
        for (slice, outcome) in slices.into_iter().zip(outcomes.iter_mut()) {
            scope.spawn(move |_| {
                let worker = slice.worker;
                let result = panic::catch_unwind(AssertUnwindSafe(|| {
                    compressor.compress_blocks(staged, worker, slice.rows, slice.out)
                }));
                *outcome = match result {
                    Ok(Ok(())) => Ok(()),
                    Ok(Err(source)) => Err(EngineError::WorkerFailed { worker, source }),
                    Err(cause) => Err(EngineError::WorkerPanicked {
                        worker,
                        message: panic_message(cause.as_ref()),
                    }),
                };
            });
        }
    });

    outcomes.into_iter().collect()
}

fn panic_message(cause: &(dyn Any + Send)) -> String {
    cause
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| cause.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
