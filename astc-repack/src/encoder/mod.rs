//! Block compression for decoded raw images.
//!
//! This module owns the compression context shared by the whole run. The
//! [`CompressionEngine`] is created once, compresses images one at a time, and
//! splits each image's block rows across a fixed number of workers.
//!
//! # Architecture
//!
//! ```text
//!            ┌──────────────────────────────────────────────┐
//! RawImage ─►│ CompressionEngine                            │─► payload
//!            │                                              │
//!            │  stage ──► StagedImage (padded to blocks)    │
//!            │    │                                         │
//!            │    ▼                                         │
//!            │  WorkPartition ── worker 0 ─┐                │
//!            │                ── worker 1 ─┼─► join ─► reset│
//!            │                ── worker N ─┘                │
//!            │                     │                        │
//!            │         Arc<dyn BlockCompressor>             │
//!            └─────────────────────┼────────────────────────┘
//!                                  ▼
//!                         LdrAstcCompressor
//!                     (fits BlockParams per 4×4)
//! ```
//!
//! The reset step drops the staged image. It runs after every image, on
//! success and on failure, and the engine refuses to start a new image while
//! a staged image is still held.

mod block;
mod compressor;
mod config;
mod engine;
mod error;
mod ldr;
mod partition;
mod staging;

pub use block::{BlockLayout, BlockParams, Texel, BLOCK_TEXELS};
pub use compressor::BlockCompressor;
pub use config::{default_workers, EngineConfig, QualityPreset};
pub use engine::CompressionEngine;
pub use error::{CompressorError, EngineError};
pub use ldr::LdrAstcCompressor;
pub use partition::{WorkPartition, WorkerSlice};
pub use staging::StagedImage;
