//! Sequential repacking driver.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Instant;

use tracing::{error, info, warn};

use super::{discover_sources, DiscoveryError, FileReport, RepackError, RunSummary};
use crate::astc::{AstcHeader, ContainerWriter, HEADER_LEN};
use crate::config::{RepackConfig, SOURCE_EXTENSION};
use crate::encoder::{CompressionEngine, EngineError};
use crate::raw::RawImage;

/// Converts every `.data` file under a source root into an `.astc` container.
///
/// Files are processed one at a time against a single [`CompressionEngine`],
/// so at most one image is ever in flight. A file that fails is logged and
/// skipped; it never stops the run.
///
/// # Example
///
/// ```no_run
/// use astc_repack::config::RepackConfig;
/// use astc_repack::pipeline::Repacker;
///
/// let config = RepackConfig::new("Content").unwrap().in_place();
/// let mut repacker = Repacker::new(config).unwrap();
/// let summary = repacker.run().unwrap();
/// println!("{} of {} converted", summary.converted, summary.discovered);
/// ```
#[derive(Debug)]
pub struct Repacker {
    config: RepackConfig,
    engine: CompressionEngine,
    writer: ContainerWriter,
}

impl Repacker {
    /// Create a repacker, initializing the compression engine.
    ///
    /// # Errors
    ///
    /// Engine initialization failures are fatal and returned as `EngineError`.
    pub fn new(config: RepackConfig) -> Result<Self, EngineError> {
        let engine = CompressionEngine::new(*config.engine())?;
        Ok(Self::with_engine(config, engine))
    }

    /// Create a repacker around an already initialized engine.
    pub fn with_engine(config: RepackConfig, engine: CompressionEngine) -> Self {
        let writer = ContainerWriter::new(config.layout());
        Self {
            config,
            engine,
            writer,
        }
    }

    /// Run configuration.
    pub fn config(&self) -> &RepackConfig {
        &self.config
    }

    /// The engine shared by every file in the run.
    pub fn engine(&self) -> &CompressionEngine {
        &self.engine
    }

    /// Discover and repack every source file under the source root.
    ///
    /// # Errors
    ///
    /// Only discovery failures abort the run. Per-file failures are counted in
    /// the returned [`RunSummary`].
    pub fn run(&mut self) -> Result<RunSummary, DiscoveryError> {
        let started = Instant::now();
        let sources = discover_sources(self.config.source_root(), SOURCE_EXTENSION)?;

        info!(
            source = %self.config.source_root().display(),
            output = %self.config.output_root().display(),
            files = sources.len(),
            workers = self.engine.workers(),
            "Repacking started"
        );

        let mut summary = RunSummary {
            discovered: sources.len(),
            ..RunSummary::default()
        };

        for source in &sources {
            match self.repack_file(source) {
                Ok(report) => {
                    summary.converted += 1;
                    info!(
                        file = %display_name(&report.source),
                        width = report.width,
                        height = report.height,
                        alpha = report.has_alpha,
                        elapsed_secs = report.elapsed.as_secs_f64(),
                        "Converted"
                    );
                }
                Err(e) => {
                    summary.failed += 1;
                    error!(file = %display_name(e.path()), error = %e, "Conversion failed");
                }
            }
        }
        summary.elapsed = started.elapsed();

        if summary.is_empty() {
            warn!(
                source = %self.config.source_root().display(),
                extension = SOURCE_EXTENSION,
                "No source files found"
            );
        } else if summary.all_failed() {
            error!(failed = summary.failed, "Every source file failed to convert");
        }

        info!(
            discovered = summary.discovered,
            converted = summary.converted,
            failed = summary.failed,
            elapsed_secs = summary.elapsed.as_secs_f64(),
            "Repacking finished"
        );
        Ok(summary)
    }

    /// Decode, compress and write a single source file.
    ///
    /// Buffers for the decoded pixels and the payload are dropped when this
    /// returns, on every path.
    ///
    /// # Errors
    ///
    /// Returns `RepackError` naming the file and the stage that failed.
    pub fn repack_file(&mut self, source: &Path) -> Result<FileReport, RepackError> {
        let started = Instant::now();

        let file = File::open(source).map_err(|e| RepackError::Open {
            path: source.to_path_buf(),
            source: e,
        })?;
        let image = RawImage::decode(BufReader::new(file)).map_err(|e| RepackError::Decode {
            path: source.to_path_buf(),
            source: e,
        })?;

        let header = AstcHeader::new(self.engine.footprint(), image.width(), image.height())
            .map_err(|e| RepackError::Write {
                path: source.to_path_buf(),
                source: e,
            })?;

        let payload = self.engine.compress(&image).map_err(|e| RepackError::Compress {
            path: source.to_path_buf(),
            source: e,
        })?;

        let output = self
            .writer
            .write(source, &header, &payload)
            .map_err(|e| RepackError::Write {
                path: source.to_path_buf(),
                source: e,
            })?;

        Ok(FileReport {
            source: source.to_path_buf(),
            output,
            width: image.width(),
            height: image.height(),
            has_alpha: image.has_alpha(),
            bytes_written: HEADER_LEN + payload.len(),
            elapsed: started.elapsed(),
        })
    }
}

fn display_name(path: &Path) -> std::path::Display<'_> {
    path.file_name().map(Path::new).unwrap_or(path).display()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::astc::{BlockFootprint, ASTC_MAGIC};
    use crate::encoder::{BlockCompressor, CompressorError, EngineConfig, StagedImage};
    use crate::raw::RawDecodeError;
    use std::fs;
    use std::ops::Range;
    use std::path::PathBuf;
    use std::sync::Arc;

    /// Fills each block with its worker index.
    struct StampCompressor;

    impl BlockCompressor for StampCompressor {
        fn name(&self) -> &str {
            "stamp"
        }

        fn footprint(&self) -> BlockFootprint {
            BlockFootprint::BLOCK_4X4
        }

        fn compress_blocks(
            &self,
            _image: &StagedImage,
            worker: usize,
            _rows: Range<u32>,
            out: &mut [u8],
        ) -> Result<(), CompressorError> {
            out.fill(worker as u8);
            Ok(())
        }
    }

    fn rle_opaque(width: i32, height: i32, rgb: [u8; 3]) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&width.to_le_bytes());
        bytes.extend_from_slice(&height.to_le_bytes());
        bytes.push(0);
        let mut remaining = (width * height) as usize;
        while remaining > 0 {
            let run = remaining.min(255);
            bytes.push(run as u8);
            bytes.extend_from_slice(&rgb);
            remaining -= run;
        }
        bytes
    }

    fn repacker(source: &Path, output: &Path, workers: usize) -> Repacker {
        let config = RepackConfig::new(source)
            .unwrap()
            .with_output_root(output)
            .unwrap()
            .with_workers(workers);
        let engine = CompressionEngine::with_compressor(
            EngineConfig::new().with_workers(workers),
            Arc::new(StampCompressor),
        )
        .unwrap();
        Repacker::with_engine(config, engine)
    }

    #[test]
    fn test_repack_file_writes_container() {
        let temp = tempfile::tempdir().unwrap();
        let src = temp.path().join("src");
        let out = temp.path().join("out");
        fs::create_dir_all(src.join("ui")).unwrap();
        let input = src.join("ui/button.data");
        fs::write(&input, rle_opaque(6, 5, [1, 2, 3])).unwrap();

        let mut repacker = repacker(&src, &out, 2);
        let report = repacker.repack_file(&input).unwrap();

        assert_eq!(report.output, out.join("ui/button.astc"));
        assert_eq!((report.width, report.height), (6, 5));
        assert!(!report.has_alpha);
        assert_eq!(report.bytes_written, 16 + 2 * 2 * 16);

        let bytes = fs::read(&report.output).unwrap();
        assert_eq!(bytes.len(), report.bytes_written);
        assert_eq!(&bytes[..4], &ASTC_MAGIC);
        assert!(repacker.engine().is_idle());
    }

    #[test]
    fn test_repack_file_reports_truncated_source() {
        let temp = tempfile::tempdir().unwrap();
        let input = temp.path().join("short.data");
        let mut bytes = rle_opaque(4, 4, [0, 0, 0]);
        bytes.truncate(bytes.len() - 2);
        fs::write(&input, bytes).unwrap();

        let mut repacker = repacker(temp.path(), &temp.path().join("out"), 1);
        let err = repacker.repack_file(&input).unwrap_err();

        assert!(matches!(err, RepackError::Decode { ref path, .. } if *path == input));
        assert!(!temp.path().join("out/short.astc").exists());
    }

    #[test]
    fn test_repack_file_rejects_oversized_header() {
        let temp = tempfile::tempdir().unwrap();
        let input = temp.path().join("huge.data");
        let mut bytes = rle_opaque(4, 4, [0, 0, 0]);
        bytes[..4].copy_from_slice(&(1i32 << 24).to_le_bytes());
        fs::write(&input, bytes).unwrap();

        let mut repacker = repacker(temp.path(), &temp.path().join("out"), 2);
        let err = repacker.repack_file(&input).unwrap_err();

        assert!(matches!(
            err,
            RepackError::Decode {
                source: RawDecodeError::TooLarge { width: 16_777_216, height: 4 },
                ..
            }
        ));
        assert!(!temp.path().join("out/huge.astc").exists());
        assert!(repacker.engine().is_idle());
        assert_eq!(repacker.engine().images_compressed(), 0);
    }

    #[test]
    fn test_repack_file_reports_missing_source() {
        let temp = tempfile::tempdir().unwrap();
        let mut repacker = repacker(temp.path(), &temp.path().join("out"), 1);

        let err = repacker
            .repack_file(&temp.path().join("gone.data"))
            .unwrap_err();
        assert!(matches!(err, RepackError::Open { .. }));
    }

    #[test]
    fn test_run_continues_past_failures() {
        let temp = tempfile::tempdir().unwrap();
        let src = temp.path().join("src");
        let out = temp.path().join("out");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("a.data"), rle_opaque(4, 4, [9, 9, 9])).unwrap();
        fs::write(src.join("b.data"), [1, 2, 3]).unwrap();
        fs::write(src.join("c.data"), rle_opaque(8, 2, [7, 7, 7])).unwrap();

        let mut repacker = repacker(&src, &out, 3);
        let summary = repacker.run().unwrap();

        assert_eq!(summary.discovered, 3);
        assert_eq!(summary.converted, 2);
        assert_eq!(summary.failed, 1);
        assert!(out.join("a.astc").is_file());
        assert!(!out.join("b.astc").exists());
        assert!(out.join("c.astc").is_file());
        assert_eq!(repacker.engine().images_compressed(), 2);
    }

    #[test]
    fn test_run_on_empty_tree() {
        let temp = tempfile::tempdir().unwrap();
        let mut repacker = repacker(temp.path(), &temp.path().join("out"), 1);

        let summary = repacker.run().unwrap();

        assert!(summary.is_empty());
        assert!(!summary.all_failed());
    }

    #[test]
    fn test_display_name_uses_file_name() {
        let path = PathBuf::from("/games/Content/ui/button.data");
        assert_eq!(display_name(&path).to_string(), "button.data");
    }
}
