//! Run configuration.
//!
//! `RepackConfig` gathers everything a run needs: where to scan, where to
//! write, and how to configure the compression engine.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::astc::OutputLayout;
use crate::encoder::{EngineConfig, QualityPreset};

/// Output directory used when neither an explicit root nor in-place mode is set.
pub const DEFAULT_OUTPUT_DIR: &str = "out";

/// Extension of the source files picked up by a scan.
pub const SOURCE_EXTENSION: &str = "data";

/// Errors that can occur while building a [`RepackConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The source path does not name a directory.
    #[error("path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// The working directory needed to absolutize a path is unavailable.
    #[error("failed to resolve working directory: {0}")]
    CurrentDir(#[source] io::Error),
}

/// Configuration for a repacking run.
///
/// # Example
///
/// ```
/// use astc_repack::config::RepackConfig;
///
/// let source = std::env::temp_dir();
/// let config = RepackConfig::new(&source).unwrap().in_place().with_workers(2);
///
/// assert_eq!(config.output_root(), config.source_root());
/// assert_eq!(config.engine().workers(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct RepackConfig {
    source_root: PathBuf,
    output_root: PathBuf,
    engine: EngineConfig,
}

impl RepackConfig {
    /// Create a configuration scanning `source_root`.
    ///
    /// The source root is made absolute. Output defaults to
    /// [`DEFAULT_OUTPUT_DIR`] under the working directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotADirectory` if `source_root` is not a directory.
    pub fn new(source_root: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source_root = absolute(source_root.as_ref())?;
        if !source_root.is_dir() {
            return Err(ConfigError::NotADirectory(source_root));
        }

        Ok(Self {
            output_root: absolute(Path::new(DEFAULT_OUTPUT_DIR))?,
            source_root,
            engine: EngineConfig::new(),
        })
    }

    /// Write containers under `output_root`, mirroring the source layout.
    pub fn with_output_root(mut self, output_root: impl AsRef<Path>) -> Result<Self, ConfigError> {
        self.output_root = absolute(output_root.as_ref())?;
        Ok(self)
    }

    /// Write each container next to its source file.
    pub fn in_place(mut self) -> Self {
        self.output_root = self.source_root.clone();
        self
    }

    /// Set the number of compression workers.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.engine = self.engine.with_workers(workers);
        self
    }

    /// Set the encoder quality preset.
    pub fn with_quality(mut self, quality: QualityPreset) -> Self {
        self.engine = self.engine.with_quality(quality);
        self
    }

    /// Absolute directory scanned for sources.
    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    /// Absolute directory containers are written under.
    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Whether containers are written next to their sources.
    pub fn is_in_place(&self) -> bool {
        self.output_root == self.source_root
    }

    /// Compression engine configuration.
    pub fn engine(&self) -> &EngineConfig {
        &self.engine
    }

    /// Output layout derived from the source and output roots.
    pub fn layout(&self) -> OutputLayout {
        OutputLayout::new(&self.source_root, &self.output_root)
    }
}

fn absolute(path: &Path) -> Result<PathBuf, ConfigError> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(ConfigError::CurrentDir)?;
    Ok(cwd.join(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_defaults_to_out_directory() {
        let temp = tempfile::tempdir().unwrap();
        let config = RepackConfig::new(temp.path()).unwrap();

        assert_eq!(config.source_root(), temp.path());
        assert!(config.output_root().is_absolute());
        assert!(config.output_root().ends_with(DEFAULT_OUTPUT_DIR));
        assert!(!config.is_in_place());
    }

    #[test]
    fn test_in_place_uses_source_root() {
        let temp = tempfile::tempdir().unwrap();
        let config = RepackConfig::new(temp.path()).unwrap().in_place();

        assert_eq!(config.output_root(), temp.path());
        assert!(config.is_in_place());
    }

    #[test]
    fn test_rejects_file_as_source() {
        let temp = tempfile::tempdir().unwrap();
        let file = temp.path().join("a.data");
        std::fs::write(&file, b"x").unwrap();

        let err = RepackConfig::new(&file).unwrap_err();
        assert!(matches!(err, ConfigError::NotADirectory(p) if p == file));
    }

    #[test]
    fn test_rejects_missing_source() {
        let temp = tempfile::tempdir().unwrap();
        let err = RepackConfig::new(temp.path().join("missing")).unwrap_err();
        assert!(matches!(err, ConfigError::NotADirectory(_)));
    }

    #[test]
    fn test_engine_settings_flow_through() {
        let temp = tempfile::tempdir().unwrap();
        let config = RepackConfig::new(temp.path())
            .unwrap()
            .with_workers(3)
            .with_quality(QualityPreset::Thorough);

        assert_eq!(config.engine().workers(), 3);
        assert_eq!(config.engine().quality(), QualityPreset::Thorough);
    }

    #[test]
    fn test_layout_maps_into_output_root() {
        let temp = tempfile::tempdir().unwrap();
        let out = temp.path().join("converted");
        let config = RepackConfig::new(temp.path())
            .unwrap()
            .with_output_root(&out)
            .unwrap();

        let path = config
            .layout()
            .output_path(&temp.path().join("a/b.data"))
            .unwrap();
        assert_eq!(path, out.join("a/b.astc"));
    }
}
