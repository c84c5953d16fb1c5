//! Errors that end a CLI run with a failure exit code.

use astc_repack::config::ConfigError;
use astc_repack::encoder::EngineError;
use astc_repack::pipeline::DiscoveryError;
use thiserror::Error;

/// Fatal CLI errors.
///
/// Per-file conversion failures are not represented here; they are logged by
/// the pipeline and do not change the exit code.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("invalid source directory: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to initialize compression engine: {0}")]
    Engine(#[from] EngineError),

    #[error("failed to scan source directory: {0}")]
    Discovery(#[from] DiscoveryError),
}
