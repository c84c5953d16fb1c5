//! astc-repack CLI - Command-line interface
//!
//! Converts every `.data` texture under a directory into an `.astc` file.
//!
//! ```text
//! astc-repack <SOURCE> [--install] [--output <DIR>] [--workers <N>]
//!             [--quality <fast|thorough>] [--verbose]
//! ```
//!
//! Exits with `-1` on invalid arguments or when the compression engine cannot
//! be initialized, and with `0` once every file has been attempted.

mod error;
mod logging;

use std::path::PathBuf;

use astc_repack::config::RepackConfig;
use astc_repack::encoder::QualityPreset;
use astc_repack::pipeline::{Repacker, RunSummary};
use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};
use tracing::{error, info};

use crate::error::CliError;

/// Process exit status for fatal errors.
const EXIT_FAILURE: i32 = -1;

#[derive(Debug, Parser)]
#[command(name = "astc-repack", version, about = "Repack raw .data textures into ASTC files")]
struct Cli {
    /// Directory scanned recursively for .data files
    source: PathBuf,

    /// Write each .astc file next to its source instead of under ./out
    #[arg(long, conflicts_with = "output")]
    install: bool,

    /// Directory that receives the converted tree
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Number of compression workers (defaults to available cores)
    #[arg(short = 'j', long, value_parser = clap::value_parser!(u16).range(1..))]
    workers: Option<u16>,

    /// Encoder quality preset
    #[arg(long, value_enum, default_value_t = Quality::Fast)]
    quality: Quality,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Encoder quality selection for CLI arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Quality {
    /// Fast encoding along each block's principal color axis
    Fast,
    /// Slower, higher quality encoding
    Thorough,
}

impl From<Quality> for QualityPreset {
    fn from(quality: Quality) -> Self {
        match quality {
            Quality::Fast => QualityPreset::Fast,
            Quality::Thorough => QualityPreset::Thorough,
        }
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            _ => {
                let _ = e.print();
                std::process::exit(EXIT_FAILURE);
            }
        },
    };

    logging::init(cli.verbose);

    if let Err(e) = run(cli) {
        error!("{}", e);
        std::process::exit(EXIT_FAILURE);
    }
}

/// Build the configuration and engine, then convert the tree.
fn run(cli: Cli) -> Result<RunSummary, CliError> {
    let config = build_config(&cli)?;
    info!(
        version = astc_repack::VERSION,
        quality = config.engine().quality().name(),
        in_place = config.is_in_place(),
        "astc-repack starting"
    );

    let mut repacker = Repacker::new(config)?;
    Ok(repacker.run()?)
}

fn build_config(cli: &Cli) -> Result<RepackConfig, CliError> {
    let mut config = RepackConfig::new(&cli.source)?.with_quality(cli.quality.into());

    if cli.install {
        config = config.in_place();
    } else if let Some(output) = &cli.output {
        config = config.with_output_root(output)?;
    }
    if let Some(workers) = cli.workers {
        config = config.with_workers(usize::from(workers));
    }
    Ok(config)
}
