//! End-to-end repacking of a source tree.
//!
//! The pipeline finds every `.data` file under the source root and runs each
//! one through the three stages in order:
//!
//! ```text
//! discover_sources ──► for each file (sorted, sequential):
//!
//!   File ──► RawImage::decode ──► CompressionEngine::compress ──► ContainerWriter::write
//!                 │                          │                            │
//!                 └──────────────┬───────────┴────────────────────────────┘
//!                                ▼
//!                   RepackError (logged, file skipped)
//! ```
//!
//! Only engine initialization and discovery are fatal. Anything that goes
//! wrong with an individual file is reported with the file name and the run
//! moves on, which is reflected in the returned [`RunSummary`].

mod discovery;
mod driver;
mod error;
mod report;

pub use discovery::discover_sources;
pub use driver::Repacker;
pub use error::{DiscoveryError, RepackError};
pub use report::{FileReport, RunSummary};
