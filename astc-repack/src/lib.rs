//! astc-repack - Convert run-length encoded raw textures into ASTC containers
//!
//! This library decodes the `.data` texture format, compresses the pixels into
//! 4×4 ASTC blocks on a fixed pool of workers, and writes each result as a
//! standard `.astc` file next to its source or into a mirrored output tree.
//!
//! The main entry point is [`pipeline::Repacker`]; the individual stages are
//! usable on their own through [`raw`], [`encoder`] and [`astc`].

pub mod astc;
pub mod config;
pub mod encoder;
pub mod pipeline;
pub mod raw;

/// Library version, as published in `Cargo.toml`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_not_empty() {
        assert!(!VERSION.is_empty(), "Version should not be empty");
    }
}
