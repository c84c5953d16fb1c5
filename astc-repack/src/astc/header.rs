//! The 16-byte `.astc` file header.
//!
//! ```text
//! offset  size  field
//! 0       4     magic    13 AB A1 5C
//! 4       1     block_x
//! 5       1     block_y
//! 6       1     block_z
//! 7       3     dim_x    24-bit little-endian
//! 10      3     dim_y    24-bit little-endian
//! 13      3     dim_z    24-bit little-endian
//! ```
//!
//! Fields are serialized one by one at their fixed offsets.

use std::io::{self, Write};

use super::{BlockFootprint, ContainerError};

/// Magic number that opens every `.astc` file.
pub const ASTC_MAGIC: [u8; 4] = [0x13, 0xAB, 0xA1, 0x5C];

/// Serialized header length in bytes.
pub const HEADER_LEN: usize = 16;

/// Largest dimension representable in a 24-bit header field.
pub const MAX_DIMENSION: u32 = 0x00FF_FFFF;

/// Parsed or to-be-written `.astc` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AstcHeader {
    footprint: BlockFootprint,
    width: u32,
    height: u32,
    depth: u32,
}

impl AstcHeader {
    /// Create a header for a 2D image (depth 1).
    ///
    /// # Errors
    ///
    /// Returns `ContainerError::DimensionOutOfRange` if either dimension is
    /// zero or does not fit in 24 bits.
    pub fn new(footprint: BlockFootprint, width: u32, height: u32) -> Result<Self, ContainerError> {
        check_dimension("width", width)?;
        check_dimension("height", height)?;
        Ok(Self {
            footprint,
            width,
            height,
            depth: 1,
        })
    }

    /// Parse a header from the start of `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ContainerError> {
        if bytes.len() < HEADER_LEN {
            return Err(ContainerError::TruncatedHeader { len: bytes.len() });
        }
        if bytes[..4] != ASTC_MAGIC {
            return Err(ContainerError::InvalidMagic([
                bytes[0], bytes[1], bytes[2], bytes[3],
            ]));
        }

        Ok(Self {
            footprint: BlockFootprint {
                x: bytes[4],
                y: bytes[5],
                z: bytes[6],
            },
            width: read_u24(&bytes[7..10]),
            height: read_u24(&bytes[10..13]),
            depth: read_u24(&bytes[13..16]),
        })
    }

    /// Serialize the header.
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut bytes = [0u8; HEADER_LEN];
        bytes[..4].copy_from_slice(&ASTC_MAGIC);
        bytes[4] = self.footprint.x;
        bytes[5] = self.footprint.y;
        bytes[6] = self.footprint.z;
        write_u24(&mut bytes[7..10], self.width);
        write_u24(&mut bytes[10..13], self.height);
        write_u24(&mut bytes[13..16], self.depth);
        bytes
    }

    /// Write the serialized header to `writer`.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.to_bytes())
    }

    /// Block footprint recorded in the header.
    pub fn footprint(&self) -> BlockFootprint {
        self.footprint
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Image depth in pixels.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Payload length the header describes.
    pub fn payload_len(&self) -> usize {
        self.footprint.payload_len(self.width, self.height)
    }
}

fn check_dimension(axis: &'static str, value: u32) -> Result<(), ContainerError> {
    if value == 0 || value > MAX_DIMENSION {
        return Err(ContainerError::DimensionOutOfRange { axis, value });
    }
    Ok(())
}

fn write_u24(dst: &mut [u8], value: u32) {
    dst.copy_from_slice(&value.to_le_bytes()[..3]);
}

fn read_u24(src: &[u8]) -> u32 {
    u32::from_le_bytes([src[0], src[1], src[2], 0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_300x150_bytes() {
        let header = AstcHeader::new(BlockFootprint::BLOCK_4X4, 300, 150).unwrap();
        let bytes = header.to_bytes();

        assert_eq!(
            bytes,
            [
                0x13, 0xAB, 0xA1, 0x5C, // magic
                4, 4, 1, // block
                0x2C, 0x01, 0x00, // dim_x
                0x96, 0x00, 0x00, // dim_y
                0x01, 0x00, 0x00, // dim_z
            ]
        );
    }

    #[test]
    fn test_header_uses_all_three_dimension_bytes() {
        let header = AstcHeader::new(BlockFootprint::BLOCK_4X4, 0x0012_3456, 0x00AB_CDEF).unwrap();
        let bytes = header.to_bytes();

        assert_eq!(&bytes[7..10], &[0x56, 0x34, 0x12]);
        assert_eq!(&bytes[10..13], &[0xEF, 0xCD, 0xAB]);
    }

    #[test]
    fn test_header_rejects_oversized_dimension() {
        let err = AstcHeader::new(BlockFootprint::BLOCK_4X4, MAX_DIMENSION + 1, 4).unwrap_err();
        assert!(matches!(
            err,
            ContainerError::DimensionOutOfRange { axis: "width", .. }
        ));
    }

    #[test]
    fn test_header_rejects_zero_dimension() {
        let err = AstcHeader::new(BlockFootprint::BLOCK_4X4, 4, 0).unwrap_err();
        assert!(matches!(
            err,
            ContainerError::DimensionOutOfRange { axis: "height", value: 0 }
        ));
    }

    #[test]
    fn test_write_to_matches_to_bytes() {
        let header = AstcHeader::new(BlockFootprint::BLOCK_4X4, 17, 9).unwrap();
        let mut out = Vec::new();
        header.write_to(&mut out).unwrap();
        assert_eq!(out, header.to_bytes());
    }

    #[test]
    fn test_from_bytes_parses_written_header() {
        let header = AstcHeader::new(BlockFootprint::BLOCK_4X4, 300, 150).unwrap();
        let parsed = AstcHeader::from_bytes(&header.to_bytes()).unwrap();

        assert_eq!(parsed, header);
        assert_eq!(parsed.depth(), 1);
        assert_eq!(parsed.payload_len(), 75 * 38 * 16);
    }

    #[test]
    fn test_from_bytes_rejects_bad_magic() {
        let mut bytes = AstcHeader::new(BlockFootprint::BLOCK_4X4, 4, 4)
            .unwrap()
            .to_bytes();
        bytes[0] = 0x00;
        assert!(matches!(
            AstcHeader::from_bytes(&bytes),
            Err(ContainerError::InvalidMagic(_))
        ));
    }

    #[test]
    fn test_from_bytes_rejects_short_input() {
        assert!(matches!(
            AstcHeader::from_bytes(&ASTC_MAGIC),
            Err(ContainerError::TruncatedHeader { len: 4 })
        ));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_dimensions_encode_little_endian(
                width in 1u32..=MAX_DIMENSION,
                height in 1u32..=MAX_DIMENSION
            ) {
                let bytes = AstcHeader::new(BlockFootprint::BLOCK_4X4, width, height)
                    .unwrap()
                    .to_bytes();
                let width_le = width.to_le_bytes();
                let height_le = height.to_le_bytes();
                prop_assert_eq!(&bytes[7..10], &width_le[..3]);
                prop_assert_eq!(&bytes[10..13], &height_le[..3]);
                prop_assert_eq!(&bytes[13..16], &[1u8, 0, 0][..]);
            }
        }
    }
}
