// SPDX-License-Identifier: MIT
//! The V1 "plate" tile container format
//!
//! A plate file packs a quadtree tile pyramid into one file. Level `l` holds a
//! `2^l x 2^l` grid of tiles. The layout is fixed:
//!
//! ```text
//! [magic: u32 LE][levels: u32 LE]
//! [offset: u32 LE][length: u32 LE]   one entry per slot, levels 0..=levels
//! [tile payloads in write order]
//! ```
//!
//! Slot numbering is closed-form: the slots of level `l` start after the
//! `(4^l - 1) / 3` slots of all earlier levels and run row-major. Offsets are
//! 32 bits wide, so a V1 file never exceeds 4 GiB. A never-written slot holds
//! `(0, 0)` and reads back as an empty tile.

pub mod reader;
pub mod writer;

pub use reader::PlateReader;
pub use writer::PlateWriter;

/// Magic number of the V1 format
pub const V1_MAGIC: u32 = 0x7E69AD43;

/// Magic number of the hash-table based V2 format, which is not supported
pub const V2_MAGIC: u32 = 0x17914242;

/// Header length; also the width of one index entry
pub const HEADER_LEN: u64 = 8;

/// Width of one `(offset, length)` index entry
pub const INDEX_ENTRY_LEN: u64 = 8;

/// First offset beyond the 32-bit address space
pub const ADDRESS_LIMIT: u64 = 1 << 32;

/// Deepest level whose slot arithmetic fits in 64 bits
pub const MAX_LEVEL: u32 = 31;

/// Errors raised by plate readers and writers
#[derive(Debug, thiserror::Error)]
pub enum PlateError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed plate header: {0}")]
    MalformedHeader(String),

    #[error("Input is a V2 plate file (magic {magic:#010x}), not V1")]
    UnsupportedVersion { magic: u32 },

    #[error("Plate address space exceeded: {0}")]
    AddressSpaceExceeded(String),

    #[error("Invalid tile position L{level}X{x}Y{y}")]
    CoordinateOutOfRange { level: u32, x: u32, y: u32 },

    #[error("Plate handle is closed")]
    Closed,
}

/// Number of slots in all levels before `level`
#[inline]
pub fn level_base(level: u32) -> u64 {
    ((1u64 << (2 * level)) - 1) / 3
}

/// Total number of slots in levels `0..=levels`
#[inline]
pub fn slot_count(levels: u32) -> u64 {
    level_base(levels) + (1u64 << (2 * levels))
}

/// Validate a tile position against a pyramid depth
pub fn check_position(levels: u32, level: u32, x: u32, y: u32) -> Result<(), PlateError> {
    let out_of_range = PlateError::CoordinateOutOfRange { level, x, y };
    if level > levels || level > MAX_LEVEL {
        return Err(out_of_range);
    }

    let n = 1u64 << level;
    if u64::from(x) >= n || u64::from(y) >= n {
        return Err(out_of_range);
    }
    Ok(())
}

/// Slot number of a validated tile position
#[inline]
pub fn slot_index(level: u32, x: u32, y: u32) -> u64 {
    level_base(level) + (1u64 << level) * u64::from(y) + u64::from(x)
}

/// Byte position of a slot's index entry
#[inline]
pub fn entry_position(slot: u64) -> u64 {
    INDEX_ENTRY_LEN * (slot + 1)
}

/// Decode the 8-byte header, returning the level count
pub fn parse_header(bytes: [u8; 8]) -> Result<u32, PlateError> {
    let magic = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    let levels = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);

    match magic {
        V1_MAGIC => Ok(levels),
        V2_MAGIC => Err(PlateError::UnsupportedVersion { magic }),
        _ => Err(PlateError::MalformedHeader(format!(
            "magic {magic:#010x} is neither V1 nor V2"
        ))),
    }
}

pub fn encode_header(levels: u32) -> [u8; 8] {
    let mut bytes = [0u8; 8];
    bytes[..4].copy_from_slice(&V1_MAGIC.to_le_bytes());
    bytes[4..].copy_from_slice(&levels.to_le_bytes());
    bytes
}
