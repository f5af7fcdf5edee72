// SPDX-License-Identifier: MIT
//! The "file cabinet" container format
//!
//! A cabinet bundles named files behind an XML index:
//!
//! ```text
//! [XML header][file 1 bytes][file 2 bytes]...
//! ```
//!
//! The root element of the header carries `HeaderSize="0xHHHHHHHH"`, the byte
//! length of the header itself, and a `Files` element listing one `File` per
//! entry with its `Name`, `Size` and `Offset` (relative to the end of the
//! header). There is no padding or per-file framing.
//!
//! Names use backslash as the path separator.

pub mod reader;
pub mod writer;

use std::path::{Component, Path, PathBuf};

pub use reader::CabinetReader;
pub use writer::{pack_directory, CabinetWriter};

use crate::xml::XmlError;

/// Tag of the header root element
pub const ROOT_TAG: &str = "FileCabinet";

/// Leading bytes searched for the header-size marker
pub const HEADER_PROBE_LEN: usize = 256;

/// Attribute text that precedes the hex header size
pub const HEADER_SIZE_MARKER: &[u8] = b"HeaderSize=\"";

/// Width of the `0x`-prefixed hex header size
pub const HEADER_SIZE_WIDTH: usize = 10;

/// Fixed-width value written before the real header size is known
pub const HEADER_SIZE_PLACEHOLDER: &str = "0x0BADFEED";

/// Region of the serialized header the placeholder must fall within
///
/// Everything up to here is declaration and root attributes; no file name can
/// appear this early.
pub const PATCH_WINDOW: usize = 90;

/// Separator used inside archive names
pub const NAME_SEPARATOR: char = '\\';

/// Errors raised by cabinet readers and writers
#[derive(Debug, thiserror::Error)]
pub enum CabinetError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Header XML error: {0}")]
    Xml(#[from] XmlError),

    #[error("Malformed cabinet header: {0}")]
    MalformedHeader(String),

    #[error("Duplicate file name in cabinet: {0}")]
    DuplicateName(String),

    #[error("No such file in cabinet: {0}")]
    UnknownName(String),

    #[error("Cabinet reader is closed")]
    Closed,

    #[error("Cannot store path in cabinet: {0}")]
    InvalidPath(String),
}

/// One file recorded in a cabinet header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CabinetEntry {
    pub name: String,

    /// Absolute offset of the file's first byte
    pub offset: u64,
    pub size: u64,
}

/// Format a header size the way the header stores it
pub fn format_header_size(size: u32) -> String {
    format!("0x{size:08x}")
}

/// Parse a `0x`-prefixed hex header size
pub fn parse_header_size(text: &[u8]) -> Result<u64, CabinetError> {
    let text = std::str::from_utf8(text)
        .map_err(|_| CabinetError::MalformedHeader("header size is not ASCII".to_string()))?;
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .ok_or_else(|| CabinetError::MalformedHeader(format!("bad header size {text:?}")))?;
    u64::from_str_radix(digits, 16)
        .map_err(|_| CabinetError::MalformedHeader(format!("bad header size {text:?}")))
}

/// Map an archive name onto a relative filesystem path
///
/// An empty leading segment (as in `\dir\file`) is dropped rather than making
/// the path absolute. `.` and `..` segments are rejected.
pub fn name_to_path(name: &str) -> Result<PathBuf, CabinetError> {
    let mut pieces: Vec<&str> = name.split(NAME_SEPARATOR).collect();
    if pieces.first().is_some_and(|p| p.is_empty()) {
        pieces.remove(0);
    }

    if pieces.is_empty() || pieces.iter().any(|p| matches!(*p, "" | "." | "..")) {
        return Err(CabinetError::MalformedHeader(format!(
            "unsafe file name {name:?}"
        )));
    }

    Ok(pieces.iter().collect())
}

/// Map a relative filesystem path onto an archive name
pub fn path_to_name(path: &Path) -> Result<String, CabinetError> {
    let mut pieces = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(piece) => pieces.push(
                piece
                    .to_str()
                    .ok_or_else(|| CabinetError::InvalidPath(path.display().to_string()))?,
            ),
            _ => return Err(CabinetError::InvalidPath(path.display().to_string())),
        }
    }

    if pieces.is_empty() {
        return Err(CabinetError::InvalidPath(path.display().to_string()));
    }
    Ok(pieces.join("\\"))
}
