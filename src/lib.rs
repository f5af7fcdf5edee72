// SPDX-License-Identifier: MIT
//! # WWT Data Formats
//!
//! Readers and writers for the data files of a virtual-sky visualization
//! platform.
//!
//! ## Components
//!
//! - [`codec`]: a directive-driven XML codec. Record types declare how each
//!   field maps to an attribute, text element, nested element or list, and
//!   the engine serializes, merges into existing trees, and deserializes.
//! - [`cabinet`]: the "file cabinet" container, named blobs behind an XML
//!   index.
//! - [`plate`]: the V1 "plate" container for quadtree tile pyramids.
//! - [`constellations`]: point-in-constellation lookup over a boundary
//!   catalog.
//!
//! [`imageset`] and [`layers`] are the concrete records used by layer
//! collections (`.wwtl` cabinets).
//!
//! ## Format Overview
//!
//! ```text
//! Cabinet:  [XML header with HeaderSize="0xHHHHHHHH"][blob][blob]...
//! Plate V1: [magic 0x7E69AD43][levels][(offset, length) per slot][tiles]
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use std::io::Cursor;
//! use wwt_data_formats::{CabinetReader, CabinetWriter};
//!
//! let mut writer = CabinetWriter::new();
//! writer.add_file_with_data("file1.txt", b"Hello world\n".to_vec()).unwrap();
//!
//! let mut data = Vec::new();
//! writer.emit(&mut data).unwrap();
//!
//! let mut reader = CabinetReader::new(Cursor::new(data)).unwrap();
//! assert_eq!(reader.read_file("file1.txt").unwrap(), b"Hello world\n");
//! ```
//!
//! ## Logging
//!
//! Archive and catalog operations emit `tracing` events. The crate never
//! installs a subscriber.

pub mod cabinet;
pub mod codec;
pub mod config;
pub mod constellations;
pub mod enums;
pub mod error;
pub mod imageset;
pub mod layers;
pub mod plate;
pub mod xml;

// Re-export main types
pub use cabinet::{CabinetError, CabinetReader, CabinetWriter};
pub use codec::{FieldDirective, XmlRecord};
pub use config::Config;
pub use constellations::{find_constellation, ConstellationTable};
pub use enums::{Bandpass, Constellation, DataSetType, FolderType, ProjectionType};
pub use error::{Error, ErrorKind, Result};
pub use imageset::ImageSet;
pub use layers::{ImageSetLayer, LayerContainerReader, LayerContainerXml, LayerKind};
pub use plate::{PlateError, PlateReader, PlateWriter};
pub use xml::{Element, XmlError};
