// SPDX-License-Identifier: MIT
//! Plate reader

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use tracing::{debug, trace};

use super::{check_position, entry_position, parse_header, slot_index, PlateError};

/// Random-access reader for V1 plate files
pub struct PlateReader<R> {
    stream: Option<R>,
    levels: u32,
}

impl PlateReader<BufReader<File>> {
    /// Open a plate file on disk
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PlateError> {
        let path = path.as_ref();
        debug!("Opening plate: {:?}", path);
        Self::new(BufReader::new(File::open(path)?))
    }
}

impl<R: Read + Seek> PlateReader<R> {
    /// Validate the header of `stream`
    pub fn new(mut stream: R) -> Result<Self, PlateError> {
        stream.seek(SeekFrom::Start(0))?;
        let mut header = [0u8; 8];
        stream.read_exact(&mut header).map_err(|e| {
            PlateError::MalformedHeader(format!("cannot read plate header: {e}"))
        })?;

        let levels = parse_header(header)?;
        debug!("Loaded plate header: {} levels", levels);

        Ok(Self {
            stream: Some(stream),
            levels,
        })
    }

    /// Index entry of a tile: `(offset, length)`, `(0, 0)` when absent
    pub fn tile_location(&mut self, level: u32, x: u32, y: u32) -> Result<(u32, u32), PlateError> {
        let stream = self.stream.as_mut().ok_or(PlateError::Closed)?;
        check_position(self.levels, level, x, y)?;

        stream.seek(SeekFrom::Start(entry_position(slot_index(level, x, y))))?;
        let mut entry = [0u8; 8];
        stream.read_exact(&mut entry)?;

        let offset = u32::from_le_bytes([entry[0], entry[1], entry[2], entry[3]]);
        let length = u32::from_le_bytes([entry[4], entry[5], entry[6], entry[7]]);
        Ok((offset, length))
    }

    /// Read one tile into memory; absent tiles are empty
    pub fn read_tile(&mut self, level: u32, x: u32, y: u32) -> Result<Vec<u8>, PlateError> {
        let (offset, length) = self.tile_location(level, x, y)?;
        trace!("Reading tile L{}X{}Y{}: {} bytes at {}", level, x, y, length, offset);

        let mut data = vec![0u8; length as usize];
        if length > 0 {
            let stream = self.stream.as_mut().ok_or(PlateError::Closed)?;
            stream.seek(SeekFrom::Start(u64::from(offset)))?;
            stream.read_exact(&mut data)?;
        }
        Ok(data)
    }

    /// Close the underlying stream; later reads fail with [`PlateError::Closed`]
    pub fn close(&mut self) {
        if self.stream.take().is_some() {
            debug!("Closed plate reader");
        }
    }
}

impl<R> PlateReader<R> {
    /// Depth of the pyramid; valid levels are `0..=levels`
    pub fn levels(&self) -> u32 {
        self.levels
    }

    pub fn is_closed(&self) -> bool {
        self.stream.is_none()
    }
}
