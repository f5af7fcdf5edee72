// SPDX-License-Identifier: MIT
//! Plate writer

use std::io::{self, Read, Seek, SeekFrom, Write};

use tracing::{debug, trace};

use super::{
    check_position, encode_header, slot_count, slot_index, PlateError, ADDRESS_LIMIT, HEADER_LEN,
    INDEX_ENTRY_LEN, MAX_LEVEL,
};

/// Writer for V1 plate files
///
/// The index is reserved on disk at construction and kept in memory; tiles
/// are streamed straight to their final position. [`PlateWriter::close`]
/// writes the index back and must be called for the file to be readable.
pub struct PlateWriter<W> {
    stream: W,
    levels: u32,
    index: Vec<(u32, u32)>,
    next_offset: u64,
    closed: bool,
}

impl<W: Write + Seek> PlateWriter<W> {
    /// Reserve the header and a zeroed index for `levels` levels
    pub fn new(mut stream: W, levels: u32) -> Result<Self, PlateError> {
        if levels > MAX_LEVEL {
            return Err(PlateError::AddressSpaceExceeded(format!(
                "{levels} levels cannot be addressed"
            )));
        }

        let slots = slot_count(levels);
        let data_start = HEADER_LEN + INDEX_ENTRY_LEN * slots;
        if data_start >= ADDRESS_LIMIT {
            return Err(PlateError::AddressSpaceExceeded(format!(
                "index for {levels} levels needs {data_start} bytes"
            )));
        }

        stream.seek(SeekFrom::Start(0))?;
        stream.write_all(&encode_header(levels))?;
        io::copy(&mut io::repeat(0).take(INDEX_ENTRY_LEN * slots), &mut stream)?;
        stream.seek(SeekFrom::Start(data_start))?;

        debug!("Created plate writer: {} levels, {} slots", levels, slots);

        Ok(Self {
            stream,
            levels,
            index: vec![(0, 0); slots as usize],
            next_offset: data_start,
            closed: false,
        })
    }

    /// Append a tile from memory, returning the bytes written
    pub fn append_bytes(&mut self, level: u32, x: u32, y: u32, data: &[u8]) -> Result<u32, PlateError> {
        self.ensure_open()?;
        check_position(self.levels, level, x, y)?;

        let end = self.next_offset + data.len() as u64;
        if end > ADDRESS_LIMIT {
            return Err(PlateError::AddressSpaceExceeded(format!(
                "tile L{level}X{x}Y{y} of {} bytes would end at {end}",
                data.len()
            )));
        }

        self.stream.write_all(data)?;
        self.record(level, x, y, data.len() as u64)
    }

    /// Append a tile copied from `source`, returning the bytes written
    ///
    /// The payload length is only known after copying, so a tile that crosses
    /// the address ceiling is detected after its bytes reach the stream. The
    /// writer is then unusable: later appends and `close` fail with
    /// [`PlateError::Closed`].
    pub fn append_stream<S: Read>(&mut self, level: u32, x: u32, y: u32, mut source: S) -> Result<u32, PlateError> {
        self.ensure_open()?;
        check_position(self.levels, level, x, y)?;

        if self.next_offset >= ADDRESS_LIMIT {
            return Err(PlateError::AddressSpaceExceeded(format!(
                "next offset {} is past the limit",
                self.next_offset
            )));
        }

        let written = io::copy(&mut source, &mut self.stream)?;
        if self.next_offset + written > ADDRESS_LIMIT {
            self.closed = true;
            return Err(PlateError::AddressSpaceExceeded(format!(
                "tile L{level}X{x}Y{y} of {written} bytes overran the limit"
            )));
        }
        self.record(level, x, y, written)
    }

    fn record(&mut self, level: u32, x: u32, y: u32, length: u64) -> Result<u32, PlateError> {
        let overflow = || PlateError::AddressSpaceExceeded(format!("tile L{level}X{x}Y{y}"));
        let offset = u32::try_from(self.next_offset).map_err(|_| overflow())?;
        let length = u32::try_from(length).map_err(|_| overflow())?;

        self.index[slot_index(level, x, y) as usize] = (offset, length);
        self.next_offset += u64::from(length);

        trace!("Wrote tile L{}X{}Y{}: {} bytes at {}", level, x, y, length, offset);
        Ok(length)
    }

    /// Write the index back and flush
    pub fn close(&mut self) -> Result<(), PlateError> {
        self.ensure_open()?;
        self.closed = true;

        self.stream.seek(SeekFrom::Start(HEADER_LEN))?;
        let mut encoded = Vec::with_capacity(self.index.len() * INDEX_ENTRY_LEN as usize);
        for (offset, length) in &self.index {
            encoded.extend_from_slice(&offset.to_le_bytes());
            encoded.extend_from_slice(&length.to_le_bytes());
        }
        self.stream.write_all(&encoded)?;
        self.stream.flush()?;

        debug!("Closed plate writer: {} bytes", self.next_offset);
        Ok(())
    }

    fn ensure_open(&self) -> Result<(), PlateError> {
        if self.closed {
            Err(PlateError::Closed)
        } else {
            Ok(())
        }
    }
}

impl<W> PlateWriter<W> {
    pub fn levels(&self) -> u32 {
        self.levels
    }

    /// Offset at which the next tile will be written
    pub fn next_offset(&self) -> u64 {
        self.next_offset
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Give back the underlying stream; the index is only on disk after close
    pub fn into_inner(self) -> W {
        self.stream
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plate::PlateReader;
    use std::io::Cursor;

    /// Seekable sink that keeps only its length
    #[derive(Default)]
    struct Discard {
        pos: u64,
        len: u64,
    }

    impl Write for Discard {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.pos += buf.len() as u64;
            self.len = self.len.max(self.pos);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Seek for Discard {
        fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
            let target = match pos {
                SeekFrom::Start(n) => Some(n),
                SeekFrom::End(d) => self.len.checked_add_signed(d),
                SeekFrom::Current(d) => self.pos.checked_add_signed(d),
            };
            self.pos = target.ok_or_else(|| io::Error::from(io::ErrorKind::InvalidInput))?;
            Ok(self.pos)
        }
    }

    fn zeros(n: u64) -> io::Take<io::Repeat> {
        io::repeat(0).take(n)
    }

    #[test]
    fn test_reserved_index() {
        let writer = PlateWriter::new(Cursor::new(Vec::new()), 2).unwrap();
        assert_eq!(writer.next_offset(), 8 + 8 * 21);
        assert_eq!(writer.into_inner().into_inner().len(), 8 + 8 * 21);
    }

    #[test]
    fn test_append_stream() {
        let mut writer = PlateWriter::new(Cursor::new(Vec::new()), 0).unwrap();
        assert_eq!(writer.append_stream(0, 0, 0, &b"streamed"[..]).unwrap(), 8);
        writer.close().unwrap();

        let mut reader = PlateReader::new(writer.into_inner()).unwrap();
        assert_eq!(reader.read_tile(0, 0, 0).unwrap(), b"streamed");
    }

    #[test]
    fn test_closed_writer() {
        let mut writer = PlateWriter::new(Cursor::new(Vec::new()), 1).unwrap();
        writer.close().unwrap();
        assert!(matches!(
            writer.append_bytes(0, 0, 0, b"000"),
            Err(PlateError::Closed)
        ));
        assert!(matches!(writer.close(), Err(PlateError::Closed)));
    }

    #[test]
    fn test_out_of_range_append() {
        let mut writer = PlateWriter::new(Cursor::new(Vec::new()), 1).unwrap();
        assert!(matches!(
            writer.append_bytes(1, 2, 0, b"x"),
            Err(PlateError::CoordinateOutOfRange { .. })
        ));
        // nothing was written
        assert_eq!(writer.next_offset(), 48);
    }

    #[test]
    fn test_fill_to_address_ceiling() {
        let mut writer = PlateWriter::new(Discard::default(), 1).unwrap();
        let start = writer.next_offset();

        let length = writer.append_stream(0, 0, 0, zeros(ADDRESS_LIMIT - start)).unwrap();
        assert_eq!(u64::from(length), ADDRESS_LIMIT - start);
        assert_eq!(writer.next_offset(), ADDRESS_LIMIT);

        assert!(matches!(
            writer.append_bytes(1, 0, 0, b"x"),
            Err(PlateError::AddressSpaceExceeded(_))
        ));
        assert!(matches!(
            writer.append_stream(1, 1, 0, &b"x"[..]),
            Err(PlateError::AddressSpaceExceeded(_))
        ));

        // rejected before writing, so the plate can still be finished
        assert_eq!(writer.next_offset(), ADDRESS_LIMIT);
        writer.close().unwrap();
        assert_eq!(writer.into_inner().len, ADDRESS_LIMIT);
    }

    #[test]
    fn test_stream_overrun_closes_writer() {
        let mut writer = PlateWriter::new(Discard::default(), 1).unwrap();
        let start = writer.next_offset();

        assert!(matches!(
            writer.append_stream(0, 0, 0, zeros(ADDRESS_LIMIT - start + 1)),
            Err(PlateError::AddressSpaceExceeded(_))
        ));
        assert!(writer.is_closed());
        assert!(matches!(
            writer.append_bytes(1, 0, 0, b"x"),
            Err(PlateError::Closed)
        ));
        assert!(matches!(
            writer.append_stream(1, 0, 0, &b"x"[..]),
            Err(PlateError::Closed)
        ));
        assert!(matches!(writer.close(), Err(PlateError::Closed)));
    }

    #[test]
    fn test_too_many_levels() {
        assert!(matches!(
            PlateWriter::new(Cursor::new(Vec::new()), 15),
            Err(PlateError::AddressSpaceExceeded(_))
        ));
    }
}
