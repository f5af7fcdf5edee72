// SPDX-License-Identifier: MIT
//! Cabinet reader

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use super::{
    name_to_path, parse_header_size, CabinetEntry, CabinetError, HEADER_PROBE_LEN,
    HEADER_SIZE_MARKER, HEADER_SIZE_WIDTH,
};
use crate::xml::{self, Element};

/// Random-access reader over a cabinet stream
pub struct CabinetReader<R> {
    stream: Option<R>,
    header_size: u64,
    entries: Vec<CabinetEntry>,
    index: HashMap<String, usize>,
}

impl CabinetReader<BufReader<File>> {
    /// Open a cabinet file on disk
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CabinetError> {
        let path = path.as_ref();
        debug!("Opening cabinet: {:?}", path);
        Self::new(BufReader::new(File::open(path)?))
    }
}

impl<R: Read + Seek> CabinetReader<R> {
    /// Parse the header of `stream` and index its files
    pub fn new(mut stream: R) -> Result<Self, CabinetError> {
        stream.seek(SeekFrom::Start(0))?;

        let mut probe = Vec::with_capacity(HEADER_PROBE_LEN);
        (&mut stream)
            .take(HEADER_PROBE_LEN as u64)
            .read_to_end(&mut probe)?;

        let header_size = locate_header_size(&probe)?;
        let stream_len = stream.seek(SeekFrom::End(0))?;
        if header_size > stream_len {
            return Err(CabinetError::MalformedHeader(format!(
                "header size {header_size} exceeds stream length {stream_len}"
            )));
        }

        let header_len = usize::try_from(header_size).map_err(|_| {
            CabinetError::MalformedHeader(format!("header size {header_size} is not addressable"))
        })?;
        let mut header = vec![0u8; header_len];
        stream.seek(SeekFrom::Start(0))?;
        stream.read_exact(&mut header).map_err(|e| {
            CabinetError::MalformedHeader(format!("header of {header_size} bytes truncated: {e}"))
        })?;

        let root = xml::parse_bytes(&header)?;
        let (entries, index) = index_entries(&root, header_size, stream_len)?;

        debug!(
            "Loaded cabinet header: {} bytes, {} files",
            header_size,
            entries.len()
        );

        Ok(Self {
            stream: Some(stream),
            header_size,
            entries,
            index,
        })
    }

    /// Read one file into memory
    pub fn read_file(&mut self, name: &str) -> Result<Vec<u8>, CabinetError> {
        let stream = self.stream.as_mut().ok_or(CabinetError::Closed)?;
        let entry = self
            .index
            .get(name)
            .map(|&i| &self.entries[i])
            .ok_or_else(|| CabinetError::UnknownName(name.to_string()))?;

        trace!("Reading cabinet file {:?} ({} bytes)", entry.name, entry.size);

        let len = usize::try_from(entry.size).map_err(|_| {
            CabinetError::MalformedHeader(format!("{:?} is too large to load", entry.name))
        })?;
        let mut data = vec![0u8; len];
        stream.seek(SeekFrom::Start(entry.offset))?;
        stream.read_exact(&mut data)?;
        Ok(data)
    }

    /// Extract every file under `dir`, returning the paths written
    pub fn unpack_to(&mut self, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, CabinetError> {
        if self.stream.is_none() {
            return Err(CabinetError::Closed);
        }

        let dir = dir.as_ref();
        let names: Vec<String> = self.entries.iter().map(|e| e.name.clone()).collect();
        let mut written = Vec::with_capacity(names.len());

        for name in names {
            let target = dir.join(name_to_path(&name)?);
            let data = self.read_file(&name)?;

            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&target, data)?;
            written.push(target);
        }

        debug!("Unpacked {} files into {:?}", written.len(), dir);
        Ok(written)
    }

    /// Close the underlying stream; later reads fail with [`CabinetError::Closed`]
    pub fn close(&mut self) {
        if self.stream.take().is_some() {
            debug!("Closed cabinet reader");
        }
    }
}

impl<R> CabinetReader<R> {
    /// File names in header order
    pub fn filenames(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn entries(&self) -> &[CabinetEntry] {
        &self.entries
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn header_size(&self) -> u64 {
        self.header_size
    }

    pub fn is_closed(&self) -> bool {
        self.stream.is_none()
    }
}

fn locate_header_size(probe: &[u8]) -> Result<u64, CabinetError> {
    let start = probe
        .windows(HEADER_SIZE_MARKER.len())
        .position(|w| w == HEADER_SIZE_MARKER)
        .map(|i| i + HEADER_SIZE_MARKER.len())
        .ok_or_else(|| {
            CabinetError::MalformedHeader(format!(
                "no HeaderSize attribute in the first {HEADER_PROBE_LEN} bytes"
            ))
        })?;

    let text = probe
        .get(start..start + HEADER_SIZE_WIDTH)
        .ok_or_else(|| CabinetError::MalformedHeader("header size truncated".to_string()))?;
    parse_header_size(text)
}

type Index = (Vec<CabinetEntry>, HashMap<String, usize>);

/// Every entry must lie within the `stream_len` bytes of the cabinet
fn index_entries(root: &Element, header_size: u64, stream_len: u64) -> Result<Index, CabinetError> {
    let files = root
        .find("Files")
        .ok_or_else(|| CabinetError::MalformedHeader("no Files element".to_string()))?;

    let mut entries = Vec::new();
    let mut index = HashMap::new();

    for file in files.find_all("File") {
        let (Some(name), Some(offset), Some(size)) =
            (file.get("Name"), file.get("Offset"), file.get("Size"))
        else {
            return Err(CabinetError::MalformedHeader(
                "incomplete File record".to_string(),
            ));
        };

        let offset: u64 = offset.trim().parse().map_err(|_| {
            CabinetError::MalformedHeader(format!("bad Offset {offset:?} for {name:?}"))
        })?;
        let size: u64 = size.trim().parse().map_err(|_| {
            CabinetError::MalformedHeader(format!("bad Size {size:?} for {name:?}"))
        })?;

        let end = header_size
            .checked_add(offset)
            .and_then(|start| start.checked_add(size));
        if !end.is_some_and(|end| end <= stream_len) {
            return Err(CabinetError::MalformedHeader(format!(
                "{name:?} (offset {offset}, size {size}) runs past the end of the stream"
            )));
        }

        if index.insert(name.to_string(), entries.len()).is_some() {
            return Err(CabinetError::DuplicateName(name.to_string()));
        }
        entries.push(CabinetEntry {
            name: name.to_string(),
            offset: header_size + offset,
            size,
        });
    }

    Ok((entries, index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn cabinet_bytes(files: &str, payload: &[u8]) -> Vec<u8> {
        // Header size is patched in after measuring
        let template = format!(
            "<?xml version=\"1.0\"?><FileCabinet HeaderSize=\"0x00000000\"><Files>{files}</Files></FileCabinet>"
        );
        let text = template.replace("0x00000000", &format!("0x{:08x}", template.len()));
        let mut bytes = text.into_bytes();
        bytes.extend_from_slice(payload);
        bytes
    }

    #[test]
    fn test_read_handmade_cabinet() {
        let bytes = cabinet_bytes(
            r#"<File Name="a.txt" Size="3" Offset="0"/><File Name="dir\b.bin" Size="2" Offset="3"/>"#,
            b"abcXY",
        );
        let mut reader = CabinetReader::new(Cursor::new(bytes)).unwrap();

        assert_eq!(reader.filenames().collect::<Vec<_>>(), vec!["a.txt", "dir\\b.bin"]);
        assert_eq!(reader.read_file("dir\\b.bin").unwrap(), b"XY");
        assert_eq!(reader.read_file("a.txt").unwrap(), b"abc");
    }

    #[test]
    fn test_unknown_and_closed() {
        let bytes = cabinet_bytes(r#"<File Name="a.txt" Size="1" Offset="0"/>"#, b"z");
        let mut reader = CabinetReader::new(Cursor::new(bytes)).unwrap();

        assert!(matches!(
            reader.read_file("missing"),
            Err(CabinetError::UnknownName(_))
        ));

        reader.close();
        assert!(reader.is_closed());
        assert!(matches!(reader.read_file("a.txt"), Err(CabinetError::Closed)));
        // the index survives close
        assert_eq!(reader.len(), 1);
    }

    #[test]
    fn test_duplicate_header_entry() {
        let bytes = cabinet_bytes(
            r#"<File Name="a" Size="1" Offset="0"/><File Name="a" Size="1" Offset="1"/>"#,
            b"12",
        );
        assert!(matches!(
            CabinetReader::new(Cursor::new(bytes)),
            Err(CabinetError::DuplicateName(_))
        ));
    }

    #[test]
    fn test_missing_marker() {
        let bytes = b"<FileCabinet><Files/></FileCabinet>".to_vec();
        assert!(matches!(
            CabinetReader::new(Cursor::new(bytes)),
            Err(CabinetError::MalformedHeader(_))
        ));
    }

    #[test]
    fn test_entry_past_end_of_stream() {
        let bytes = cabinet_bytes(r#"<File Name="a" Size="1000000000000" Offset="0"/>"#, b"z");
        assert!(matches!(
            CabinetReader::new(Cursor::new(bytes)),
            Err(CabinetError::MalformedHeader(_))
        ));

        let bytes = cabinet_bytes(r#"<File Name="a" Size="2" Offset="0"/>"#, b"z");
        assert!(matches!(
            CabinetReader::new(Cursor::new(bytes)),
            Err(CabinetError::MalformedHeader(_))
        ));

        let bytes = cabinet_bytes(
            r#"<File Name="a" Size="1" Offset="18446744073709551615"/>"#,
            b"z",
        );
        assert!(matches!(
            CabinetReader::new(Cursor::new(bytes)),
            Err(CabinetError::MalformedHeader(_))
        ));

        // an entry ending exactly at the end of the stream is fine
        let bytes = cabinet_bytes(r#"<File Name="a" Size="1" Offset="0"/>"#, b"z");
        let mut reader = CabinetReader::new(Cursor::new(bytes)).unwrap();
        assert_eq!(reader.read_file("a").unwrap(), b"z");
    }

    #[test]
    fn test_incomplete_record() {
        let bytes = cabinet_bytes(r#"<File Name="a" Offset="0"/>"#, b"");
        assert!(matches!(
            CabinetReader::new(Cursor::new(bytes)),
            Err(CabinetError::MalformedHeader(_))
        ));
    }
}
