// SPDX-License-Identifier: MIT
//! Cabinet writer

use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use super::{
    format_header_size, path_to_name, CabinetError, HEADER_SIZE_PLACEHOLDER, PATCH_WINDOW,
    ROOT_TAG,
};
use crate::xml::{self, Element};

/// Builder that accumulates files in memory until [`CabinetWriter::emit`]
#[derive(Debug, Default)]
pub struct CabinetWriter {
    files: Vec<(String, Vec<u8>)>,
    names: HashSet<String>,
}

impl CabinetWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file under `name`; names must be unique
    pub fn add_file_with_data(
        &mut self,
        name: impl Into<String>,
        data: impl Into<Vec<u8>>,
    ) -> Result<(), CabinetError> {
        let name = name.into();
        if !self.names.insert(name.clone()) {
            return Err(CabinetError::DuplicateName(name));
        }

        let data = data.into();
        trace!("Queued cabinet file {:?} ({} bytes)", name, data.len());
        self.files.push((name, data));
        Ok(())
    }

    /// Add the contents of a file on disk under `name`
    pub fn add_file_from_path(
        &mut self,
        name: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> Result<(), CabinetError> {
        let name = name.into();
        if self.names.contains(&name) {
            return Err(CabinetError::DuplicateName(name));
        }
        let data = std::fs::read(path)?;
        self.add_file_with_data(name, data)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Names queued so far, in insertion order
    pub fn filenames(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(|(name, _)| name.as_str())
    }

    /// Serialize the header
    ///
    /// The `HeaderSize` attribute is written as a placeholder and patched once
    /// the header's byte length is known.
    fn build_header(&self) -> Result<Vec<u8>, CabinetError> {
        let mut files = Element::new("Files");
        let mut offset: u64 = 0;

        for (name, data) in &self.files {
            files.push(
                Element::new("File")
                    .with_attr("Name", name.as_str())
                    .with_attr("Size", data.len().to_string())
                    .with_attr("Offset", offset.to_string()),
            );
            offset += data.len() as u64;
        }

        let root = Element::new(ROOT_TAG)
            .with_attr("HeaderSize", HEADER_SIZE_PLACEHOLDER)
            .with_attr("MajorVersion", "1")
            .with_attr("MinorVersion", "0")
            .with_child(files);

        let mut header = xml::render_to_string(&root)?.into_bytes();

        let window = &header[..header.len().min(PATCH_WINDOW)];
        let at = window
            .windows(HEADER_SIZE_PLACEHOLDER.len())
            .position(|w| w == HEADER_SIZE_PLACEHOLDER.as_bytes())
            .ok_or_else(|| {
                CabinetError::MalformedHeader("header size placeholder not found".to_string())
            })?;

        let size = u32::try_from(header.len()).map_err(|_| {
            CabinetError::MalformedHeader(format!("header of {} bytes is too large", header.len()))
        })?;
        header[at..at + HEADER_SIZE_PLACEHOLDER.len()]
            .copy_from_slice(format_header_size(size).as_bytes());

        Ok(header)
    }

    /// Write the cabinet to `out`, returning the number of bytes written
    pub fn emit<W: Write>(self, mut out: W) -> Result<u64, CabinetError> {
        let header = self.build_header()?;
        out.write_all(&header)?;

        let mut total = header.len() as u64;
        for (_, data) in &self.files {
            out.write_all(data)?;
            total += data.len() as u64;
        }
        out.flush()?;

        debug!(
            "Wrote cabinet: {} files, {} header bytes, {} total",
            self.files.len(),
            header.len(),
            total
        );
        Ok(total)
    }
}

/// Pack every regular file under `dir` into a cabinet written to `out`
///
/// Names are the paths relative to `dir`, joined with backslashes, visited in
/// sorted order.
pub fn pack_directory<W: Write>(dir: impl AsRef<Path>, out: W) -> Result<u64, CabinetError> {
    let dir = dir.as_ref();
    let mut paths = Vec::new();
    collect_files(dir, &mut paths)?;
    paths.sort();

    let mut writer = CabinetWriter::new();
    for path in &paths {
        let relative = path
            .strip_prefix(dir)
            .map_err(|_| CabinetError::InvalidPath(path.display().to_string()))?;
        writer.add_file_from_path(path_to_name(relative)?, path)?;
    }

    writer.emit(out)
}

fn collect_files(dir: &Path, paths: &mut Vec<PathBuf>) -> Result<(), CabinetError> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            collect_files(&entry.path(), paths)?;
        } else if file_type.is_file() {
            paths.push(entry.path());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cabinet::{CabinetReader, HEADER_SIZE_MARKER};
    use std::io::Cursor;

    #[test]
    fn test_duplicate_name() {
        let mut writer = CabinetWriter::new();
        writer.add_file_with_data("a.txt", b"1".to_vec()).unwrap();
        assert!(matches!(
            writer.add_file_with_data("a.txt", b"2".to_vec()),
            Err(CabinetError::DuplicateName(_))
        ));
        assert_eq!(writer.len(), 1);
    }

    #[test]
    fn test_header_size_patched() {
        let mut writer = CabinetWriter::new();
        writer.add_file_with_data("x", b"payload".to_vec()).unwrap();
        let header = writer.build_header().unwrap();

        let text = String::from_utf8(header.clone()).unwrap();
        assert!(text.contains(&format!("HeaderSize=\"{}\"", format_header_size(header.len() as u32))));
        assert!(!text.contains(HEADER_SIZE_PLACEHOLDER));

        let marker = header
            .windows(HEADER_SIZE_MARKER.len())
            .position(|w| w == HEADER_SIZE_MARKER)
            .unwrap();
        assert!(marker < PATCH_WINDOW);
    }

    #[test]
    fn test_placeholder_in_file_name_untouched() {
        let mut writer = CabinetWriter::new();
        writer
            .add_file_with_data(HEADER_SIZE_PLACEHOLDER, b"tricky".to_vec())
            .unwrap();

        let mut out = Vec::new();
        writer.emit(&mut out).unwrap();

        let mut reader = CabinetReader::new(Cursor::new(out)).unwrap();
        assert_eq!(reader.read_file(HEADER_SIZE_PLACEHOLDER).unwrap(), b"tricky");
    }

    #[test]
    fn test_empty_cabinet() {
        let mut out = Vec::new();
        let total = CabinetWriter::new().emit(&mut out).unwrap();
        assert_eq!(total, out.len() as u64);

        let reader = CabinetReader::new(Cursor::new(out)).unwrap();
        assert!(reader.is_empty());
    }
}
