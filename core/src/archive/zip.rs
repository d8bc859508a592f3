//! archive/zip.rs
//! Zip archives as read and write filesystems.
//!
//! Design notes:
//! - The reader buffers the whole container stream, since the central
//!   directory sits at the end.
//! - Writer entries are independent buffers committed to the archive when
//!   they are closed; closing the filesystem finalizes the archive and
//!   writes it into the container stream.

use std::cell::RefCell;
use std::fmt;
use std::io::{self, Cursor, Read, Write};
use std::rc::Rc;

use ::zip::result::ZipError;
use ::zip::write::SimpleFileOptions;
use ::zip::{CompressionMethod, ZipArchive, ZipWriter};
use serde::{Deserialize, Serialize};

use crate::archive::ArchiveError;
use crate::fs::{ReadFs, ReadFsFromStream, WriteFs, WriteFsFromStream};
use crate::stream::{Close, ReadStream, WriteStream};
use crate::types::{ChainError, Result};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZipCompression {
    Stored,
    #[default]
    Deflated,
}

impl ZipCompression {
    fn method(self) -> CompressionMethod {
        match self {
            ZipCompression::Stored => CompressionMethod::Stored,
            ZipCompression::Deflated => CompressionMethod::Deflated,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZipConfig {
    /// Archive comment written when the archive is finalized.
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub compression: ZipCompression,
}

impl ZipConfig {
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    pub fn with_compression(mut self, compression: ZipCompression) -> Self {
        self.compression = compression;
        self
    }

    /// Interprets a readable stream as a zip archive.
    pub fn fs_reader(&self) -> impl ReadFsFromStream {
        |mut source: ReadStream| -> Result<Box<dyn ReadFs>> {
            let mut data = Vec::new();
            source.read_to_end(&mut data)?;
            let archive = ZipArchive::new(Cursor::new(data)).map_err(ArchiveError::from)?;
            log::debug!("zip: opened archive with {} entr(ies)", archive.len());
            Ok(Box::new(ZipReadFs { archive }))
        }
    }

    /// Interprets a writable stream as a zip archive under construction.
    pub fn fs_writer(&self) -> impl WriteFsFromStream {
        let cfg = self.clone();
        move |sink: WriteStream| -> Result<Box<dyn WriteFs>> { Ok(Box::new(ZipWriteFs::new(cfg, sink))) }
    }
}

pub struct ZipReadFs {
    archive: ZipArchive<Cursor<Vec<u8>>>,
}

impl ZipReadFs {
    pub fn names(&self) -> Vec<String> {
        self.archive.file_names().map(str::to_string).collect()
    }
}

impl ReadFs for ZipReadFs {
    fn open(&mut self, name: &str) -> Result<ReadStream> {
        let mut entry = self.archive.by_name(name).map_err(|err| match err {
            ZipError::FileNotFound => ChainError::NotFound { name: name.to_string() },
            other => ArchiveError::from(other).into(),
        })?;
        // Declared sizes are untrusted; let the buffer grow with the data.
        let mut data = Vec::new();
        entry.read_to_end(&mut data)?;
        Ok(ReadStream::new(Cursor::new(data)))
    }
}

impl Close for ZipReadFs {
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

impl fmt::Debug for ZipReadFs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZipReadFs").field("entries", &self.archive.len()).finish()
    }
}

struct ZipState {
    // None once finalized.
    writer: Option<ZipWriter<Cursor<Vec<u8>>>>,
    open_entries: usize,
}

pub struct ZipWriteFs {
    state: Rc<RefCell<ZipState>>,
    sink: WriteStream,
    cfg: ZipConfig,
}

impl ZipWriteFs {
    fn new(cfg: ZipConfig, sink: WriteStream) -> Self {
        let state = ZipState {
            writer: Some(ZipWriter::new(Cursor::new(Vec::new()))),
            open_entries: 0,
        };
        Self { state: Rc::new(RefCell::new(state)), sink, cfg }
    }
}

impl WriteFs for ZipWriteFs {
    fn create(&mut self, name: &str) -> Result<WriteStream> {
        let mut state = self.state.borrow_mut();
        if state.writer.is_none() {
            return Err(ArchiveError::Finalized { name: name.to_string() }.into());
        }
        state.open_entries += 1;
        Ok(WriteStream::closable(ZipEntry {
            state: Rc::clone(&self.state),
            name: name.to_string(),
            method: self.cfg.compression.method(),
            buf: Some(Vec::new()),
        }))
    }
}

impl Close for ZipWriteFs {
    fn close(&mut self) -> Result<()> {
        let (writer, open_entries) = {
            let mut state = self.state.borrow_mut();
            (state.writer.take(), state.open_entries)
        };
        let Some(mut writer) = writer else {
            return Ok(());
        };
        if open_entries > 0 {
            log::warn!("zip: finalizing with {} entr(ies) still open; they will be missing", open_entries);
        }

        writer.set_comment(self.cfg.comment.clone());
        let archive = writer.finish().map_err(ArchiveError::from)?.into_inner();
        log::debug!("zip: finalized archive ({} bytes)", archive.len());
        self.sink.write_all(&archive)?;
        self.sink.flush()?;
        Ok(())
    }
}

impl fmt::Debug for ZipWriteFs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("ZipWriteFs")
            .field("finalized", &state.writer.is_none())
            .field("open_entries", &state.open_entries)
            .finish()
    }
}

struct ZipEntry {
    state: Rc<RefCell<ZipState>>,
    name: String,
    method: CompressionMethod,
    // None once committed.
    buf: Option<Vec<u8>>,
}

impl Write for ZipEntry {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        match self.buf.as_mut() {
            Some(buf) => {
                buf.extend_from_slice(data);
                Ok(data.len())
            }
            None => Err(io::Error::from(ChainError::Closed)),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Close for ZipEntry {
    fn close(&mut self) -> Result<()> {
        let Some(data) = self.buf.take() else {
            return Ok(());
        };
        let mut state = self.state.borrow_mut();
        state.open_entries = state.open_entries.saturating_sub(1);
        let writer = state
            .writer
            .as_mut()
            .ok_or_else(|| ArchiveError::Finalized { name: self.name.clone() })?;

        let options = SimpleFileOptions::default().compression_method(self.method);
        writer.start_file(self.name.as_str(), options).map_err(ArchiveError::from)?;
        writer.write_all(&data)?;
        log::trace!("zip: committed '{}' ({} bytes)", self.name, data.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_from_json() {
        let cfg: ZipConfig = serde_json::from_str(r#"{"comment":"hi"}"#).unwrap();
        assert_eq!(cfg, ZipConfig::default().with_comment("hi"));
        assert_eq!(cfg.compression, ZipCompression::Deflated);
    }

    /// One stored entry "a" holding "hi" whose central directory record
    /// claims a zip64 uncompressed size of 2^63 bytes.
    fn archive_with_oversized_entry() -> Vec<u8> {
        let crc = crc32fast::hash(b"hi");
        let mut out = Vec::new();

        // Local file header + data.
        out.extend_from_slice(&0x0403_4b50u32.to_le_bytes());
        out.extend_from_slice(&45u16.to_le_bytes());
        out.extend_from_slice(&[0, 0, 0, 0, 0, 0]);
        out.extend_from_slice(&0x21u16.to_le_bytes());
        out.extend_from_slice(&crc.to_le_bytes());
        out.extend_from_slice(&2u32.to_le_bytes());
        out.extend_from_slice(&2u32.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(b"ahi");
        let cd_offset = out.len() as u32;

        // Central directory record with a zip64 extra field.
        out.extend_from_slice(&0x0201_4b50u32.to_le_bytes());
        out.extend_from_slice(&45u16.to_le_bytes());
        out.extend_from_slice(&45u16.to_le_bytes());
        out.extend_from_slice(&[0, 0, 0, 0, 0, 0]);
        out.extend_from_slice(&0x21u16.to_le_bytes());
        out.extend_from_slice(&crc.to_le_bytes());
        out.extend_from_slice(&2u32.to_le_bytes());
        out.extend_from_slice(&u32::MAX.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&12u16.to_le_bytes());
        out.extend_from_slice(&[0u8; 6]);
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.push(b'a');
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&8u16.to_le_bytes());
        out.extend_from_slice(&(1u64 << 63).to_le_bytes());
        let cd_len = out.len() as u32 - cd_offset;

        // End of central directory.
        out.extend_from_slice(&0x0605_4b50u32.to_le_bytes());
        out.extend_from_slice(&[0, 0, 0, 0]);
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&cd_len.to_le_bytes());
        out.extend_from_slice(&cd_offset.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out
    }

    #[test]
    fn declared_entry_size_is_not_trusted() {
        let open = ZipConfig::default().fs_reader();
        let mut fs = match open.open_fs(ReadStream::new(Cursor::new(archive_with_oversized_entry()))) {
            Ok(fs) => fs,
            // Rejecting the archive outright is fine too.
            Err(_) => return,
        };
        if let Ok(mut entry) = fs.open("a") {
            let mut data = Vec::new();
            entry.read_to_end(&mut data).unwrap();
            assert_eq!(data, b"hi");
        }
    }
}
