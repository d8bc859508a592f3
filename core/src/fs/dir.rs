//! fs/dir.rs
//! Host directory exposed as a filesystem.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::fs::{ReadFs, WriteFs};
use crate::stream::{Close, ReadStream, WriteStream};
use crate::types::{ChainError, Result};

/// Directory on the host filesystem; entry names are relative paths under `root`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirFs {
    root: PathBuf,
}

impl DirFs {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves `name` under the root, refusing anything that could escape it.
    fn resolve(&self, name: &str) -> Result<PathBuf> {
        let invalid = |reason| ChainError::InvalidName { name: name.to_string(), reason };

        let mut path = self.root.clone();
        let mut depth = 0usize;
        for component in Path::new(name).components() {
            match component {
                Component::Normal(part) => {
                    path.push(part);
                    depth += 1;
                }
                Component::CurDir => {}
                Component::ParentDir => return Err(invalid("parent directory components are not allowed")),
                Component::RootDir | Component::Prefix(_) => return Err(invalid("absolute paths are not allowed")),
            }
        }
        if depth == 0 {
            return Err(invalid("empty name"));
        }
        Ok(path)
    }
}

impl ReadFs for DirFs {
    fn open(&mut self, name: &str) -> Result<ReadStream> {
        let path = self.resolve(name)?;
        let file = File::open(&path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => ChainError::NotFound { name: name.to_string() },
            _ => ChainError::Io(err),
        })?;
        log::debug!("dir fs: opened {}", path.display());
        Ok(ReadStream::closable(DirEntry::new(file)))
    }
}

impl WriteFs for DirFs {
    fn create(&mut self, name: &str) -> Result<WriteStream> {
        let path = self.resolve(name)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(&path)?;
        log::debug!("dir fs: created {}", path.display());
        Ok(WriteStream::closable(DirEntry::new(file)))
    }
}

impl Close for DirFs {
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Open host file; close flushes and drops the handle.
struct DirEntry {
    file: Option<File>,
}

impl DirEntry {
    fn new(file: File) -> Self {
        Self { file: Some(file) }
    }

    fn file(&mut self) -> io::Result<&mut File> {
        self.file.as_mut().ok_or_else(|| io::Error::from(ChainError::Closed))
    }
}

impl Read for DirEntry {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file()?.read(buf)
    }
}

impl Write for DirEntry {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file()?.flush()
    }
}

impl Close for DirEntry {
    fn close(&mut self) -> Result<()> {
        match self.file.take() {
            Some(mut file) => {
                file.flush()?;
                Ok(())
            }
            None => Ok(()),
        }
    }
}
