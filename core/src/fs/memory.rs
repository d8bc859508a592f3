//! fs/memory.rs
//! In-memory filesystem. Clones share the same file table.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, Cursor, Write};
use std::rc::Rc;

use crate::fs::{ReadFs, WriteFs};
use crate::stream::{Close, ReadStream, WriteStream};
use crate::types::{ChainError, Result};

type Files = Rc<RefCell<BTreeMap<String, Vec<u8>>>>;

#[derive(Clone, Default)]
pub struct MemFs {
    files: Files,
}

impl MemFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<N: Into<String>, D: Into<Vec<u8>>>(&self, name: N, data: D) {
        self.files.borrow_mut().insert(name.into(), data.into());
    }

    pub fn get(&self, name: &str) -> Option<Vec<u8>> {
        self.files.borrow().get(name).cloned()
    }

    pub fn names(&self) -> Vec<String> {
        self.files.borrow().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.files.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.borrow().is_empty()
    }
}

impl fmt::Debug for MemFs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemFs").field("names", &self.names()).finish()
    }
}

impl ReadFs for MemFs {
    fn open(&mut self, name: &str) -> Result<ReadStream> {
        let data = self.get(name).ok_or_else(|| ChainError::NotFound { name: name.to_string() })?;
        Ok(ReadStream::new(Cursor::new(data)))
    }
}

impl WriteFs for MemFs {
    /// The entry becomes visible once its stream is closed.
    fn create(&mut self, name: &str) -> Result<WriteStream> {
        if name.is_empty() {
            return Err(ChainError::InvalidName { name: String::new(), reason: "empty name" });
        }
        Ok(WriteStream::closable(MemEntry {
            files: Rc::clone(&self.files),
            name: name.to_string(),
            buf: Some(Vec::new()),
        }))
    }
}

impl Close for MemFs {
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

struct MemEntry {
    files: Files,
    name: String,
    buf: Option<Vec<u8>>,
}

impl Write for MemEntry {
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

impl Close for MemEntry {
    fn close(&mut self) -> Result<()> {
        if let Some(buf) = self.buf.take() {
            log::trace!("mem fs: committed '{}' ({} bytes)", self.name, buf.len());
            self.files.borrow_mut().insert(self.name.clone(), buf);
        }
        Ok(())
    }
}
