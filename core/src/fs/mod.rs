//! fs/mod.rs
//! Filesystem capabilities and filesystem layering.
//!
//! A filesystem hands out named entry streams and owns whatever it needed
//! to build its view (for a container: the stream chain it was parsed
//! from). Closing a filesystem releases those resources only: entry streams
//! already handed out stay open and remain the caller's to close.

pub mod dir;
pub mod memory;
pub mod reader;
pub mod writer;

use crate::stream::{Close, ReadStream, WriteStream};
use crate::types::Result;

pub use dir::DirFs;
pub use memory::MemFs;
pub use reader::{ChainReadFs, ReaderFsBuilder};
pub use writer::{ChainWriteFs, WriterFsBuilder};

/// Readable named-entry container.
pub trait ReadFs: Close {
    fn open(&mut self, name: &str) -> Result<ReadStream>;
}

/// Writable named-entry container.
pub trait WriteFs: Close {
    fn create(&mut self, name: &str) -> Result<WriteStream>;
}

impl<T: ReadFs + ?Sized> ReadFs for Box<T> {
    fn open(&mut self, name: &str) -> Result<ReadStream> {
        (**self).open(name)
    }
}

impl<T: WriteFs + ?Sized> WriteFs for Box<T> {
    fn create(&mut self, name: &str) -> Result<WriteStream> {
        (**self).create(name)
    }
}

/// Interprets a readable stream as a container filesystem.
pub trait ReadFsFromStream {
    fn open_fs(self, source: ReadStream) -> Result<Box<dyn ReadFs>>;
}

impl<F> ReadFsFromStream for F
where
    F: FnOnce(ReadStream) -> Result<Box<dyn ReadFs>>,
{
    fn open_fs(self, source: ReadStream) -> Result<Box<dyn ReadFs>> {
        self(source)
    }
}

/// Interprets a writable stream as a container filesystem.
pub trait WriteFsFromStream {
    fn open_fs(self, sink: WriteStream) -> Result<Box<dyn WriteFs>>;
}

impl<F> WriteFsFromStream for F
where
    F: FnOnce(WriteStream) -> Result<Box<dyn WriteFs>>,
{
    fn open_fs(self, sink: WriteStream) -> Result<Box<dyn WriteFs>> {
        self(sink)
    }
}
