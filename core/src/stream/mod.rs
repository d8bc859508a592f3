//! stream/mod.rs
//! Stream capabilities handed between transforms.
//!
//! Design notes:
//! - A stream is a data-transfer primitive (`Read` or `Write`) tagged with
//!   whether it also carries a release operation (`Close`).
//! - The tag is resolved once, when a builder registers the stream in its
//!   close stack; nothing downstream re-inspects it.
//! - After registration the next transform only sees a `Plain` handle, so a
//!   layer can never release the layer beneath it.

pub mod finish;
pub mod nop;
mod shared;

use std::fmt;
use std::io::{self, Read, Write};

use crate::close::CloseStack;
use crate::types::Result;

pub use finish::{Finish, FinishWriter};
pub use nop::NopCloser;
pub(crate) use shared::Shared;

/// Release operation of a stream, filesystem or other acquired resource.
pub trait Close {
    fn close(&mut self) -> Result<()>;
}

impl<T: Close + ?Sized> Close for Box<T> {
    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}

pub trait ReadCloser: Read + Close {}
impl<T: Read + Close + ?Sized> ReadCloser for T {}

pub trait WriteCloser: Write + Close {}
impl<T: Write + Close + ?Sized> WriteCloser for T {}

/// Readable stream paired with its optional release capability.
pub enum ReadStream {
    Plain(Box<dyn Read>),
    Closable(Box<dyn ReadCloser>),
}

impl ReadStream {
    /// Stream with nothing to release.
    pub fn new<R: Read + 'static>(reader: R) -> Self {
        ReadStream::Plain(Box::new(reader))
    }

    /// Stream whose `close` must run once the chain is released.
    pub fn closable<R: Read + Close + 'static>(reader: R) -> Self {
        ReadStream::Closable(Box::new(reader))
    }

    pub fn is_closable(&self) -> bool {
        matches!(self, ReadStream::Closable(_))
    }

    /// Moves the release capability (if any) into `stack` and returns the
    /// plain handle that stays on the data path.
    pub(crate) fn register(self, stack: &mut CloseStack) -> Box<dyn Read> {
        match self {
            ReadStream::Plain(reader) => reader,
            ReadStream::Closable(reader) => {
                let shared = Shared::new(reader);
                stack.register(Box::new(shared.clone()));
                Box::new(shared)
            }
        }
    }
}

impl Read for ReadStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            ReadStream::Plain(reader) => reader.read(buf),
            ReadStream::Closable(reader) => reader.read(buf),
        }
    }
}

impl fmt::Debug for ReadStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadStream::Plain(_) => f.write_str("ReadStream::Plain"),
            ReadStream::Closable(_) => f.write_str("ReadStream::Closable"),
        }
    }
}

/// Writable stream paired with its optional release capability.
pub enum WriteStream {
    Plain(Box<dyn Write>),
    Closable(Box<dyn WriteCloser>),
}

impl WriteStream {
    pub fn new<W: Write + 'static>(writer: W) -> Self {
        WriteStream::Plain(Box::new(writer))
    }

    pub fn closable<W: Write + Close + 'static>(writer: W) -> Self {
        WriteStream::Closable(Box::new(writer))
    }

    pub fn is_closable(&self) -> bool {
        matches!(self, WriteStream::Closable(_))
    }

    pub(crate) fn register(self, stack: &mut CloseStack) -> Box<dyn Write> {
        match self {
            WriteStream::Plain(writer) => writer,
            WriteStream::Closable(writer) => {
                let shared = Shared::new(writer);
                stack.register(Box::new(shared.clone()));
                Box::new(shared)
            }
        }
    }
}

impl Write for WriteStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            WriteStream::Plain(writer) => writer.write(buf),
            WriteStream::Closable(writer) => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            WriteStream::Plain(writer) => writer.flush(),
            WriteStream::Closable(writer) => writer.flush(),
        }
    }
}

impl fmt::Debug for WriteStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteStream::Plain(_) => f.write_str("WriteStream::Plain"),
            WriteStream::Closable(_) => f.write_str("WriteStream::Closable"),
        }
    }
}
