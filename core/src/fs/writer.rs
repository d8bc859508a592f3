//! fs/writer.rs
//! Write-side filesystem layering.
//!
//! - `WriterBuilder::writing_to_fs(fs)`: every created entry goes through
//!   the write chain before reaching `fs`.
//! - `WriterBuilder::into_fs(interpret)`: the chain wraps the container
//!   stream as a whole; `then` adds transforms applied per entry.

use std::fmt;

use crate::chain::writer::build_writer;
use crate::chain::{ChainWriter, WriteTransform};
use crate::close::{rollback, CloseErrorStack, CloseStack};
use crate::fs::{WriteFs, WriteFsFromStream};
use crate::stream::{Close, WriteStream};
use crate::types::{ChainError, Result};

type Interpret = Box<dyn FnOnce(WriteStream) -> Result<Box<dyn WriteFs>>>;

/// Container filesystem awaiting its sink.
pub struct WriterFsBuilder {
    container: Vec<Box<dyn WriteTransform>>,
    per_entry: Vec<Box<dyn WriteTransform>>,
    interpret: Interpret,
}

impl WriterFsBuilder {
    /// Container written straight into the sink, with no stream transforms.
    pub fn new<I: WriteFsFromStream + 'static>(interpret: I) -> Self {
        Self::over_chain(Vec::new(), interpret)
    }

    pub(crate) fn over_chain<I>(container: Vec<Box<dyn WriteTransform>>, interpret: I) -> Self
    where
        I: WriteFsFromStream + 'static,
    {
        Self {
            container,
            per_entry: Vec::new(),
            interpret: Box::new(move |sink| interpret.open_fs(sink)),
        }
    }

    /// Adds a transform applied to every created entry, first-added outermost.
    pub fn then<T: WriteTransform + 'static>(mut self, next: T) -> Self {
        self.per_entry.push(Box::new(next));
        self
    }

    /// Builds the container chain over `sink` and interprets it. A failing
    /// interpreter releases the chain (and the sink) before returning.
    pub fn writing_to(self, sink: WriteStream) -> Result<ChainWriteFs> {
        let (head, stack) = build_writer(&self.container, sink)?.into_parts();
        match (self.interpret)(WriteStream::Plain(head)) {
            Ok(fs) => Ok(ChainWriteFs::new(fs, stack, self.per_entry)),
            Err(err) => {
                log::debug!("write fs: container interpretation failed: {}", err);
                Err(rollback(err, stack))
            }
        }
    }
}

impl fmt::Debug for WriterFsBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriterFsBuilder")
            .field("container", &self.container.len())
            .field("per_entry", &self.per_entry.len())
            .finish()
    }
}

/// Filesystem whose entries pass through a per-entry write chain.
pub struct ChainWriteFs {
    fs: Box<dyn WriteFs>,
    // Container stream chain; the container finalizes into it on close.
    stack: CloseStack,
    per_entry: Vec<Box<dyn WriteTransform>>,
    closed: bool,
}

impl ChainWriteFs {
    pub(crate) fn new(fs: Box<dyn WriteFs>, stack: CloseStack, per_entry: Vec<Box<dyn WriteTransform>>) -> Self {
        Self { fs, stack, per_entry, closed: false }
    }

    /// Creates `name` and returns the concrete chain writer.
    pub fn create_entry(&mut self, name: &str) -> Result<ChainWriter> {
        if self.closed {
            return Err(ChainError::Closed);
        }
        let raw = self.fs.create(name)?;
        log::debug!("write fs: created '{}' ({} per-entry layer(s))", name, self.per_entry.len());
        build_writer(&self.per_entry, raw)
    }
}

impl WriteFs for ChainWriteFs {
    fn create(&mut self, name: &str) -> Result<WriteStream> {
        self.create_entry(name).map(WriteStream::closable)
    }
}

impl Close for ChainWriteFs {
    /// Finalizes the container, then releases its stream chain outermost first.
    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        let mut errors = CloseErrorStack::new();
        if let Err(err) = self.fs.close() {
            errors.push(err);
        }
        if let Err(err) = self.stack.close() {
            errors.push(err);
        }
        errors.into_result()
    }
}

impl fmt::Debug for ChainWriteFs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainWriteFs")
            .field("stack", &self.stack)
            .field("per_entry", &self.per_entry.len())
            .field("closed", &self.closed)
            .finish()
    }
}
