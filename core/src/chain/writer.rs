//! chain/writer.rs
//! Lazy write-chain builder.
//!
//! Transforms are only recorded until `writing_to` supplies the sink; the
//! build then wraps the sink with the last-added transform first, so the
//! first-added transform is the one callers write into.

use std::fmt;
use std::io::{self, Write};

use crate::chain::WriteTransform;
use crate::close::{rollback, CloseStack};
use crate::fs::{ChainWriteFs, WriteFs, WriteFsFromStream, WriterFsBuilder};
use crate::stream::{Close, WriteStream};
use crate::types::Result;

/// Ordered write transforms awaiting a sink. Holds at least one transform.
pub struct WriterBuilder {
    transforms: Vec<Box<dyn WriteTransform>>,
}

impl WriterBuilder {
    pub fn new<T: WriteTransform + 'static>(first: T) -> Self {
        Self {
            transforms: vec![Box::new(first)],
        }
    }

    /// Appends `next` beneath the transforms already added.
    pub fn then<T: WriteTransform + 'static>(mut self, next: T) -> Self {
        self.transforms.push(Box::new(next));
        self
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    /// Builds the chain over `sink`. On failure every layer acquired so far,
    /// the sink included, is released before the error is returned.
    pub fn writing_to(self, sink: WriteStream) -> Result<ChainWriter> {
        build_writer(&self.transforms, sink)
    }

    /// Applies this chain to every entry created in `fs`.
    pub fn writing_to_fs<F>(self, fs: F) -> ChainWriteFs
    where
        F: WriteFs + 'static,
    {
        ChainWriteFs::new(Box::new(fs), CloseStack::new(), self.transforms)
    }

    /// Interprets the chain's output as a container filesystem; the chain
    /// applies to the container stream as a whole.
    pub fn into_fs<I>(self, interpret: I) -> WriterFsBuilder
    where
        I: WriteFsFromStream + 'static,
    {
        WriterFsBuilder::over_chain(self.transforms, interpret)
    }
}

impl fmt::Debug for WriterBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriterBuilder").field("transforms", &self.transforms.len()).finish()
    }
}

/// Wraps `sink` in `transforms`, applying them last-to-first.
pub(crate) fn build_writer(transforms: &[Box<dyn WriteTransform>], sink: WriteStream) -> Result<ChainWriter> {
    let mut stack = CloseStack::new();
    let mut head = sink.register(&mut stack);

    for (index, transform) in transforms.iter().enumerate().rev() {
        match transform.apply(WriteStream::Plain(head)) {
            Ok(stream) => {
                log::trace!("write chain: layer {} applied (closable: {})", index + 1, stream.is_closable());
                head = stream.register(&mut stack);
            }
            Err(err) => {
                log::debug!("write chain: layer {} failed: {}", index + 1, err);
                return Err(rollback(err, stack));
            }
        }
    }

    log::debug!("write chain: built {} layer(s), {} closable", transforms.len(), stack.len());
    Ok(ChainWriter { head, stack })
}

/// Fully assembled write chain; owns every closable layer beneath it.
pub struct ChainWriter {
    head: Box<dyn Write>,
    stack: CloseStack,
}

impl ChainWriter {
    pub fn closable_layers(&self) -> usize {
        self.stack.len()
    }

    pub(crate) fn into_parts(self) -> (Box<dyn Write>, CloseStack) {
        (self.head, self.stack)
    }
}

impl Write for ChainWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.head.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.head.flush()
    }
}

impl Close for ChainWriter {
    /// Releases layers outermost first, so each encoder flushes its
    /// trailer into layers that are still open.
    fn close(&mut self) -> Result<()> {
        self.stack.close()
    }
}

impl fmt::Debug for ChainWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainWriter").field("stack", &self.stack).finish()
    }
}
