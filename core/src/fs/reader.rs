//! fs/reader.rs
//! Read-side filesystem layering.
//!
//! Two ways in:
//! - `ReaderFsBuilder::reading_from_fs(fs)`: an existing filesystem.
//! - `ReaderBuilder::as_fs(interpret)`: a stream chain parsed as a container.
//!
//! Transforms added with `then` run on every entry opened afterwards, each
//! entry getting its own close stack.

use std::fmt;

use crate::chain::{ChainReader, ReadTransform, ReaderBuilder};
use crate::close::{rollback, CloseErrorStack, CloseStack};
use crate::fs::{ReadFs, ReadFsFromStream};
use crate::stream::{Close, ReadStream};
use crate::types::{ChainError, Result};

type Interpret = Box<dyn FnOnce(ReadStream) -> Result<Box<dyn ReadFs>>>;

enum Source {
    Fs(Box<dyn ReadFs>),
    Stream { chain: ReaderBuilder, interpret: Interpret },
}

pub struct ReaderFsBuilder {
    source: Source,
    per_entry: Vec<Box<dyn ReadTransform>>,
}

impl ReaderFsBuilder {
    pub fn reading_from_fs<F: ReadFs + 'static>(fs: F) -> Self {
        Self {
            source: Source::Fs(Box::new(fs)),
            per_entry: Vec::new(),
        }
    }

    pub(crate) fn over_stream<I>(chain: ReaderBuilder, interpret: I) -> Self
    where
        I: ReadFsFromStream + 'static,
    {
        Self {
            source: Source::Stream {
                chain,
                interpret: Box::new(move |source| interpret.open_fs(source)),
            },
            per_entry: Vec::new(),
        }
    }

    /// Adds a transform applied to every entry, in the order added.
    pub fn then<T: ReadTransform + 'static>(mut self, next: T) -> Self {
        self.per_entry.push(Box::new(next));
        self
    }

    pub fn finally<T: ReadTransform + 'static>(self, next: T) -> Result<ChainReadFs> {
        self.then(next).build()
    }

    /// Builds the filesystem. A failing container interpreter releases the
    /// stream chain beneath it before the error is returned.
    pub fn build(self) -> Result<ChainReadFs> {
        let (fs, stack) = match self.source {
            Source::Fs(fs) => (fs, CloseStack::new()),
            Source::Stream { chain, interpret } => {
                let (head, stack) = chain.into_parts()?;
                match interpret(ReadStream::Plain(head)) {
                    Ok(fs) => (fs, stack),
                    Err(err) => {
                        log::debug!("read fs: container interpretation failed: {}", err);
                        return Err(rollback(err, stack));
                    }
                }
            }
        };
        Ok(ChainReadFs::new(fs, stack, self.per_entry))
    }

    /// Builds the filesystem and opens `name` through the per-entry chain.
    ///
    /// The returned builder owns the whole filesystem: releasing the final
    /// stream closes the entry first, then the filesystem and everything
    /// it was built from.
    pub fn open(self, name: &str) -> ReaderBuilder {
        let mut fs = match self.build() {
            Ok(fs) => fs,
            Err(err) => return ReaderBuilder::poisoned(err),
        };

        match fs.open_entry(name) {
            Ok(entry) => {
                let mut stack = CloseStack::new();
                stack.register(Box::new(fs));
                let head = ReadStream::closable(entry).register(&mut stack);
                ReaderBuilder::from_parts(head, stack)
            }
            Err(err) => {
                let mut stack = CloseStack::new();
                stack.register(Box::new(fs));
                ReaderBuilder::poisoned(rollback(err, stack))
            }
        }
    }
}

impl fmt::Debug for ReaderFsBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source = match &self.source {
            Source::Fs(_) => "fs",
            Source::Stream { .. } => "stream",
        };
        f.debug_struct("ReaderFsBuilder")
            .field("source", &source)
            .field("per_entry", &self.per_entry.len())
            .finish()
    }
}

/// Filesystem whose entries pass through a per-entry read chain.
pub struct ChainReadFs {
    fs: Box<dyn ReadFs>,
    // Stream chain the container was parsed from; empty for a plain fs.
    stack: CloseStack,
    per_entry: Vec<Box<dyn ReadTransform>>,
    closed: bool,
}

impl ChainReadFs {
    pub(crate) fn new(fs: Box<dyn ReadFs>, stack: CloseStack, per_entry: Vec<Box<dyn ReadTransform>>) -> Self {
        Self { fs, stack, per_entry, closed: false }
    }

    /// Opens `name` and returns the concrete chain reader.
    pub fn open_entry(&mut self, name: &str) -> Result<ChainReader> {
        if self.closed {
            return Err(ChainError::Closed);
        }
        let raw = self.fs.open(name)?;
        log::debug!("read fs: opened '{}' ({} per-entry layer(s))", name, self.per_entry.len());

        self.per_entry
            .iter()
            .fold(ReaderBuilder::reading_from(raw), |chain, next| chain.then_dyn(next.as_ref()))
            .build()
    }
}

impl ReadFs for ChainReadFs {
    fn open(&mut self, name: &str) -> Result<ReadStream> {
        self.open_entry(name).map(ReadStream::closable)
    }
}

impl Close for ChainReadFs {
    /// Closes the container, then the stream chain it was parsed from.
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

impl fmt::Debug for ChainReadFs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainReadFs")
            .field("stack", &self.stack)
            .field("per_entry", &self.per_entry.len())
            .field("closed", &self.closed)
            .finish()
    }
}
