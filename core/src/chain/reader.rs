//! chain/reader.rs
//! Eager read-chain builder.
//!
//! Each `then` runs its transform immediately against the current head.
//! The first failure poisons the builder: everything acquired so far is
//! released right away and later steps only carry the error forward.

use std::fmt;
use std::io::{self, Read};

use crate::chain::ReadTransform;
use crate::close::{rollback, CloseStack};
use crate::fs::{ReadFsFromStream, ReaderFsBuilder};
use crate::stream::{Close, ReadStream};
use crate::types::{ChainError, Result};

enum State {
    Live {
        head: Box<dyn Read>,
        stack: CloseStack,
        depth: usize,
    },
    Poisoned(ChainError),
}

/// Builds a chain of readers, outermost last.
pub struct ReaderBuilder {
    state: State,
}

impl ReaderBuilder {
    /// Seeds a chain with `source`; a closable source is released last.
    pub fn reading_from(source: ReadStream) -> Self {
        let mut stack = CloseStack::new();
        let head = source.register(&mut stack);
        Self {
            state: State::Live { head, stack, depth: 0 },
        }
    }

    /// Continues a chain whose stack already owns resources beneath `head`.
    pub(crate) fn from_parts(head: Box<dyn Read>, stack: CloseStack) -> Self {
        Self {
            state: State::Live { head, stack, depth: 0 },
        }
    }

    pub(crate) fn poisoned(err: ChainError) -> Self {
        Self { state: State::Poisoned(err) }
    }

    pub fn is_poisoned(&self) -> bool {
        matches!(self.state, State::Poisoned(_))
    }

    /// Applies `next` to the current head.
    pub fn then<T: ReadTransform>(self, next: T) -> Self {
        self.then_dyn(&next)
    }

    pub(crate) fn then_dyn(self, next: &dyn ReadTransform) -> Self {
        let state = match self.state {
            State::Poisoned(err) => State::Poisoned(err),
            State::Live { head, mut stack, depth } => match next.apply(ReadStream::Plain(head)) {
                Ok(stream) => {
                    let closable = stream.is_closable();
                    let head = stream.register(&mut stack);
                    log::trace!("read chain: layer {} applied (closable: {})", depth + 1, closable);
                    State::Live { head, stack, depth: depth + 1 }
                }
                Err(err) => {
                    log::debug!("read chain: layer {} failed: {}", depth + 1, err);
                    State::Poisoned(rollback(err, stack))
                }
            },
        };
        Self { state }
    }

    /// Applies `next` and hands the finished chain to the caller.
    pub fn finally<T: ReadTransform>(self, next: T) -> Result<ChainReader> {
        self.then(next).build()
    }

    /// Finishes the chain with the transforms applied so far.
    pub fn build(self) -> Result<ChainReader> {
        let (head, stack) = self.into_parts()?;
        Ok(ChainReader { head, stack })
    }

    /// Interprets the chain's output as a container filesystem.
    pub fn as_fs<I>(self, interpret: I) -> ReaderFsBuilder
    where
        I: ReadFsFromStream + 'static,
    {
        ReaderFsBuilder::over_stream(self, interpret)
    }

    pub(crate) fn into_parts(self) -> Result<(Box<dyn Read>, CloseStack)> {
        match self.state {
            State::Live { head, stack, depth } => {
                log::debug!("read chain: built {} layer(s), {} closable", depth, stack.len());
                Ok((head, stack))
            }
            State::Poisoned(err) => Err(err),
        }
    }
}

impl fmt::Debug for ReaderBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            State::Live { stack, depth, .. } => f
                .debug_struct("ReaderBuilder")
                .field("depth", depth)
                .field("stack", stack)
                .finish(),
            State::Poisoned(err) => f.debug_tuple("ReaderBuilder::Poisoned").field(err).finish(),
        }
    }
}

/// Fully assembled read chain; owns every closable layer beneath it.
pub struct ChainReader {
    head: Box<dyn Read>,
    stack: CloseStack,
}

impl ChainReader {
    /// Number of registered closable layers still awaiting release.
    pub fn closable_layers(&self) -> usize {
        self.stack.len()
    }
}

impl Read for ChainReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.head.read(buf)
    }
}

impl Close for ChainReader {
    fn close(&mut self) -> Result<()> {
        self.stack.close()
    }
}

impl fmt::Debug for ChainReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainReader").field("stack", &self.stack).finish()
    }
}
