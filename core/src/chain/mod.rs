//! chain/mod.rs
//! Read and write chain builders.
//!
//! Composition order:
//! - Read chain `[A, B]` over source `S`: bytes flow `S -> A -> B -> caller`.
//!   Transforms run in the order they are added.
//! - Write chain `[A, B]` into sink `S`: bytes flow `caller -> A -> B -> S`.
//!   The sink is only known at build time, so transforms run in reverse and
//!   the first one added ends up outermost.

pub mod reader;
pub mod writer;

use crate::stream::{ReadStream, WriteStream};
use crate::types::Result;

pub use reader::{ChainReader, ReaderBuilder};
pub use writer::{ChainWriter, WriterBuilder};

/// Read-side codec step. Called once per chain it is applied to; layered
/// filesystems call it again for every entry they open.
pub trait ReadTransform {
    fn apply(&self, source: ReadStream) -> Result<ReadStream>;
}

impl<F> ReadTransform for F
where
    F: Fn(ReadStream) -> Result<ReadStream>,
{
    fn apply(&self, source: ReadStream) -> Result<ReadStream> {
        self(source)
    }
}

/// Write-side codec step: wraps the layer beneath it.
pub trait WriteTransform {
    fn apply(&self, sink: WriteStream) -> Result<WriteStream>;
}

impl<F> WriteTransform for F
where
    F: Fn(WriteStream) -> Result<WriteStream>,
{
    fn apply(&self, sink: WriteStream) -> Result<WriteStream> {
        self(sink)
    }
}
