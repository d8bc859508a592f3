//! codecs/zstd.rs
//! Zstd streaming layers.

use std::io::Write;

use ::zstd::stream::read::Decoder;
use ::zstd::stream::write::Encoder;

use crate::compression::types::{CompressionCodec, CompressionError};
use crate::stream::{Finish, FinishWriter, ReadStream, WriteStream};
use crate::types::Result;

pub fn writer(sink: WriteStream, level: i32) -> Result<WriteStream> {
    let encoder = Encoder::new(sink, level).map_err(|e| CompressionError::init(CompressionCodec::Zstd, e))?;
    Ok(WriteStream::closable(FinishWriter::new(encoder)))
}

pub fn reader(source: ReadStream) -> Result<ReadStream> {
    let decoder = Decoder::new(source).map_err(|e| CompressionError::init(CompressionCodec::Zstd, e))?;
    Ok(ReadStream::new(decoder))
}

impl<W: Write> Finish for Encoder<'static, W> {
    fn finish_stream(self) -> Result<()> {
        let mut inner = self.finish()?;
        inner.flush()?;
        Ok(())
    }
}
