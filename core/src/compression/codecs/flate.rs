//! codecs/flate.rs
//! Gzip and zlib layers over flate2's streaming encoders.

use std::io::Write;

use flate2::read::{MultiGzDecoder, ZlibDecoder};
use flate2::write::{GzEncoder, ZlibEncoder};
use flate2::Compression;

use crate::compression::types::{CompressionCodec, CompressionError};
use crate::stream::{Finish, FinishWriter, ReadStream, WriteStream};
use crate::types::Result;

pub fn gzip_writer(sink: WriteStream, level: i32) -> WriteStream {
    WriteStream::closable(FinishWriter::new(GzEncoder::new(sink, flate_level(level))))
}

/// Parses the gzip header before returning, so a non-gzip source fails
/// the chain build instead of the first read. Concatenated members are
/// decoded as one stream.
pub fn gzip_reader(source: ReadStream) -> Result<ReadStream> {
    let decoder = MultiGzDecoder::new(source);
    if decoder.header().is_none() {
        return Err(CompressionError::InvalidHeader {
            codec: CompressionCodec::Gzip,
            msg: "missing or malformed gzip header".into(),
        }
        .into());
    }
    Ok(ReadStream::new(decoder))
}

pub fn zlib_writer(sink: WriteStream, level: i32) -> WriteStream {
    WriteStream::closable(FinishWriter::new(ZlibEncoder::new(sink, flate_level(level))))
}

pub fn zlib_reader(source: ReadStream) -> ReadStream {
    ReadStream::new(ZlibDecoder::new(source))
}

fn flate_level(level: i32) -> Compression {
    // Range already checked by the registry.
    Compression::new(level.clamp(0, 9) as u32)
}

impl<W: Write> Finish for GzEncoder<W> {
    fn finish_stream(self) -> Result<()> {
        let mut inner = self.finish()?;
        inner.flush()?;
        Ok(())
    }
}

impl<W: Write> Finish for ZlibEncoder<W> {
    fn finish_stream(self) -> Result<()> {
        let mut inner = self.finish()?;
        inner.flush()?;
        Ok(())
    }
}
