//! codecs/lz4.rs
//! LZ4 frame-format layers. The frame format has no compression levels.

use std::io::Write;

use lz4_flex::frame::{FrameDecoder, FrameEncoder};

use crate::compression::types::{CompressionCodec, CompressionError};
use crate::stream::{Finish, FinishWriter, ReadStream, WriteStream};
use crate::types::Result;

pub fn writer(sink: WriteStream) -> WriteStream {
    WriteStream::closable(FinishWriter::new(FrameEncoder::new(sink)))
}

pub fn reader(source: ReadStream) -> ReadStream {
    ReadStream::new(FrameDecoder::new(source))
}

impl<W: Write> Finish for FrameEncoder<W> {
    fn finish_stream(self) -> Result<()> {
        let mut inner = self.finish().map_err(|e| CompressionError::process(CompressionCodec::Lz4, e))?;
        inner.flush()?;
        Ok(())
    }
}
