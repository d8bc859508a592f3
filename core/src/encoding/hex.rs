//! encoding/hex.rs
//! Streaming lowercase hex layers.

use std::io::{self, Read, Write};

use crate::chain::{ReadTransform, WriteTransform};
use crate::encoding::EncodingError;
use crate::stream::{ReadStream, WriteStream};
use crate::types::{io_error, Result};

/// Hex encoding; stateless, so both sides are plain layers.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Hex;

impl Hex {
    pub fn encode(&self) -> impl WriteTransform {
        |sink: WriteStream| -> Result<WriteStream> { Ok(WriteStream::new(HexWriter::new(sink))) }
    }

    pub fn decode(&self) -> impl ReadTransform {
        |source: ReadStream| -> Result<ReadStream> { Ok(ReadStream::new(HexReader::new(source))) }
    }
}

pub struct HexWriter<W> {
    inner: W,
    scratch: Vec<u8>,
}

impl<W: Write> HexWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, scratch: Vec::new() }
    }
}

impl<W: Write> Write for HexWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.scratch.resize(buf.len() * 2, 0);
        // Output is exactly twice the input, so this cannot fail.
        ::hex::encode_to_slice(buf, &mut self.scratch).map_err(|e| io_error(EncodingError::Hex(e)))?;
        self.inner.write_all(&self.scratch)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Decodes hex digits from `inner`. Digit pairs may straddle reads; a
/// dangling digit at end of input is an error.
pub struct HexReader<R> {
    inner: R,
    pending: Option<u8>,
    scratch: Vec<u8>,
}

impl<R: Read> HexReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, pending: None, scratch: Vec::new() }
    }
}

impl<R: Read> Read for HexReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        loop {
            let carried = usize::from(self.pending.is_some());
            self.scratch.clear();
            if let Some(digit) = self.pending.take() {
                self.scratch.push(digit);
            }
            self.scratch.resize(buf.len() * 2, 0);

            let n = self.inner.read(&mut self.scratch[carried..])?;
            if n == 0 {
                if carried == 1 {
                    return Err(io_error(EncodingError::OddLength));
                }
                return Ok(0);
            }

            let digits = carried + n;
            let pairs = digits / 2;
            if digits % 2 == 1 {
                self.pending = Some(self.scratch[digits - 1]);
            }
            if pairs > 0 {
                ::hex::decode_to_slice(&self.scratch[..pairs * 2], &mut buf[..pairs])
                    .map_err(|e| io_error(EncodingError::Hex(e)))?;
                return Ok(pairs);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Reader returning at most `step` bytes per call.
    struct Trickle<R>(R, usize);

    impl<R: Read> Read for Trickle<R> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = buf.len().min(self.1);
            self.0.read(&mut buf[..n])
        }
    }

    #[test]
    fn decodes_across_odd_boundaries() {
        let encoded = ::hex::encode(b"boundary straddling input");
        let mut reader = HexReader::new(Trickle(Cursor::new(encoded.into_bytes()), 3));
        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"boundary straddling input");
    }

    #[test]
    fn dangling_digit_is_an_error() {
        let mut reader = HexReader::new(Cursor::new(b"abc".to_vec()));
        let mut out = Vec::new();
        let err = reader.read_to_end(&mut out).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn writer_emits_lowercase_pairs() {
        let mut out = Vec::new();
        HexWriter::new(&mut out).write_all(&[0xde, 0xad, 0x01]).unwrap();
        assert_eq!(out, b"dead01");
    }
}
