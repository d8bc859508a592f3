//! checksum/crc32.rs
//! CRC32 trailer: the writer appends a little-endian CRC32 of the payload
//! on close; the reader strips and verifies it at end of stream.

use std::io::{self, Read, Write};

use crc32fast::Hasher;

use crate::chain::{ReadTransform, WriteTransform};
use crate::checksum::ChecksumError;
use crate::constants::CRC32_TRAILER_LEN;
use crate::stream::{Close, ReadStream, WriteStream};
use crate::types::{io_error, ChainError, Result};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Crc32;

impl Crc32 {
    pub fn append(&self) -> impl WriteTransform {
        |sink: WriteStream| -> Result<WriteStream> { Ok(WriteStream::closable(Crc32Writer::new(sink))) }
    }

    pub fn verify(&self) -> impl ReadTransform {
        |source: ReadStream| -> Result<ReadStream> { Ok(ReadStream::new(Crc32Reader::new(source))) }
    }
}

pub struct Crc32Writer<W> {
    inner: W,
    // None once the trailer has been written.
    hasher: Option<Hasher>,
}

impl<W: Write> Crc32Writer<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, hasher: Some(Hasher::new()) }
    }
}

impl<W: Write> Write for Crc32Writer<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let hasher = self.hasher.as_mut().ok_or_else(|| io_error(ChainError::Closed))?;
        let n = self.inner.write(buf)?;
        hasher.update(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl<W: Write> Close for Crc32Writer<W> {
    fn close(&mut self) -> Result<()> {
        if let Some(hasher) = self.hasher.take() {
            let crc = hasher.finalize();
            log::trace!("crc32: writing trailer {:#010x}", crc);
            self.inner.write_all(&crc.to_le_bytes())?;
            self.inner.flush()?;
        }
        Ok(())
    }
}

/// Passes payload bytes through while holding back the last four, which
/// are checked against the running CRC once the source is exhausted.
pub struct Crc32Reader<R> {
    inner: R,
    hasher: Hasher,
    tail: Vec<u8>,
    // Set once the source is exhausted; a failed check is replayed on every later read.
    outcome: Option<std::result::Result<(), ChecksumError>>,
}

impl<R: Read> Crc32Reader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            hasher: Hasher::new(),
            tail: Vec::with_capacity(CRC32_TRAILER_LEN * 2),
            outcome: None,
        }
    }

    fn check_trailer(&self) -> std::result::Result<(), ChecksumError> {
        let trailer: [u8; CRC32_TRAILER_LEN] =
            self.tail.as_slice().try_into().map_err(|_| ChecksumError::Truncated)?;
        let expected = u32::from_le_bytes(trailer);
        let actual = self.hasher.clone().finalize();
        if expected != actual {
            return Err(ChecksumError::Mismatch { expected, actual });
        }
        Ok(())
    }

    fn finish(&mut self) -> io::Result<usize> {
        if self.outcome.is_none() {
            self.outcome = Some(self.check_trailer());
        }
        match &self.outcome {
            Some(Err(err)) => Err(io_error(err.clone())),
            _ => Ok(0),
        }
    }
}

impl<R: Read> Read for Crc32Reader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.outcome.is_some() {
            return self.finish();
        }
        if buf.is_empty() {
            return Ok(0);
        }
        loop {
            // Release everything beyond the trailer-sized tail.
            if self.tail.len() > CRC32_TRAILER_LEN {
                let ready = (self.tail.len() - CRC32_TRAILER_LEN).min(buf.len());
                buf[..ready].copy_from_slice(&self.tail[..ready]);
                self.tail.drain(..ready);
                self.hasher.update(&buf[..ready]);
                return Ok(ready);
            }

            let mut chunk = [0u8; 8 * 1024];
            let want = chunk.len().min(buf.len() + CRC32_TRAILER_LEN);
            let n = self.inner.read(&mut chunk[..want])?;
            if n == 0 {
                return self.finish();
            }
            self.tail.extend_from_slice(&chunk[..n]);
        }
    }
}
