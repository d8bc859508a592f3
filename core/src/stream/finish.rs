//! stream/finish.rs
//! Closable write layer for encoders that emit a trailer when finished.
//!
//! Compressors and the base64 encoder buffer state that only reaches the
//! next layer when they are finished. `FinishWriter` turns that one-shot
//! finish into the layer's `close`.

use std::io::{self, Write};

use crate::stream::Close;
use crate::types::{io_error, ChainError, Result};

/// Encoder that must be finished to flush its trailer into the inner writer.
pub trait Finish: Write {
    fn finish_stream(self) -> Result<()>;
}

pub struct FinishWriter<E> {
    // None once finished; later writes fail with `Closed`.
    encoder: Option<E>,
}

impl<E: Finish> FinishWriter<E> {
    pub fn new(encoder: E) -> Self {
        Self { encoder: Some(encoder) }
    }

    pub fn is_finished(&self) -> bool {
        self.encoder.is_none()
    }
}

impl<E: Finish> Write for FinishWriter<E> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.encoder.as_mut() {
            Some(encoder) => encoder.write(buf),
            None => Err(io_error(ChainError::Closed)),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.encoder.as_mut() {
            Some(encoder) => encoder.flush(),
            None => Ok(()),
        }
    }
}

impl<E: Finish> Close for FinishWriter<E> {
    fn close(&mut self) -> Result<()> {
        match self.encoder.take() {
            Some(encoder) => encoder.finish_stream(),
            None => Ok(()),
        }
    }
}
