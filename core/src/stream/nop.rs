use std::io::{self, Read, Write};

use crate::stream::Close;
use crate::types::Result;

/// Adapter giving a plain reader or writer a release operation that does nothing.
///
/// Useful when an API hands out closable streams but the underlying object
/// (an in-memory buffer, a borrowed handle) owns nothing to release.
#[derive(Debug, Default, Clone)]
pub struct NopCloser<T>(pub T);

impl<T> NopCloser<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: Read> Read for NopCloser<T> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.0.read(buf)
    }
}

impl<T: Write> Write for NopCloser<T> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}

impl<T> Close for NopCloser<T> {
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}
