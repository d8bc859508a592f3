#![allow(dead_code)]
//! Shared test doubles: recording layers, byte-mapping transforms and logging setup.

use std::cell::RefCell;
use std::io::{self, Cursor, Read, Write};
use std::rc::Rc;

use chain_core::prelude::*;
use thiserror::Error;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Error raised by a recording layer; the payload is the layer id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("layer {0} failed")]
pub struct LayerError(pub usize);

/// Error type no test layer ever raises.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("never raised")]
pub struct UnusedError;

/// Shared event log, e.g. `["open 1", "open 2", "close 2", "close 1"]`.
#[derive(Clone, Default)]
pub struct Recorder(Rc<RefCell<Vec<String>>>);

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: impl Into<String>) {
        self.0.borrow_mut().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    /// Events starting with `prefix`, e.g. only the closes.
    pub fn filtered(&self, prefix: &str) -> Vec<String> {
        self.0.borrow().iter().filter(|e| e.starts_with(prefix)).cloned().collect()
    }
}

/// Closable layer that records its release and can be told to fail it.
pub struct Tracked<T> {
    inner: T,
    id: usize,
    log: Recorder,
    fail_close: bool,
}

impl<T> Tracked<T> {
    pub fn new(inner: T, id: usize, log: &Recorder, fail_close: bool) -> Self {
        Self { inner, id, log: log.clone(), fail_close }
    }
}

impl<T: Read> Read for Tracked<T> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl<T: Write> Write for Tracked<T> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl<T> Close for Tracked<T> {
    fn close(&mut self) -> Result<()> {
        self.log.push(format!("close {}", self.id));
        if self.fail_close {
            return Err(ChainError::other(LayerError(self.id)));
        }
        Ok(())
    }
}

/// Closable in-memory source registered as layer `id`.
pub fn tracked_source(data: &[u8], id: usize, log: &Recorder, fail_close: bool) -> ReadStream {
    ReadStream::closable(Tracked::new(Cursor::new(data.to_vec()), id, log, fail_close))
}

/// Closable sink appending into `out`, registered as layer `id`.
pub fn tracked_sink(out: &SharedBuf, id: usize, log: &Recorder, fail_close: bool) -> WriteStream {
    WriteStream::closable(Tracked::new(out.clone(), id, log, fail_close))
}

pub fn tracked_read(id: usize, log: &Recorder, fail_close: bool) -> impl ReadTransform {
    let log = log.clone();
    move |source: ReadStream| -> Result<ReadStream> {
        log.push(format!("open {}", id));
        Ok(ReadStream::closable(Tracked::new(source, id, &log, fail_close)))
    }
}

pub fn tracked_write(id: usize, log: &Recorder, fail_close: bool) -> impl WriteTransform {
    let log = log.clone();
    move |sink: WriteStream| -> Result<WriteStream> {
        log.push(format!("open {}", id));
        Ok(WriteStream::closable(Tracked::new(sink, id, &log, fail_close)))
    }
}

pub fn failing_read(id: usize, log: &Recorder) -> impl ReadTransform {
    let log = log.clone();
    move |_source: ReadStream| -> Result<ReadStream> {
        log.push(format!("fail {}", id));
        Err(ChainError::other(LayerError(id)))
    }
}

pub fn failing_write(id: usize, log: &Recorder) -> impl WriteTransform {
    let log = log.clone();
    move |_sink: WriteStream| -> Result<WriteStream> {
        log.push(format!("fail {}", id));
        Err(ChainError::other(LayerError(id)))
    }
}

/// In-memory filesystem recording its own release as layer `id`; every
/// entry it opens is a closable layer `entry_id`.
pub struct TrackedFs {
    inner: MemFs,
    id: usize,
    entry_id: usize,
    log: Recorder,
}

impl TrackedFs {
    pub fn new(inner: MemFs, id: usize, entry_id: usize, log: &Recorder) -> Self {
        Self { inner, id, entry_id, log: log.clone() }
    }
}

impl ReadFs for TrackedFs {
    fn open(&mut self, name: &str) -> Result<ReadStream> {
        let raw = self.inner.open(name)?;
        self.log.push(format!("open {}", self.entry_id));
        Ok(ReadStream::closable(Tracked::new(raw, self.entry_id, &self.log, false)))
    }
}

impl Close for TrackedFs {
    fn close(&mut self) -> Result<()> {
        self.log.push(format!("close {}", self.id));
        Ok(())
    }
}

/// Plain reader layer applying `f` to every byte.
pub struct MapReader<R> {
    inner: R,
    f: fn(u8) -> u8,
}

impl<R: Read> Read for MapReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        for b in &mut buf[..n] {
            *b = (self.f)(*b);
        }
        Ok(n)
    }
}

/// Plain writer layer applying `f` to every byte.
pub struct MapWriter<W> {
    inner: W,
    f: fn(u8) -> u8,
}

impl<W: Write> Write for MapWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mapped: Vec<u8> = buf.iter().map(|b| (self.f)(*b)).collect();
        self.inner.write(&mapped)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

pub fn map_read(f: fn(u8) -> u8) -> impl ReadTransform {
    move |source: ReadStream| -> Result<ReadStream> { Ok(ReadStream::new(MapReader { inner: source, f })) }
}

pub fn map_write(f: fn(u8) -> u8) -> impl WriteTransform {
    move |sink: WriteStream| -> Result<WriteStream> { Ok(WriteStream::new(MapWriter { inner: sink, f })) }
}

pub fn to_upper(b: u8) -> u8 {
    b.to_ascii_uppercase()
}

pub fn to_lower(b: u8) -> u8 {
    b.to_ascii_lowercase()
}

pub fn remove_xyz(b: u8) -> u8 {
    if (b'x'..=b'z').contains(&b) {
        b'.'
    } else {
        b
    }
}

pub fn remove_abc(b: u8) -> u8 {
    if (b'A'..=b'C').contains(&b) {
        b'.'
    } else {
        b
    }
}

/// Cloneable in-memory sink whose contents stay readable after the chain owns it.
#[derive(Clone, Default)]
pub struct SharedBuf(Rc<RefCell<Vec<u8>>>);

impl SharedBuf {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bytes(&self) -> Vec<u8> {
        self.0.borrow().clone()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub fn read_all<R: Read>(mut reader: R) -> Vec<u8> {
    let mut out = Vec::new();
    reader.read_to_end(&mut out).expect("read to end");
    out
}
