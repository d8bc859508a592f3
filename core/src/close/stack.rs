use std::fmt;

use crate::close::CloseErrorStack;
use crate::stream::Close;
use crate::types::{ChainError, Result};

/// Ordered list of acquired layers, released last-to-first.
///
/// `close` drains the list, so releasing twice never touches a layer twice.
#[derive(Default)]
pub struct CloseStack {
    layers: Vec<Box<dyn Close>>,
}

impl CloseStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, layer: Box<dyn Close>) {
        self.layers.push(layer);
        log::trace!("close stack: registered layer {}", self.layers.len());
    }

    /// Registers a release closure that runs at most once.
    pub fn push_fn<F>(&mut self, release: F)
    where
        F: FnOnce() -> Result<()> + 'static,
    {
        self.register(Box::new(CloseFn(Some(release))));
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Releases every layer from most recently to least recently registered.
    ///
    /// Returns the lone error when one layer fails and a `CloseErrorStack`
    /// (in release order) when several do.
    pub fn close(&mut self) -> Result<()> {
        let layers = std::mem::take(&mut self.layers);
        if layers.is_empty() {
            return Ok(());
        }
        log::debug!("close stack: releasing {} layer(s)", layers.len());

        let mut errors = CloseErrorStack::new();
        for (index, mut layer) in layers.into_iter().enumerate().rev() {
            if let Err(err) = layer.close() {
                log::debug!("close stack: layer {} failed to release: {}", index + 1, err);
                errors.push(err);
            }
        }
        errors.into_result()
    }

    /// Consuming form of `close`.
    pub fn unwind(mut self) -> Result<()> {
        self.close()
    }
}

impl Close for CloseStack {
    fn close(&mut self) -> Result<()> {
        CloseStack::close(self)
    }
}

impl Drop for CloseStack {
    fn drop(&mut self) {
        if !self.layers.is_empty() {
            log::warn!("close stack dropped with {} unreleased layer(s)", self.layers.len());
        }
    }
}

impl fmt::Debug for CloseStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloseStack").field("layers", &self.layers.len()).finish()
    }
}

struct CloseFn<F>(Option<F>);

impl<F: FnOnce() -> Result<()>> Close for CloseFn<F> {
    fn close(&mut self) -> Result<()> {
        match self.0.take() {
            Some(release) => release(),
            None => Ok(()),
        }
    }
}

/// Unwinds `stack` after a construction failure and hands `err` back.
///
/// The construction error always wins; release failures met during the
/// unwind are logged and dropped.
pub(crate) fn rollback(err: ChainError, stack: CloseStack) -> ChainError {
    if stack.is_empty() {
        return err;
    }
    log::debug!("rolling back {} layer(s) after: {}", stack.len(), err);
    if let Err(secondary) = stack.unwind() {
        log::warn!("discarding release failure during rollback: {}", secondary);
    }
    err
}
