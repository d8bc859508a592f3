use std::cell::RefCell;
use std::io::{self, Read, Write};
use std::rc::Rc;

use crate::stream::Close;
use crate::types::Result;

/// Single-threaded handle to a registered layer.
///
/// One clone sits in the close stack, the other on the data path. Borrows
/// never overlap because layers are strictly nested: a layer only ever
/// calls into the layer beneath it.
pub(crate) struct Shared<T>(Rc<RefCell<T>>);

impl<T> Shared<T> {
    pub(crate) fn new(inner: T) -> Self {
        Shared(Rc::new(RefCell::new(inner)))
    }
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Shared(Rc::clone(&self.0))
    }
}

impl<T: Read> Read for Shared<T> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.0.borrow_mut().read(buf)
    }
}

impl<T: Write> Write for Shared<T> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.borrow_mut().flush()
    }
}

impl<T: Close> Close for Shared<T> {
    fn close(&mut self) -> Result<()> {
        self.0.borrow_mut().close()
    }
}
