use std::error::Error as StdError;
use std::fmt;

use crate::types::{ChainError, Result};

/// Release failures in the order they were encountered (reverse acquisition order).
#[derive(Debug, Default)]
pub struct CloseErrorStack {
    errors: Vec<ChainError>,
}

impl CloseErrorStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a failure. Nested aggregates are flattened so the stack
    /// always lists leaf errors.
    pub fn push(&mut self, err: ChainError) {
        match err {
            ChainError::Close(nested) => self.errors.extend(nested.errors),
            leaf => self.errors.push(leaf),
        }
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ChainError] {
        &self.errors
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChainError> {
        self.errors.iter()
    }

    pub fn into_inner(self) -> Vec<ChainError> {
        self.errors
    }

    pub fn any<F: Fn(&ChainError) -> bool>(&self, pred: F) -> bool {
        self.errors.iter().any(|e| e.any_by(&pred))
    }

    /// First underlying error of type `T`, checking every element.
    pub fn find<T: StdError + 'static>(&self) -> Option<&T> {
        self.errors.iter().find_map(|e| e.find::<T>())
    }

    /// True when any element holds an error equal to `target`.
    pub fn contains<T: StdError + PartialEq + 'static>(&self, target: &T) -> bool {
        self.errors.iter().any(|e| e.contains(target))
    }

    /// Collapses to `Ok` when empty, the lone error when there is exactly
    /// one, and the aggregate otherwise.
    pub fn into_result(mut self) -> Result<()> {
        if self.errors.len() > 1 {
            return Err(ChainError::Close(self));
        }
        match self.errors.pop() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl fmt::Display for CloseErrorStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", err)?;
        }
        f.write_str("]")
    }
}

impl StdError for CloseErrorStack {}

impl IntoIterator for CloseErrorStack {
    type Item = ChainError;
    type IntoIter = std::vec::IntoIter<ChainError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a CloseErrorStack {
    type Item = &'a ChainError;
    type IntoIter = std::slice::Iter<'a, ChainError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}
