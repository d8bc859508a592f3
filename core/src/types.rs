use std::error::Error as StdError;
use std::io;

use thiserror::Error;

use crate::archive::ArchiveError;
use crate::checksum::ChecksumError;
use crate::close::CloseErrorStack;
use crate::compression::CompressionError;
use crate::crypto::CipherError;
use crate::encoding::EncodingError;

/// Boxed error accepted from third-party transforms and filesystems.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

pub type Result<T> = std::result::Result<T, ChainError>;

/// Unified chain error covering I/O, codec layers, filesystems and release failures.
/// - `From<T>` impls let `?` cross layer boundaries.
/// - `Close` carries the aggregate produced when more than one layer fails to release.
#[derive(Debug, Error)]
pub enum ChainError {
    /// I/O error from a source, sink or layer.
    #[error("I/O error: {0}")]
    Io(io::Error),

    /// Stream cipher setup or keystream failure.
    #[error("cipher error: {0}")]
    Cipher(#[from] CipherError),

    /// Compression/decompression error.
    #[error("compression error: {0}")]
    Compression(#[from] CompressionError),

    /// Text encoding (base64/hex) error.
    #[error("encoding error: {0}")]
    Encoding(#[from] EncodingError),

    /// Integrity trailer error.
    #[error("checksum error: {0}")]
    Checksum(#[from] ChecksumError),

    /// Container format error.
    #[error("archive error: {0}")]
    Archive(#[from] ArchiveError),

    /// Named entry does not exist in a filesystem.
    #[error("entry not found: {name}")]
    NotFound { name: String },

    /// Entry name rejected by a filesystem.
    #[error("invalid entry name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    /// Stream or filesystem used after release.
    #[error("already closed")]
    Closed,

    /// More than one layer failed to release (reverse acquisition order).
    #[error(transparent)]
    Close(#[from] CloseErrorStack),

    /// Error raised by a caller-supplied transform, stream or filesystem.
    #[error("{0}")]
    Other(BoxError),
}

impl ChainError {
    pub fn other<E: Into<BoxError>>(err: E) -> Self {
        ChainError::Other(err.into())
    }

    /// True when `pred` holds for this error or, for an aggregate, for any
    /// error inside it.
    pub fn any<F: Fn(&ChainError) -> bool>(&self, pred: F) -> bool {
        self.any_by(&pred)
    }

    pub(crate) fn any_by(&self, pred: &dyn Fn(&ChainError) -> bool) -> bool {
        match self {
            ChainError::Close(stack) => stack.iter().any(|e| e.any_by(pred)),
            leaf => pred(leaf),
        }
    }

    /// Finds the first underlying error of type `T`, looking through
    /// aggregates, `Io` wrappers and boxed `Other` errors.
    pub fn find<T: StdError + 'static>(&self) -> Option<&T> {
        match self {
            ChainError::Close(stack) => stack.find::<T>(),
            ChainError::Other(err) => match err.downcast_ref::<ChainError>() {
                Some(chain) => chain.find::<T>(),
                None => err.downcast_ref::<T>(),
            },
            ChainError::Io(err) => {
                if let Some(inner) = err.get_ref() {
                    if let Some(chain) = inner.downcast_ref::<ChainError>() {
                        return chain.find::<T>();
                    }
                    if let Some(found) = inner.downcast_ref::<T>() {
                        return Some(found);
                    }
                }
                (err as &(dyn StdError + 'static)).downcast_ref::<T>()
            }
            ChainError::Cipher(err) => (err as &(dyn StdError + 'static)).downcast_ref::<T>(),
            ChainError::Compression(err) => (err as &(dyn StdError + 'static)).downcast_ref::<T>(),
            ChainError::Encoding(err) => (err as &(dyn StdError + 'static)).downcast_ref::<T>(),
            ChainError::Checksum(err) => (err as &(dyn StdError + 'static)).downcast_ref::<T>(),
            ChainError::Archive(err) => (err as &(dyn StdError + 'static)).downcast_ref::<T>(),
            ChainError::NotFound { .. } | ChainError::InvalidName { .. } | ChainError::Closed => None,
        }
    }

    /// True when an underlying error equal to `target` is present.
    pub fn contains<T: StdError + PartialEq + 'static>(&self, target: &T) -> bool {
        self.any(|leaf| leaf.find::<T>().map_or(false, |found| found == target))
    }
}

impl From<io::Error> for ChainError {
    fn from(err: io::Error) -> Self {
        // Layers report chain errors through `Read`/`Write` as io::Error; unwrap them again.
        let wraps_chain = err.get_ref().map_or(false, |inner| inner.is::<ChainError>());
        if !wraps_chain {
            return ChainError::Io(err);
        }
        let kind = err.kind();
        match err.into_inner().map(|inner| inner.downcast::<ChainError>()) {
            Some(Ok(chain)) => *chain,
            Some(Err(inner)) => ChainError::Io(io::Error::new(kind, inner)),
            None => ChainError::Io(io::Error::from(kind)),
        }
    }
}

impl From<ChainError> for io::Error {
    fn from(err: ChainError) -> Self {
        match err {
            ChainError::Io(err) => err,
            err @ ChainError::NotFound { .. } => io::Error::new(io::ErrorKind::NotFound, err),
            err @ ChainError::InvalidName { .. } => io::Error::new(io::ErrorKind::InvalidInput, err),
            err @ (ChainError::Encoding(_) | ChainError::Checksum(_)) => io::Error::new(io::ErrorKind::InvalidData, err),
            other => io::Error::new(io::ErrorKind::Other, other),
        }
    }
}

/// Converts any layer error into the io::Error a `Read`/`Write` impl must return.
pub(crate) fn io_error<E: Into<ChainError>>(err: E) -> io::Error {
    io::Error::from(err.into())
}
