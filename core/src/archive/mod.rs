//! archive/mod.rs
//! Container formats exposed as filesystems.

pub mod zip;

use thiserror::Error;

pub use self::zip::{ZipCompression, ZipConfig, ZipReadFs, ZipWriteFs};

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error(transparent)]
    Zip(#[from] ::zip::result::ZipError),

    /// Entry committed after its archive was finalized.
    #[error("archive already finalized; entry '{name}' was not written")]
    Finalized { name: String },
}
