//! checksum/mod.rs
//! Integrity trailer layers.

pub mod crc32;

use thiserror::Error;

pub use crc32::{Crc32, Crc32Reader, Crc32Writer};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChecksumError {
    #[error("checksum mismatch: trailer {expected:#010x}, computed {actual:#010x}")]
    Mismatch { expected: u32, actual: u32 },

    #[error("stream shorter than the checksum trailer")]
    Truncated,
}
