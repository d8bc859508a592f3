//! compression/types.rs
//! Codec identifiers and compression errors.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionCodec {
    Gzip,
    Zlib,
    Zstd,
    Lz4,
}

impl CompressionCodec {
    pub const ALL: [CompressionCodec; 4] = [
        CompressionCodec::Gzip,
        CompressionCodec::Zlib,
        CompressionCodec::Zstd,
        CompressionCodec::Lz4,
    ];
}

impl fmt::Display for CompressionCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(crate::compression::registry::resolve(*self).name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompressionError {
    #[error("codec {codec} does not accept level {level}")]
    InvalidLevel { codec: CompressionCodec, level: i32 },

    #[error("codec {codec} init failed: {msg}")]
    CodecInitFailed { codec: CompressionCodec, msg: String },

    #[error("codec {codec} process failed: {msg}")]
    CodecProcessFailed { codec: CompressionCodec, msg: String },

    #[error("invalid {codec} header: {msg}")]
    InvalidHeader { codec: CompressionCodec, msg: String },
}

impl CompressionError {
    pub(crate) fn init(codec: CompressionCodec, err: impl fmt::Display) -> Self {
        CompressionError::CodecInitFailed { codec, msg: err.to_string() }
    }

    pub(crate) fn process(codec: CompressionCodec, err: impl fmt::Display) -> Self {
        CompressionError::CodecProcessFailed { codec, msg: err.to_string() }
    }
}
