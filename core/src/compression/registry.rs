//! compression/registry.rs
//! Static codec metadata and level resolution.

use crate::compression::types::{CompressionCodec, CompressionError};
use crate::constants::{DEFAULT_LEVEL_GZIP, DEFAULT_LEVEL_ZLIB, DEFAULT_LEVEL_ZSTD, FLATE_LEVELS, ZSTD_LEVELS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecInfo {
    pub name: &'static str,
    /// Inclusive level range; `None` for codecs without levels.
    pub levels: Option<(i32, i32)>,
    pub default_level: Option<i32>,
}

pub fn resolve(codec: CompressionCodec) -> CodecInfo {
    match codec {
        CompressionCodec::Gzip => CodecInfo { name: "gzip", levels: Some(FLATE_LEVELS), default_level: Some(DEFAULT_LEVEL_GZIP) },
        CompressionCodec::Zlib => CodecInfo { name: "zlib", levels: Some(FLATE_LEVELS), default_level: Some(DEFAULT_LEVEL_ZLIB) },
        CompressionCodec::Zstd => CodecInfo { name: "zstd", levels: Some(ZSTD_LEVELS), default_level: Some(DEFAULT_LEVEL_ZSTD) },
        CompressionCodec::Lz4 => CodecInfo { name: "lz4", levels: None, default_level: None },
    }
}

/// Validates a requested level, falling back to the codec default.
pub fn resolve_level(codec: CompressionCodec, level: Option<i32>) -> Result<Option<i32>, CompressionError> {
    let info = resolve(codec);
    match (info.levels, level) {
        (_, None) => Ok(info.default_level),
        (Some((lo, hi)), Some(level)) if (lo..=hi).contains(&level) => Ok(Some(level)),
        (_, Some(level)) => Err(CompressionError::InvalidLevel { codec, level }),
    }
}
