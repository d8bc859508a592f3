//! compression/config.rs
//! User-facing compression layer configuration.

use serde::{Deserialize, Serialize};

use crate::chain::{ReadTransform, WriteTransform};
use crate::compression::codecs::{flate, lz4, zstd};
use crate::compression::registry::resolve_level;
use crate::compression::types::CompressionCodec;
use crate::stream::{ReadStream, WriteStream};
use crate::types::Result;

/// Codec plus optional level; `None` uses the codec's default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub codec: CompressionCodec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<i32>,
}

impl CompressionConfig {
    pub fn new(codec: CompressionCodec) -> Self {
        Self { codec, level: None }
    }

    pub fn gzip() -> Self {
        Self::new(CompressionCodec::Gzip)
    }

    pub fn zlib() -> Self {
        Self::new(CompressionCodec::Zlib)
    }

    pub fn zstd() -> Self {
        Self::new(CompressionCodec::Zstd)
    }

    pub fn lz4() -> Self {
        Self::new(CompressionCodec::Lz4)
    }

    pub fn with_level(mut self, level: i32) -> Self {
        self.level = Some(level);
        self
    }

    /// Write transform producing a closable encoder layer; closing it
    /// writes the codec trailer into the layer beneath.
    pub fn compress(&self) -> impl WriteTransform {
        let cfg = *self;
        move |sink: WriteStream| -> Result<WriteStream> {
            let level = resolve_level(cfg.codec, cfg.level)?.unwrap_or_default();
            log::debug!("compression: {} encoder (level {})", cfg.codec, level);
            match cfg.codec {
                CompressionCodec::Gzip => Ok(flate::gzip_writer(sink, level)),
                CompressionCodec::Zlib => Ok(flate::zlib_writer(sink, level)),
                CompressionCodec::Zstd => zstd::writer(sink, level),
                CompressionCodec::Lz4 => Ok(lz4::writer(sink)),
            }
        }
    }

    pub fn decompress(&self) -> impl ReadTransform {
        let codec = self.codec;
        move |source: ReadStream| -> Result<ReadStream> {
            log::debug!("compression: {} decoder", codec);
            match codec {
                CompressionCodec::Gzip => flate::gzip_reader(source),
                CompressionCodec::Zlib => Ok(flate::zlib_reader(source)),
                CompressionCodec::Zstd => zstd::reader(source),
                CompressionCodec::Lz4 => Ok(lz4::reader(source)),
            }
        }
    }
}
