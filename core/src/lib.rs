//! chain-core
//!
//! Layered byte-stream chains (cipher, compression, encoding, archive)
//! and virtual filesystems built from order-sensitive transforms, with a
//! close stack that releases every acquired layer exactly once.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;

// Core: streams, close stack, chain builders, filesystem layering
pub mod stream;
pub mod close;
pub mod chain;
pub mod fs;

// Codec layers
pub mod crypto;
pub mod compression;
pub mod encoding;
pub mod checksum;
pub mod archive;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::chain::{ChainReader, ChainWriter, ReadTransform, ReaderBuilder, WriteTransform, WriterBuilder};
    pub use crate::close::{CloseErrorStack, CloseStack};
    pub use crate::fs::{
        ChainReadFs, ChainWriteFs, DirFs, MemFs, ReadFs, ReadFsFromStream, ReaderFsBuilder, WriteFs,
        WriteFsFromStream, WriterFsBuilder,
    };
    pub use crate::stream::{Close, NopCloser, ReadStream, WriteStream};
    pub use crate::types::{ChainError, Result};

    pub use crate::archive::{ZipCompression, ZipConfig};
    pub use crate::checksum::Crc32;
    pub use crate::compression::{CompressionCodec, CompressionConfig};
    pub use crate::crypto::{CipherConfig, CipherSuite};
    pub use crate::encoding::{Base64Alphabet, Base64Config, Hex};
}
