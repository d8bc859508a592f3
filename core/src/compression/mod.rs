//! compression/mod.rs
//! Streaming compression layers.
//!
//! Notes:
//! - Encoders are closable layers: the codec trailer only reaches the next
//!   layer when the chain is closed.
//! - Decoders are plain readers and own nothing beyond the stream they wrap.

pub mod codecs;
pub mod config;
pub mod registry;
pub mod types;

pub use config::CompressionConfig;
pub use registry::{resolve, resolve_level, CodecInfo};
pub use types::{CompressionCodec, CompressionError};
