//! compression/codecs/mod.rs
//! Per-codec layer constructors. Every encoder is wrapped in a
//! `FinishWriter`, so its trailer is written when the layer is closed.

pub mod flate;
pub mod lz4;
pub mod zstd;
