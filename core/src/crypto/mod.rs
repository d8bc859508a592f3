//! crypto/mod.rs
//! Stream cipher layers.
//!
//! Design notes:
//! - Ciphers are length-preserving keystream XORs, so the encrypt side has
//!   no trailer and nothing to release.
//! - Key and IV are validated when the transform runs; a bad key fails the
//!   chain build and rolls back the layers beneath it.

pub mod cipher;
pub mod types;

pub use cipher::{CipherConfig, DecryptReader, EncryptWriter};
pub use types::{CipherError, CipherSuite};
