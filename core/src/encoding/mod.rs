//! encoding/mod.rs
//! Text encoding layers (base64, hex).

pub mod base64;
pub mod hex;

use thiserror::Error;

pub use self::base64::{Base64Alphabet, Base64Config};
pub use self::hex::{Hex, HexReader, HexWriter};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodingError {
    #[error("invalid hex input: {0}")]
    Hex(#[from] ::hex::FromHexError),

    #[error("hex input ended on an odd number of digits")]
    OddLength,
}
