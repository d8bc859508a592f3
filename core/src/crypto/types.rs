//! crypto/types.rs
//! Cipher suites and cipher layer errors.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{AES_BLOCK_LEN, AES_KEY_LENS, CHACHA20_KEY_LEN, CHACHA20_NONCE_LEN};

/// Symmetric stream cipher used by the cipher layer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CipherSuite {
    /// AES in CTR mode; the key length picks AES-128, AES-192 or AES-256.
    AesCtr,
    /// AES in OFB mode, keyed the same way as `AesCtr`.
    AesOfb,
    ChaCha20,
}

impl CipherSuite {
    pub fn key_lens(self) -> &'static [usize] {
        match self {
            CipherSuite::AesCtr | CipherSuite::AesOfb => AES_KEY_LENS,
            CipherSuite::ChaCha20 => &[CHACHA20_KEY_LEN],
        }
    }

    pub fn iv_len(self) -> usize {
        match self {
            CipherSuite::AesCtr | CipherSuite::AesOfb => AES_BLOCK_LEN,
            CipherSuite::ChaCha20 => CHACHA20_NONCE_LEN,
        }
    }

    /// Key length used by `CipherConfig::generate`.
    pub fn default_key_len(self) -> usize {
        match self {
            CipherSuite::AesCtr | CipherSuite::AesOfb => 32,
            CipherSuite::ChaCha20 => CHACHA20_KEY_LEN,
        }
    }
}

impl fmt::Display for CipherSuite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CipherSuite::AesCtr => f.write_str("aes-ctr"),
            CipherSuite::AesOfb => f.write_str("aes-ofb"),
            CipherSuite::ChaCha20 => f.write_str("chacha20"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CipherError {
    #[error("invalid {suite} key length: expected one of {expected:?}, got {actual}")]
    InvalidKeyLen {
        suite: CipherSuite,
        expected: &'static [usize],
        actual: usize,
    },

    #[error("invalid {suite} iv length: expected {expected}, got {actual}")]
    InvalidIvLen {
        suite: CipherSuite,
        expected: usize,
        actual: usize,
    },

    #[error("keystream exhausted")]
    KeystreamExhausted,
}
