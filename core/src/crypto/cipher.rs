//! crypto/cipher.rs
//! AES-CTR, AES-OFB and ChaCha20 keystream layers.

use std::fmt;
use std::io::{self, Read, Write};

use aes_gcm::aes::{Aes128, Aes192, Aes256};
use chacha20::ChaCha20;
use ctr::cipher::{KeyIvInit, StreamCipher};
use rand::RngCore;

use crate::chain::{ReadTransform, WriteTransform};
use crate::crypto::types::{CipherError, CipherSuite};
use crate::stream::{ReadStream, WriteStream};
use crate::types::{io_error, Result};

type Aes128Ctr = ctr::Ctr128BE<Aes128>;
type Aes192Ctr = ctr::Ctr128BE<Aes192>;
type Aes256Ctr = ctr::Ctr128BE<Aes256>;
type Aes128Ofb = ofb::Ofb<Aes128>;
type Aes192Ofb = ofb::Ofb<Aes192>;
type Aes256Ofb = ofb::Ofb<Aes256>;

/// Key material for a cipher layer. The IV defaults to all zeroes.
#[derive(Clone, PartialEq, Eq)]
pub struct CipherConfig {
    pub suite: CipherSuite,
    pub key: Vec<u8>,
    pub iv: Vec<u8>,
}

impl CipherConfig {
    pub fn new(suite: CipherSuite, key: impl Into<Vec<u8>>) -> Self {
        Self {
            suite,
            key: key.into(),
            iv: vec![0u8; suite.iv_len()],
        }
    }

    pub fn aes(key: impl Into<Vec<u8>>) -> Self {
        Self::new(CipherSuite::AesCtr, key)
    }

    pub fn aes_ofb(key: impl Into<Vec<u8>>) -> Self {
        Self::new(CipherSuite::AesOfb, key)
    }

    pub fn chacha20(key: impl Into<Vec<u8>>) -> Self {
        Self::new(CipherSuite::ChaCha20, key)
    }

    pub fn with_iv(mut self, iv: impl Into<Vec<u8>>) -> Self {
        self.iv = iv.into();
        self
    }

    /// Random key and IV of the suite's default sizes.
    pub fn generate(suite: CipherSuite) -> Self {
        let mut rng = rand::thread_rng();
        let mut key = vec![0u8; suite.default_key_len()];
        let mut iv = vec![0u8; suite.iv_len()];
        rng.fill_bytes(&mut key);
        rng.fill_bytes(&mut iv);
        Self { suite, key, iv }
    }

    /// Checks key and IV lengths against the suite.
    pub fn validate(&self) -> std::result::Result<(), CipherError> {
        let expected = self.suite.key_lens();
        if !expected.contains(&self.key.len()) {
            return Err(CipherError::InvalidKeyLen {
                suite: self.suite,
                expected,
                actual: self.key.len(),
            });
        }
        if self.iv.len() != self.suite.iv_len() {
            return Err(CipherError::InvalidIvLen {
                suite: self.suite,
                expected: self.suite.iv_len(),
                actual: self.iv.len(),
            });
        }
        Ok(())
    }

    /// Write transform that encrypts everything written through it.
    pub fn encrypt(&self) -> impl WriteTransform {
        let cfg = self.clone();
        move |sink: WriteStream| -> Result<WriteStream> {
            let keystream = Keystream::new(&cfg)?;
            log::debug!("cipher: encrypt layer ({})", cfg.suite);
            Ok(WriteStream::new(EncryptWriter { inner: sink, keystream, scratch: Vec::new() }))
        }
    }

    /// Read transform that decrypts everything read through it.
    pub fn decrypt(&self) -> impl ReadTransform {
        let cfg = self.clone();
        move |source: ReadStream| -> Result<ReadStream> {
            let keystream = Keystream::new(&cfg)?;
            log::debug!("cipher: decrypt layer ({})", cfg.suite);
            Ok(ReadStream::new(DecryptReader { inner: source, keystream }))
        }
    }
}

impl fmt::Debug for CipherConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CipherConfig")
            .field("suite", &self.suite)
            .field("key", &format_args!("<{} bytes redacted>", self.key.len()))
            .field("iv", &hex::encode(&self.iv))
            .finish()
    }
}

enum Keystream {
    Aes128(Aes128Ctr),
    Aes192(Aes192Ctr),
    Aes256(Aes256Ctr),
    Aes128Ofb(Aes128Ofb),
    Aes192Ofb(Aes192Ofb),
    Aes256Ofb(Aes256Ofb),
    ChaCha20(ChaCha20),
}

impl Keystream {
    fn new(cfg: &CipherConfig) -> std::result::Result<Self, CipherError> {
        cfg.validate()?;
        let bad_key = || CipherError::InvalidKeyLen {
            suite: cfg.suite,
            expected: cfg.suite.key_lens(),
            actual: cfg.key.len(),
        };
        let (key, iv) = (cfg.key.as_slice(), cfg.iv.as_slice());

        let keystream = match (cfg.suite, key.len()) {
            (CipherSuite::AesCtr, 16) => Keystream::Aes128(Aes128Ctr::new_from_slices(key, iv).map_err(|_| bad_key())?),
            (CipherSuite::AesCtr, 24) => Keystream::Aes192(Aes192Ctr::new_from_slices(key, iv).map_err(|_| bad_key())?),
            (CipherSuite::AesCtr, _) => Keystream::Aes256(Aes256Ctr::new_from_slices(key, iv).map_err(|_| bad_key())?),
            (CipherSuite::AesOfb, 16) => Keystream::Aes128Ofb(Aes128Ofb::new_from_slices(key, iv).map_err(|_| bad_key())?),
            (CipherSuite::AesOfb, 24) => Keystream::Aes192Ofb(Aes192Ofb::new_from_slices(key, iv).map_err(|_| bad_key())?),
            (CipherSuite::AesOfb, _) => Keystream::Aes256Ofb(Aes256Ofb::new_from_slices(key, iv).map_err(|_| bad_key())?),
            (CipherSuite::ChaCha20, _) => Keystream::ChaCha20(ChaCha20::new_from_slices(key, iv).map_err(|_| bad_key())?),
        };
        Ok(keystream)
    }

    fn apply(&mut self, buf: &mut [u8]) -> std::result::Result<(), CipherError> {
        let res = match self {
            Keystream::Aes128(c) => c.try_apply_keystream(buf),
            Keystream::Aes192(c) => c.try_apply_keystream(buf),
            Keystream::Aes256(c) => c.try_apply_keystream(buf),
            Keystream::Aes128Ofb(c) => c.try_apply_keystream(buf),
            Keystream::Aes192Ofb(c) => c.try_apply_keystream(buf),
            Keystream::Aes256Ofb(c) => c.try_apply_keystream(buf),
            Keystream::ChaCha20(c) => c.try_apply_keystream(buf),
        };
        res.map_err(|_| CipherError::KeystreamExhausted)
    }
}

/// Encrypts into `inner`. Every accepted byte is forwarded in full so the
/// keystream position always matches the output.
pub struct EncryptWriter<W> {
    inner: W,
    keystream: Keystream,
    scratch: Vec<u8>,
}

impl<W: Write> Write for EncryptWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.scratch.clear();
        self.scratch.extend_from_slice(buf);
        self.keystream.apply(&mut self.scratch).map_err(io_error)?;
        self.inner.write_all(&self.scratch)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

pub struct DecryptReader<R> {
    inner: R,
    keystream: Keystream,
}

impl<R: Read> Read for DecryptReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.keystream.apply(&mut buf[..n]).map_err(io_error)?;
        Ok(n)
    }
}
