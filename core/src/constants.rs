//! constants.rs
//! Defaults and fixed sizes shared by the codec layers.

/// AES block size; also the CTR-mode IV length.
pub const AES_BLOCK_LEN: usize = 16;

/// Accepted AES key lengths (AES-128, AES-192, AES-256).
pub const AES_KEY_LENS: &[usize] = &[16, 24, 32];

/// ChaCha20 key and nonce lengths.
pub const CHACHA20_KEY_LEN: usize = 32;
pub const CHACHA20_NONCE_LEN: usize = 12;

/// Default compression levels (balanced).
pub const DEFAULT_LEVEL_GZIP: i32 = 6;
pub const DEFAULT_LEVEL_ZLIB: i32 = 6;
pub const DEFAULT_LEVEL_ZSTD: i32 = 6;

/// Valid level ranges per codec family.
pub const FLATE_LEVELS: (i32, i32) = (0, 9);
pub const ZSTD_LEVELS: (i32, i32) = (1, 22);

/// Size of the little-endian CRC32 trailer written by the checksum layer.
pub const CRC32_TRAILER_LEN: usize = 4;
