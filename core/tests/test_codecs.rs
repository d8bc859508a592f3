mod common;

#[cfg(test)]
mod tests {
    use super::common::*;
    use chain_core::checksum::ChecksumError;
    use chain_core::compression::CompressionError;
    use chain_core::crypto::CipherError;
    use chain_core::prelude::*;
    use proptest::prelude::*;
    use std::io::{Cursor, Write};

    const KEY_HEX: &str = "6368616e676520746869732070617373";

    fn aes() -> CipherConfig {
        CipherConfig::aes(hex::decode(KEY_HEX).expect("key hex"))
    }

    /// Writes `data` through `chain` into memory and returns the sink bytes.
    fn seal(chain: WriterBuilder, data: &[u8]) -> Vec<u8> {
        let out = SharedBuf::new();
        let mut w = chain.writing_to(WriteStream::new(out.clone())).expect("build writer");
        w.write_all(data).expect("write");
        w.close().expect("close writer");
        out.bytes()
    }

    fn source(bytes: Vec<u8>) -> ReaderBuilder {
        ReaderBuilder::reading_from(ReadStream::new(Cursor::new(bytes)))
    }

    #[test]
    fn encrypt_then_compress_round_trips_hello_world() {
        init_logging();
        let gzip = CompressionConfig::gzip();
        let sealed = seal(WriterBuilder::new(aes().encrypt()).then(gzip.compress()), b"hello world");
        assert_ne!(sealed, b"hello world");

        let mut r = source(sealed).then(gzip.decompress()).finally(aes().decrypt()).expect("build reader");
        assert_eq!(read_all(&mut r), b"hello world");
        r.close().expect("close reader");
    }

    #[test]
    fn every_codec_round_trips() {
        let payload = b"the quick brown fox jumps over the lazy dog ".repeat(64);
        for codec in CompressionCodec::ALL {
            let cfg = CompressionConfig::new(codec);
            let sealed = seal(WriterBuilder::new(cfg.compress()), &payload);
            assert!(sealed.len() < payload.len(), "{} should shrink repetitive input", codec);

            let r = source(sealed).finally(cfg.decompress()).expect("build reader");
            assert_eq!(read_all(r), payload, "{} round trip", codec);
        }
    }

    #[test]
    fn gzip_reads_concatenated_members() {
        let gzip = CompressionConfig::gzip();
        let mut joined = seal(WriterBuilder::new(gzip.compress()), b"hello ");
        joined.extend(seal(WriterBuilder::new(gzip.compress()), b"world"));

        let r = source(joined).finally(gzip.decompress()).expect("build reader");
        assert_eq!(read_all(r), b"hello world");
    }

    #[test]
    fn gzip_rejects_a_bad_header_at_build_time() {
        let log = Recorder::new();
        let err = ReaderBuilder::reading_from(tracked_source(b"definitely not gzip", 0, &log, false))
            .then(tracked_read(1, &log, false))
            .finally(CompressionConfig::gzip().decompress())
            .expect_err("header is invalid");

        assert!(matches!(err, ChainError::Compression(CompressionError::InvalidHeader { .. })));
        assert_eq!(log.filtered("close"), vec!["close 1", "close 0"]);
    }

    #[test]
    fn out_of_range_level_fails_the_build() {
        let out = SharedBuf::new();
        let err = WriterBuilder::new(CompressionConfig::zlib().with_level(12).compress())
            .writing_to(WriteStream::new(out))
            .expect_err("level 12 is out of range");
        assert!(matches!(
            err,
            ChainError::Compression(CompressionError::InvalidLevel { codec: CompressionCodec::Zlib, level: 12 })
        ));
    }

    #[test]
    fn bad_key_rolls_back_the_sink() {
        let log = Recorder::new();
        let out = SharedBuf::new();
        let err = WriterBuilder::new(CipherConfig::aes(vec![0u8; 7]).encrypt())
            .writing_to(tracked_sink(&out, 0, &log, false))
            .expect_err("key too short");

        assert!(matches!(err, ChainError::Cipher(CipherError::InvalidKeyLen { actual: 7, .. })));
        assert_eq!(log.events(), vec!["close 0"]);
    }

    #[test]
    fn chacha20_round_trips_with_generated_key() {
        let cfg = CipherConfig::generate(CipherSuite::ChaCha20);
        let sealed = seal(WriterBuilder::new(cfg.encrypt()), b"stream cipher payload");
        assert_eq!(sealed.len(), b"stream cipher payload".len());

        let r = source(sealed).finally(cfg.decrypt()).expect("build reader");
        assert_eq!(read_all(r), b"stream cipher payload");
    }

    #[test]
    fn base64_alphabets_round_trip() {
        let payload = [0xfbu8, 0xff, 0xfe, 0x00, 0x10];
        for alphabet in [
            Base64Alphabet::Standard,
            Base64Alphabet::StandardNoPad,
            Base64Alphabet::UrlSafe,
            Base64Alphabet::UrlSafeNoPad,
        ] {
            let cfg = Base64Config::new(alphabet);
            let sealed = seal(WriterBuilder::new(cfg.encode()), &payload);
            let r = source(sealed).finally(cfg.decode()).expect("build reader");
            assert_eq!(read_all(r), payload, "{:?}", alphabet);
        }

        let sealed = seal(WriterBuilder::new(Base64Config::new(Base64Alphabet::UrlSafeNoPad).encode()), &payload);
        assert_eq!(sealed, b"-__-ABA");
    }

    #[test]
    fn hex_round_trips() {
        let sealed = seal(WriterBuilder::new(Hex.encode()), b"hello world");
        assert_eq!(sealed, b"68656c6c6f20776f726c64");
        let r = source(sealed).finally(Hex.decode()).expect("build reader");
        assert_eq!(read_all(r), b"hello world");
    }

    #[test]
    fn crc32_trailer_detects_corruption() {
        let gzip = CompressionConfig::gzip();
        let mut sealed = seal(WriterBuilder::new(gzip.compress()).then(Crc32.append()), b"integrity");

        let r = source(sealed.clone()).then(Crc32.verify()).finally(gzip.decompress()).expect("build reader");
        assert_eq!(read_all(r), b"integrity");

        let last = sealed.len() - 1;
        sealed[last] ^= 0x01;
        let mut r = source(sealed).finally(Crc32.verify()).expect("build reader");
        let err = std::io::Read::read_to_end(&mut r, &mut Vec::new()).expect_err("trailer mismatch");
        let err = ChainError::from(err);
        assert!(matches!(err, ChainError::Checksum(ChecksumError::Mismatch { .. })));
    }

    #[test]
    fn configs_load_from_json() {
        let cfg: CompressionConfig = serde_json::from_str(r#"{"codec":"zstd","level":19}"#).expect("json");
        assert_eq!(cfg, CompressionConfig::zstd().with_level(19));

        let cfg: Base64Config = serde_json::from_str(r#"{"alphabet":"url_safe_no_pad"}"#).expect("json");
        assert_eq!(cfg.alphabet, Base64Alphabet::UrlSafeNoPad);

        let json = serde_json::to_string(&CompressionConfig::lz4()).expect("json");
        assert_eq!(json, r#"{"codec":"lz4"}"#);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_full_stack_round_trips(
            data in proptest::collection::vec(any::<u8>(), 0..2048),
            codec_index in 0usize..4,
        ) {
            let cipher = CipherConfig::generate(CipherSuite::AesCtr);
            let compression = CompressionConfig::new(CompressionCodec::ALL[codec_index]);
            let b64 = Base64Config::default();

            let sealed = seal(
                WriterBuilder::new(cipher.encrypt()).then(compression.compress()).then(b64.encode()),
                &data,
            );
            let r = source(sealed)
                .then(b64.decode())
                .then(compression.decompress())
                .finally(cipher.decrypt())
                .unwrap();
            prop_assert_eq!(read_all(r), data);
        }
    }
}
