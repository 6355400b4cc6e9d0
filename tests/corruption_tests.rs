// Corruption Tests for sstblock
// Damaged encoded blocks must fail closed with a specific reason

use bytes::BufMut;
use proptest::prelude::*;
use sstblock::sstable::{Block, BlockBuilder};
use sstblock::{CompressionType, Error};

fn codecs() -> Vec<CompressionType> {
    vec![
        CompressionType::None,
        #[cfg(feature = "snappy")]
        CompressionType::Snappy,
        #[cfg(feature = "lz4-compression")]
        CompressionType::Lz4,
    ]
}

fn encoded_block(codec: CompressionType) -> Vec<u8> {
    let mut builder = BlockBuilder::new(4096);
    for i in 0..32 {
        let key = format!("key{:04}", i);
        let value = format!("value-{}", i * 7);
        assert!(builder.add_value(key.as_bytes(), value.as_bytes()));
    }
    builder.build().unwrap().encode(codec).unwrap().to_vec()
}

/// Wrap a raw uncompressed payload with a valid checksum
fn with_checksum(payload: &[u8]) -> Vec<u8> {
    let mut out = payload.to_vec();
    out.put_u32(crc32fast::hash(payload));
    out
}

/// Test every single-byte flip is caught by the checksum
#[test]
fn test_every_byte_flip_detected() {
    env_logger::try_init().ok();

    for codec in codecs() {
        let encoded = encoded_block(codec);
        for pos in 0..encoded.len() {
            let mut damaged = encoded.clone();
            damaged[pos] ^= 0x01;
            let err = Block::decode(&damaged, codec).unwrap_err();
            assert!(
                matches!(err, Error::ChecksumMismatch { .. }),
                "codec {:?}, position {}: {}",
                codec,
                pos,
                err
            );
        }
    }
}

/// Test inputs too short to hold a checksum and an offset count
#[test]
fn test_undersized_input() {
    for len in 0..=6 {
        let err = Block::decode(&vec![1u8; len], CompressionType::None)
            .unwrap_err();
        assert!(matches!(err, Error::Corruption(_)), "len {}", len);
        assert!(err.to_string().contains("too small"));
    }
}

/// Test truncating an encoded block at any point fails closed
#[test]
fn test_truncated_block() {
    let encoded = encoded_block(CompressionType::None);
    for len in 0..encoded.len() {
        assert!(
            Block::decode(&encoded[..len], CompressionType::None).is_err(),
            "len {}",
            len
        );
    }
}

/// Test structural damage that still carries a valid checksum
#[test]
fn test_structural_corruption_with_valid_checksum() {
    let cases: Vec<(&str, Vec<u8>)> = vec![
        (
            "offset count larger than the block",
            vec![b'a', b'b', 0xFF, 0xFF],
        ),
        ("zero offsets", vec![b'a', b'b', b'c', 0, 0]),
        ("offset beyond the data", vec![0, 1, b'k', 0, 0xFF, 0, 1]),
        (
            "offsets not ascending",
            vec![0, 1, b'k', 0, 1, b'j', 0, 3, 0, 0, 0, 2],
        ),
        (
            "first key length overruns the data",
            vec![0, 9, b'k', 0, 0, 0, 1],
        ),
        ("empty first key", vec![0, 0, 0, 0, 0, 1]),
    ];

    for (name, payload) in cases {
        let err = Block::decode(&with_checksum(&payload), CompressionType::None)
            .unwrap_err();
        assert!(matches!(err, Error::Corruption(_)), "{}: {}", name, err);
    }
}

/// Test decoding with a different codec than the one used to encode
#[cfg(feature = "snappy")]
#[test]
fn test_wrong_codec_fails() {
    let encoded = encoded_block(CompressionType::None);
    // The checksum is valid, so the payload reaches the decompressor and must be rejected there
    let err = Block::decode(&encoded, CompressionType::Snappy).unwrap_err();
    assert!(!matches!(err, Error::ChecksumMismatch { .. }));
}

proptest! {
    /// Any byte flipped to any other value is reported as a checksum mismatch
    #[test]
    fn prop_byte_flip_is_checksum_mismatch(pos in any::<prop::sample::Index>(), flip in 1u8..=255) {
        for codec in codecs() {
            let mut encoded = encoded_block(codec);
            let pos = pos.index(encoded.len() - 4);
            encoded[pos] ^= flip;
            let err = Block::decode(&encoded, codec).unwrap_err();
            prop_assert!(matches!(err, Error::ChecksumMismatch { .. }), "{}", err);
        }
    }

    /// Decoding arbitrary bytes never panics
    #[test]
    fn prop_decode_garbage_never_panics(data in prop::collection::vec(any::<u8>(), 0..256)) {
        for codec in codecs() {
            let _ = Block::decode(&data, codec);
        }
        let _ = Block::decode(&with_checksum(&data), CompressionType::None);
    }
}
