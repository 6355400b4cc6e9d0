//! Block payload compression.
//!
//! The wire codec hands the whole uncompressed block payload to [`encode`]
//! and checksums the result; on the read side the checksum is verified first
//! and only then is the payload passed to [`decode`]. Both functions are
//! deterministic for a given [`CompressionType`] and `CompressionType::None`
//! is the identity transform.

use crate::config::CompressionType;
use crate::error::Result;

/// Compress `data` with the given codec.
pub fn encode(data: &[u8], compression: CompressionType) -> Result<Vec<u8>> {
    match compression {
        CompressionType::None => Ok(data.to_vec()),
        #[cfg(feature = "snappy")]
        CompressionType::Snappy => Ok(snap::raw::Encoder::new().compress_vec(data)?),
        #[cfg(feature = "lz4-compression")]
        CompressionType::Lz4 => Ok(lz4::block::compress(data, None, true)?),
    }
}

/// Decompress `data` that was produced by [`encode`] with the same codec.
pub fn decode(data: &[u8], compression: CompressionType) -> Result<Vec<u8>> {
    match compression {
        CompressionType::None => Ok(data.to_vec()),
        #[cfg(feature = "snappy")]
        CompressionType::Snappy => Ok(snap::raw::Decoder::new().decompress_vec(data)?),
        #[cfg(feature = "lz4-compression")]
        CompressionType::Lz4 => Ok(lz4::block::decompress(data, None)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codecs() -> Vec<CompressionType> {
        vec![
            CompressionType::None,
            #[cfg(feature = "snappy")]
            CompressionType::Snappy,
            #[cfg(feature = "lz4-compression")]
            CompressionType::Lz4,
        ]
    }

    #[test]
    fn test_none_is_identity() {
        let data = b"the quick brown fox";
        assert_eq!(encode(data, CompressionType::None).unwrap(), data.to_vec());
        assert_eq!(decode(data, CompressionType::None).unwrap(), data.to_vec());
    }

    #[test]
    fn test_codecs_are_lossless() {
        let data: Vec<u8> = b"key00000001value00000001".repeat(64);
        for codec in codecs() {
            let compressed = encode(&data, codec).unwrap();
            assert_eq!(
                decode(&compressed, codec).unwrap(),
                data,
                "codec {:?}",
                codec
            );
        }
    }

    #[test]
    fn test_codecs_are_deterministic() {
        let data: Vec<u8> = (0..2048u32).map(|i| (i % 7) as u8).collect();
        for codec in codecs() {
            assert_eq!(
                encode(&data, codec).unwrap(),
                encode(&data, codec).unwrap()
            );
        }
    }

    #[cfg(feature = "snappy")]
    #[test]
    fn test_snappy_compresses_repetitive_data() {
        let data = vec![b'a'; 4096];
        let compressed = encode(&data, CompressionType::Snappy).unwrap();
        assert!(compressed.len() < data.len());
    }

    #[cfg(feature = "snappy")]
    #[test]
    fn test_snappy_rejects_garbage() {
        // declares 10 bytes, then a 3-byte literal with only one byte present
        let garbage = [0x0Au8, 0x08, b'a'];
        let err = decode(&garbage, CompressionType::Snappy).unwrap_err();
        assert!(matches!(err, crate::Error::Compression(_)));
    }
}
