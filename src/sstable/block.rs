//! Block format implementation for SSTable.
//!
//! A block holds a sorted run of rows plus an offset table pointing at the
//! start of each row, which is what makes binary-search seeks possible.
//!
//! Encoded format:
//! ```text
//! +-------------------------------------------+
//! | compressed(                               |
//! |   [Row 1]                                 |
//! |   [Row 2]                                 |
//! |   ...                                     |
//! |   [Row N]                                 |
//! |   [Offset of Row 1: u16]                  |
//! |   ...                                     |
//! |   [Offset of Row N: u16]                  |
//! |   [Num Offsets: u16]                      |
//! | )                                         |
//! | [Checksum: u32]  // CRC32 of the above    |
//! +-------------------------------------------+
//! ```
//!
//! All integers are big-endian. The checksum covers the compressed bytes so
//! a damaged payload is rejected before it reaches a decompressor. See
//! [`crate::sstable::row`] for the row format.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::compress;
use crate::config::CompressionType;
use crate::error::{Error, Result};
use crate::sstable::iterator::BlockIterator;

/// Size of the trailing checksum.
pub const CHECKSUM_SIZE: usize = 4;

/// Size of each offset table entry and of the offset count.
pub const OFFSET_SIZE: usize = 2;

/// An immutable, built block.
///
/// Blocks come from [`crate::sstable::BlockBuilder::build`] or
/// [`Block::decode`]. All buffers are reference counted, so cloning a block
/// or handing out keys and values never copies row data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub(crate) first_key: Bytes,
    pub(crate) data: Bytes,
    pub(crate) offsets: Vec<u16>,
}

impl Block {
    /// The first (smallest) key in the block.
    pub fn first_key(&self) -> &Bytes {
        &self.first_key
    }

    /// The concatenated row bytes.
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Start offset of every row within [`Block::data`].
    pub fn offsets(&self) -> &[u16] {
        &self.offsets
    }

    /// Number of entries in the block.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Always false for a built or decoded block.
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Create an iterator positioned at the first entry.
    pub fn iter(&self) -> BlockIterator<'_> {
        BlockIterator::new(self)
    }

    /// Create an iterator positioned at the first entry whose key is `>= key`.
    pub fn iter_at_key(&self, key: &[u8]) -> Result<BlockIterator<'_>> {
        BlockIterator::new_at_key(self, key)
    }

    /// Size of the uncompressed payload produced by [`Block::encode`].
    pub fn uncompressed_size(&self) -> usize {
        self.data.len() + self.offsets.len() * OFFSET_SIZE + OFFSET_SIZE
    }

    /// Serialize the block, compress it and append a checksum.
    pub fn encode(&self, compression: CompressionType) -> Result<Bytes> {
        let mut buf = BytesMut::with_capacity(self.uncompressed_size());
        buf.put_slice(&self.data);
        for offset in &self.offsets {
            buf.put_u16(*offset);
        }
        buf.put_u16(self.offsets.len() as u16);

        let compressed = compress::encode(&buf, compression)?;

        let mut out = BytesMut::with_capacity(compressed.len() + CHECKSUM_SIZE);
        out.put_slice(&compressed);
        out.put_u32(crc32fast::hash(&compressed));
        Ok(out.freeze())
    }

    /// Verify, decompress and parse an encoded block.
    ///
    /// Any inconsistency fails the whole decode; no partial block is ever
    /// returned.
    pub fn decode(input: &[u8], compression: CompressionType) -> Result<Self> {
        Self::decode_inner(input, compression).inspect_err(|e| {
            log::warn!("Rejecting {} byte block: {}", input.len(), e);
        })
    }

    fn decode_inner(input: &[u8], compression: CompressionType) -> Result<Self> {
        if input.len() <= CHECKSUM_SIZE + OFFSET_SIZE {
            return Err(Error::corruption(format!(
                "block is too small: {} bytes, must be more than {}",
                input.len(),
                CHECKSUM_SIZE + OFFSET_SIZE
            )));
        }

        // Last 4 bytes hold the checksum of the compressed payload
        let (compressed, mut checksum) = input.split_at(input.len() - CHECKSUM_SIZE);
        let expected = checksum.get_u32();
        let actual = crc32fast::hash(compressed);
        if expected != actual {
            return Err(Error::ChecksumMismatch { expected, actual });
        }

        let buf = Bytes::from(compress::decode(compressed, compression)?);
        if buf.len() <= OFFSET_SIZE {
            return Err(Error::corruption(format!(
                "uncompressed block is too small: {} bytes, must be more than {}",
                buf.len(),
                OFFSET_SIZE
            )));
        }

        // Last 2 bytes hold the offset count
        let count_index = buf.len() - OFFSET_SIZE;
        let count = (&buf[count_index..]).get_u16() as usize;
        let offset_start = count_index.checked_sub(count * OFFSET_SIZE).ok_or_else(|| {
            Error::corruption(format!(
                "offset table of {} entries does not fit in {} byte block",
                count,
                buf.len()
            ))
        })?;

        let mut offsets = Vec::with_capacity(count);
        for mut entry in buf[offset_start..count_index].chunks_exact(OFFSET_SIZE) {
            let offset = entry.get_u16();
            if offset as usize > offset_start {
                return Err(Error::corruption(format!(
                    "offset[{}] = {} points past the row data ({} bytes)",
                    offsets.len(),
                    offset,
                    offset_start
                )));
            }
            if offsets.last().is_some_and(|prev| *prev >= offset) {
                return Err(Error::corruption(format!(
                    "offset[{}] = {} is not greater than the previous offset",
                    offsets.len(),
                    offset
                )));
            }
            offsets.push(offset);
        }

        if offsets.is_empty() {
            return Err(Error::corruption("block has no entries"));
        }

        let data = buf.slice(..offset_start);
        let first_key = Self::read_first_key(&data, offsets[0] as usize)?;

        Ok(Self {
            first_key,
            data,
            offsets,
        })
    }

    /// Read the key of the first row without a row codec.
    ///
    /// The first row is never prefix-compressed, so it starts with the full
    /// key length followed by the key.
    fn read_first_key(data: &Bytes, offset: usize) -> Result<Bytes> {
        let key_start = offset + OFFSET_SIZE;
        let mut len_bytes = data
            .get(offset..key_start)
            .ok_or_else(|| Error::corruption("first row is truncated before its key length"))?;
        let key_end = key_start + len_bytes.get_u16() as usize;
        if key_end > data.len() {
            return Err(Error::corruption(format!(
                "first key ends at {} past the row data ({} bytes)",
                key_end,
                data.len()
            )));
        }
        if key_start == key_end {
            return Err(Error::corruption("first key is empty"));
        }
        Ok(data.slice(key_start..key_end))
    }
}
