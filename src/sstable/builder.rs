//! Block builder implementation.
//!
//! Accumulates sorted entries into a single [`Block`], keeping the encoded
//! size under a soft budget.

use bytes::{Bytes, BytesMut};

use crate::config::Options;
use crate::error::{Error, Result};
use crate::sstable::block::{Block, OFFSET_SIZE};
use crate::sstable::row::{Row, RowCodec, RowKey, RowValue, V0RowCodec};

/// BlockBuilder builds a block with prefix compression.
///
/// Every key is prefix-compressed against the first key of the block. Keys
/// must be added in strictly ascending order; debug builds assert this,
/// release builds trust the caller.
///
/// Usage:
/// ```
/// use sstblock::sstable::BlockBuilder;
///
/// let mut builder = BlockBuilder::new(4096);
/// assert!(builder.add_value(b"key1", b"value1"));
/// assert!(builder.add_value(b"key2", b"value2"));
/// let block = builder.build().unwrap();
/// assert_eq!(block.first_key().as_ref(), b"key1");
/// ```
#[derive(Debug)]
pub struct BlockBuilder<C: RowCodec = V0RowCodec> {
    codec: C,
    offsets: Vec<u16>,
    data: BytesMut,
    block_size: usize,
    first_key: Option<Bytes>,
    #[cfg(debug_assertions)]
    last_key: Vec<u8>,
}

impl BlockBuilder {
    /// Create a new BlockBuilder using the default row codec.
    pub fn new(block_size: usize) -> Self {
        Self::with_codec(block_size, V0RowCodec)
    }

    /// Create a new BlockBuilder sized from `options`.
    pub fn with_options(options: &Options) -> Self {
        Self::new(options.block_size)
    }
}

impl<C: RowCodec> BlockBuilder<C> {
    /// Create a new BlockBuilder encoding rows with `codec`.
    pub fn with_codec(block_size: usize, codec: C) -> Self {
        Self {
            codec,
            offsets: Vec::new(),
            data: BytesMut::new(),
            block_size,
            first_key: None,
            #[cfg(debug_assertions)]
            last_key: Vec::new(),
        }
    }

    /// Add an entry to the block.
    ///
    /// Returns false if the entry would push the block over its size budget.
    /// The first entry is always accepted, however large.
    ///
    /// # Panics
    ///
    /// Panics if `key` is empty or longer than `u16::MAX` bytes.
    pub fn add(&mut self, key: &[u8], value: RowValue<'_>) -> bool {
        assert!(!key.is_empty(), "key must not be empty");
        assert!(
            key.len() <= u16::MAX as usize,
            "key must not exceed u16::MAX bytes"
        );
        #[cfg(debug_assertions)]
        debug_assert!(
            self.is_empty() || key > self.last_key.as_slice(),
            "keys must be added in ascending order"
        );

        let prefix_len = self
            .first_key
            .as_deref()
            .map_or(0, |first| shared_prefix_len(first, key));
        let row = Row {
            key: RowKey {
                prefix_len,
                suffix: &key[prefix_len..],
            },
            value,
        };
        let row_size = self.codec.encoded_size(&row);

        if !self.is_empty() {
            if self.current_size() + row_size > self.block_size {
                log::trace!(
                    "block full: {} bytes + {} byte row exceeds {}",
                    self.current_size(),
                    row_size,
                    self.block_size
                );
                return false;
            }
            // The next row would start beyond what a u16 offset can address
            if self.data.len() > u16::MAX as usize {
                log::trace!(
                    "block full: next row would start at offset {}, past u16::MAX",
                    self.data.len()
                );
                return false;
            }
        }

        self.offsets.push(self.data.len() as u16);
        self.codec.encode(&row, &mut self.data);

        if self.first_key.is_none() {
            self.first_key = Some(Bytes::copy_from_slice(key));
        }
        #[cfg(debug_assertions)]
        {
            self.last_key.clear();
            self.last_key.extend_from_slice(key);
        }
        true
    }

    /// Add a key-value pair to the block.
    ///
    /// An empty `value` is stored as a tombstone; blocks have no separate
    /// representation for a present-but-empty value.
    pub fn add_value(&mut self, key: &[u8], value: &[u8]) -> bool {
        if value.is_empty() {
            return self.add(key, RowValue::Tombstone);
        }
        self.add(key, RowValue::Plain(value))
    }

    /// Add a deletion marker for `key`.
    pub fn add_tombstone(&mut self, key: &[u8]) -> bool {
        self.add(key, RowValue::Tombstone)
    }

    /// Check if the block is empty
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Number of entries added so far
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Get the current encoded size of the block (before compression)
    pub fn current_size(&self) -> usize {
        OFFSET_SIZE // number of entries
            + self.offsets.len() * OFFSET_SIZE
            + self.data.len()
    }

    /// Finish building and return the block.
    pub fn build(self) -> Result<Block> {
        let first_key = self.first_key.ok_or(Error::EmptyBlock)?;
        log::debug!(
            "Built block: {} entries, {} bytes, first key {} bytes",
            self.offsets.len(),
            OFFSET_SIZE + self.offsets.len() * OFFSET_SIZE + self.data.len(),
            first_key.len()
        );
        Ok(Block {
            first_key,
            data: self.data.freeze(),
            offsets: self.offsets,
        })
    }
}

/// Calculate the length of the shared prefix
fn shared_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}
