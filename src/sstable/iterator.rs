//! Iterators over the entries of a [`Block`].
//!
//! A [`BlockIterator`] is a single forward pass: it starts either at the
//! first entry or, via [`BlockIterator::new_at_key`], at the first entry
//! whose key is greater than or equal to a target found by binary search
//! over the offset table. It borrows the block and never copies row data;
//! returned keys and values share the block's buffer wherever possible.

use std::cmp::Ordering;

use bytes::{Bytes, BytesMut};

use crate::error::{Error, Result};
use crate::sstable::block::Block;
use crate::sstable::row::{RowCodec, RowKey, RowValue, V0RowCodec};
use crate::types::{KeyValue, RowEntry, Value};

/// Iterator over entries in a block
///
/// ```
/// use sstblock::sstable::{BlockBuilder, BlockIterator};
///
/// let mut builder = BlockBuilder::new(1024);
/// builder.add_value(b"donkey", b"kong");
/// builder.add_value(b"kratos", b"atreus");
/// let block = builder.build().unwrap();
///
/// let mut iter = BlockIterator::new_at_key(&block, b"ka").unwrap();
/// let kv = iter.next_key_value().unwrap().unwrap();
/// assert_eq!(kv.key.as_ref(), b"kratos");
/// assert!(iter.next_key_value().unwrap().is_none());
/// ```
#[derive(Debug)]
pub struct BlockIterator<'a, C: RowCodec = V0RowCodec> {
    block: &'a Block,
    codec: C,
    /// Index into the offset table of the next entry to return
    index: usize,
}

impl<'a> BlockIterator<'a> {
    /// Create an iterator positioned at the first entry.
    pub fn new(block: &'a Block) -> Self {
        Self::with_codec(block, V0RowCodec)
    }

    /// Create an iterator positioned at the first entry whose key is `>= key`.
    ///
    /// If every key in the block is smaller than `key` the iterator starts
    /// exhausted.
    pub fn new_at_key(block: &'a Block, key: &[u8]) -> Result<Self> {
        Self::with_codec_at_key(block, key, V0RowCodec)
    }
}

impl<'a, C: RowCodec> BlockIterator<'a, C> {
    /// Create an iterator decoding rows with `codec`.
    pub fn with_codec(block: &'a Block, codec: C) -> Self {
        Self {
            block,
            codec,
            index: 0,
        }
    }

    /// Seeking variant of [`BlockIterator::with_codec`].
    pub fn with_codec_at_key(block: &'a Block, key: &[u8], codec: C) -> Result<Self> {
        let mut iter = Self::with_codec(block, codec);
        iter.index = iter.search(key)?;
        Ok(iter)
    }

    /// Binary search for the smallest index whose key is `>= target`.
    ///
    /// Only row keys are decoded while searching.
    fn search(&self, target: &[u8]) -> Result<usize> {
        let mut left = 0;
        let mut right = self.block.offsets.len();
        while left < right {
            let mid = left + (right - left) / 2;
            match self.key_at(mid)?.compare(&self.block.first_key, target)? {
                Ordering::Less => left = mid + 1,
                Ordering::Equal | Ordering::Greater => right = mid,
            }
        }
        Ok(left)
    }

    fn row_data(&self, index: usize) -> Result<&'a [u8]> {
        let offset = self.block.offsets[index] as usize;
        self.block.data.get(offset..).ok_or_else(|| {
            Error::corruption(format!(
                "offset[{}] = {} is outside the block",
                index, offset
            ))
        })
    }

    fn key_at(&self, index: usize) -> Result<RowKey<'a>> {
        self.codec.decode_key(self.row_data(index)?)
    }

    fn entry_at(&self, index: usize) -> Result<RowEntry> {
        let row = self.codec.decode(self.row_data(index)?)?;
        let key = self.materialize_key(&row.key)?;
        let value = match row.value {
            RowValue::Plain(v) => Value::Plain(self.block.data.slice_ref(v)),
            RowValue::Tombstone => Value::Tombstone,
        };
        Ok(RowEntry { key, value })
    }

    /// Rebuild the full key from the block's first key and the row suffix.
    fn materialize_key(&self, key: &RowKey<'a>) -> Result<Bytes> {
        if key.prefix_len == 0 {
            return Ok(self.block.data.slice_ref(key.suffix));
        }
        let prefix = key.prefix(&self.block.first_key)?;
        let mut buf = BytesMut::with_capacity(key.len());
        buf.extend_from_slice(prefix);
        buf.extend_from_slice(key.suffix);
        Ok(buf.freeze())
    }

    /// Return the next entry, including tombstone status.
    ///
    /// Returns `Ok(None)` once the iterator is exhausted, and keeps doing so
    /// on every later call. A row that fails to decode is reported once as
    /// corruption, after which the iterator is exhausted.
    pub fn next_entry(&mut self) -> Result<Option<RowEntry>> {
        if self.is_exhausted() {
            return Ok(None);
        }
        match self.entry_at(self.index) {
            Ok(entry) => {
                self.index += 1;
                Ok(Some(entry))
            }
            Err(e) => {
                self.index = self.block.offsets.len();
                Err(e)
            }
        }
    }

    /// Return the next entry as a plain key/value pair.
    ///
    /// Tombstones come back with an empty value.
    pub fn next_key_value(&mut self) -> Result<Option<KeyValue>> {
        Ok(self.next_entry()?.map(RowEntry::into_key_value))
    }

    /// Check if the iterator has no more entries
    pub fn is_exhausted(&self) -> bool {
        self.index >= self.block.offsets.len()
    }
}

impl<C: RowCodec> Iterator for BlockIterator<'_, C> {
    type Item = Result<RowEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_entry().transpose()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.block.offsets.len().saturating_sub(self.index)))
    }
}
