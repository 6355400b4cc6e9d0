//! Row codec: the wire form of a single block entry.
//!
//! Keys are prefix-compressed against the first key of the block, so a row
//! only stores the suffix that differs plus the length of the shared prefix.
//!
//! `V0RowCodec` format:
//! ```text
//! [key_suffix_len: u16]
//! [key_suffix: bytes]
//! [key_prefix_len: u16]
//! [value_len: u32]        // u32::MAX marks a tombstone; no value bytes follow
//! [value: bytes]
//! ```
//!
//! All integers are big-endian. The suffix length leads the row so that the
//! first row of a block, whose prefix length is always zero, starts with the
//! length of the full first key followed by the key itself. `Block::decode`
//! relies on that to recover the first key without going through a codec.

use std::cmp::Ordering;

use bytes::{Buf, BufMut, BytesMut};

use crate::error::{Error, Result};

/// On-disk value length marking a deleted key.
const TOMBSTONE: u32 = u32::MAX;

/// Value half of a row, borrowed from the caller or from block data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowValue<'a> {
    /// A live value.
    Plain(&'a [u8]),
    /// A deletion marker.
    Tombstone,
}

impl RowValue<'_> {
    /// Returns true if this is a deletion marker.
    pub fn is_tombstone(&self) -> bool {
        matches!(self, RowValue::Tombstone)
    }
}

/// The key half of a row: how much of the block's first key it shares, and
/// the bytes that follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowKey<'a> {
    /// Number of leading bytes shared with the block's first key.
    pub prefix_len: usize,
    /// Remaining key bytes.
    pub suffix: &'a [u8],
}

impl RowKey<'_> {
    /// Returns the shared prefix taken from `first_key`.
    pub fn prefix<'k>(&self, first_key: &'k [u8]) -> Result<&'k [u8]> {
        first_key.get(..self.prefix_len).ok_or_else(|| {
            Error::corruption(format!(
                "row key prefix length {} exceeds first key length {}",
                self.prefix_len,
                first_key.len()
            ))
        })
    }

    /// Compares the full key against `target` without materializing it.
    pub fn compare(&self, first_key: &[u8], target: &[u8]) -> Result<Ordering> {
        let prefix = self.prefix(first_key)?;
        Ok(prefix.iter().chain(self.suffix).cmp(target.iter()))
    }

    /// Total length of the full key.
    pub fn len(&self) -> usize {
        self.prefix_len + self.suffix.len()
    }

    /// Returns true if the full key is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One entry in wire-ready form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Row<'a> {
    /// Prefix-compressed key.
    pub key: RowKey<'a>,
    /// Value or tombstone.
    pub value: RowValue<'a>,
}

/// Converts rows to and from their wire bytes.
///
/// Implementations must write the key suffix length as a big-endian `u16`
/// followed by the suffix bytes at the very start of every row whose prefix
/// length is zero.
pub trait RowCodec {
    /// Number of bytes `encode` will append for `row`.
    fn encoded_size(&self, row: &Row<'_>) -> usize;

    /// Appends the wire form of `row` to `buf`.
    fn encode(&self, row: &Row<'_>, buf: &mut BytesMut);

    /// Decodes the row starting at the beginning of `data`.
    ///
    /// `data` may extend past the end of the row.
    fn decode<'a>(&self, data: &'a [u8]) -> Result<Row<'a>>;

    /// Decodes only the key of the row starting at the beginning of `data`.
    fn decode_key<'a>(&self, data: &'a [u8]) -> Result<RowKey<'a>> {
        Ok(self.decode(data)?.key)
    }
}

/// The default row codec.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct V0RowCodec;

impl V0RowCodec {
    fn read_key<'a>(data: &mut &'a [u8]) -> Result<RowKey<'a>> {
        let suffix_len = read_u16(data, "key suffix length")? as usize;
        let suffix = take(data, suffix_len, "key suffix")?;
        let prefix_len = read_u16(data, "key prefix length")? as usize;
        Ok(RowKey { prefix_len, suffix })
    }
}

impl RowCodec for V0RowCodec {
    fn encoded_size(&self, row: &Row<'_>) -> usize {
        let value_len = match row.value {
            RowValue::Plain(v) => v.len(),
            RowValue::Tombstone => 0,
        };
        2 + row.key.suffix.len() + 2 + 4 + value_len
    }

    fn encode(&self, row: &Row<'_>, buf: &mut BytesMut) {
        assert!(
            row.key.suffix.len() <= u16::MAX as usize,
            "key suffix exceeds u16::MAX bytes"
        );
        assert!(
            row.key.prefix_len <= u16::MAX as usize,
            "key prefix exceeds u16::MAX bytes"
        );

        buf.reserve(self.encoded_size(row));
        buf.put_u16(row.key.suffix.len() as u16);
        buf.put_slice(row.key.suffix);
        buf.put_u16(row.key.prefix_len as u16);
        match row.value {
            RowValue::Plain(v) => {
                assert!(
                    v.len() < TOMBSTONE as usize,
                    "value must be shorter than u32::MAX bytes"
                );
                buf.put_u32(v.len() as u32);
                buf.put_slice(v);
            }
            RowValue::Tombstone => buf.put_u32(TOMBSTONE),
        }
    }

    fn decode<'a>(&self, mut data: &'a [u8]) -> Result<Row<'a>> {
        let key = Self::read_key(&mut data)?;
        let value = match read_u32(&mut data, "value length")? {
            TOMBSTONE => RowValue::Tombstone,
            len => RowValue::Plain(take(&mut data, len as usize, "value")?),
        };
        Ok(Row { key, value })
    }

    fn decode_key<'a>(&self, mut data: &'a [u8]) -> Result<RowKey<'a>> {
        Self::read_key(&mut data)
    }
}

fn read_u16(data: &mut &[u8], field: &str) -> Result<u16> {
    if data.remaining() < 2 {
        return Err(Error::corruption(format!(
            "row truncated reading {}",
            field
        )));
    }
    Ok(data.get_u16())
}

fn read_u32(data: &mut &[u8], field: &str) -> Result<u32> {
    if data.remaining() < 4 {
        return Err(Error::corruption(format!(
            "row truncated reading {}",
            field
        )));
    }
    Ok(data.get_u32())
}

fn take<'a>(data: &mut &'a [u8], len: usize, field: &str) -> Result<&'a [u8]> {
    if data.len() < len {
        return Err(Error::corruption(format!(
            "row truncated reading {}: need {} bytes, have {}",
            field,
            len,
            data.len()
        )));
    }
    let (head, tail) = data.split_at(len);
    *data = tail;
    Ok(head)
}
