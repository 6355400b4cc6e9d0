//! Logical entry types produced by block iterators.
//!
//! A block stores either a value or a tombstone for every key. The
//! distinction is carried as an explicit variant; the row codec's on-disk
//! sentinel for deletions never leaves the codec.

use bytes::Bytes;

/// The type of a value stored in a block.
///
/// - `Value`: A normal key-value pair
/// - `Deletion`: A tombstone marking that a key has been deleted
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ValueType {
    /// A tombstone indicating the key has been deleted
    Deletion = 0,

    /// A normal value
    Value = 1,
}

impl ValueType {
    /// Converts a u8 to a ValueType.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(ValueType::Deletion),
            1 => Some(ValueType::Value),
            _ => None,
        }
    }

    /// Converts the ValueType to a u8.
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// A decoded value or tombstone.
///
/// `Plain` buffers usually share memory with the block they were read from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Value {
    /// A live value.
    Plain(Bytes),
    /// The key was deleted.
    #[default]
    Tombstone,
}

impl Value {
    /// Returns true if this is a deletion marker.
    pub fn is_tombstone(&self) -> bool {
        matches!(self, Value::Tombstone)
    }

    /// Returns the value bytes, or `None` for a tombstone.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Plain(v) => Some(v),
            Value::Tombstone => None,
        }
    }

    /// Returns the type tag of this value.
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Plain(_) => ValueType::Value,
            Value::Tombstone => ValueType::Deletion,
        }
    }
}

/// A full entry as stored in a block, including tombstone status.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RowEntry {
    /// The full (prefix-expanded) key.
    pub key: Bytes,
    /// The value or tombstone.
    pub value: Value,
}

impl RowEntry {
    /// Flattens the entry into a key/value pair.
    ///
    /// A tombstone becomes an empty value, the same representation
    /// `BlockBuilder::add_value` accepts for deletions.
    pub fn into_key_value(self) -> KeyValue {
        let value = match self.value {
            Value::Plain(v) => v,
            Value::Tombstone => Bytes::new(),
        };
        KeyValue {
            key: self.key,
            value,
        }
    }
}

/// A flattened key/value pair.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyValue {
    /// The full key.
    pub key: Bytes,
    /// The value; empty for tombstones.
    pub value: Bytes,
}
