//! # sstblock - SSTable data blocks for LSM-Tree storage engines
//!
//! sstblock implements the block layer of a sorted-string table: the
//! self-describing unit that holds a sorted run of key/value entries.
//!
//! ## Architecture
//!
//! - **Builder**: Accumulates sorted entries under a soft size budget,
//!   prefix-compressing keys against the block's first key
//! - **Block**: Immutable rows plus a 16-bit offset table
//! - **Wire codec**: Compresses the block and appends a CRC32 checksum;
//!   decoding verifies the checksum before decompressing
//! - **Iterators**: Forward scans and binary-search seeks
//!
//! Table assembly (index blocks, footers, files) lives above this crate.
//!
//! ## Example Usage
//!
//! ```rust
//! use sstblock::sstable::{Block, BlockBuilder};
//! use sstblock::{CompressionType, Value};
//!
//! # fn main() -> Result<(), sstblock::Error> {
//! let mut builder = BlockBuilder::new(4096);
//! assert!(builder.add_value(b"donkey", b"kong"));
//! assert!(builder.add_value(b"kratos", b"atreus"));
//! assert!(builder.add_tombstone(b"super"));
//! let block = builder.build()?;
//!
//! let encoded = block.encode(CompressionType::None)?;
//! let decoded = Block::decode(&encoded, CompressionType::None)?;
//! assert_eq!(decoded.first_key().as_ref(), b"donkey");
//!
//! let mut iter = decoded.iter_at_key(b"ka")?;
//! let entry = iter.next_entry()?.unwrap();
//! assert_eq!(entry.key.as_ref(), b"kratos");
//! assert_eq!(iter.next_entry()?.unwrap().value, Value::Tombstone);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

// Module declarations
pub mod compress;
pub mod config;
pub mod error;
pub mod sstable;
pub mod types;

// Re-exports
pub use config::{CompressionType, Options};
pub use error::{Error, Result};
pub use types::{KeyValue, RowEntry, Value, ValueType};
