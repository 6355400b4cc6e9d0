//! SSTable data blocks.
//!
//! A data block is the unit of compression, checksumming and caching inside
//! an SSTable. Building, encoding and reading one goes through:
//!
//! - [`BlockBuilder`]: accumulates sorted entries under a soft size budget
//! - [`Block`]: the immutable result, with [`Block::encode`] / [`Block::decode`]
//! - [`BlockIterator`]: forward scans and binary-search seeks
//! - [`row`]: the per-entry wire format behind the [`RowCodec`] trait
//! - [`debug`]: human-readable dumps
//!
//! ## Block Format
//!
//! ```text
//! compressed([Rows...][Offsets: u16...][Num Offsets: u16]) [CRC32: u32]
//! ```
//!
//! The first row of every block stores its key without prefix compression,
//! so the smallest key can be read straight from the encoded data.

pub mod block;
pub mod builder;
pub mod debug;
pub mod iterator;
pub mod row;

pub use block::Block;
pub use builder::BlockBuilder;
pub use debug::{pretty_print, truncate};
pub use iterator::BlockIterator;
pub use row::{Row, RowCodec, RowKey, RowValue, V0RowCodec};

// Re-export CompressionType from config
pub use crate::config::{CompressionType, DEFAULT_BLOCK_SIZE};
