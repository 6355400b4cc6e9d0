//! Configuration options for building and encoding blocks.

use serde::{Deserialize, Serialize};

/// Default target size of a data block (4KB).
pub const DEFAULT_BLOCK_SIZE: usize = 4096;

/// Largest block size whose row offsets still fit in a `u16`.
pub const MAX_BLOCK_SIZE: usize = u16::MAX as usize + 1;

/// Block-level options shared by the builder and the wire codec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Soft upper bound on the encoded size of a block (in bytes).
    /// The first entry of a block is always accepted, even when larger.
    /// Default: 4KB
    pub block_size: usize,

    /// Compression algorithm applied to the encoded block.
    /// Default: CompressionType::Snappy
    pub compression: CompressionType,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            compression: CompressionType::default(),
        }
    }
}

/// Compression algorithms supported for block payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum CompressionType {
    /// No compression.
    None = 0,

    /// Snappy compression (fast, moderate compression ratio).
    #[cfg(feature = "snappy")]
    Snappy = 1,

    /// LZ4 compression (very fast, lower compression ratio).
    #[cfg(feature = "lz4-compression")]
    Lz4 = 2,
}

impl CompressionType {
    /// Convert from u8
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(CompressionType::None),
            #[cfg(feature = "snappy")]
            1 => Some(CompressionType::Snappy),
            #[cfg(feature = "lz4-compression")]
            2 => Some(CompressionType::Lz4),
            _ => None,
        }
    }

    /// Convert to u8
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl Default for CompressionType {
    fn default() -> Self {
        #[cfg(feature = "snappy")]
        return CompressionType::Snappy;

        #[cfg(not(feature = "snappy"))]
        CompressionType::None
    }
}

impl Options {
    /// Creates a new Options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the block size.
    pub fn block_size(mut self, size: usize) -> Self {
        self.block_size = size;
        self
    }

    /// Sets the compression algorithm.
    pub fn compression(mut self, compression: CompressionType) -> Self {
        self.compression = compression;
        self
    }

    /// Validates the options and returns an error if any are invalid.
    pub fn validate(&self) -> crate::Result<()> {
        if self.block_size == 0 {
            return Err(crate::Error::invalid_argument("block_size must be > 0"));
        }
        if self.block_size > MAX_BLOCK_SIZE {
            return Err(crate::Error::invalid_argument(format!(
                "block_size must be <= {} (row offsets are 16-bit)",
                MAX_BLOCK_SIZE
            )));
        }
        Ok(())
    }
}
