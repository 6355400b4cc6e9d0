//! Error types for the block layer.

use std::io;
use thiserror::Error;

/// The result type used throughout sstblock.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type for block operations.
#[derive(Debug, Error)]
pub enum Error {
    /// An I/O error surfaced by a compression codec.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// `build()` was called on a builder that never accepted an entry.
    #[error("empty block")]
    EmptyBlock,

    /// The encoded block is structurally invalid.
    #[error("Data corruption: {0}")]
    Corruption(String),

    /// The stored checksum does not match the one computed over the payload.
    #[error("Checksum mismatch: expected {expected:#x}, got {actual:#x}")]
    ChecksumMismatch {
        /// The checksum stored in the encoded block.
        expected: u32,
        /// The checksum computed over the compressed payload.
        actual: u32,
    },

    /// Compressing or decompressing the block payload failed.
    #[error("Compression error: {0}")]
    Compression(String),

    /// An invalid argument was provided.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl Error {
    /// Creates a new corruption error.
    pub fn corruption(msg: impl Into<String>) -> Self {
        Error::Corruption(msg.into())
    }

    /// Creates a new compression error.
    pub fn compression(msg: impl Into<String>) -> Self {
        Error::Compression(msg.into())
    }

    /// Creates a new invalid argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    /// Returns true if the error indicates damaged block contents.
    pub fn is_corruption(&self) -> bool {
        matches!(self, Error::Corruption(_) | Error::ChecksumMismatch { .. })
    }
}

#[cfg(feature = "snappy")]
impl From<snap::Error> for Error {
    fn from(err: snap::Error) -> Self {
        Error::compression(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::corruption("offset table overruns block");
        assert_eq!(err.to_string(), "Data corruption: offset table overruns block");

        let err = Error::ChecksumMismatch {
            expected: 0x12345678,
            actual: 0x87654321,
        };
        assert!(err.to_string().contains("0x12345678"));
        assert!(err.to_string().contains("0x87654321"));

        assert_eq!(Error::EmptyBlock.to_string(), "empty block");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::InvalidData, "bad frame");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(!err.is_corruption());
    }

    #[test]
    fn test_is_corruption() {
        assert!(Error::corruption("x").is_corruption());
        let mismatch = Error::ChecksumMismatch {
            expected: 1,
            actual: 2,
        };
        assert!(mismatch.is_corruption());
        assert!(!Error::EmptyBlock.is_corruption());
        assert!(!Error::compression("bad frame").is_corruption());
    }

    #[cfg(feature = "snappy")]
    #[test]
    fn test_error_from_snap() {
        let snap_err = snap::Error::Empty;
        let message = snap_err.to_string();
        let err: Error = snap_err.into();
        assert!(matches!(err, Error::Compression(ref msg) if *msg == message));
        assert_eq!(err.to_string(), format!("Compression error: {}", message));
    }
}
