//! Wire Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction.

use crate::encoding::TextEncoding;
use derive_more::{Display, Error};
use std::io::Error as IoError;

/// A wire-format error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for wire operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The stream ended before a declared field or length was satisfied.
    /// The input is incomplete; don't retry with the same bytes.
    #[display("truncated input")]
    Truncated,
    /// A varint continuation sequence does not fit in 64 bits.
    #[display("varint overflows 64 bits")]
    VarintOverflow,
    /// A compressed payload is not a valid, complete gzip stream.
    #[display("invalid or corrupted compressed data")]
    Decompression,
    /// Bytes are not a valid sequence in the requested encoding.
    #[display("byte sequence is not valid {_0}")]
    Undecodable(#[error(not(source))] TextEncoding),
    /// Text contains a character the requested encoding cannot represent.
    #[display("text is not representable in {_0}")]
    Unencodable(#[error(not(source))] TextEncoding),
    /// The named encoding is not one this format supports.
    #[display("unsupported text encoding: {_0}")]
    UnsupportedEncoding(#[error(not(source))] String),
    /// An I/O operation failed. Used for reading/writing the underlying stream.
    #[display("I/O error: {_0}")]
    Io(IoError),
}

impl From<IoError> for ErrorKind {
    fn from(err: IoError) -> Self {
        Self::Io(err)
    }
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Io(_))
    }
}
