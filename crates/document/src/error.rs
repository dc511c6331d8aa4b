//! Document Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction.

use derive_more::{Display, Error};
use fretfile_wire::error::{Error as WireError, ErrorKind as WireErrorKind};
use std::io::Error as IoError;
use std::path::PathBuf;

/// A document error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for document operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The stream does not begin with this format's magic identifier.
    /// This is not a file the reader understands; nothing was parsed.
    #[display("not a fretfile document (leading bytes {_0:x?})")]
    FormatMismatch(#[error(not(source))] Vec<u8>),
    /// The file ended before every declared field was read. No partial
    /// record is returned.
    #[display("truncated or corrupt document")]
    Truncated,
    /// A stored timestamp is outside the representable range.
    #[display("timestamp out of range")]
    InvalidTimestamp,
    /// A source-kind ordinal this format does not define.
    #[display("unknown source kind ordinal: {_0}")]
    UnknownSourceKind(#[error(not(source))] i32),
    /// A malformed `major.minor` version string.
    #[display("malformed format version: {_0:?}")]
    InvalidVersion(#[error(not(source))] String),
    /// A wire-level encoding failure (string framing, compression,
    /// varints). The frame tree carries the underlying wire error.
    #[display("wire encoding error")]
    Wire,
    /// File does not exist
    #[display("file not found: {}", _0.display())]
    NotFound(#[error(not(source))] PathBuf),
    /// Access denied (permissions)
    #[display("permission denied: {}", _0.display())]
    PermissionDenied(#[error(not(source))] PathBuf),
    /// Underlying I/O error
    #[display("I/O error: {_0}")]
    Io(IoError),
}

impl From<IoError> for ErrorKind {
    fn from(err: IoError) -> Self {
        Self::Io(err)
    }
}

impl ErrorKind {
    /// Convert a wire error into a document error, preserving the wire
    /// crate's `Exn` frame (error tree) as a child in its own error tree.
    /// Truncation keeps its identity so callers can match on it.
    #[track_caller]
    pub fn wire(err: WireError) -> Error {
        let kind = match &*err {
            WireErrorKind::Truncated => ErrorKind::Truncated,
            _ => ErrorKind::Wire,
        };
        err.raise(kind)
    }

    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}

pub(crate) fn map_io_error(err: IoError, path: &std::path::Path) -> ErrorKind {
    match err.kind() {
        std::io::ErrorKind::NotFound => ErrorKind::NotFound(path.to_path_buf()),
        std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied(path.to_path_buf()),
        _ => ErrorKind::Io(err),
    }
}

pub(crate) fn map_read_error(err: IoError) -> ErrorKind {
    match err.kind() {
        std::io::ErrorKind::UnexpectedEof => ErrorKind::Truncated,
        _ => ErrorKind::Io(err),
    }
}
