//! Library Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction.

use derive_more::{Display, Error};
use fretfile_document::error::Error as DocumentError;
use fretfile_wire::error::Error as WireError;
use std::io::Error as IoError;
use std::path::PathBuf;

/// A library error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The index or playlist markup is not well-formed XML.
    #[display("malformed document: {_0}")]
    Malformed(#[error(not(source))] String),
    /// The root element carries no `version` attribute.
    #[display("document declares no format version")]
    MissingVersion,
    /// An attribute is present but its value cannot be parsed.
    #[display("invalid value for attribute `{_0}`")]
    InvalidAttribute(#[error(not(source))] String),
    /// A referenced document failed to encode or decode. The frame tree
    /// carries the underlying document error.
    #[display("document error")]
    Document,
    /// A text-encoding failure (unsupported declaration, unencodable
    /// text). The frame tree carries the underlying wire error.
    #[display("text encoding error")]
    Encoding,
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
    /// Convert a document error into a library error, preserving the
    /// document crate's `Exn` frame (error tree) as a child in its own
    /// error tree.
    #[track_caller]
    pub fn document(err: DocumentError) -> Error {
        err.raise(ErrorKind::Document)
    }

    /// Convert a wire error into a library error, preserving its frame
    /// tree.
    #[track_caller]
    pub fn encoding(err: WireError) -> Error {
        err.raise(ErrorKind::Encoding)
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
