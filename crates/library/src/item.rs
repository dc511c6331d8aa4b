//! Library catalog entries.
//!
//! An entry's catalog metadata (favorited, view count) lives only in the
//! index; the referenced document is the content, the index is the
//! catalog. An entry exists in memory only if its referenced document was
//! successfully resolved during load.

use crate::playlist::PlaylistDocument;
use fretfile_document::TablatureRecord;
use std::path::PathBuf;

/// A tablature reference resolved from the index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TablatureLibraryItem {
    /// Full path of the referenced binary document
    pub path: PathBuf,
    pub record: TablatureRecord,
    pub favorited: bool,
    /// Times the tab has been opened, per the catalog
    pub views: u32,
}

impl TablatureLibraryItem {
    /// Wraps a freshly loaded record with default catalog metadata.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, record: TablatureRecord) -> Self {
        Self {
            path: path.into(),
            record,
            favorited: false,
            views: 0,
        }
    }
}

/// A playlist reference resolved from the index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaylistLibraryItem {
    /// Full path of the referenced playlist document
    pub path: PathBuf,
    pub playlist: PlaylistDocument,
}

impl PlaylistLibraryItem {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, playlist: PlaylistDocument) -> Self {
        Self { path: path.into(), playlist }
    }
}
