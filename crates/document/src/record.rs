//! The tablature record model.

use crate::error::{ErrorKind, Result};
use std::fmt::{Display, Formatter, Result as FmtResult};
use time::OffsetDateTime;

/// A named tablature type tag.
///
/// The format stores the tag as free text, so user-defined types round
/// trip unchanged; the constants below are the built-in vocabulary.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TablatureType(String);

impl TablatureType {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn guitar_tab() -> Self {
        Self::new("Guitar Tab")
    }

    #[must_use]
    pub fn guitar_chords() -> Self {
        Self::new("Guitar Chords")
    }

    #[must_use]
    pub fn bass_tab() -> Self {
        Self::new("Bass Tab")
    }

    #[must_use]
    pub fn drum_tab() -> Self {
        Self::new("Drum Tab")
    }

    #[must_use]
    pub fn ukulele_tab() -> Self {
        Self::new("Ukulele Tab")
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Display for TablatureType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TablatureType {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Where a tablature originally came from.
///
/// Stored on the wire as a 4-byte little-endian signed ordinal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Authored inside the application
    #[default]
    UserCreated = 0,
    /// Imported from a file on disk
    FileImport = 1,
    /// Fetched from a remote source
    Download = 2,
}

impl SourceKind {
    #[inline]
    #[must_use]
    pub fn ordinal(&self) -> i32 {
        *self as i32
    }

    /// Maps a stored ordinal back to its variant.
    ///
    /// An ordinal outside the defined set fails with
    /// [`UnknownSourceKind`](ErrorKind::UnknownSourceKind); the document
    /// is treated as corrupt rather than defaulting.
    pub fn from_ordinal(ordinal: i32) -> Result<Self> {
        match ordinal {
            0 => Ok(SourceKind::UserCreated),
            1 => Ok(SourceKind::FileImport),
            2 => Ok(SourceKind::Download),
            _ => exn::bail!(ErrorKind::UnknownSourceKind(ordinal)),
        }
    }
}

/// A single tablature document: core attributes plus the tab body.
///
/// Every field is required and written unconditionally; the codec never
/// retains a reference, so the caller that loads or constructs a record
/// owns it outright.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TablatureRecord {
    /// Creation timestamp, stored at 100 ns resolution
    pub created: OffsetDateTime,
    pub artist: String,
    pub title: String,
    pub tab_type: TablatureType,
    pub source_kind: SourceKind,
    /// URI text describing where the tab came from
    pub source: String,
    pub comment: String,
    /// The tab body itself, typically the largest field
    pub contents: String,
}

impl TablatureRecord {
    /// An empty record stamped `now`, ready for field assignment.
    #[must_use]
    pub fn new(tab_type: TablatureType) -> Self {
        Self {
            created: OffsetDateTime::now_utc(),
            artist: String::new(),
            title: String::new(),
            tab_type,
            source_kind: SourceKind::default(),
            source: String::new(),
            comment: String::new(),
            contents: String::new(),
        }
    }
}
