//! The XML library index document.
//!
//! The index is the catalog: a manifest of paths to tablature and
//! playlist documents plus per-entry metadata that lives nowhere else.
//! Loading resolves each referenced path through the binary document
//! codec; references whose files are gone are dropped from the in-memory
//! collections (and recorded in [`LibraryIndex::skipped_paths`]) so a
//! library with one missing file still opens. Saving regenerates the
//! manifest from memory without any existence checks.

use crate::error::{ErrorKind, Result, map_io_error};
use crate::item::{PlaylistLibraryItem, TablatureLibraryItem};
use crate::playlist::PlaylistDocument;
use crate::xml::{attribute, declared_encoding, text, xml_escape};
use fretfile_document::{FileHeader, FormatVersion, tablature};
use fretfile_wire::TextEncoding;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::fs;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use tracing::instrument;

/// Derived metadata for a loaded or saved index document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FileAttributes {
    /// Filesystem creation time at load; the moment of the write after a
    /// save
    pub created: OffsetDateTime,
    /// The markup's declared text encoding
    pub encoding: TextEncoding,
}

/// An in-progress `<tab>` or `<playlist>` reference while its text (the
/// path) is being collected.
enum Pending {
    Tab { favorited: bool, views: u32, path: String },
    Playlist { path: String },
}

/// The library manifest document.
///
/// Constructed empty, populated by [`load`](Self::load) (which replaces
/// prior contents) or by [`add_tablature`](Self::add_tablature)/
/// [`add_playlist`](Self::add_playlist), and written by
/// [`save`](Self::save). The on-disk manifest and the in-memory
/// collections agree only at load/save boundaries.
#[derive(Debug, Default)]
pub struct LibraryIndex {
    file_header: Option<FileHeader>,
    file_attributes: Option<FileAttributes>,
    tablature_items: Vec<TablatureLibraryItem>,
    playlist_items: Vec<PlaylistLibraryItem>,
    skipped: Vec<PathBuf>,
}

impl LibraryIndex {
    /// The version this build writes.
    pub const FILE_VERSION: FormatVersion = FormatVersion::new(1, 0);

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Header parsed from (or refreshed by) the last load/save, if any.
    #[must_use]
    pub fn file_header(&self) -> Option<&FileHeader> {
        self.file_header.as_ref()
    }

    /// Derived attributes from the last load/save, if any.
    #[must_use]
    pub fn file_attributes(&self) -> Option<&FileAttributes> {
        self.file_attributes.as_ref()
    }

    /// Resolved tablature entries, in manifest order.
    #[must_use]
    pub fn tablature_items(&self) -> &[TablatureLibraryItem] {
        &self.tablature_items
    }

    /// Resolved playlist entries, in manifest order.
    #[must_use]
    pub fn playlist_items(&self) -> &[PlaylistLibraryItem] {
        &self.playlist_items
    }

    /// References the last load dropped because their files were missing
    /// or unreadable.
    #[must_use]
    pub fn skipped_paths(&self) -> &[PathBuf] {
        &self.skipped
    }

    pub fn add_tablature(&mut self, item: TablatureLibraryItem) {
        self.tablature_items.push(item);
    }

    pub fn add_playlist(&mut self, item: PlaylistLibraryItem) {
        self.playlist_items.push(item);
    }

    /// Parses the manifest at `path` and resolves every reference in
    /// node order, replacing this index's contents.
    ///
    /// A reference whose path no longer exists (or whose document fails
    /// to load) is not an error: the entry is dropped, logged, and
    /// recorded in [`skipped_paths`](Self::skipped_paths). Failures to
    /// read or parse the manifest itself propagate.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display(), tabs, playlists, skipped))]
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| map_io_error(e, path))?;

        let mut reader = Reader::from_reader(bytes.as_slice());
        reader.trim_text(true);

        let mut version: Option<FormatVersion> = None;
        let mut encoding: Option<TextEncoding> = None;
        let mut tablature_items = Vec::new();
        let mut playlist_items = Vec::new();
        let mut skipped = Vec::new();
        let mut pending: Option<Pending> = None;
        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Decl(ref decl)) => encoding = declared_encoding(decl)?,
                Ok(Event::Start(ref e)) => match e.name().as_ref() {
                    b"library" => version = Some(root_version(e)?),
                    b"tab" => pending = Some(pending_tab(e)?),
                    b"playlist" => pending = Some(Pending::Playlist { path: String::new() }),
                    _ => {},
                },
                Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                    b"library" => version = Some(root_version(e)?),
                    // A childless reference node carries no path
                    b"tab" => {
                        if let Pending::Tab { favorited, views, path } = pending_tab(e)? {
                            resolve_tablature(
                                PathBuf::from(path),
                                favorited,
                                views,
                                &mut tablature_items,
                                &mut skipped,
                            );
                        }
                    },
                    b"playlist" => {
                        resolve_playlist(PathBuf::new(), &mut playlist_items, &mut skipped);
                    },
                    _ => {},
                },
                Ok(Event::Text(ref e)) => {
                    match pending.as_mut() {
                        Some(Pending::Tab { path, .. }) | Some(Pending::Playlist { path }) => {
                            path.push_str(&text(e)?);
                        },
                        None => {},
                    }
                },
                Ok(Event::End(ref e)) => match (e.name().as_ref(), pending.take()) {
                    (b"tab", Some(Pending::Tab { favorited, views, path })) => {
                        resolve_tablature(
                            PathBuf::from(path),
                            favorited,
                            views,
                            &mut tablature_items,
                            &mut skipped,
                        );
                    },
                    (b"playlist", Some(Pending::Playlist { path })) => {
                        resolve_playlist(PathBuf::from(path), &mut playlist_items, &mut skipped);
                    },
                    (_, p) => pending = p,
                },
                Ok(Event::Eof) => break,
                Ok(_) => {},
                Err(e) => exn::bail!(ErrorKind::Malformed(e.to_string())),
            }
            buf.clear();
        }

        let Some(version) = version else {
            exn::bail!(ErrorKind::MissingVersion);
        };

        let metadata = fs::metadata(path).map_err(|e| map_io_error(e, path))?;
        let created = metadata
            .created()
            .or_else(|_| metadata.modified())
            .map_err(ErrorKind::Io)?
            .into();

        let span = tracing::Span::current();
        span.record("tabs", tablature_items.len());
        span.record("playlists", playlist_items.len());
        span.record("skipped", skipped.len());

        self.file_header = Some(FileHeader { version, compressed: false });
        self.file_attributes = Some(FileAttributes {
            created,
            encoding: encoding.unwrap_or_default(),
        });
        self.tablature_items = tablature_items;
        self.playlist_items = playlist_items;
        self.skipped = skipped;
        Ok(())
    }

    /// Regenerates the manifest from the in-memory collections and writes
    /// it to `path`.
    ///
    /// No existence checks are performed; the manifest reflects current
    /// state, including entries added since the last load. Afterwards the
    /// header and attributes are refreshed to this write (the previously
    /// recorded text encoding is kept, defaulting to UTF-8).
    #[instrument(skip(self, path), fields(
        path = %path.as_ref().display(),
        tabs = self.tablature_items.len(),
        playlists = self.playlist_items.len()
    ))]
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let encoding = self.file_attributes.map(|a| a.encoding).unwrap_or_default();

        let mut xml = String::new();
        xml.push_str(&format!(
            "<?xml version=\"1.0\" encoding=\"{}\"?>\n",
            encoding.label()
        ));
        xml.push_str(&format!("<library version=\"{}\">\n", Self::FILE_VERSION));
        xml.push_str("  <tabs>\n");
        for item in &self.tablature_items {
            xml.push_str(&format!(
                "    <tab favorite=\"{}\" views=\"{}\">{}</tab>\n",
                item.favorited,
                item.views,
                xml_escape(&item.path.display().to_string())
            ));
        }
        xml.push_str("  </tabs>\n");
        xml.push_str("  <playlists>\n");
        for item in &self.playlist_items {
            xml.push_str(&format!(
                "    <playlist>{}</playlist>\n",
                xml_escape(&item.path.display().to_string())
            ));
        }
        xml.push_str("  </playlists>\n");
        xml.push_str("</library>\n");

        let bytes = encoding.encode(&xml).map_err(ErrorKind::encoding)?;
        fs::write(path, bytes).map_err(|e| map_io_error(e, path))?;

        self.file_header = Some(FileHeader {
            version: Self::FILE_VERSION,
            compressed: false,
        });
        self.file_attributes = Some(FileAttributes {
            created: OffsetDateTime::now_utc(),
            encoding,
        });
        Ok(())
    }
}

fn root_version(e: &BytesStart) -> Result<FormatVersion> {
    let Some(declared) = attribute(e, b"version")? else {
        exn::bail!(ErrorKind::MissingVersion);
    };
    declared
        .parse::<FormatVersion>()
        .map_err(|err| err.raise(ErrorKind::InvalidAttribute("version".to_string())))
}

fn pending_tab(e: &BytesStart) -> Result<Pending> {
    let favorited = match attribute(e, b"favorite")? {
        None => false,
        Some(v) if v.eq_ignore_ascii_case("true") => true,
        Some(v) if v.eq_ignore_ascii_case("false") => false,
        Some(_) => exn::bail!(ErrorKind::InvalidAttribute("favorite".to_string())),
    };
    let views = match attribute(e, b"views")? {
        None => 0,
        Some(v) => v
            .parse::<u32>()
            .map_err(|_| exn::Exn::from(ErrorKind::InvalidAttribute("views".to_string())))?,
    };
    Ok(Pending::Tab { favorited, views, path: String::new() })
}

fn resolve_tablature(
    path: PathBuf,
    favorited: bool,
    views: u32,
    items: &mut Vec<TablatureLibraryItem>,
    skipped: &mut Vec<PathBuf>,
) {
    if !path.exists() {
        tracing::warn!(path = %path.display(), "skipping missing tablature reference");
        skipped.push(path);
        return;
    }
    match tablature::load(&path) {
        Ok((record, _header)) => items.push(TablatureLibraryItem { path, record, favorited, views }),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "skipping unreadable tablature reference");
            skipped.push(path);
        },
    }
}

fn resolve_playlist(path: PathBuf, items: &mut Vec<PlaylistLibraryItem>, skipped: &mut Vec<PathBuf>) {
    if !path.exists() {
        tracing::warn!(path = %path.display(), "skipping missing playlist reference");
        skipped.push(path);
        return;
    }
    match PlaylistDocument::load(&path) {
        Ok((playlist, _header)) => items.push(PlaylistLibraryItem { path, playlist }),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "skipping unreadable playlist reference");
            skipped.push(path);
        },
    }
}
