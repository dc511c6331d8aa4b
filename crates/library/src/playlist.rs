//! XML playlist documents.
//!
//! A playlist is an ordered list of paths to tablature documents, saved
//! as its own small XML file and referenced from the library index.

use crate::error::{ErrorKind, Result, map_io_error};
use crate::xml::{attribute, text, xml_escape};
use fretfile_document::{FileHeader, FormatVersion};
use fretfile_wire::TextEncoding;
use quick_xml::Reader;
use quick_xml::events::Event;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// An ordered set of tablature references with a display name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlaylistDocument {
    pub name: String,
    /// Paths to the referenced tablature documents, in playback order
    pub entries: Vec<PathBuf>,
}

impl PlaylistDocument {
    /// The version this build writes.
    pub const FILE_VERSION: FormatVersion = FormatVersion::new(1, 0);

    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), entries: Vec::new() }
    }

    /// Parses the playlist at `path`, returning it with the header parsed
    /// from the root's `version` attribute.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<(Self, FileHeader)> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| map_io_error(e, path))?;

        let mut reader = Reader::from_reader(bytes.as_slice());
        reader.trim_text(true);

        let mut playlist = PlaylistDocument::default();
        let mut version: Option<FormatVersion> = None;
        let mut in_song = false;
        let mut song = String::new();
        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => match e.name().as_ref() {
                    b"playlist" => version = Some(read_root(e, &mut playlist)?),
                    b"song" => {
                        in_song = true;
                        song.clear();
                    },
                    _ => {},
                },
                Ok(Event::Empty(ref e)) if e.name().as_ref() == b"playlist" => {
                    version = Some(read_root(e, &mut playlist)?);
                },
                Ok(Event::Text(ref e)) if in_song => song.push_str(&text(e)?),
                Ok(Event::End(ref e)) if e.name().as_ref() == b"song" => {
                    in_song = false;
                    playlist.entries.push(PathBuf::from(std::mem::take(&mut song)));
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
        Ok((playlist, FileHeader { version, compressed: false }))
    }

    /// Writes the playlist to `path`, regenerating the markup from
    /// scratch.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display(), entries = self.entries.len()))]
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut xml = String::new();
        xml.push_str(&format!(
            "<?xml version=\"1.0\" encoding=\"{}\"?>\n",
            TextEncoding::Utf8.label()
        ));
        xml.push_str(&format!(
            "<playlist version=\"{}\" name=\"{}\">\n",
            Self::FILE_VERSION,
            xml_escape(&self.name)
        ));
        xml.push_str("  <songs>\n");
        for entry in &self.entries {
            xml.push_str(&format!(
                "    <song>{}</song>\n",
                xml_escape(&entry.display().to_string())
            ));
        }
        xml.push_str("  </songs>\n");
        xml.push_str("</playlist>\n");
        fs::write(path, xml.as_bytes()).map_err(|e| map_io_error(e, path))?;
        Ok(())
    }
}

fn read_root(e: &quick_xml::events::BytesStart, playlist: &mut PlaylistDocument) -> Result<FormatVersion> {
    let Some(declared) = attribute(e, b"version")? else {
        exn::bail!(ErrorKind::MissingVersion);
    };
    if let Some(name) = attribute(e, b"name")? {
        playlist.name = name;
    }
    declared
        .parse::<FormatVersion>()
        .map_err(|err| err.raise(ErrorKind::InvalidAttribute("version".to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("practice.playlist");
        let mut playlist = PlaylistDocument::new("Practice & Warm-up");
        playlist.entries.push(PathBuf::from("/library/sweet-child.tab"));
        playlist.entries.push(PathBuf::from("/library/paradise-city.tab"));
        playlist.save(&path).unwrap();

        let (loaded, header) = PlaylistDocument::load(&path).unwrap();
        assert_eq!(loaded, playlist);
        assert_eq!(header.version, PlaylistDocument::FILE_VERSION);
        assert!(!header.compressed);
    }

    #[test]
    fn test_empty_playlist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.playlist");
        PlaylistDocument::new("Empty").save(&path).unwrap();
        let (loaded, _) = PlaylistDocument::load(&path).unwrap();
        assert_eq!(loaded.name, "Empty");
        assert!(loaded.entries.is_empty());
    }

    #[test]
    fn test_missing_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("versionless.playlist");
        fs::write(&path, "<?xml version=\"1.0\"?><playlist name=\"x\"><songs/></playlist>").unwrap();
        let err = PlaylistDocument::load(&path).unwrap_err();
        assert!(matches!(&*err, ErrorKind::MissingVersion));
    }

    #[test]
    fn test_malformed_markup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.playlist");
        fs::write(&path, "<playlist version=\"1.0\"><songs></plist>").unwrap();
        assert!(PlaylistDocument::load(&path).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = PlaylistDocument::load(dir.path().join("nope.playlist")).unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
    }
}
