//! Tablature binary document codec.
//!
//! Layout on disk: the [`FileHeader`](crate::FileHeader) (magic, version,
//! compression flag), then the fields of
//! [`TABLATURE_SCHEMA`](crate::TABLATURE_SCHEMA) in wire order. All text
//! fields use UTF-8.

use crate::error::{ErrorKind, Result, map_io_error, map_read_error};
use crate::header::{FileHeader, FormatVersion, read_header, write_header};
use crate::record::{SourceKind, TablatureRecord, TablatureType};
use crate::schema::{FieldCodec, FieldSpec, TABLATURE_SCHEMA};
use fretfile_wire::{TextEncoding, WireRead, WireWrite};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use time::OffsetDateTime;
use tracing::instrument;

/// The version this build writes.
pub const FILE_VERSION: FormatVersion = FormatVersion::new(1, 0);

/// Text encoding of every string field in the binary format.
const ENCODING: TextEncoding = TextEncoding::Utf8;

/// Serializes `record` to `path`, creating or truncating the file.
///
/// # Examples
///
/// ```no_run
/// use fretfile_document::{TablatureRecord, TablatureType, tablature};
///
/// # fn example() -> fretfile_document::error::Result<()> {
/// let mut record = TablatureRecord::new(TablatureType::guitar_tab());
/// record.artist = "Slash".to_string();
/// record.contents = "e|---|".to_string();
/// tablature::save(&record, "/library/slash.tab")?;
/// # Ok(())
/// # }
/// ```
#[instrument(skip(record, path), fields(path = %path.as_ref().display()))]
pub fn save(record: &TablatureRecord, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| map_io_error(e, path))?;
    let mut writer = BufWriter::new(file);
    let header = FileHeader { version: FILE_VERSION, compressed: false };
    write_header(&mut writer, &header)?;
    write_fields(&mut writer, record)?;
    writer.flush().map_err(ErrorKind::Io)?;
    Ok(())
}

/// Loads the record at `path`, returning it together with the header so
/// the caller can police version acceptance independently of the payload.
///
/// Any field read that hits end-of-stream early fails with
/// [`Truncated`](ErrorKind::Truncated); no partially populated record is
/// ever returned.
#[instrument(skip(path), fields(path = %path.as_ref().display()))]
pub fn load(path: impl AsRef<Path>) -> Result<(TablatureRecord, FileHeader)> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| map_io_error(e, path))?;
    let mut reader = BufReader::new(file);
    let header = read_header(&mut reader)?;
    let record = read_fields(&mut reader)?;
    Ok((record, header))
}

/// Reads only the header of the document at `path`.
#[instrument(skip(path), fields(path = %path.as_ref().display()))]
pub fn header(path: impl AsRef<Path>) -> Result<FileHeader> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| map_io_error(e, path))?;
    read_header(&mut BufReader::new(file))
}

fn write_fields<W: Write>(writer: &mut W, record: &TablatureRecord) -> Result<()> {
    for spec in TABLATURE_SCHEMA {
        match spec {
            FieldSpec::Created => {
                let ticks = ticks_from(record.created)?;
                writer.write_all(&ticks.to_le_bytes()).map_err(ErrorKind::Io)?;
            },
            FieldSpec::SourceKind => {
                let ordinal = record.source_kind.ordinal();
                writer.write_all(&ordinal.to_le_bytes()).map_err(ErrorKind::Io)?;
            },
            FieldSpec::Text(field, codec) => {
                let text = record.text_field(*field);
                match codec {
                    FieldCodec::Plain => writer.write_string(text, ENCODING).map_err(ErrorKind::wire)?,
                    FieldCodec::Compressed => {
                        writer.write_compressed_string(text, ENCODING).map_err(ErrorKind::wire)?
                    },
                }
            },
        }
    }
    Ok(())
}

fn read_fields<R: Read>(reader: &mut R) -> Result<TablatureRecord> {
    let mut record = TablatureRecord {
        created: OffsetDateTime::UNIX_EPOCH,
        artist: String::new(),
        title: String::new(),
        tab_type: TablatureType::new(""),
        source_kind: SourceKind::default(),
        source: String::new(),
        comment: String::new(),
        contents: String::new(),
    };
    for spec in TABLATURE_SCHEMA {
        match spec {
            FieldSpec::Created => {
                let mut bytes = [0u8; 8];
                reader.read_exact(&mut bytes).map_err(map_read_error)?;
                record.created = datetime_from_ticks(i64::from_le_bytes(bytes))?;
            },
            FieldSpec::SourceKind => {
                let mut bytes = [0u8; 4];
                reader.read_exact(&mut bytes).map_err(map_read_error)?;
                record.source_kind = SourceKind::from_ordinal(i32::from_le_bytes(bytes))?;
            },
            FieldSpec::Text(field, codec) => {
                let text = match codec {
                    FieldCodec::Plain => reader.read_string(ENCODING).map_err(ErrorKind::wire)?,
                    FieldCodec::Compressed => {
                        reader.read_compressed_string(ENCODING).map_err(ErrorKind::wire)?
                    },
                };
                record.set_text_field(*field, text);
            },
        }
    }
    Ok(record)
}

// Timestamps are stored as a signed count of 100 ns ticks since the Unix
// epoch; sub-tick precision is dropped on write.
fn ticks_from(timestamp: OffsetDateTime) -> Result<i64> {
    i64::try_from(timestamp.unix_timestamp_nanos() / 100)
        .map_err(|_| exn::Exn::from(ErrorKind::InvalidTimestamp))
}

fn datetime_from_ticks(ticks: i64) -> Result<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(ticks) * 100)
        .map_err(|_| exn::Exn::from(ErrorKind::InvalidTimestamp))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn sample_record() -> TablatureRecord {
        TablatureRecord {
            created: datetime!(2013-04-21 17:30:00 UTC),
            artist: "Slash".to_string(),
            title: "Paradise City".to_string(),
            tab_type: TablatureType::guitar_tab(),
            source_kind: SourceKind::FileImport,
            source: "http://example.com/tab".to_string(),
            comment: String::new(),
            contents: "e|---|".to_string(),
        }
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("paradise-city.tab");
        let record = sample_record();
        save(&record, &path).unwrap();
        let (loaded, header) = load(&path).unwrap();
        assert_eq!(loaded, record);
        assert_eq!(header.version, FILE_VERSION);
        assert!(!header.compressed);
    }

    #[test]
    fn test_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.tab");
        save(&sample_record(), &path).unwrap();
        let header = header(&path).unwrap();
        assert_eq!(header.version, FormatVersion::new(1, 0));
        assert!(!header.compressed);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(dir.path().join("nope.tab")).unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
    }

    #[test]
    fn test_load_rejects_foreign_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("library.xml");
        std::fs::write(&path, "<?xml version=\"1.0\"?><library/>").unwrap();
        let err = load(&path).unwrap_err();
        assert!(matches!(&*err, ErrorKind::FormatMismatch(_)));
    }

    #[test]
    fn test_truncated_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cut.tab");
        save(&sample_record(), &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        // Cut into the middle of the contents field
        std::fs::write(&path, &bytes[..bytes.len() - 3]).unwrap();
        let err = load(&path).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Truncated));
    }

    #[test]
    fn test_truncated_inside_fixed_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cut.tab");
        save(&sample_record(), &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        // Header is magic (8) + version (8) + flag (1); cut inside `created`
        std::fs::write(&path, &bytes[..20]).unwrap();
        let err = load(&path).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Truncated));
    }

    #[test]
    fn test_unknown_source_kind_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weird.tab");
        save(&sample_record(), &path).unwrap();
        let mut bytes = std::fs::read(&path).unwrap();
        // The ordinal follows magic + version + flag + created + three
        // one-byte-length strings
        let offset = 17
            + 8
            + (1 + "Slash".len())
            + (1 + "Paradise City".len())
            + (1 + "Guitar Tab".len());
        bytes[offset..offset + 4].copy_from_slice(&99i32.to_le_bytes());
        std::fs::write(&path, bytes).unwrap();
        let err = load(&path).unwrap_err();
        assert!(matches!(&*err, ErrorKind::UnknownSourceKind(99)));
    }

    #[test]
    fn test_empty_comment_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.tab");
        save(&sample_record(), &path).unwrap();
        let (loaded, _) = load(&path).unwrap();
        assert_eq!(loaded.comment, "");
    }
}
