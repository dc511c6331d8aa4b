//! Binary file header: magic identifier, format version, compression flag.
//!
//! The header gates every binary document read. The magic is compared
//! byte-for-byte before anything else is consumed; the version and
//! compression flag are returned as plain data. Whether a given version is
//! acceptable is a caller-side policy ([`FormatVersion::supports`]), not
//! something the codec enforces.

use crate::error::{ErrorKind, Result, map_read_error};
use fretfile_wire::{TextEncoding, WireWrite};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::io::{Read, Write};
use std::str::FromStr;

/// The magic identifier at the front of every fretfile binary document.
pub const MAGIC: &str = "FRETTAB";

/// A `major.minor` format version.
///
/// Displays as `1.0` and parses back from that form; the XML index stores
/// it that way in its `version` attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FormatVersion {
    pub major: u32,
    pub minor: u32,
}

impl FormatVersion {
    #[must_use]
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Whether code at this version can read a document written at
    /// `other`. Same major, equal or older minor.
    ///
    /// Codecs never call this; they hand back the version they found and
    /// leave acceptance to the integrating application.
    #[must_use]
    pub fn supports(&self, other: &FormatVersion) -> bool {
        self.major == other.major && self.minor >= other.minor
    }
}

impl Display for FormatVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for FormatVersion {
    type Err = crate::error::Error;
    fn from_str(s: &str) -> Result<Self> {
        let Some((major, minor)) = s.split_once('.') else {
            exn::bail!(ErrorKind::InvalidVersion(s.to_string()));
        };
        let (Ok(major), Ok(minor)) = (major.parse(), minor.parse()) else {
            exn::bail!(ErrorKind::InvalidVersion(s.to_string()));
        };
        Ok(Self { major, minor })
    }
}

/// The fixed-position header of a binary document.
///
/// Created once per write and read once per load; never mutated after
/// construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FileHeader {
    pub version: FormatVersion,
    /// Whether string payloads in the body use the compressed framing.
    pub compressed: bool,
}

/// Writes the magic identifier, version and compression flag.
pub fn write_header<W: Write>(writer: &mut W, header: &FileHeader) -> Result<()> {
    writer
        .write_string(MAGIC, TextEncoding::Utf8)
        .map_err(ErrorKind::wire)?;
    writer
        .write_all(&header.version.major.to_le_bytes())
        .map_err(ErrorKind::Io)?;
    writer
        .write_all(&header.version.minor.to_le_bytes())
        .map_err(ErrorKind::Io)?;
    writer
        .write_all(&[u8::from(header.compressed)])
        .map_err(ErrorKind::Io)?;
    Ok(())
}

/// Reads and validates the magic identifier, then the version and
/// compression flag.
///
/// A stream whose leading bytes differ from the expected magic fails with
/// [`FormatMismatch`](ErrorKind::FormatMismatch) before anything past the
/// magic is consumed, regardless of what follows.
pub fn read_header<R: Read>(reader: &mut R) -> Result<FileHeader> {
    let mut found = [0u8; MAGIC.len() + 1];
    reader.read_exact(&mut found).map_err(map_read_error)?;
    let mut expected = [0u8; MAGIC.len() + 1];
    expected[0] = MAGIC.len() as u8;
    expected[1..].copy_from_slice(MAGIC.as_bytes());
    if found != expected {
        exn::bail!(ErrorKind::FormatMismatch(found.to_vec()));
    }

    let major = read_u32(reader)?;
    let minor = read_u32(reader)?;
    let mut flag = [0u8; 1];
    reader.read_exact(&mut flag).map_err(map_read_error)?;
    Ok(FileHeader {
        version: FormatVersion::new(major, minor),
        compressed: flag[0] != 0,
    })
}

fn read_u32<R: Read>(reader: &mut R) -> Result<u32> {
    let mut bytes = [0u8; 4];
    reader.read_exact(&mut bytes).map_err(map_read_error)?;
    Ok(u32::from_le_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Cursor;

    fn roundtrip(header: FileHeader) -> FileHeader {
        let mut buf = Vec::new();
        write_header(&mut buf, &header).unwrap();
        read_header(&mut Cursor::new(buf)).unwrap()
    }

    #[rstest]
    #[case(FileHeader { version: FormatVersion::new(1, 0), compressed: false })]
    #[case(FileHeader { version: FormatVersion::new(1, 0), compressed: true })]
    #[case(FileHeader { version: FormatVersion::new(2, 7), compressed: false })]
    fn test_round_trip(#[case] header: FileHeader) {
        assert_eq!(roundtrip(header), header);
    }

    #[test]
    fn test_rejects_wrong_magic() {
        // A stream that is well-formed apart from its magic identifier
        let mut buf = Vec::new();
        buf.write_string("NOTATAB", TextEncoding::Utf8).unwrap();
        buf.extend_from_slice(&1u32.to_le_bytes());
        buf.extend_from_slice(&0u32.to_le_bytes());
        buf.push(0);
        let err = read_header(&mut Cursor::new(buf)).unwrap_err();
        assert!(matches!(&*err, ErrorKind::FormatMismatch(_)));
    }

    #[test]
    fn test_rejects_arbitrary_leading_bytes() {
        let err = read_header(&mut Cursor::new(b"<?xml version=\"1.0\"?>")).unwrap_err();
        assert!(matches!(&*err, ErrorKind::FormatMismatch(_)));
    }

    #[test]
    fn test_truncated_header() {
        let err = read_header(&mut Cursor::new([0x07])).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Truncated));
    }

    #[rstest]
    #[case("1.0", FormatVersion::new(1, 0))]
    #[case("2.14", FormatVersion::new(2, 14))]
    fn test_version_parse(#[case] text: &str, #[case] expected: FormatVersion) {
        assert_eq!(text.parse::<FormatVersion>().unwrap(), expected);
        assert_eq!(expected.to_string(), text);
    }

    #[rstest]
    #[case("1")]
    #[case("1.")]
    #[case("one.zero")]
    #[case("")]
    fn test_version_parse_invalid(#[case] text: &str) {
        assert!(text.parse::<FormatVersion>().is_err());
    }

    #[rstest]
    #[case(FormatVersion::new(1, 2), FormatVersion::new(1, 0), true)]
    #[case(FormatVersion::new(1, 2), FormatVersion::new(1, 2), true)]
    #[case(FormatVersion::new(1, 0), FormatVersion::new(1, 2), false)]
    #[case(FormatVersion::new(2, 0), FormatVersion::new(1, 0), false)]
    fn test_supports_policy(#[case] reader: FormatVersion, #[case] written: FormatVersion, #[case] expected: bool) {
        assert_eq!(reader.supports(&written), expected);
    }
}
