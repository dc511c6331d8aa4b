//! Text encodings for document string fields.
//!
//! Both on-disk formats declare the character encoding of their text
//! explicitly: the binary format passes it to every string read/write, and
//! the XML index records it in the document declaration. Only the encodings
//! the formats actually emit are supported.

use crate::error::{ErrorKind, Result};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// A supported character encoding.
///
/// Defaults to [`Utf8`](Self::Utf8), which is what the binary document
/// format writes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextEncoding {
    /// UTF-8
    #[default]
    Utf8,
    /// ISO-8859-1, one byte per code point
    Latin1,
}

impl TextEncoding {
    /// Returns the IANA label for this encoding, as written in XML
    /// declarations.
    #[inline]
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "UTF-8",
            TextEncoding::Latin1 => "ISO-8859-1",
        }
    }

    /// Encode `text` into bytes under this encoding.
    ///
    /// Latin-1 rejects any character above U+00FF with
    /// [`Unencodable`](ErrorKind::Unencodable); UTF-8 is total.
    pub fn encode(&self, text: &str) -> Result<Vec<u8>> {
        match self {
            TextEncoding::Utf8 => Ok(text.as_bytes().to_vec()),
            TextEncoding::Latin1 => text
                .chars()
                .map(|ch| {
                    u8::try_from(u32::from(ch))
                        .map_err(|_| exn::Exn::from(ErrorKind::Unencodable(*self)))
                })
                .collect(),
        }
    }

    /// Decode `bytes` into a string under this encoding.
    ///
    /// UTF-8 rejects invalid sequences with
    /// [`Undecodable`](ErrorKind::Undecodable); Latin-1 accepts any byte.
    pub fn decode(&self, bytes: &[u8]) -> Result<String> {
        match self {
            TextEncoding::Utf8 => match std::str::from_utf8(bytes) {
                Ok(text) => Ok(text.to_string()),
                Err(_) => exn::bail!(ErrorKind::Undecodable(*self)),
            },
            TextEncoding::Latin1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }
}

impl Display for TextEncoding {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.label())
    }
}

impl AsRef<str> for TextEncoding {
    fn as_ref(&self) -> &'static str {
        self.label()
    }
}

impl FromStr for TextEncoding {
    type Err = crate::error::Error;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(TextEncoding::Utf8),
            "iso-8859-1" | "iso8859-1" | "latin-1" | "latin1" => Ok(TextEncoding::Latin1),
            _ => exn::bail!(ErrorKind::UnsupportedEncoding(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("UTF-8", TextEncoding::Utf8)]
    #[case("utf-8", TextEncoding::Utf8)]
    #[case("utf8", TextEncoding::Utf8)]
    #[case("ISO-8859-1", TextEncoding::Latin1)]
    #[case("iso-8859-1", TextEncoding::Latin1)]
    #[case("latin1", TextEncoding::Latin1)]
    #[case("Latin-1", TextEncoding::Latin1)]
    fn test_from_str(#[case] label: &str, #[case] expected: TextEncoding) {
        assert_eq!(label.parse::<TextEncoding>().unwrap(), expected);
    }

    #[rstest]
    #[case("utf-16")]
    #[case("shift-jis")]
    #[case("")]
    fn test_from_str_invalid(#[case] label: &str) {
        assert!(label.parse::<TextEncoding>().is_err());
    }

    #[rstest]
    #[case(TextEncoding::Utf8)]
    #[case(TextEncoding::Latin1)]
    fn test_label_round_trips(#[case] encoding: TextEncoding) {
        assert_eq!(encoding.label().parse::<TextEncoding>().unwrap(), encoding);
    }

    #[test]
    fn test_utf8_round_trip() {
        let text = "Für Elise — e|--0--|";
        let bytes = TextEncoding::Utf8.encode(text).unwrap();
        assert_eq!(TextEncoding::Utf8.decode(&bytes).unwrap(), text);
    }

    #[test]
    fn test_latin1_round_trip() {
        let text = "Motörhead";
        let bytes = TextEncoding::Latin1.encode(text).unwrap();
        // One byte per character, not UTF-8's two for 'ö'
        assert_eq!(bytes.len(), text.chars().count());
        assert_eq!(TextEncoding::Latin1.decode(&bytes).unwrap(), text);
    }

    #[test]
    fn test_latin1_rejects_unmappable() {
        assert!(TextEncoding::Latin1.encode("響け").is_err());
    }

    #[test]
    fn test_utf8_rejects_invalid_bytes() {
        assert!(TextEncoding::Utf8.decode(&[0xC0, 0x00]).is_err());
        // Those same bytes are fine as Latin-1
        assert!(TextEncoding::Latin1.decode(&[0xC0, 0x00]).is_ok());
    }
}
