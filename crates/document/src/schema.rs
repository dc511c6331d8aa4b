//! Per-format field schemas.
//!
//! Which fields a binary format carries, in what order, and which string
//! framing each text field uses is declared once as an ordered table.
//! The codec loops over the table; a new format adds a schema instead of
//! duplicating read/write logic.

use crate::record::{TablatureRecord, TablatureType};

/// A text field of the tablature record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextField {
    Artist,
    Title,
    TypeTag,
    Source,
    Comment,
    Contents,
}

/// How a text field's payload is framed on the wire.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FieldCodec {
    /// Varint length prefix over the raw encoded bytes
    #[default]
    Plain,
    /// The same framing over a gzipped payload
    Compressed,
}

/// One wire-order field of a binary format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldSpec {
    /// 8-byte little-endian tick count
    Created,
    /// 4-byte little-endian signed ordinal
    SourceKind,
    /// Length-prefixed text in the given framing
    Text(TextField, FieldCodec),
}

/// The tablature binary format, in wire order.
///
/// Every text field uses the plain framing, including `contents`, the
/// largest field; the compressed framing is not part of this format's
/// layout.
pub const TABLATURE_SCHEMA: &[FieldSpec] = &[
    FieldSpec::Created,
    FieldSpec::Text(TextField::Artist, FieldCodec::Plain),
    FieldSpec::Text(TextField::Title, FieldCodec::Plain),
    FieldSpec::Text(TextField::TypeTag, FieldCodec::Plain),
    FieldSpec::SourceKind,
    FieldSpec::Text(TextField::Source, FieldCodec::Plain),
    FieldSpec::Text(TextField::Comment, FieldCodec::Plain),
    FieldSpec::Text(TextField::Contents, FieldCodec::Plain),
];

impl TablatureRecord {
    pub(crate) fn text_field(&self, field: TextField) -> &str {
        match field {
            TextField::Artist => &self.artist,
            TextField::Title => &self.title,
            TextField::TypeTag => self.tab_type.name(),
            TextField::Source => &self.source,
            TextField::Comment => &self.comment,
            TextField::Contents => &self.contents,
        }
    }

    pub(crate) fn set_text_field(&mut self, field: TextField, value: String) {
        match field {
            TextField::Artist => self.artist = value,
            TextField::Title => self.title = value,
            TextField::TypeTag => self.tab_type = TablatureType::new(value),
            TextField::Source => self.source = value,
            TextField::Comment => self.comment = value,
            TextField::Contents => self.contents = value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_covers_every_text_field_once() {
        let text_fields: Vec<TextField> = TABLATURE_SCHEMA
            .iter()
            .filter_map(|spec| match spec {
                FieldSpec::Text(field, _) => Some(*field),
                _ => None,
            })
            .collect();
        for field in [
            TextField::Artist,
            TextField::Title,
            TextField::TypeTag,
            TextField::Source,
            TextField::Comment,
            TextField::Contents,
        ] {
            assert_eq!(text_fields.iter().filter(|f| **f == field).count(), 1);
        }
    }

    #[test]
    fn test_schema_order() {
        assert_eq!(TABLATURE_SCHEMA.first(), Some(&FieldSpec::Created));
        assert_eq!(
            TABLATURE_SCHEMA.last(),
            Some(&FieldSpec::Text(TextField::Contents, FieldCodec::Plain))
        );
        // The source ordinal sits between the type tag and the source URI
        let ordinal_at = TABLATURE_SCHEMA.iter().position(|s| *s == FieldSpec::SourceKind);
        assert_eq!(ordinal_at, Some(4));
    }
}
