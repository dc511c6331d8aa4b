//! Small XML helpers shared by the index and playlist documents.

use crate::error::{ErrorKind, Result};
use fretfile_wire::TextEncoding;
use quick_xml::events::{BytesDecl, BytesStart, BytesText};

pub(crate) fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Looks up an attribute by name, unescaping its value.
pub(crate) fn attribute(start: &BytesStart, name: &[u8]) -> Result<Option<String>> {
    for attr in start.attributes() {
        let attr = attr.map_err(|e| exn::Exn::from(ErrorKind::Malformed(e.to_string())))?;
        if attr.key.as_ref() == name {
            let value = attr
                .unescape_value()
                .map_err(|e| exn::Exn::from(ErrorKind::Malformed(e.to_string())))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// Unescapes a text node.
pub(crate) fn text(event: &BytesText) -> Result<String> {
    let value = event
        .unescape()
        .map_err(|e| exn::Exn::from(ErrorKind::Malformed(e.to_string())))?;
    Ok(value.into_owned())
}

/// Reads the declared encoding out of an XML declaration, if any.
pub(crate) fn declared_encoding(decl: &BytesDecl) -> Result<Option<TextEncoding>> {
    let Some(enc) = decl.encoding() else {
        return Ok(None);
    };
    let enc = enc.map_err(|e| exn::Exn::from(ErrorKind::Malformed(e.to_string())))?;
    let label = String::from_utf8_lossy(&enc);
    let encoding = label.parse::<TextEncoding>().map_err(ErrorKind::encoding)?;
    Ok(Some(encoding))
}
