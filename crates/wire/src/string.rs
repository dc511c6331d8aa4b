//! Length-prefixed string framing.
//!
//! A string field is a varint byte count followed by that many payload
//! bytes. The plain variant writes the encoded text directly; the
//! compressed variant gzips the encoded text and length-prefixes the
//! *compressed* bytes instead. Both share the framing, so a decoder must
//! know from context which variant a given field uses.

use crate::TextEncoding;
use crate::error::{ErrorKind, Result};
use crate::varint;
use exn::ResultExt;
use flate2::Compression as GzLevel;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use std::io::{Read, Write};

// Tab text is small; always spend the highest level.
const GZIP_LEVEL: GzLevel = GzLevel::best();

/// Extension methods for reading fretfile wire primitives from any
/// [`Read`] source.
///
/// # Examples
///
/// ```
/// use fretfile_wire::{TextEncoding, WireRead, WireWrite};
/// use std::io::Cursor;
///
/// let mut buf = Vec::new();
/// buf.write_string("e|---|", TextEncoding::Utf8).unwrap();
/// let mut cursor = Cursor::new(buf);
/// assert_eq!(cursor.read_string(TextEncoding::Utf8).unwrap(), "e|---|");
/// ```
pub trait WireRead: Read {
    /// Reads a 7-bit variable-length integer.
    fn read_varint(&mut self) -> Result<u64>
    where
        Self: Sized,
    {
        varint::read(self)
    }

    /// Reads a length-prefixed string in the given encoding.
    ///
    /// A zero-length prefix yields an empty string without consuming any
    /// further bytes. A stream that ends before the declared length is
    /// satisfied fails with [`Truncated`](ErrorKind::Truncated).
    fn read_string(&mut self, encoding: TextEncoding) -> Result<String>
    where
        Self: Sized,
    {
        let length = varint::read(self)?;
        if length == 0 {
            return Ok(String::new());
        }
        let bytes = read_payload(self, length)?;
        encoding.decode(&bytes)
    }

    /// Reads a length-prefixed gzip-compressed string.
    ///
    /// A length prefix that does not frame a valid, complete gzip stream
    /// fails with [`Decompression`](ErrorKind::Decompression).
    fn read_compressed_string(&mut self, encoding: TextEncoding) -> Result<String>
    where
        Self: Sized,
    {
        let length = varint::read(self)?;
        if length == 0 {
            return Ok(String::new());
        }
        let compressed = read_payload(self, length)?;
        let mut decoder = GzDecoder::new(compressed.as_slice());
        let mut bytes = Vec::new();
        decoder
            .read_to_end(&mut bytes)
            .or_raise(|| ErrorKind::Decompression)?;
        encoding.decode(&bytes)
    }
}
impl<R: Read> WireRead for R {}

/// Extension methods for writing fretfile wire primitives to any
/// [`Write`] sink.
pub trait WireWrite: Write {
    /// Writes a 7-bit variable-length integer.
    fn write_varint(&mut self, value: u64) -> Result<usize>
    where
        Self: Sized,
    {
        varint::write(self, value)
    }

    /// Writes a length-prefixed string in the given encoding.
    fn write_string(&mut self, text: &str, encoding: TextEncoding) -> Result<()>
    where
        Self: Sized,
    {
        let bytes = encoding.encode(text)?;
        varint::write(self, bytes.len() as u64)?;
        self.write_all(&bytes).map_err(ErrorKind::Io)?;
        Ok(())
    }

    /// Writes a length-prefixed gzip-compressed string.
    ///
    /// The length prefix counts the *compressed* bytes, not the encoded
    /// text.
    fn write_compressed_string(&mut self, text: &str, encoding: TextEncoding) -> Result<()>
    where
        Self: Sized,
    {
        let bytes = encoding.encode(text)?;
        let mut encoder = GzEncoder::new(Vec::new(), GZIP_LEVEL);
        encoder.write_all(&bytes).map_err(ErrorKind::Io)?;
        let compressed = encoder.finish().map_err(ErrorKind::Io)?;
        tracing::trace!(raw = bytes.len(), compressed = compressed.len(), "compressed string field");
        varint::write(self, compressed.len() as u64)?;
        self.write_all(&compressed).map_err(ErrorKind::Io)?;
        Ok(())
    }
}
impl<W: Write> WireWrite for W {}

/// Read exactly `length` payload bytes, detecting short streams.
fn read_payload<R: Read>(reader: &mut R, length: u64) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    reader
        .by_ref()
        .take(length)
        .read_to_end(&mut bytes)
        .map_err(ErrorKind::Io)?;
    if (bytes.len() as u64) != length {
        exn::bail!(ErrorKind::Truncated);
    }
    Ok(bytes)
}
