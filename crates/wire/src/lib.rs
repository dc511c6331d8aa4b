//! Wire primitives shared by the fretfile on-disk formats.
//!
//! This crate provides the low-level encodings every fretfile document is
//! built from:
//!
//! - **Varints** ([`varint`]) — unsigned integers packed 7 bits per byte,
//!   high bit as the continuation flag, least-significant group first
//! - **Text encodings** ([`TextEncoding`]) — the character encodings the
//!   formats declare for their text fields
//! - **Length-prefixed strings** ([`WireRead`]/[`WireWrite`]) — a varint
//!   byte count followed by the encoded text, plus a gzip-compressed
//!   variant that shares the framing but compresses the payload
//!
//! The string methods are extension traits blanket-implemented for any
//! [`std::io::Read`]/[`std::io::Write`], so they compose with files,
//! buffered wrappers, and in-memory cursors alike.

pub mod error;
mod encoding;
mod string;
pub mod varint;

pub use crate::encoding::TextEncoding;
pub use crate::string::{WireRead, WireWrite};
