//! Versioned binary tablature documents.
//!
//! A fretfile binary document is a [`FileHeader`] (magic identifier,
//! `major.minor` format version, compression flag) followed by the fields
//! of a per-format schema in fixed wire order. This crate provides:
//!
//! - The header codec ([`read_header`]/[`write_header`]), which gates
//!   every read on an exact magic match and returns the version as data
//!   for the caller to police
//! - The [`TablatureRecord`] model and its schema-driven codec
//!   ([`tablature::save`], [`tablature::load`], [`tablature::header`])
//! - The [`TablatureTextImporter`] interface consumed by import layers

pub mod error;
mod header;
mod import;
mod record;
mod schema;
pub mod tablature;

pub use crate::header::{FileHeader, FormatVersion, MAGIC, read_header, write_header};
pub use crate::import::TablatureTextImporter;
pub use crate::record::{SourceKind, TablatureRecord, TablatureType};
pub use crate::schema::{FieldCodec, FieldSpec, TABLATURE_SCHEMA, TextField};
