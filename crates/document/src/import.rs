//! Text import interface.

use crate::error::Result;
use crate::record::{TablatureRecord, TablatureType};

/// Text-based tab source.
///
/// Implementations parse a site- or layout-specific plain-text tab into a
/// [`TablatureRecord`]. The caller supplies the type tag explicitly;
/// importers never guess it.
pub trait TablatureTextImporter {
    /// Parses a tab from its text source.
    fn parse(&self, text: &str, tab_type: TablatureType) -> Result<TablatureRecord>;
}
