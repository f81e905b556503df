//! Extractor interface
//!
//! Language crates implement [`DeclarationSource`] so that filtering, reshaping
//! and rendering never depend on a concrete source-parsing facility.

use crate::error::StructSpecResult;
use crate::model::StructRecord;

/// Provides struct declarations for one generation run
pub trait DeclarationSource {
    /// Package name declared by the scanned sources.
    ///
    /// Used for the generated file when no output package is configured.
    fn package_name(&self) -> StructSpecResult<String>;

    /// All struct declarations with their fields and parsed tags, in a
    /// deterministic order. Any parse failure aborts the whole call.
    fn structs(&self) -> StructSpecResult<Vec<StructRecord>>;
}
