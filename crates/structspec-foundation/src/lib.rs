//! Foundation Layer - declaration model, error types and extractor interface
//!
//! This crate provides the building blocks shared by every other structspec crate:
//! - [`model`] - structs, fields and tags as extracted from source, plus the
//!   render model produced by the reshape stage
//! - [`error`] - the [`StructSpecError`] taxonomy used by all library crates
//! - [`source`] - the [`DeclarationSource`] trait implemented by language extractors

pub mod error;
pub mod model;
pub mod source;

// Re-export commonly used types for convenience
pub use error::*;
pub use model::*;
pub use source::DeclarationSource;
