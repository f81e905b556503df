//! Code generation pipeline for structspec
//!
//! The pipeline takes struct declarations from any
//! [`DeclarationSource`](structspec_foundation::DeclarationSource) and turns them
//! into one generated Go file:
//!
//! 1. [`filter`] - keep structs selected by include/exclude name rules
//! 2. [`reshape`] - group fields by tag key into sorted [`TagGroup`](structspec_foundation::TagGroup)s
//! 3. [`render`] - build Go source text from the [`RenderModel`](structspec_foundation::RenderModel)
//! 4. [`output`] - print the text or replace the output file atomically
//!
//! [`generator::generate`] wires the stages together.
//!
//! # Example
//!
//! ```rust
//! use structspec_codegen::filter::StructFilter;
//! use structspec_codegen::matcher::MatchMode;
//! use structspec_codegen::reshape::reshape;
//! use structspec_foundation::{FieldRecord, StructRecord, TagValue};
//!
//! let structs = vec![StructRecord::new(
//!     "User",
//!     vec![FieldRecord::new("ID").with_tag("json", TagValue::new("id"))],
//! )];
//!
//! let filter = StructFilter::new(MatchMode::Regex, &["User"], &[]).unwrap();
//! let specs = reshape(&filter.apply(structs), &["json"]);
//! assert_eq!(specs[0].tag_groups[0].display_name, "Json");
//! ```

pub mod filter;
pub mod generator;
pub mod matcher;
pub mod output;
pub mod render;
pub mod reshape;

pub use filter::StructFilter;
pub use generator::{build_model, generate, GenerateError, GenerateOptions, GenerateReport, Stage};
pub use matcher::{MatchMode, NameMatcher};
pub use output::OutputTarget;
pub use render::{GoSpecRenderer, Renderer};
pub use reshape::{display_name, reshape};
