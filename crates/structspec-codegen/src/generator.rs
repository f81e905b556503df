//! One generation run: extract, filter, reshape, render, emit

use crate::filter::StructFilter;
use crate::matcher::MatchMode;
use crate::output::{self, OutputTarget};
use crate::render::Renderer;
use crate::reshape::reshape;
use std::fmt;
use structspec_foundation::{DeclarationSource, RenderModel, StructSpecError, StructSpecResult};
use thiserror::Error;
use tracing::{debug, info};

/// Settings for one run, already merged from config file and CLI flags
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Struct name rules; empty means "all structs"
    pub include_structs: Vec<String>,
    /// Struct name rules that always win over `include_structs`
    pub ignore_structs: Vec<String>,
    /// Tag keys to emit; empty means "every key found"
    pub tags: Vec<String>,
    pub match_mode: MatchMode,
    /// Package clause of the generated file; taken from the source when `None`
    pub out_package: Option<String>,
}

/// What a successful run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateReport {
    pub structs_found: usize,
    pub structs_rendered: usize,
    pub package_name: String,
}

/// Pipeline step a [`GenerateError`] comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Invalid name rules
    Configure,
    /// Reading or parsing declarations
    Extract,
    Render,
    /// Printing or writing the generated file
    Write,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Configure => "configure",
            Stage::Extract => "extract",
            Stage::Render => "render",
            Stage::Write => "write",
        })
    }
}

/// A failed [`generate`] run
#[derive(Error, Debug)]
#[error("{stage} stage failed: {source}")]
pub struct GenerateError {
    pub stage: Stage,
    #[source]
    pub source: StructSpecError,
}

impl GenerateError {
    fn at(stage: Stage) -> impl FnOnce(StructSpecError) -> Self {
        move |source| Self { stage, source }
    }
}

/// Extract, filter and reshape declarations into a [`RenderModel`].
///
/// Name rules are compiled before the source is touched, so a bad pattern
/// fails without any parsing work.
pub fn build_model(
    source: &dyn DeclarationSource,
    options: &GenerateOptions,
) -> StructSpecResult<(RenderModel, usize)> {
    let filter = StructFilter::new(
        options.match_mode,
        options.include_structs.as_slice(),
        options.ignore_structs.as_slice(),
    )?;

    let package_name = match &options.out_package {
        Some(name) if !name.is_empty() => name.clone(),
        _ => source.package_name()?,
    };
    debug!(package = %package_name, "Resolved output package");

    let all_structs = source.structs()?;
    let structs_found = all_structs.len();

    let target_structs = filter.apply(all_structs);
    let structs = reshape(&target_structs, options.tags.as_slice());

    Ok((
        RenderModel {
            package_name,
            structs,
        },
        structs_found,
    ))
}

/// Run the whole pipeline and send the result to `target`.
///
/// Nothing is written unless extraction and rendering both succeed.
pub fn generate(
    source: &dyn DeclarationSource,
    renderer: &dyn Renderer,
    options: &GenerateOptions,
    target: &OutputTarget,
) -> Result<GenerateReport, GenerateError> {
    let (model, structs_found) = build_model(source, options).map_err(|e| {
        let stage = match e {
            StructSpecError::Config { .. } => Stage::Configure,
            _ => Stage::Extract,
        };
        GenerateError { stage, source: e }
    })?;
    let rendered = renderer
        .render(&model)
        .map_err(GenerateError::at(Stage::Render))?;

    output::emit(&rendered, target).map_err(GenerateError::at(Stage::Write))?;

    let report = GenerateReport {
        structs_found,
        structs_rendered: model.structs.len(),
        package_name: model.package_name,
    };

    info!(
        found = report.structs_found,
        rendered = report.structs_rendered,
        package = %report.package_name,
        "Generation finished"
    );

    Ok(report)
}
