//! CLI command handling for structspec

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use structspec_codegen::{generate, GenerateError, GenerateReport, GoSpecRenderer, MatchMode, Stage};
use structspec_config::{logging, AppConfig, GenerateConfig};
use structspec_lang_go::GoPackageSource;
use tracing::debug;

/// The main CLI struct.
#[derive(Parser)]
#[command(name = "structspec")]
#[command(about = "Generate Go struct tag spec variables from struct declarations")]
#[command(version)]
pub struct Cli {
    /// The command to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// The available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Generate `<Struct>Spec` variables for the structs of a Go package
    ///
    /// Examples:
    ///   structspec gen --src ./models --tag json,pg
    ///   structspec gen --src ./models --structs 'User.*' --ignore UserDraft --out-file ./models/specs.go
    Gen(GenArgs),
}

/// Flags of `structspec gen`; every flag overrides the config file
#[derive(Args, Debug)]
pub struct GenArgs {
    /// Directory containing the Go files to read
    #[arg(long)]
    pub src: Option<PathBuf>,

    /// File name globs inside the source directory (default: "*")
    #[arg(long, value_delimiter = ',')]
    pub files: Vec<String>,

    /// Struct names to include (repeatable; all structs when omitted)
    #[arg(long = "structs")]
    pub structs: Vec<String>,

    /// Struct names to exclude, wins over --structs (repeatable)
    #[arg(long)]
    pub ignore: Vec<String>,

    /// Tag keys to emit (repeatable or comma separated; all keys when omitted)
    #[arg(long = "tag", value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Output file; generated code goes to stdout when omitted
    #[arg(long)]
    pub out_file: Option<PathBuf>,

    /// Package name of the generated file (default: package of the sources)
    #[arg(long)]
    pub out_pkg: Option<String>,

    /// How --structs and --ignore are matched: full-name regexes or exact names
    #[arg(long)]
    pub match_mode: Option<MatchMode>,

    /// Config file (default: structspec.toml in the working directory, if present)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl GenArgs {
    /// Overlay the flags that were given on top of `config`
    pub fn apply(self, config: &mut GenerateConfig) {
        if let Some(src) = self.src {
            config.src = Some(src);
        }
        if !self.files.is_empty() {
            config.files = self.files;
        }
        if !self.structs.is_empty() {
            config.structs = self.structs;
        }
        if !self.ignore.is_empty() {
            config.ignore = self.ignore;
        }
        if !self.tags.is_empty() {
            config.tags = self.tags;
        }
        if let Some(out_file) = self.out_file {
            config.out_file = Some(out_file);
        }
        if let Some(out_pkg) = self.out_pkg {
            config.out_pkg = Some(out_pkg);
        }
        if let Some(match_mode) = self.match_mode {
            config.match_mode = match_mode;
        }
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Gen(args) => run_gen(args).map(|_| ()),
    }
}

fn run_gen(mut args: GenArgs) -> Result<GenerateReport> {
    let config_path = args.config.take();
    let mut config = AppConfig::load(config_path.as_deref()).context("bad configuration")?;
    args.apply(&mut config.generate);

    logging::initialize(&config.logging);
    debug!(
        config = ?config_path,
        src = ?config.generate.src,
        match_mode = %config.generate.match_mode,
        "Configuration loaded"
    );

    let settings = &config.generate;
    let src = settings.require_src().context("bad configuration")?;
    let _span = logging::generate_span(src).entered();

    let source = GoPackageSource::new(src)
        .with_file_patterns(settings.files.as_slice())
        .context("bad configuration")?
        .skipping(settings.out_file.as_deref());

    generate(
        &source,
        &GoSpecRenderer,
        &settings.to_options(),
        &settings.output_target(),
    )
    .map_err(with_stage_context)
}

fn with_stage_context(err: GenerateError) -> anyhow::Error {
    let context = match err.stage {
        Stage::Configure => "bad configuration",
        Stage::Extract => "parse files",
        Stage::Render => "render output",
        Stage::Write => "write output",
    };
    anyhow::Error::new(err.source).context(context)
}
