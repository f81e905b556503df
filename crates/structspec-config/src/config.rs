//! Application configuration

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use structspec_codegen::{GenerateOptions, MatchMode, OutputTarget};
use structspec_foundation::{StructSpecError, StructSpecResult};

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "structspec.toml";

/// Prefix of environment overrides, `STRUCTSPEC__LOGGING__LEVEL=debug`
pub const ENV_PREFIX: &str = "STRUCTSPEC__";

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Code generation settings
    pub generate: GenerateConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Settings of one `gen` run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateConfig {
    /// Directory of Go files to read
    pub src: Option<PathBuf>,
    /// File name globs inside `src`
    pub files: Vec<String>,
    /// Struct name include patterns, empty keeps every struct
    pub structs: Vec<String>,
    /// Struct name exclude patterns
    pub ignore: Vec<String>,
    /// Tag keys to keep, empty keeps every key
    pub tags: Vec<String>,
    /// Output file, stdout when absent
    pub out_file: Option<PathBuf>,
    /// Output package name, taken from the sources when absent
    pub out_pkg: Option<String>,
    /// How struct name patterns are interpreted
    pub match_mode: MatchMode,
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format
    #[default]
    Pretty,
    /// Structured JSON format
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format
    pub format: LogFormat,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            src: None,
            files: vec!["*".to_string()],
            structs: Vec::new(),
            ignore: Vec::new(),
            tags: Vec::new(),
            out_file: None,
            out_pkg: None,
            match_mode: MatchMode::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

const VALID_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl AppConfig {
    /// Load configuration
    ///
    /// Configuration is loaded in the following priority order (highest to lowest):
    /// 1. Environment variables (`STRUCTSPEC__*`)
    /// 2. `config_path`, or `structspec.toml` in the working directory
    /// 3. Default values
    ///
    /// A `config_path` that does not exist is an error; a missing
    /// `structspec.toml` is not.
    ///
    /// Loading happens before the tracing subscriber exists, so nothing is
    /// logged here; the caller reports the loaded values once logging is up.
    pub fn load(config_path: Option<&Path>) -> StructSpecResult<Self> {
        let figment = Self::figment(config_path)?.merge(
            Env::prefixed(ENV_PREFIX)
                .map(|k| k.as_str().to_lowercase().into())
                .split("__"),
        );

        Self::from_figment(figment)
    }

    /// Defaults layered with the config file, without environment overrides
    pub fn figment(config_path: Option<&Path>) -> StructSpecResult<Figment> {
        let figment = Figment::from(Serialized::defaults(AppConfig::default()));

        let file = match config_path {
            Some(path) if !path.is_file() => {
                return Err(StructSpecError::config(format!(
                    "config file '{}' does not exist",
                    path.display()
                )));
            }
            Some(path) => Some(path.to_path_buf()),
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                default_path.is_file().then_some(default_path)
            }
        };

        Ok(match file {
            Some(path) => figment.merge(Toml::file(path)),
            None => figment,
        })
    }

    /// Extract and validate a configuration
    pub fn from_figment(figment: Figment) -> StructSpecResult<Self> {
        let app_config: AppConfig = figment
            .extract()
            .map_err(|e| StructSpecError::config(format!("Failed to load configuration: {}", e)))?;

        app_config.validate()?;
        Ok(app_config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> StructSpecResult<()> {
        let level = self.logging.level.trim();
        if level.is_empty() {
            return Err(StructSpecError::config("Log level cannot be empty"));
        }

        if !VALID_LEVELS.contains(&level.to_lowercase().as_str()) {
            return Err(StructSpecError::config(format!(
                "Invalid log level '{}', must be one of: {}",
                self.logging.level,
                VALID_LEVELS.join(", ")
            )));
        }

        // An empty list would match no file at all
        if self.generate.files.iter().any(|f| f.trim().is_empty()) {
            return Err(StructSpecError::config("File patterns cannot be empty"));
        }

        Ok(())
    }
}

impl GenerateConfig {
    /// The source directory, which has no default
    pub fn require_src(&self) -> StructSpecResult<&Path> {
        self.src
            .as_deref()
            .ok_or_else(|| StructSpecError::config("source directory is required (--src)"))
    }

    pub fn to_options(&self) -> GenerateOptions {
        GenerateOptions {
            include_structs: self.structs.clone(),
            ignore_structs: self.ignore.clone(),
            tags: self.tags.clone(),
            match_mode: self.match_mode,
            out_package: self.out_pkg.clone(),
        }
    }

    pub fn output_target(&self) -> OutputTarget {
        OutputTarget::from_path(self.out_file.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.generate.files, vec!["*"]);
        assert_eq!(config.generate.match_mode, MatchMode::Regex);
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_file_layer_overrides_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("custom.toml");
        std::fs::write(
            &path,
            r#"
[generate]
src = "./models"
tags = ["json", "pg"]
match_mode = "exact"
out_pkg = "specs"

[logging]
format = "json"
"#,
        )
        .unwrap();

        let config = AppConfig::from_figment(AppConfig::figment(Some(&path)).unwrap()).unwrap();

        assert_eq!(config.generate.src, Some(PathBuf::from("./models")));
        assert_eq!(config.generate.tags, vec!["json", "pg"]);
        assert_eq!(config.generate.match_mode, MatchMode::Exact);
        assert_eq!(config.generate.out_pkg.as_deref(), Some("specs"));
        // Untouched keys keep their defaults
        assert_eq!(config.generate.files, vec!["*"]);
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_later_layers_win() {
        let figment = Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::string("[logging]\nlevel = \"info\""))
            .merge(Serialized::default("logging.level", "debug"));

        let config = AppConfig::from_figment(figment).unwrap();
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_missing_explicit_config_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = AppConfig::figment(Some(&temp_dir.path().join("nope.toml"))).unwrap_err();

        assert!(matches!(err, StructSpecError::Config { .. }));
        assert!(err.to_string().contains("nope.toml"));
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.toml");
        std::fs::write(&path, "[generate]\nmatch_mode = \"fuzzy\"\n").unwrap();

        let err = AppConfig::from_figment(AppConfig::figment(Some(&path)).unwrap()).unwrap_err();
        assert!(matches!(err, StructSpecError::Config { .. }));
    }

    #[test]
    fn test_validate_log_level() {
        let mut config = AppConfig::default();

        config.logging.level = String::new();
        assert!(config.validate().is_err());

        config.logging.level = "loud".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("loud"));

        config.logging.level = "DEBUG".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_require_src() {
        let mut generate = GenerateConfig::default();
        assert!(generate.require_src().is_err());

        generate.src = Some(PathBuf::from("models"));
        assert_eq!(generate.require_src().unwrap(), Path::new("models"));
    }

    #[test]
    fn test_to_options_and_target() {
        let generate = GenerateConfig {
            structs: vec!["User".to_string()],
            ignore: vec!["Internal.*".to_string()],
            tags: vec!["json".to_string()],
            out_file: Some(PathBuf::from("specs.go")),
            out_pkg: Some("specs".to_string()),
            ..GenerateConfig::default()
        };

        let options = generate.to_options();
        assert_eq!(options.include_structs, vec!["User"]);
        assert_eq!(options.ignore_structs, vec!["Internal.*"]);
        assert_eq!(options.tags, vec!["json"]);
        assert_eq!(options.out_package.as_deref(), Some("specs"));
        assert_eq!(
            generate.output_target(),
            OutputTarget::File(PathBuf::from("specs.go"))
        );
        assert_eq!(
            GenerateConfig::default().output_target(),
            OutputTarget::Stdout
        );
    }
}
