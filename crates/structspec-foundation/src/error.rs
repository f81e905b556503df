//! Error handling for structspec library crates

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error type shared by extraction, filtering, rendering and output stages
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum StructSpecError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Parse error at {location}: {message}")]
    Parse { location: String, message: String },

    #[error("Invalid struct tag: {message}")]
    Tag { message: String },

    #[error("Render error: {message}")]
    Render { message: String },

    #[error("I/O error: cannot {operation} '{}': {source}", .path.display())]
    Io {
        operation: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StructSpecError {
    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new parse error for a location (`file`, `file:line:column`, ...)
    pub fn parse(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            location: location.into(),
            message: message.into(),
        }
    }

    /// Create a new parse error pointing at a 1-based line and column of a file
    pub fn parse_at(path: &Path, line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::parse(
            format!("{}:{}:{}", path.display(), line, column),
            message,
        )
    }

    /// Create a new tag error
    pub fn tag(message: impl Into<String>) -> Self {
        Self::Tag {
            message: message.into(),
        }
    }

    /// Create a new render error
    pub fn render(message: impl Into<String>) -> Self {
        Self::Render {
            message: message.into(),
        }
    }

    /// Wrap an I/O error with the operation and path it failed on
    pub fn io(operation: impl Into<String>, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for convenience
pub type StructSpecResult<T> = Result<T, StructSpecError>;
