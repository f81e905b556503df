//! Configuration management for structspec
//!
//! - [`config`] - layered [`AppConfig`] loading (defaults, TOML file, environment)
//! - [`logging`] - tracing subscriber initialization

pub mod config;
pub mod logging;

pub use config::{AppConfig, GenerateConfig, LogFormat, LoggingConfig};
