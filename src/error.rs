//! Error types for the adoc-mathsvg library.

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Result type alias for this library.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the library.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Toolchain error: {0}")]
    Toolchain(#[from] ToolchainError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that occur while splitting source text into nodes.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Unterminated listing block opened at line {line}")]
    UnterminatedBlock { line: usize },
}

/// Errors in the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No math output directory configured (set MATH_OUTPUT or math.output_dir)")]
    MissingOutputDir,

    #[error("Invalid setting `{key}`: {message}")]
    InvalidSetting { key: &'static str, message: String },

    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised by the external TeX toolchain.
#[derive(Debug, Error)]
pub enum ToolchainError {
    #[error("Failed to start `{tool}`: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{tool}` execution failed ({status}): {output}")]
    Failed {
        tool: String,
        status: ExitStatus,
        output: String,
    },

    #[error("`{tool}` did not produce {path}: {source}")]
    MissingOutput {
        tool: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("dvipng did not report a depth: {0}")]
    MissingDepth(String),

    #[error("Malformed PNG header: {0}")]
    MalformedRaster(String),

    #[error("Failed to prepare working directory: {0}")]
    WorkDir(#[source] std::io::Error),
}
