//! Content-addressed storage of rendered formulas.

use crate::config::MathConfig;
use crate::error::{ConfigError, Result};
use crate::render::math::ConversionResult;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::info;

/// Number of hex digits of the SHA-256 digest kept in artifact names.
const DIGEST_PREFIX_LEN: usize = 16;

/// File name for a formula: `math-<16 hex digits of SHA-256>.svg`.
///
/// The same formula text always maps to the same name, so rebuilding a
/// site leaves unchanged formulas byte-identical.
pub fn artifact_name(formula: &str) -> String {
    let digest = hex::encode(Sha256::digest(formula.as_bytes()));
    format!("math-{}.svg", &digest[..DIGEST_PREFIX_LEN])
}

/// Writes rendered formulas into the output directory.
#[derive(Debug, Clone, Default)]
pub struct ArtifactStore {
    output_dir: Option<PathBuf>,
}

impl ArtifactStore {
    pub fn new(output_dir: Option<PathBuf>) -> Self {
        Self { output_dir }
    }

    pub fn from_config(config: &MathConfig) -> Self {
        Self::new(config.output_dir.clone())
    }

    /// The configured output directory.
    pub fn output_dir(&self) -> std::result::Result<&Path, ConfigError> {
        self.output_dir
            .as_deref()
            .ok_or(ConfigError::MissingOutputDir)
    }

    /// Write the SVG under its content-addressed name and return that name.
    ///
    /// An existing file with the same name is overwritten.
    pub fn store(&self, result: &ConversionResult) -> Result<String> {
        let dir = self.output_dir()?;
        let name = artifact_name(&result.formula);
        let path = dir.join(&name);
        std::fs::write(&path, &result.svg)?;
        info!(path = %path.display(), bytes = result.svg.len(), "stored formula");
        Ok(name)
    }
}
