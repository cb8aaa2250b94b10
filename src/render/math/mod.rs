//! Formula rendering through the TeX toolchain.
//!
//! A formula goes through three conversions inside a private temporary
//! directory:
//!
//! 1. `latex` turns the generated document into DVI;
//! 2. `dvisvgm` turns the DVI into the SVG that is published;
//! 3. `dvipng` rasterizes the DVI once more, only to learn the image
//!    height and the baseline depth that size the SVG in the page.

mod raster;
mod template;
mod toolchain;

pub use self::raster::{parse_depth, png_dimensions};
pub use self::template::latex_document;
pub use self::toolchain::{SystemToolchain, Toolchain};

#[cfg(test)]
pub(crate) use self::raster::png_header;

use crate::config::{MathConfig, MetricSettings};
use crate::error::ToolchainError;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

const TEX_FILE: &str = "formula.tex";
const DVI_FILE: &str = "formula.dvi";
const SVG_FILE: &str = "formula.svg";
const PNG_FILE: &str = "formula.png";

/// Vertical metrics of a rendered formula.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    /// Image height in ex of the surrounding text.
    pub ex_height: f64,
    /// Baseline shift in ex; never positive.
    pub ex_valign: f64,
    /// Image height in CSS pixels.
    pub px_height: f64,
}

impl Metrics {
    /// Derive metrics from the raster height and depth (in raster pixels).
    pub fn from_raster(height: u32, depth: u32, settings: &MetricSettings) -> Self {
        let scale = settings.raster_px_per_ex();
        let ex_height = f64::from(height) / scale;
        Self {
            ex_height,
            ex_valign: -f64::from(depth) / scale,
            px_height: ex_height * settings.px_per_ex,
        }
    }
}

/// Output of a single formula conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionResult {
    /// SVG document bytes.
    pub svg: Vec<u8>,
    pub metrics: Metrics,
    /// The formula as written by the author.
    pub formula: String,
}

/// Renders formulas to SVG with a [`Toolchain`].
#[derive(Clone)]
pub struct FormulaRenderer {
    toolchain: Arc<dyn Toolchain>,
    settings: MetricSettings,
}

impl std::fmt::Debug for FormulaRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormulaRenderer")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl FormulaRenderer {
    /// Create a renderer over any toolchain.
    pub fn new(toolchain: impl Toolchain + 'static, settings: MetricSettings) -> Self {
        Self {
            toolchain: Arc::new(toolchain),
            settings,
        }
    }

    /// Create a renderer running the configured system programs.
    pub fn from_config(config: &MathConfig) -> Self {
        Self::new(SystemToolchain::new(config.tools.clone()), config.metrics)
    }

    /// Render a formula.
    ///
    /// The temporary working directory is removed when this returns,
    /// whether or not the conversion succeeded.
    pub fn render(&self, formula: &str) -> Result<ConversionResult, ToolchainError> {
        let workdir = tempfile::Builder::new()
            .prefix("mathsvg-")
            .tempdir()
            .map_err(ToolchainError::WorkDir)?;
        self.render_in(workdir.path(), formula)
    }

    fn render_in(&self, dir: &Path, formula: &str) -> Result<ConversionResult, ToolchainError> {
        let tex = latex_document(formula);
        debug!(%tex, "generated LaTeX source");
        std::fs::write(dir.join(TEX_FILE), tex).map_err(ToolchainError::WorkDir)?;

        self.toolchain.compile(dir, TEX_FILE)?;

        self.toolchain.dvi_to_svg(dir, DVI_FILE)?;
        let svg = read_output("dvisvgm", dir.join(SVG_FILE))?;

        let report = self
            .toolchain
            .dvi_to_png(dir, DVI_FILE, PNG_FILE, self.settings.dpi())?;
        let depth = parse_depth(&report)?;
        let png = read_output("dvipng", dir.join(PNG_FILE))?;
        let (width, height) = png_dimensions(&png)?;
        debug!(width, height, depth, "raster metrics");

        Ok(ConversionResult {
            svg,
            metrics: Metrics::from_raster(height, depth, &self.settings),
            formula: formula.to_string(),
        })
    }
}

fn read_output(tool: &str, path: PathBuf) -> Result<Vec<u8>, ToolchainError> {
    std::fs::read(&path).map_err(|source| ToolchainError::MissingOutput {
        tool: tool.to_string(),
        path,
        source,
    })
}
