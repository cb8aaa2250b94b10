//! Rendering layer: formula images and the expanded HTML output.

pub mod html;
pub mod math;

pub use html::{escape_html, expand, render_block};
pub use math::{ConversionResult, FormulaRenderer, Metrics, SystemToolchain, Toolchain};
