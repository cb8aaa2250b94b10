//! The `math` inline macro and block.

use super::{create_image_block, Block, BlockProcessor, InlineMacroProcessor, MacroFormat};
use crate::ast::Attributes;
use crate::config::MathConfig;
use crate::error::Result;
use crate::render::html::escape_html;
use crate::render::math::{FormulaRenderer, Metrics};
use crate::store::ArtifactStore;

/// Role given to formula blocks that have no explicit placement.
const DEFAULT_BLOCK_ROLE: &str = "text-indent";

/// A formula that has been rendered and written to the output directory.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredFormula {
    /// Artifact file name, relative to the output directory.
    pub name: String,
    pub metrics: Metrics,
    pub formula: String,
}

/// Render-then-store, shared by the inline macro and the block.
#[derive(Debug, Clone)]
pub struct MathPipeline {
    renderer: FormulaRenderer,
    store: ArtifactStore,
}

impl MathPipeline {
    pub fn new(renderer: FormulaRenderer, store: ArtifactStore) -> Self {
        Self { renderer, store }
    }

    pub fn from_config(config: &MathConfig) -> Self {
        Self::new(
            FormulaRenderer::from_config(config),
            ArtifactStore::from_config(config),
        )
    }

    /// Render a formula and store the SVG.
    ///
    /// Fails before running any tool when no output directory is set.
    pub fn render_and_store(&self, formula: &str) -> Result<StoredFormula> {
        self.store.output_dir()?;

        let result = self.renderer.render(formula)?;
        let name = self.store.store(&result)?;

        Ok(StoredFormula {
            name,
            metrics: result.metrics,
            formula: result.formula,
        })
    }
}

/// Inline macro `math:[formula]`, emitting an `<img>` sized in ex.
#[derive(Debug, Clone)]
pub struct MathInlineMacro {
    pipeline: MathPipeline,
}

impl MathInlineMacro {
    pub fn new(pipeline: MathPipeline) -> Self {
        Self { pipeline }
    }
}

impl InlineMacroProcessor for MathInlineMacro {
    fn name(&self) -> &str {
        "math"
    }

    fn format(&self) -> MacroFormat {
        MacroFormat::Short
    }

    fn process(&self, target: &str, _attrs: &Attributes) -> Result<String> {
        if target.is_empty() {
            return Ok(String::new());
        }

        let stored = self.pipeline.render_and_store(target)?;
        Ok(format!(
            r#"<img src="{}" class="inlinemath" style="height:{}ex;vertical-align:{}ex;" alt="{}"/>"#,
            escape_html(&stored.name),
            escape_html(&format_ex(stored.metrics.ex_height)),
            escape_html(&format_ex(stored.metrics.ex_valign)),
            escape_html(&stored.formula),
        ))
    }
}

/// Block `[math]` over a listing, emitting an image block.
#[derive(Debug, Clone)]
pub struct MathBlock {
    pipeline: MathPipeline,
}

impl MathBlock {
    pub fn new(pipeline: MathPipeline) -> Self {
        Self { pipeline }
    }
}

impl BlockProcessor for MathBlock {
    fn name(&self) -> &str {
        "math"
    }

    fn process(&self, lines: &[String], mut attrs: Attributes) -> Result<Option<Block>> {
        let formula = lines.join("\n");
        if formula.is_empty() {
            return Ok(None);
        }

        let stored = self.pipeline.render_and_store(&formula)?;
        attrs.insert("target".to_string(), stored.name);
        attrs.insert("alt".to_string(), stored.formula);

        if !attrs.contains_key("width") && !attrs.contains_key("height") {
            let height = stored.metrics.px_height.round() as i64;
            attrs.insert("height".to_string(), height.to_string());
        }
        if !["align", "role", "float"].iter().any(|key| attrs.contains_key(*key)) {
            attrs.insert("role".to_string(), DEFAULT_BLOCK_ROLE.to_string());
        }

        Ok(Some(create_image_block(attrs)))
    }
}

/// Round to three decimals, keeping at least one fractional digit
/// (`3.125`, `2.0`, `-0.156`). Zero depth prints as `0.0`, never `-0.0`.
fn format_ex(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    // -0.0 prints as "-0"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    if rounded.fract() == 0.0 {
        format!("{:.1}", rounded)
    } else {
        rounded.to_string()
    }
}
