//! Expansion of extension constructs into HTML.

use crate::ast::{Attributes, Document, Inline, Node};
use crate::error::Result;
use crate::extensions::{Block, MacroFormat, Registry};
use crate::parser::attribute_list;
use tracing::{debug, warn};

/// Expand every registered construct in a document.
///
/// Constructs without a registered extension are emitted exactly as
/// written, as is all other text.
pub fn expand(doc: &Document, registry: &Registry) -> Result<String> {
    let mut expander = Expander::new(registry);
    expander.expand(doc)
}

struct Expander<'a> {
    registry: &'a Registry,
    lines: Vec<String>,
}

impl<'a> Expander<'a> {
    fn new(registry: &'a Registry) -> Self {
        Self {
            registry,
            lines: Vec::new(),
        }
    }

    fn expand(&mut self, doc: &Document) -> Result<String> {
        for node in &doc.nodes {
            self.expand_node(node)?;
        }

        let mut output = std::mem::take(&mut self.lines).join("\n");
        if doc.trailing_newline && !output.is_empty() {
            output.push('\n');
        }
        Ok(output)
    }

    fn expand_node(&mut self, node: &Node) -> Result<()> {
        match node {
            Node::Line(inlines) => {
                let line = self.expand_inlines(inlines)?;
                self.lines.push(line);
            }
            Node::BlockMacro {
                name,
                target,
                attrs,
                source,
            } => match self.registry.find_block_macro(name) {
                Some(processor) => {
                    if let Some(block) = processor.process(target, attrs.clone())? {
                        self.lines.push(render_block(&block));
                    }
                }
                None => {
                    warn!(name = %name, "no block macro registered, keeping source");
                    self.lines.push(source.clone());
                }
            },
            Node::Listing {
                style,
                attrs,
                lines,
                source,
            } => match style.as_deref().and_then(|s| self.registry.find_block(s)) {
                Some(processor) => {
                    if let Some(block) = processor.process(lines, attrs.clone())? {
                        self.lines.push(render_block(&block));
                    }
                }
                None => self.lines.push(source.clone()),
            },
        }
        Ok(())
    }

    fn expand_inlines(&self, inlines: &[Inline]) -> Result<String> {
        let mut line = String::new();

        for inline in inlines {
            match inline {
                Inline::Text(text) => line.push_str(text),
                Inline::Macro {
                    name,
                    target,
                    text,
                    source,
                } => {
                    let Some(processor) = self.registry.find_inline_macro(name) else {
                        debug!(name = %name, "no inline macro registered, keeping source");
                        line.push_str(source);
                        continue;
                    };

                    match (processor.format(), target.is_empty()) {
                        (MacroFormat::Short, true) => {
                            line.push_str(&processor.process(text, &Attributes::new())?);
                        }
                        (MacroFormat::Long, false) => {
                            let attrs = attribute_list(text).named;
                            line.push_str(&processor.process(target, &attrs)?);
                        }
                        _ => {
                            debug!(name = %name, "macro written in the wrong format, keeping source");
                            line.push_str(source);
                        }
                    }
                }
            }
        }

        Ok(line)
    }
}

/// Render a block produced by an extension.
pub fn render_block(block: &Block) -> String {
    match block {
        Block::Image(attrs) => render_image(attrs),
        Block::Pass(content) => content.clone(),
    }
}

fn render_image(attrs: &Attributes) -> String {
    let mut classes = vec!["imageblock".to_string()];
    if let Some(float) = attrs.get("float") {
        classes.push(float.clone());
    }
    if let Some(align) = attrs.get("align") {
        classes.push(format!("text-{}", align));
    }
    if let Some(role) = attrs.get("role") {
        classes.push(role.clone());
    }

    let attr = |key: &str| attrs.get(key).map(String::as_str).unwrap_or_default();
    let mut img = format!(
        r#"<img src="{}" alt="{}""#,
        escape_html(attr("target")),
        escape_html(attr("alt"))
    );
    for key in ["width", "height"] {
        if let Some(value) = attrs.get(key) {
            img.push_str(&format!(r#" {}="{}""#, key, escape_html(value)));
        }
    }
    img.push('>');

    format!(
        "<div class=\"{}\">\n<div class=\"content\">\n{}\n</div>\n</div>",
        escape_html(&classes.join(" ")),
        img
    )
}

/// Escape text for HTML content and attribute values.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
