//! Extension points of the host and the processors registered on them.
//!
//! Three kinds of extensions exist, each looked up by name:
//!
//! - [`InlineMacroProcessor`]: replaces `name:target[text]` within a line;
//! - [`BlockProcessor`]: replaces a listing block styled `[name]`;
//! - [`BlockMacroProcessor`]: replaces a `name::target[attrs]` line.

mod disqus;
mod math;

pub use self::disqus::DisqusBlockMacro;
pub use self::math::{MathBlock, MathInlineMacro, MathPipeline, StoredFormula};

use crate::ast::Attributes;
use crate::config::Config;
use crate::error::Result;
use std::collections::HashMap;

/// Syntax an inline macro is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MacroFormat {
    /// `name:target[attrs]`
    #[default]
    Long,
    /// `name:[text]`; the bracket text is passed as the target.
    Short,
}

/// Block produced by a block-level extension.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// An image, described by attributes (`target`, `alt`, `width`,
    /// `height`, `align`, `float`, `role`).
    Image(Attributes),
    /// Raw output emitted as is.
    Pass(String),
}

/// Build an image block from attributes.
pub fn create_image_block(attrs: Attributes) -> Block {
    Block::Image(attrs)
}

/// Build a block whose content is emitted without substitutions.
pub fn create_pass_block(content: impl Into<String>) -> Block {
    Block::Pass(content.into())
}

/// Trait for inline macro extensions.
pub trait InlineMacroProcessor: Send + Sync {
    /// Macro name as written in the source.
    fn name(&self) -> &str;

    fn format(&self) -> MacroFormat {
        MacroFormat::Long
    }

    /// Produce the replacement markup.
    fn process(&self, target: &str, attrs: &Attributes) -> Result<String>;
}

/// Trait for extensions that take over listing blocks of a given style.
pub trait BlockProcessor: Send + Sync {
    /// Block style handled, as in `[name]`.
    fn name(&self) -> &str;

    /// Produce a block from the listing's lines, or nothing.
    fn process(&self, lines: &[String], attrs: Attributes) -> Result<Option<Block>>;
}

/// Trait for block macro extensions.
pub trait BlockMacroProcessor: Send + Sync {
    fn name(&self) -> &str;

    fn process(&self, target: &str, attrs: Attributes) -> Result<Option<Block>>;
}

/// Extensions known to the host, by name.
#[derive(Default)]
pub struct Registry {
    inline_macros: HashMap<String, Box<dyn InlineMacroProcessor>>,
    blocks: HashMap<String, Box<dyn BlockProcessor>>,
    block_macros: HashMap<String, Box<dyn BlockMacroProcessor>>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the `math` inline macro and block, plus `disqus`
    /// when a comment widget is configured.
    pub fn with_defaults(config: &Config) -> Result<Self> {
        config.validate()?;

        let pipeline = MathPipeline::from_config(&config.math);
        let mut registry = Self::new();
        registry.inline_macro(MathInlineMacro::new(pipeline.clone()));
        registry.block(MathBlock::new(pipeline));

        if let Some(ref disqus) = config.disqus {
            registry.block_macro(DisqusBlockMacro::new(disqus.clone()));
        }

        Ok(registry)
    }

    /// Register an inline macro, replacing any with the same name.
    pub fn inline_macro(&mut self, processor: impl InlineMacroProcessor + 'static) -> &mut Self {
        self.inline_macros
            .insert(processor.name().to_string(), Box::new(processor));
        self
    }

    /// Register a block processor, replacing any with the same name.
    pub fn block(&mut self, processor: impl BlockProcessor + 'static) -> &mut Self {
        self.blocks
            .insert(processor.name().to_string(), Box::new(processor));
        self
    }

    /// Register a block macro, replacing any with the same name.
    pub fn block_macro(&mut self, processor: impl BlockMacroProcessor + 'static) -> &mut Self {
        self.block_macros
            .insert(processor.name().to_string(), Box::new(processor));
        self
    }

    pub fn find_inline_macro(&self, name: &str) -> Option<&dyn InlineMacroProcessor> {
        self.inline_macros.get(name).map(|p| p.as_ref())
    }

    pub fn find_block(&self, name: &str) -> Option<&dyn BlockProcessor> {
        self.blocks.get(name).map(|p| p.as_ref())
    }

    pub fn find_block_macro(&self, name: &str) -> Option<&dyn BlockMacroProcessor> {
        self.block_macros.get(name).map(|p| p.as_ref())
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("inline_macros", &self.inline_macros.keys().collect::<Vec<_>>())
            .field("blocks", &self.blocks.keys().collect::<Vec<_>>())
            .field("block_macros", &self.block_macros.keys().collect::<Vec<_>>())
            .finish()
    }
}
