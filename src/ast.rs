//! Source nodes seen by the extension host.
//!
//! The host does not model the markup language; it only isolates the
//! constructs extensions can claim and keeps everything else as text.

use std::collections::BTreeMap;

/// Named attributes of a macro or block, e.g. `width=200`.
pub type Attributes = BTreeMap<String, String>;

/// A parsed source document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub nodes: Vec<Node>,
    /// Whether the source ended with a newline.
    pub trailing_newline: bool,
}

/// Line-level nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// An ordinary line, split around inline macros.
    Line(Vec<Inline>),

    /// A block macro occupying a whole line: `name::target[attrs]`.
    BlockMacro {
        name: String,
        target: String,
        attrs: Attributes,
        source: String,
    },

    /// A delimited listing block, with the style from its attribute line
    /// (`[math]`) if one precedes it.
    Listing {
        style: Option<String>,
        attrs: Attributes,
        lines: Vec<String>,
        source: String,
    },
}

/// Inline content of a line.
#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    Text(String),

    /// `name:target[text]`, or the short form `name:[text]` with an empty target.
    Macro {
        name: String,
        target: String,
        /// Bracket content with `\]` unescaped.
        text: String,
        source: String,
    },
}

/// Parsed bracket attribute list: `[style, key=value, "quoted"]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeList {
    pub positional: Vec<String>,
    pub named: Attributes,
}
