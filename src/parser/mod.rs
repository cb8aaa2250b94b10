//! Parser that isolates extension constructs in markup source.
//!
//! Recognized constructs:
//!
//! - inline macros `name:target[text]` and `name:[text]` anywhere in a line;
//! - block macros `name::target[attrs]` on a line of their own;
//! - listing blocks delimited by `----`, optionally styled by a preceding
//!   attribute line such as `[math]`.
//!
//! Everything else is kept as text.

mod inline;
mod lexer;

pub use inline::parse_line;
pub use lexer::attribute_list;

use crate::ast::{AttributeList, Document, Node};
use crate::error::{ParseError, Result};
use lexer::{block_attribute_line, block_macro, listing_delimiter};

/// Parse a complete document from source text.
pub fn parse(input: &str) -> Result<Document> {
    let lines: Vec<&str> = input.lines().collect();
    let mut nodes = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i].trim_end();

        // [style,attrs] directly above a listing delimiter
        if let Ok((_, attrlist)) = block_attribute_line(line) {
            if let Some(next) = lines.get(i + 1) {
                if listing_delimiter(next.trim_end()).is_ok() {
                    let (node, end) = parse_listing(&lines, i + 1, Some(attrlist.as_str()))?;
                    nodes.push(node);
                    i = end;
                    continue;
                }
            }
        }

        if listing_delimiter(line).is_ok() {
            let (node, end) = parse_listing(&lines, i, None)?;
            nodes.push(node);
            i = end;
            continue;
        }

        if let Ok((_, (name, target, attrlist))) = block_macro(line) {
            nodes.push(Node::BlockMacro {
                name: name.to_string(),
                target: target.to_string(),
                attrs: attribute_list(&attrlist).named,
                source: lines[i].to_string(),
            });
            i += 1;
            continue;
        }

        nodes.push(Node::Line(parse_line(lines[i])));
        i += 1;
    }

    Ok(Document {
        nodes,
        trailing_newline: input.ends_with('\n'),
    })
}

/// Parse the listing whose opening delimiter is `lines[open]`.
///
/// Returns the node and the index of the line after the closing delimiter.
fn parse_listing(
    lines: &[&str],
    open: usize,
    attrlist: Option<&str>,
) -> Result<(Node, usize)> {
    let delimiter = lines[open].trim_end();
    let close = lines[open + 1..]
        .iter()
        .position(|line| line.trim_end() == delimiter)
        .map(|offset| open + 1 + offset)
        .ok_or(ParseError::UnterminatedBlock { line: open + 1 })?;

    let (style, attrs, first) = match attrlist {
        Some(attrlist) => {
            let AttributeList { positional, named } = attribute_list(attrlist);
            let style = positional.into_iter().next().filter(|style| !style.is_empty());
            (style, named, open - 1)
        }
        None => (None, Default::default(), open),
    };

    let node = Node::Listing {
        style,
        attrs,
        lines: lines[open + 1..close].iter().map(|l| l.to_string()).collect(),
        source: lines[first..=close].join("\n"),
    };

    Ok((node, close + 1))
}
