//! Splitting lines around inline macros.

use crate::ast::Inline;
use crate::parser::lexer::{inline_macro, is_name_char};

/// Split a line into text and inline macros.
pub fn parse_line(line: &str) -> Vec<Inline> {
    let mut inlines = Vec::new();
    let mut text_start = 0;
    let mut pos = 0;

    while pos < line.len() {
        let rest = &line[pos..];
        // A macro name must not continue a preceding word
        let at_boundary = line[..pos]
            .chars()
            .next_back()
            .map_or(true, |c| !is_name_char(c) && c != '\\');

        if at_boundary && rest.starts_with(|c: char| c.is_ascii_alphabetic()) {
            if let Ok((remaining, (name, target, text))) = inline_macro(rest) {
                if text_start < pos {
                    inlines.push(Inline::Text(line[text_start..pos].to_string()));
                }
                let consumed = rest.len() - remaining.len();
                inlines.push(Inline::Macro {
                    name: name.to_string(),
                    target: target.to_string(),
                    text,
                    source: rest[..consumed].to_string(),
                });
                pos += consumed;
                text_start = pos;
                continue;
            }
        }

        pos += rest.chars().next().map_or(1, char::len_utf8);
    }

    if text_start < line.len() {
        inlines.push(Inline::Text(line[text_start..].to_string()));
    }

    inlines
}
