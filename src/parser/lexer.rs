//! Combinators for the constructs extensions can claim.

use crate::ast::AttributeList;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, satisfy, space0},
    combinator::{eof, map, not, recognize, verify},
    error::{Error, ErrorKind},
    multi::separated_list0,
    sequence::{delimited, pair, preceded, separated_pair, terminated},
    IResult,
};

/// Characters allowed in macro and attribute names after the first.
pub fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Macro name: a letter followed by letters, digits, `_` or `-`.
pub fn macro_name(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(|c| c.is_ascii_alphabetic()),
        take_while(is_name_char),
    ))(input)
}

fn macro_target(input: &str) -> IResult<&str, &str> {
    take_while(|c: char| !c.is_whitespace() && c != '[')(input)
}

/// Bracketed text up to the first unescaped `]`; `\]` stands for `]`.
pub fn bracket_content(input: &str) -> IResult<&str, String> {
    let (body, _) = char('[')(input)?;
    let mut text = String::new();
    let mut chars = body.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        match c {
            '\\' if matches!(chars.peek(), Some((_, ']'))) => {
                text.push(']');
                chars.next();
            }
            ']' => return Ok((&body[i + 1..], text)),
            _ => text.push(c),
        }
    }

    Err(nom::Err::Error(Error::new(input, ErrorKind::Char)))
}

/// Inline macro `name:target[text]`; the target may be empty (short form).
pub fn inline_macro(input: &str) -> IResult<&str, (&str, &str, String)> {
    let (input, name) = macro_name(input)?;
    let (input, _) = char(':')(input)?;
    // `name::` introduces a block macro, never an inline one
    let (input, target) = verify(macro_target, |t: &str| !t.starts_with(':'))(input)?;
    let (input, text) = bracket_content(input)?;
    Ok((input, (name, target, text)))
}

/// Block macro line `name::target[attrs]`.
pub fn block_macro(input: &str) -> IResult<&str, (&str, &str, String)> {
    let (input, name) = macro_name(input)?;
    let (input, _) = tag("::")(input)?;
    let (input, target) = macro_target(input)?;
    let (input, text) = terminated(bracket_content, eof)(input)?;
    Ok((input, (name, target, text)))
}

/// Block attribute line `[style,key=value]`; `[[anchor]]` is not one.
pub fn block_attribute_line(input: &str) -> IResult<&str, String> {
    preceded(
        not(tag("[[")),
        verify(terminated(bracket_content, eof), |text: &String| {
            !text.trim().is_empty()
        }),
    )(input)
}

/// Listing delimiter: four or more `-` and nothing else.
pub fn listing_delimiter(input: &str) -> IResult<&str, &str> {
    terminated(
        verify(take_while1(|c: char| c == '-'), |d: &str| d.len() >= 4),
        eof,
    )(input)
}

enum Attribute<'a> {
    Named(&'a str, String),
    Positional(String),
}

fn quoted(input: &str) -> IResult<&str, &str> {
    alt((
        delimited(char('"'), take_while(|c: char| c != '"'), char('"')),
        delimited(char('\''), take_while(|c: char| c != '\''), char('\'')),
    ))(input)
}

fn attribute_value(input: &str) -> IResult<&str, String> {
    alt((
        map(terminated(quoted, space0), String::from),
        map(take_while(|c: char| c != ','), |v: &str| v.trim().to_string()),
    ))(input)
}

fn named_attribute(input: &str) -> IResult<&str, (&str, String)> {
    separated_pair(
        delimited(space0, take_while1(is_name_char), space0),
        char('='),
        preceded(space0, attribute_value),
    )(input)
}

fn attribute(input: &str) -> IResult<&str, Attribute<'_>> {
    alt((
        map(named_attribute, |(key, value)| Attribute::Named(key, value)),
        map(preceded(space0, attribute_value), Attribute::Positional),
    ))(input)
}

/// Parse the text of an attribute list.
pub fn attribute_list(input: &str) -> AttributeList {
    let mut list = AttributeList::default();
    if input.trim().is_empty() {
        return list;
    }

    if let Ok((_, attributes)) = separated_list0(char(','), attribute)(input) {
        for attribute in attributes {
            match attribute {
                Attribute::Named(key, value) => {
                    list.named.insert(key.to_string(), value);
                }
                Attribute::Positional(value) => list.positional.push(value),
            }
        }
    }

    list
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bracket_content() {
        assert_eq!(bracket_content("[x^2] rest"), Ok((" rest", "x^2".to_string())));
        assert_eq!(
            bracket_content("[[0,1\\]] tail"),
            Ok((" tail", "[0,1]".to_string()))
        );
        assert_eq!(
            bracket_content("[\\frac{a}{b}]"),
            Ok(("", "\\frac{a}{b}".to_string()))
        );
        assert!(bracket_content("[unclosed").is_err());
    }

    #[test]
    fn test_inline_macro() {
        assert_eq!(
            inline_macro("math:[E=mc^2] and"),
            Ok((" and", ("math", "", "E=mc^2".to_string())))
        );
        assert_eq!(
            inline_macro("image:logo.png[Logo]"),
            Ok(("", ("image", "logo.png", "Logo".to_string())))
        );
        assert!(inline_macro("disqus::page[]").is_err());
        assert!(inline_macro("note: [x]").is_err());
    }

    #[test]
    fn test_block_macro() {
        assert_eq!(
            block_macro("disqus::my-post[]"),
            Ok(("", ("disqus", "my-post", String::new())))
        );
        assert!(block_macro("disqus::my-post[] trailing").is_err());
        assert!(block_macro("disqus:my-post[]").is_err());
    }

    #[test]
    fn test_block_attribute_line() {
        assert_eq!(
            block_attribute_line("[math,width=200]"),
            Ok(("", "math,width=200".to_string()))
        );
        assert!(block_attribute_line("[[anchor]]").is_err());
        assert!(block_attribute_line("[]").is_err());
        assert!(block_attribute_line("[math] text").is_err());
    }

    #[test]
    fn test_listing_delimiter() {
        assert!(listing_delimiter("----").is_ok());
        assert!(listing_delimiter("--------").is_ok());
        assert!(listing_delimiter("---").is_err());
        assert!(listing_delimiter("---- x").is_err());
    }

    #[test]
    fn test_attribute_list() {
        let list = attribute_list("math, width=200, role=\"center, wide\",align = left");
        assert_eq!(list.positional, vec!["math".to_string()]);
        assert_eq!(list.named.get("width").map(String::as_str), Some("200"));
        assert_eq!(list.named.get("role").map(String::as_str), Some("center, wide"));
        assert_eq!(list.named.get("align").map(String::as_str), Some("left"));
    }

    #[test]
    fn test_empty_attribute_list() {
        assert_eq!(attribute_list(""), AttributeList::default());
        assert_eq!(attribute_list("  "), AttributeList::default());
    }
}
