//! CSS source parsing.
//!
//! The parser is tolerant in the ways stylesheets need: nested rules,
//! custom properties whose values contain braces, comments anywhere, and
//! statements without a trailing semicolon before `}`.
//!
//! ```rust
//! use csstree::{parse, AstNode};
//!
//! let nodes = parse(".a { color: red; &:hover { color: blue } }").unwrap();
//! assert_eq!(nodes.len(), 1);
//! assert!(matches!(&nodes[0], AstNode::Rule(rule) if rule.selector == ".a"));
//! ```

use crate::ast::{AstNode, AtRule, Comment, Declaration, StyleRule};
use crate::error::CssError;

use nom::{
    IResult,
    bytes::complete::{tag, take_until, take_while1},
    character::complete::{char, multispace0},
    sequence::{delimited, preceded},
};

/// Parses a stylesheet into a list of top-level nodes.
pub fn parse(source: &str) -> Result<Vec<AstNode>, CssError> {
    let (remaining, nodes) = parse_nodes(source)?;
    let remaining = remaining.trim_start();
    if remaining.starts_with('}') {
        return Err(CssError::InvalidSyntax(format!(
            "unexpected `}}` near: {}",
            excerpt(remaining)
        )));
    }
    Ok(nodes)
}

/// Parses nodes until the end of input or an unmatched `}`.
fn parse_nodes(mut input: &str) -> Result<(&str, Vec<AstNode>), CssError> {
    let mut nodes = Vec::new();
    loop {
        let (rest, _) = ws(input);
        input = rest;
        if input.is_empty() || input.starts_with('}') {
            return Ok((input, nodes));
        }

        if input.starts_with("/*") {
            let (rest, text) = parse_comment(input).map_err(|_| CssError::Unterminated("comment"))?;
            nodes.push(AstNode::Comment(Comment {
                value: text.to_string(),
            }));
            input = rest;
            continue;
        }

        if input.starts_with(';') {
            input = &input[1..];
            continue;
        }

        if input.starts_with('@') {
            let (rest, node) = parse_at_rule(input)?;
            nodes.push(node);
            input = rest;
            continue;
        }

        let (rest, node) = parse_rule_or_declaration(input)?;
        nodes.push(node);
        input = rest;
    }
}

fn ws(input: &str) -> (&str, &str) {
    multispace0::<&str, nom::error::Error<&str>>(input).unwrap_or((input, ""))
}

fn parse_comment(input: &str) -> IResult<&str, &str> {
    delimited(tag("/*"), take_until("*/"), tag("*/"))(input)
}

fn parse_at_name(input: &str) -> IResult<&str, &str> {
    preceded(
        char('@'),
        take_while1(|c: char| c.is_alphanumeric() || c == '-' || c == '_'),
    )(input)
}

fn parse_at_rule(input: &str) -> Result<(&str, AstNode), CssError> {
    let (rest, name) = parse_at_name(input)
        .map_err(|_| CssError::InvalidSyntax(format!("invalid at-rule: {}", excerpt(input))))?;
    let (rest, prelude, terminator) = take_prelude(rest)?;
    let params = clean_text(prelude);

    match terminator {
        Some('{') => {
            let (rest, children) = parse_nodes(&rest[1..])?;
            let rest = close_block(rest, name)?;
            Ok((
                rest,
                AstNode::AtRule(AtRule {
                    name: name.to_string(),
                    params,
                    nodes: Some(children),
                }),
            ))
        }
        Some(';') => Ok((&rest[1..], AstNode::statement(name, params))),
        _ => Ok((rest, AstNode::statement(name, params))),
    }
}

fn parse_rule_or_declaration(input: &str) -> Result<(&str, AstNode), CssError> {
    let (rest, prelude, terminator) = take_prelude(input)?;

    // Custom properties may hold arbitrary blocks: `--x: { a: b }`.
    if terminator == Some('{') && is_custom_property(prelude) {
        let (rest, text) = take_declaration(input)?;
        return Ok((rest, parse_declaration(text)?));
    }

    match terminator {
        Some('{') => {
            let (rest, children) = parse_nodes(&rest[1..])?;
            let selector = clean_text(prelude);
            let rest = close_block(rest, &selector)?;
            Ok((rest, AstNode::Rule(StyleRule { selector, nodes: children })))
        }
        Some(';') => Ok((&rest[1..], parse_declaration(prelude)?)),
        _ => Ok((rest, parse_declaration(prelude)?)),
    }
}

fn close_block<'a>(input: &'a str, context: &str) -> Result<&'a str, CssError> {
    let (rest, _) = ws(input);
    rest.strip_prefix('}')
        .ok_or_else(|| CssError::UnclosedBlock(context.to_string()))
}

fn is_custom_property(prelude: &str) -> bool {
    let trimmed = prelude.trim_start();
    trimmed.starts_with("--") && trimmed.contains(':')
}

fn parse_declaration(text: &str) -> Result<AstNode, CssError> {
    let text = strip_comments(text);
    let Some(colon) = text.find(':') else {
        return Err(CssError::InvalidSyntax(format!(
            "expected declaration, found: {}",
            excerpt(text.trim())
        )));
    };
    let property = text[..colon].trim();
    if property.is_empty() {
        return Err(CssError::InvalidSyntax("declaration without property".to_string()));
    }
    let mut value = text[colon + 1..].trim().to_string();
    let mut important = false;
    if let Some(idx) = find_important(&value) {
        value.truncate(idx);
        value = value.trim_end().to_string();
        important = true;
    }
    // Custom properties keep their value verbatim.
    if !property.starts_with("--") {
        value = collapse_whitespace(&value);
    }
    Ok(AstNode::Declaration(Declaration {
        property: property.to_string(),
        value,
        important,
    }))
}

fn find_important(value: &str) -> Option<usize> {
    let lower = value.to_ascii_lowercase();
    let stripped = lower.trim_end().strip_suffix("important")?;
    let bang = stripped.trim_end().strip_suffix('!')?;
    Some(bang.len())
}

/// Takes text up to a top-level `{`, `;` or `}`. Returns the remaining
/// input (starting at the terminator), the prelude text and the terminator.
fn take_prelude(input: &str) -> Result<(&str, &str, Option<char>), CssError> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut chars = input.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if let Some(q) = quote {
            if c == '\\' {
                chars.next();
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\\' => {
                chars.next();
            }
            '"' | '\'' => quote = Some(c),
            '/' if input[idx..].starts_with("/*") => {
                let end = input[idx + 2..]
                    .find("*/")
                    .ok_or(CssError::Unterminated("comment"))?;
                let skip_to = idx + 2 + end + 2;
                while chars.peek().is_some_and(|(i, _)| *i < skip_to) {
                    chars.next();
                }
            }
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            '{' | ';' | '}' if depth == 0 => {
                return Ok((&input[idx..], &input[..idx], Some(c)));
            }
            _ => {}
        }
    }

    if quote.is_some() {
        return Err(CssError::Unterminated("string"));
    }
    Ok(("", input, None))
}

/// Takes a declaration whose value may contain balanced `{}` blocks.
fn take_declaration(input: &str) -> Result<(&str, &str), CssError> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut chars = input.char_indices();

    while let Some((idx, c)) = chars.next() {
        if let Some(q) = quote {
            if c == '\\' {
                chars.next();
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\\' => {
                chars.next();
            }
            '"' | '\'' => quote = Some(c),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            '}' if depth > 0 => depth -= 1,
            ';' if depth == 0 => return Ok((&input[idx + 1..], &input[..idx])),
            '}' => return Ok((&input[idx..], &input[..idx])),
            _ => {}
        }
    }
    Ok(("", input))
}

fn clean_text(text: &str) -> String {
    collapse_whitespace(strip_comments(text).trim())
}

/// Removes `/* ... */` comments outside of strings.
pub fn strip_comments(text: &str) -> String {
    if !text.contains("/*") {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut quote: Option<char> = None;
    let mut rest = text;
    while let Some(c) = rest.chars().next() {
        if quote.is_none() && rest.starts_with("/*") {
            match rest[2..].find("*/") {
                Some(end) => rest = &rest[2 + end + 2..],
                None => rest = "",
            }
            continue;
        }
        match quote {
            Some(q) if c == q => quote = None,
            None if c == '"' || c == '\'' => quote = Some(c),
            _ => {}
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }
    out
}

/// Collapses runs of whitespace outside of strings into single spaces.
fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut quote: Option<char> = None;
    let mut last_space = false;
    for c in text.chars() {
        if let Some(q) = quote {
            out.push(c);
            if c == q {
                quote = None;
            }
            continue;
        }
        if c.is_whitespace() {
            if !last_space {
                out.push(' ');
            }
            last_space = true;
            continue;
        }
        if c == '"' || c == '\'' {
            quote = Some(c);
        }
        last_space = false;
        out.push(c);
    }
    out
}

fn excerpt(input: &str) -> String {
    input.chars().take(40).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_prelude_ignores_braces_in_brackets() {
        let (rest, prelude, term) = take_prelude(".a\\:b[data-x=\"{\"] { }").unwrap();
        assert_eq!(prelude, ".a\\:b[data-x=\"{\"] ");
        assert_eq!(term, Some('{'));
        assert_eq!(rest, "{ }");
    }

    #[test]
    fn important_is_detected_case_insensitively() {
        let decl = parse_declaration("color: red !IMPORTANT").unwrap();
        assert_eq!(
            decl,
            AstNode::Declaration(Declaration {
                property: "color".into(),
                value: "red".into(),
                important: true,
            })
        );
    }

    #[test]
    fn strip_comments_keeps_strings() {
        assert_eq!(strip_comments("a /* x */ b"), "a  b");
        assert_eq!(strip_comments("\"/* keep */\""), "\"/* keep */\"");
    }
}
