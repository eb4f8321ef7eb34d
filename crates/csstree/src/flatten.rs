//! Nested rule flattening.
//!
//! Generated utilities and `@apply` output are built as nested trees:
//!
//! ```css
//! .md\:hover\:flex {
//!   @media (width >= 48rem) {
//!     &:hover { display: flex; }
//!   }
//! }
//! ```
//!
//! which flattens to:
//!
//! ```css
//! @media (width >= 48rem) {
//!   .md\:hover\:flex:hover { display: flex; }
//! }
//! ```
//!
//! ## Flattening Rules
//!
//! - `&` is replaced by the parent selector
//! - A nested selector without `&` implies a descendant combinator
//! - Comma lists expand to every parent/child combination
//! - Conditional group at-rules (`@media`, `@supports`, `@container`,
//!   `@layer`, `@starting-style`) are hoisted above the rule
//! - Other at-rules (`@keyframes`, `@property`, ...) pass through untouched

use crate::ast::{AstNode, AtRule, StyleRule};
use crate::segment::segment;

/// Flattens a list of potentially nested nodes.
pub fn flatten(nodes: Vec<AstNode>) -> Vec<AstNode> {
    let mut output = Vec::new();
    flatten_into(nodes, None, &mut output);
    output
}

fn is_conditional(name: &str) -> bool {
    matches!(
        name,
        "media" | "supports" | "container" | "layer" | "starting-style" | "scope" | "document"
    )
}

fn flatten_into(nodes: Vec<AstNode>, parents: Option<&[String]>, output: &mut Vec<AstNode>) {
    // Declarations directly inside a selector context become one rule,
    // emitted before any nested rules.
    let mut local = Vec::new();
    let mut nested = Vec::new();
    for node in nodes {
        match node {
            AstNode::Declaration(_) | AstNode::Comment(_) if parents.is_some() => local.push(node),
            other => nested.push(other),
        }
    }

    if let Some(parents) = parents {
        if !local.is_empty() {
            output.push(AstNode::Rule(StyleRule {
                selector: parents.join(", "),
                nodes: local,
            }));
        }
    }

    for node in nested {
        match node {
            AstNode::Rule(rule) => {
                let selectors = combine_selectors(parents, &rule.selector);
                flatten_into(rule.nodes, Some(&selectors), output);
            }
            AstNode::AtRule(AtRule {
                name,
                params,
                nodes: Some(children),
            }) if is_conditional(&name) => {
                let mut inner = Vec::new();
                flatten_into(children, parents, &mut inner);
                output.push(AstNode::AtRule(AtRule {
                    name,
                    params,
                    nodes: Some(inner),
                }));
            }
            other => output.push(other),
        }
    }
}

/// Combines parent selectors with a (possibly comma-separated) child
/// selector.
pub fn combine_selectors(parents: Option<&[String]>, child: &str) -> Vec<String> {
    let children: Vec<&str> = segment(child, ',').into_iter().map(str::trim).collect();
    let Some(parents) = parents else {
        return children.into_iter().map(str::to_string).collect();
    };

    let mut combined = Vec::with_capacity(parents.len() * children.len());
    for parent in parents {
        for child in &children {
            if contains_nesting(child) {
                combined.push(replace_nesting(child, parent));
            } else {
                combined.push(format!("{} {}", parent, child));
            }
        }
    }
    combined
}

fn contains_nesting(selector: &str) -> bool {
    let mut chars = selector.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '&' => return true,
            _ => {}
        }
    }
    false
}

/// Replaces every unescaped `&` in `selector` with `parent`.
pub fn replace_nesting(selector: &str, parent: &str) -> String {
    let mut out = String::with_capacity(selector.len() + parent.len());
    let mut chars = selector.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                out.push(c);
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            }
            '&' => out.push_str(parent),
            _ => out.push(c),
        }
    }
    out
}
