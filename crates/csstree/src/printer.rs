//! CSS printing.
//!
//! Output uses two-space indentation and one declaration per line. Style
//! rules and block at-rules that end up with no printable content are
//! dropped.

use crate::ast::AstNode;

/// Prints a list of nodes as CSS text.
///
/// ```rust
/// use csstree::{to_css, AstNode};
///
/// let css = to_css(&[AstNode::rule(".flex", vec![AstNode::decl("display", "flex")])]);
/// assert_eq!(css, ".flex {\n  display: flex;\n}\n");
/// ```
pub fn to_css(nodes: &[AstNode]) -> String {
    let mut out = String::new();
    for node in nodes {
        print_node(node, 0, &mut out);
    }
    out
}

fn print_node(node: &AstNode, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    match node {
        AstNode::Declaration(decl) => {
            out.push_str(&indent);
            out.push_str(&decl.property);
            out.push_str(": ");
            out.push_str(&decl.value);
            if decl.important {
                out.push_str(" !important");
            }
            out.push_str(";\n");
        }
        AstNode::Comment(comment) => {
            out.push_str(&indent);
            out.push_str("/*");
            out.push_str(&comment.value);
            out.push_str("*/\n");
        }
        AstNode::Rule(rule) => {
            if !has_content(&rule.nodes) {
                return;
            }
            out.push_str(&indent);
            out.push_str(&rule.selector);
            out.push_str(" {\n");
            for child in &rule.nodes {
                print_node(child, depth + 1, out);
            }
            out.push_str(&indent);
            out.push_str("}\n");
        }
        AstNode::AtRule(at) => {
            if let Some(children) = &at.nodes {
                if !has_content(children) && at.name != "layer" {
                    return;
                }
            }
            out.push_str(&indent);
            out.push('@');
            out.push_str(&at.name);
            if !at.params.is_empty() {
                out.push(' ');
                out.push_str(&at.params);
            }
            match &at.nodes {
                None => out.push_str(";\n"),
                Some(children) => {
                    out.push_str(" {\n");
                    for child in children {
                        print_node(child, depth + 1, out);
                    }
                    out.push_str(&indent);
                    out.push_str("}\n");
                }
            }
        }
    }
}

/// Returns `true` if any node would print something.
fn has_content(nodes: &[AstNode]) -> bool {
    nodes.iter().any(|node| match node {
        AstNode::Declaration(_) | AstNode::Comment(_) => true,
        AstNode::Rule(rule) => has_content(&rule.nodes),
        AstNode::AtRule(at) => match &at.nodes {
            None => true,
            Some(children) => has_content(children) || at.name == "layer",
        },
    })
}
