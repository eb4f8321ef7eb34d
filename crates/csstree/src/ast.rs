//! CSS syntax tree.
//!
//! The tree is deliberately small: style rules, at-rules, declarations and
//! comments. Selectors and values are kept as text; callers that need more
//! structure use [`segment`](crate::segment) and the value helpers.

/// A single node in a CSS syntax tree.
#[derive(Clone, Debug, PartialEq)]
pub enum AstNode {
    Rule(StyleRule),
    AtRule(AtRule),
    Declaration(Declaration),
    Comment(Comment),
}

/// A style rule such as `.btn:hover { color: red }`.
#[derive(Clone, Debug, PartialEq)]
pub struct StyleRule {
    pub selector: String,
    pub nodes: Vec<AstNode>,
}

/// An at-rule. `nodes` is `None` for statement at-rules like `@import "x";`.
#[derive(Clone, Debug, PartialEq)]
pub struct AtRule {
    /// Name without the leading `@`.
    pub name: String,
    pub params: String,
    pub nodes: Option<Vec<AstNode>>,
}

/// A `property: value` pair.
#[derive(Clone, Debug, PartialEq)]
pub struct Declaration {
    pub property: String,
    pub value: String,
    pub important: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Comment {
    pub value: String,
}

impl AstNode {
    /// Creates a style rule node.
    pub fn rule(selector: impl Into<String>, nodes: Vec<AstNode>) -> Self {
        AstNode::Rule(StyleRule {
            selector: selector.into(),
            nodes,
        })
    }

    /// Creates an at-rule node with a block body.
    pub fn at_rule(name: impl Into<String>, params: impl Into<String>, nodes: Vec<AstNode>) -> Self {
        AstNode::AtRule(AtRule {
            name: name.into(),
            params: params.into(),
            nodes: Some(nodes),
        })
    }

    /// Creates a body-less at-rule such as `@import "x";`.
    pub fn statement(name: impl Into<String>, params: impl Into<String>) -> Self {
        AstNode::AtRule(AtRule {
            name: name.into(),
            params: params.into(),
            nodes: None,
        })
    }

    /// Creates a declaration node.
    pub fn decl(property: impl Into<String>, value: impl Into<String>) -> Self {
        AstNode::Declaration(Declaration {
            property: property.into(),
            value: value.into(),
            important: false,
        })
    }

    pub fn comment(value: impl Into<String>) -> Self {
        AstNode::Comment(Comment {
            value: value.into(),
        })
    }

    /// Parses at-rule text such as `@media (width >= 40rem)` into an empty
    /// at-rule node. Returns `None` when the text does not start with `@`.
    pub fn at_rule_from_text(text: &str, nodes: Vec<AstNode>) -> Option<Self> {
        let rest = text.trim().strip_prefix('@')?;
        let end = rest
            .find(|c: char| c.is_whitespace() || c == '(')
            .unwrap_or(rest.len());
        let name = &rest[..end];
        if name.is_empty() {
            return None;
        }
        Some(AstNode::at_rule(name, rest[end..].trim(), nodes))
    }

    /// Returns the children of a rule or block at-rule.
    pub fn children(&self) -> Option<&Vec<AstNode>> {
        match self {
            AstNode::Rule(rule) => Some(&rule.nodes),
            AstNode::AtRule(at) => at.nodes.as_ref(),
            _ => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<AstNode>> {
        match self {
            AstNode::Rule(rule) => Some(&mut rule.nodes),
            AstNode::AtRule(at) => at.nodes.as_mut(),
            _ => None,
        }
    }

    /// Returns `true` if this is an at-rule with the given name.
    pub fn is_at_rule(&self, name: &str) -> bool {
        matches!(self, AstNode::AtRule(at) if at.name == name)
    }
}

/// Control flow returned from a walk callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WalkAction {
    /// Visit this node's children.
    Continue,
    /// Do not descend into this node's children.
    Skip,
}

/// Visits every node depth-first, parents before children.
pub fn walk<F>(nodes: &[AstNode], visit: &mut F)
where
    F: FnMut(&AstNode) -> WalkAction,
{
    for node in nodes {
        if visit(node) == WalkAction::Skip {
            continue;
        }
        if let Some(children) = node.children() {
            walk(children, visit);
        }
    }
}

/// Mutable variant of [`walk`].
pub fn walk_mut<F>(nodes: &mut [AstNode], visit: &mut F)
where
    F: FnMut(&mut AstNode) -> WalkAction,
{
    for node in nodes.iter_mut() {
        if visit(node) == WalkAction::Skip {
            continue;
        }
        if let Some(children) = node.children_mut() {
            walk_mut(children, visit);
        }
    }
}

/// Replaces nodes in place. The callback returns `Some(replacement)` to
/// splice a list of nodes where the visited node was, or `None` to keep it
/// and descend into its children.
pub fn replace_nodes<F>(nodes: &mut Vec<AstNode>, replace: &mut F)
where
    F: FnMut(&mut AstNode) -> Option<Vec<AstNode>>,
{
    let mut idx = 0;
    while idx < nodes.len() {
        if let Some(replacement) = replace(&mut nodes[idx]) {
            let len = replacement.len();
            nodes.splice(idx..idx + 1, replacement);
            idx += len;
            continue;
        }
        if let Some(children) = nodes[idx].children_mut() {
            replace_nodes(children, replace);
        }
        idx += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_rule_from_text_splits_name_and_params() {
        let node = AstNode::at_rule_from_text("@media(width>=123px)", vec![]).unwrap();
        assert_eq!(node, AstNode::at_rule("media", "(width>=123px)", vec![]));

        let node = AstNode::at_rule_from_text("@supports not (display: grid)", vec![]).unwrap();
        assert_eq!(node, AstNode::at_rule("supports", "not (display: grid)", vec![]));

        assert!(AstNode::at_rule_from_text("& > p", vec![]).is_none());
    }

    #[test]
    fn replace_nodes_splices_and_descends() {
        let mut nodes = vec![AstNode::rule(
            ".a",
            vec![AstNode::statement("apply", "flex"), AstNode::decl("color", "red")],
        )];
        replace_nodes(&mut nodes, &mut |node| {
            if node.is_at_rule("apply") {
                Some(vec![AstNode::decl("display", "flex"), AstNode::decl("gap", "0")])
            } else {
                None
            }
        });
        assert_eq!(nodes[0].children().unwrap().len(), 3);
    }
}
