//! `@apply` and nested `@variant` blocks.
//!
//! ```css
//! .btn {
//!   @apply px-4 hover:bg-red-500;
//!   @variant dark { color: white; }
//! }
//! ```
//!
//! Applied utilities are inlined relative to the surrounding rule, sorted
//! the same way generated utilities are. Unknown classes are fatal here,
//! unlike in [`Compiler::build`](crate::Compiler::build).

use crate::candidate::parse_variant;
use crate::design_system::{CompiledCandidate, DesignSystem};
use crate::error::{CompileError, Result};
use crate::variants::take_children;
use csstree::{AstNode, replace_nodes, segment};

/// Replaces every `@apply` in `nodes`.
pub fn substitute_apply(nodes: &mut Vec<AstNode>, system: &DesignSystem) -> Result<()> {
    let mut error = None;
    replace_nodes(nodes, &mut |node| {
        if error.is_some() || !node.is_at_rule("apply") {
            return None;
        }
        let AstNode::AtRule(at) = node else {
            return None;
        };
        match expand(&at.params, system) {
            Ok(expanded) => Some(expanded),
            Err(e) => {
                error = Some(e);
                None
            }
        }
    });
    match error {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

/// Compiles the class list of one `@apply`.
pub fn expand(params: &str, system: &DesignSystem) -> Result<Vec<AstNode>> {
    let mut important = false;
    let mut compiled: Vec<CompiledCandidate> = Vec::new();

    for raw in params.split_whitespace() {
        if raw == "!important" {
            important = true;
            continue;
        }
        match system.compile_candidate(raw) {
            Some(candidate) => compiled.push(candidate),
            None => return Err(unknown(raw, system)),
        }
    }
    compiled.sort_by(|a, b| system.compare(a, b));
    log::trace!("@apply {} -> {} candidates", params.trim(), compiled.len());

    let mut out: Vec<AstNode> = Vec::new();
    for candidate in compiled {
        for node in candidate.nodes {
            merge_or_push(&mut out, node);
        }
    }
    if important {
        mark_important(&mut out);
    }
    Ok(out)
}

/// Works out whether a class failed on a variant or on the utility.
fn unknown(raw: &str, system: &DesignSystem) -> CompileError {
    let mut segments = segment(raw, ':');
    segments.pop();
    for variant in segments {
        if parse_variant(variant, &system.variants).is_none() {
            return CompileError::UnknownVariant(variant.to_string());
        }
    }
    CompileError::UnknownUtility(raw.to_string())
}

/// Appends `node`, merging it into the previous node when both wrap the
/// same selector or at-rule.
fn merge_or_push(out: &mut Vec<AstNode>, node: AstNode) {
    let same_wrapper = match (out.last(), &node) {
        (Some(AstNode::Rule(last)), AstNode::Rule(next)) => last.selector == next.selector,
        (Some(AstNode::AtRule(last)), AstNode::AtRule(next)) => {
            last.name == next.name
                && last.params == next.params
                && last.nodes.is_some()
                && next.nodes.is_some()
                && last.name != "property"
        }
        _ => false,
    };
    if !same_wrapper {
        out.push(node);
        return;
    }
    let mut node = node;
    let children = take_children(&mut node);
    if let Some(target) = out.last_mut().and_then(AstNode::children_mut) {
        for child in children {
            merge_or_push(target, child);
        }
    }
}

fn mark_important(nodes: &mut [AstNode]) {
    for node in nodes {
        match node {
            AstNode::Declaration(decl) => decl.important = true,
            AstNode::AtRule(at) if at.name == "property" => {}
            other => {
                if let Some(children) = other.children_mut() {
                    mark_important(children);
                }
            }
        }
    }
}

/// Replaces `@variant name { ... }` blocks nested inside style rules with
/// their body wrapped in the variant.
pub fn substitute_variant_blocks(nodes: &mut Vec<AstNode>, system: &DesignSystem) -> Result<()> {
    let mut error = None;
    for node in nodes.iter_mut() {
        if let AstNode::Rule(rule) = node {
            if let Err(e) = expand_variant_blocks(&mut rule.nodes, system) {
                error.get_or_insert(e);
            }
        } else if let Some(children) = node.children_mut() {
            if let Err(e) = substitute_variant_blocks(children, system) {
                error.get_or_insert(e);
            }
        }
    }
    match error {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

fn expand_variant_blocks(nodes: &mut Vec<AstNode>, system: &DesignSystem) -> Result<()> {
    let mut error = None;
    replace_nodes(nodes, &mut |node| {
        if error.is_some() {
            return None;
        }
        let AstNode::AtRule(at) = node else {
            return None;
        };
        if at.name != "variant" || at.nodes.is_none() {
            return None;
        }
        let name = at.params.trim().to_string();
        let Some(variant) = parse_variant(&name, &system.variants) else {
            error = Some(CompileError::UnknownVariant(name));
            return None;
        };
        let body = at.nodes.take().unwrap_or_default();
        let mut wrapper = AstNode::rule("&", body);
        if system.variants.apply(&mut wrapper, &variant).is_none() {
            error = Some(CompileError::UnknownVariant(name));
            return None;
        }
        Some(take_children(&mut wrapper))
    });
    match error {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{ThemeBuilder, ThemeOptions};
    use crate::variants::DarkMode;
    use csstree::{flatten, parse, to_css};

    fn system() -> DesignSystem {
        let mut builder = ThemeBuilder::new();
        builder
            .set("--spacing", "0.25rem", ThemeOptions::empty())
            .set("--color-red-500", "#ef4444", ThemeOptions::empty());
        DesignSystem::new(builder.build(), &DarkMode::Media)
    }

    fn run(css: &str) -> Result<String> {
        let system = system();
        let mut nodes = parse(css)?;
        substitute_variant_blocks(&mut nodes, &system)?;
        substitute_apply(&mut nodes, &system)?;
        Ok(to_css(&flatten(nodes)))
    }

    #[test]
    fn applies_sorted_utilities() {
        let css = run(".btn { @apply hover:flex p-4 flex; }").unwrap();
        assert_eq!(
            css,
            ".btn {\n  display: flex;\n  padding: calc(var(--spacing, 0.25rem) * 4);\n}\n.btn:hover {\n  display: flex;\n}\n"
        );
    }

    #[test]
    fn merges_identical_wrappers() {
        let css = run(".a { @apply content-['a'] content-['b']; }").unwrap();
        assert_eq!(
            css.matches(".a {").count(),
            1,
            "expected one merged rule, got:\n{}",
            css
        );
        assert!(css.contains("--tw-content: 'a';"));
        assert!(css.contains("--tw-content: 'b';"));
    }

    #[test]
    fn unknown_utilities_and_variants_are_fatal() {
        assert!(matches!(
            run(".btn { @apply bg-not-found; }"),
            Err(CompileError::UnknownUtility(name)) if name == "bg-not-found"
        ));
        assert!(matches!(
            run(".btn { @apply wat:flex; }"),
            Err(CompileError::UnknownVariant(name)) if name == "wat"
        ));
    }

    #[test]
    fn important_flag_applies_to_everything() {
        let css = run(".btn { @apply flex !important; }").unwrap();
        assert_eq!(css, ".btn {\n  display: flex !important;\n}\n");
    }

    #[test]
    fn nested_variant_blocks() {
        let css = run(".card { color: black; @variant hover { color: red; } }").unwrap();
        assert_eq!(
            css,
            ".card {\n  color: black;\n}\n.card:hover {\n  color: red;\n}\n"
        );
    }
}
