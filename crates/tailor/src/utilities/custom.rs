//! Utilities declared in CSS with `@utility`.
//!
//! ```css
//! @utility content-auto { content-visibility: auto; }
//!
//! @utility tab-* {
//!   tab-size: --value(--tab-size-*, integer, [integer]);
//! }
//! ```
//!
//! A functional utility resolves each `--value(...)` / `--modifier(...)`
//! call against the candidate. Declarations whose call cannot be resolved
//! are dropped; if nothing resolved, the candidate is not a match.

use super::{Utilities, accepts_arbitrary, compile_fn};
use crate::candidate::{Candidate, CandidateValue, Modifier};
use crate::error::{CompileError, Result};
use crate::theme::Theme;
use crate::value::{DataType, is_fraction, is_positive_integer, is_spacing_multiplier};
use csstree::{AstNode, segment};
use std::cell::Cell;

/// What a `--value()` or `--modifier()` call is matched against.
#[derive(Debug, Clone, Copy)]
enum Input<'a> {
    Named { value: &'a str, fraction: Option<&'a str> },
    Arbitrary { value: &'a str, hint: Option<&'a str> },
}

/// Registers an `@utility` declaration.
pub fn register(utilities: &mut Utilities, name: &str, body: Vec<AstNode>) -> Result<()> {
    let name = name.trim();
    if let Some(root) = name.strip_suffix("-*") {
        if !is_valid_name(root) {
            return Err(invalid(name));
        }
        log::debug!("registering functional @utility `{}`", root);
        utilities.functional(
            root,
            compile_fn(move |candidate, theme| compile_functional(&body, candidate, theme)),
        );
        return Ok(());
    }
    if !is_valid_name(name) {
        return Err(invalid(name));
    }
    log::debug!("registering static @utility `{}`", name);
    utilities.static_nodes(name, body);
    Ok(())
}

fn invalid(name: &str) -> CompileError {
    CompileError::InvalidDirective {
        directive: "utility",
        message: format!("`{}` is not a valid utility name", name),
    }
}

fn is_valid_name(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_lowercase() || c == '-')
        && !name.ends_with('-')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/'))
}

#[derive(Default)]
struct Usage {
    value: bool,
    modifier: bool,
}

fn compile_functional(body: &[AstNode], candidate: &Candidate, theme: &Theme) -> Option<Vec<AstNode>> {
    if candidate.negative() {
        return None;
    }
    let value = match candidate.value()? {
        CandidateValue::Named { value, fraction } => Input::Named {
            value,
            fraction: fraction.as_deref(),
        },
        CandidateValue::Arbitrary { value, data_type } => Input::Arbitrary {
            value,
            hint: data_type.as_deref(),
        },
    };
    let modifier = candidate.modifier().map(|modifier| match modifier {
        Modifier::Named(named) => Input::Named {
            value: named,
            fraction: None,
        },
        Modifier::Arbitrary(arbitrary) => Input::Arbitrary {
            value: arbitrary,
            hint: None,
        },
    });

    let mut nodes = body.to_vec();
    let mut usage = Usage::default();
    substitute_nodes(&mut nodes, value, modifier, theme, &mut usage);
    if !usage.value || (modifier.is_some() && !usage.modifier) {
        return None;
    }
    Some(nodes)
}

fn substitute_nodes(
    nodes: &mut Vec<AstNode>,
    value: Input<'_>,
    modifier: Option<Input<'_>>,
    theme: &Theme,
    usage: &mut Usage,
) {
    nodes.retain_mut(|node| match node {
        AstNode::Declaration(decl) => {
            let mut resolved = decl.value.clone();
            if resolved.contains("--value(") {
                // A ratio value consumes the modifier as its denominator.
                let ratio = Cell::new(false);
                match substitute_calls(&resolved, "--value(", |args| {
                    resolve_call(args, value, theme, &ratio)
                }) {
                    Some(next) => {
                        usage.value = true;
                        usage.modifier |= ratio.get();
                        resolved = next;
                    }
                    None => return false,
                }
            }
            if resolved.contains("--modifier(") {
                let Some(modifier) = modifier else {
                    return false;
                };
                let unused = Cell::new(false);
                match substitute_calls(&resolved, "--modifier(", |args| {
                    resolve_call(args, modifier, theme, &unused)
                }) {
                    Some(next) => {
                        usage.modifier = true;
                        resolved = next;
                    }
                    None => return false,
                }
            }
            decl.value = resolved;
            true
        }
        other => {
            if let Some(children) = other.children_mut() {
                substitute_nodes(children, value, modifier, theme, usage);
            }
            true
        }
    });
}

/// Replaces every `name(args)` call in `value` with `resolve(args)`.
fn substitute_calls<F>(value: &str, name: &str, resolve: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::new();
    let mut rest = value;
    while let Some(start) = rest.find(name) {
        out.push_str(&rest[..start]);
        let args_start = start + name.len();
        let mut depth = 1usize;
        let mut end = None;
        for (idx, c) in rest[args_start..].char_indices() {
            match c {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        end = Some(args_start + idx);
                        break;
                    }
                }
                _ => {}
            }
        }
        let end = end?;
        out.push_str(&resolve(&rest[args_start..end])?);
        rest = &rest[end + 1..];
    }
    out.push_str(rest);
    Some(out)
}

/// Tries each argument of a `--value(...)` call in order.
fn resolve_call(args: &str, input: Input<'_>, theme: &Theme, ratio: &Cell<bool>) -> Option<String> {
    segment(args, ',')
        .into_iter()
        .map(str::trim)
        .find_map(|arg| resolve_arg(arg, input, theme, ratio))
}

fn resolve_arg(arg: &str, input: Input<'_>, theme: &Theme, ratio: &Cell<bool>) -> Option<String> {
    match input {
        Input::Arbitrary { value, hint } => {
            let inner = arg.strip_prefix('[')?.strip_suffix(']')?;
            if inner == "*" {
                return Some(value.to_string());
            }
            let data_type: DataType = inner.parse().ok()?;
            accepts_arbitrary(value, hint, &[data_type]).then(|| value.to_string())
        }
        Input::Named { value, fraction } => {
            if let Some(namespace) = arg.strip_suffix("-*") {
                if !namespace.starts_with("--") {
                    return None;
                }
                return theme.resolve(Some(value), &[namespace]);
            }
            if let Some(literal) = arg
                .strip_prefix('\'')
                .and_then(|a| a.strip_suffix('\''))
                .or_else(|| arg.strip_prefix('"').and_then(|a| a.strip_suffix('"')))
            {
                return (literal == value).then(|| value.to_string());
            }
            match arg {
                "integer" => is_positive_integer(value).then(|| value.to_string()),
                "number" => is_spacing_multiplier(value).then(|| value.to_string()),
                "percentage" => value
                    .strip_suffix('%')
                    .is_some_and(is_spacing_multiplier)
                    .then(|| value.to_string()),
                "ratio" => {
                    let fraction = fraction.filter(|fraction| is_fraction(fraction))?;
                    ratio.set(true);
                    Some(fraction.replace('/', " / "))
                }
                _ => None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::CandidateKind;
    use crate::theme::{ThemeBuilder, ThemeOptions};
    use csstree::parse;

    fn body(css: &str) -> Vec<AstNode> {
        match parse(&format!(".x {{ {} }}", css)).unwrap().remove(0) {
            AstNode::Rule(rule) => rule.nodes,
            other => panic!("expected a rule, got {:?}", other),
        }
    }

    fn functional(root: &str, value: CandidateValue, modifier: Option<Modifier>) -> Candidate {
        Candidate {
            kind: CandidateKind::Functional {
                root: root.into(),
                value: Some(value),
                modifier,
                negative: false,
            },
            variants: vec![],
            important: false,
            raw: root.into(),
        }
    }

    fn run(utilities: &Utilities, candidate: &Candidate, theme: &Theme) -> Option<Vec<AstNode>> {
        let root = candidate.root()?;
        utilities
            .get(root)
            .iter()
            .find_map(|utility| (utility.compile)(candidate, theme))
    }

    #[test]
    fn rejects_invalid_names() {
        let mut utilities = Utilities::new();
        assert!(register(&mut utilities, "Tab-*", vec![]).is_err());
        assert!(register(&mut utilities, "tab-", vec![]).is_err());
        assert!(register(&mut utilities, "content-auto", vec![]).is_ok());
    }

    #[test]
    fn resolves_theme_bare_and_arbitrary_values() {
        let mut utilities = Utilities::new();
        register(
            &mut utilities,
            "tab-*",
            body("tab-size: --value(--tab-size-*, integer, [integer]);"),
        )
        .unwrap();
        let mut builder = ThemeBuilder::new();
        builder.set("--tab-size-github", "8", ThemeOptions::empty());
        let theme = builder.build();

        let named = |value: &str| CandidateValue::Named {
            value: value.into(),
            fraction: None,
        };
        let themed = run(&utilities, &functional("tab", named("github"), None), &theme).unwrap();
        assert_eq!(themed, vec![AstNode::decl("tab-size", "var(--tab-size-github, 8)")]);
        let bare = run(&utilities, &functional("tab", named("4"), None), &theme).unwrap();
        assert_eq!(bare, vec![AstNode::decl("tab-size", "4")]);
        let arbitrary = CandidateValue::Arbitrary {
            value: "12".into(),
            data_type: None,
        };
        let arbitrary = run(&utilities, &functional("tab", arbitrary, None), &theme).unwrap();
        assert_eq!(arbitrary, vec![AstNode::decl("tab-size", "12")]);
        assert!(run(&utilities, &functional("tab", named("wide"), None), &theme).is_none());
    }

    #[test]
    fn unresolved_declarations_are_dropped() {
        let mut utilities = Utilities::new();
        register(
            &mut utilities,
            "scrollbar-*",
            body("scrollbar-color: --value([color]); scrollbar-width: --value('thin', 'none');"),
        )
        .unwrap();
        let candidate = functional(
            "scrollbar",
            CandidateValue::Named {
                value: "thin".into(),
                fraction: None,
            },
            None,
        );
        let nodes = run(&utilities, &candidate, &Theme::default()).unwrap();
        assert_eq!(nodes, vec![AstNode::decl("scrollbar-width", "thin")]);
    }

    #[test]
    fn modifier_must_be_consumed() {
        let mut utilities = Utilities::new();
        register(
            &mut utilities,
            "ratio-*",
            body("aspect-ratio: --value(ratio);"),
        )
        .unwrap();
        let candidate = functional(
            "ratio",
            CandidateValue::Named {
                value: "16".into(),
                fraction: Some("16/9".into()),
            },
            Some(Modifier::Named("9".into())),
        );
        let nodes = run(&utilities, &candidate, &Theme::default()).unwrap();
        assert_eq!(nodes, vec![AstNode::decl("aspect-ratio", "16 / 9")]);

        register(&mut utilities, "tab-*", body("tab-size: --value(integer);")).unwrap();
        let candidate = functional(
            "tab",
            CandidateValue::Named {
                value: "4".into(),
                fraction: Some("4/2".into()),
            },
            Some(Modifier::Named("2".into())),
        );
        assert!(run(&utilities, &candidate, &Theme::default()).is_none());
    }
}
