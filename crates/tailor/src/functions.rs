//! Compile-time CSS functions.
//!
//! | Function                      | Result                                   |
//! |-------------------------------|------------------------------------------|
//! | `theme(colors.red.500 / 50%)` | the theme value, with alpha applied       |
//! | `theme(--x, fallback)`        | the value, or `fallback` when missing     |
//! | `--theme(--color-red-500)`    | `var(--color-red-500)`                    |
//! | `--theme(--x inline)`         | the literal value                         |
//! | `--spacing(4)`                | `calc(var(--spacing) * 4)`                |
//! | `--alpha(red / 50%)`          | `color-mix(in srgb, red 50%, transparent)`|
//!
//! Functions are evaluated in declaration values and at-rule preludes.

use crate::color::{normalize_alpha, with_alpha};
use crate::error::{CompileError, Result};
use crate::theme::Theme;
use csstree::{AstNode, WalkAction, segment, walk_mut};

/// Evaluates every function call in `nodes`.
pub fn substitute_functions(nodes: &mut [AstNode], theme: &Theme) -> Result<()> {
    let mut error = None;
    walk_mut(nodes, &mut |node| {
        if error.is_some() {
            return WalkAction::Skip;
        }
        let text = match node {
            AstNode::Declaration(decl) => &mut decl.value,
            AstNode::AtRule(at) => &mut at.params,
            _ => return WalkAction::Continue,
        };
        match evaluate(text, theme) {
            Ok(value) => *text = value,
            Err(e) => error = Some(e),
        }
        WalkAction::Continue
    });
    match error {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

/// Evaluates the function calls in a single value.
pub fn evaluate(value: &str, theme: &Theme) -> Result<String> {
    if !value.contains('(') {
        return Ok(value.to_string());
    }
    let value = replace_calls(value, "theme", &mut |args| legacy_theme(args, theme))?;
    let value = replace_calls(&value, "--theme", &mut |args| modern_theme(args, theme))?;
    let value = replace_calls(&value, "--spacing", &mut |args| spacing(args, theme))?;
    replace_calls(&value, "--alpha", &mut |args| alpha(args, theme))
}

/// Replaces each `name(args)` call with `resolve(args)`. A call only
/// matches when `name` is not the tail of a longer identifier.
fn replace_calls<F>(value: &str, name: &str, resolve: &mut F) -> Result<String>
where
    F: FnMut(&str) -> Result<String>,
{
    let pattern = format!("{}(", name);
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find(&pattern) {
        let boundary = rest[..start]
            .chars()
            .next_back()
            .is_none_or(|c| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        let args_start = start + pattern.len();
        if !boundary {
            out.push_str(&rest[..args_start]);
            rest = &rest[args_start..];
            continue;
        }
        let Some(len) = closing_paren(&rest[args_start..]) else {
            out.push_str(rest);
            return Ok(out);
        };
        out.push_str(&rest[..start]);
        out.push_str(&resolve(&rest[args_start..args_start + len])?);
        rest = &rest[args_start + len + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

/// Byte offset of the `)` closing an already-opened call.
fn closing_paren(input: &str) -> Option<usize> {
    let mut depth = 1usize;
    let mut quote = None;
    for (idx, c) in input.char_indices() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    None
}

/// Splits `path, fallback` and `path / alpha`.
fn split_args(args: &str) -> (&str, Option<&str>, Option<String>) {
    let parts = segment(args, ',');
    let path_and_alpha = parts.first().copied().unwrap_or_default().trim();
    let fallback = (parts.len() > 1).then(|| {
        let offset = parts[0].len() + 1;
        args[offset..].trim().to_string()
    });
    let pieces = segment(path_and_alpha, '/');
    if pieces.len() == 2 {
        (pieces[0].trim(), Some(pieces[1].trim()), fallback)
    } else {
        (path_and_alpha, None, fallback)
    }
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
        .unwrap_or(value)
}

fn apply_alpha(color: String, alpha: Option<&str>) -> Result<String> {
    let Some(alpha) = alpha else {
        return Ok(color);
    };
    let alpha = normalize_alpha(alpha, true).ok_or_else(|| CompileError::InvalidFunction {
        function: "theme",
        message: format!("`{}` is not a valid alpha value", alpha),
    })?;
    Ok(with_alpha(&color, &alpha))
}

fn legacy_theme(args: &str, theme: &Theme) -> Result<String> {
    let (path, alpha, fallback) = split_args(args);
    let path = unquote(path);
    match theme.resolve_path(path) {
        Some(entry) => apply_alpha(entry.value.clone(), alpha),
        None => match fallback {
            Some(fallback) => evaluate(&fallback, theme),
            None => Err(CompileError::ThemeResolution(format!("theme({})", args.trim()))),
        },
    }
}

fn modern_theme(args: &str, theme: &Theme) -> Result<String> {
    let (path, alpha, fallback) = split_args(args);
    let (key, inline) = match path.strip_suffix(" inline") {
        Some(key) => (key.trim(), true),
        None => (path, false),
    };
    if !key.starts_with("--") {
        return Err(CompileError::InvalidFunction {
            function: "--theme",
            message: format!("`{}` must be a CSS variable name", key),
        });
    }
    let Some(entry) = theme.resolve_path(key) else {
        return match fallback {
            Some(fallback) => evaluate(&fallback, theme),
            None => Err(CompileError::ThemeResolution(format!("--theme({})", args.trim()))),
        };
    };
    let value = if inline || !entry.is_emittable() {
        entry.value.clone()
    } else {
        match fallback {
            Some(fallback) => format!("var({}, {})", entry.key, fallback),
            None => format!("var({})", entry.key),
        }
    };
    apply_alpha(value, alpha)
}

fn spacing(args: &str, theme: &Theme) -> Result<String> {
    let multiplier = args.trim();
    if multiplier.is_empty() {
        return Err(CompileError::InvalidFunction {
            function: "--spacing",
            message: "expected a multiplier".to_string(),
        });
    }
    let entry = theme
        .get("--spacing")
        .ok_or_else(|| CompileError::ThemeResolution(format!("--spacing({})", multiplier)))?;
    Ok(format!("calc({} * {})", entry.render(), multiplier))
}

fn alpha(args: &str, _theme: &Theme) -> Result<String> {
    let parts = segment(args, '/');
    let [color, alpha] = parts.as_slice() else {
        return Err(CompileError::InvalidFunction {
            function: "--alpha",
            message: format!("expected `color / alpha`, found `{}`", args.trim()),
        });
    };
    let alpha = normalize_alpha(alpha, true).ok_or_else(|| CompileError::InvalidFunction {
        function: "--alpha",
        message: format!("`{}` is not a valid alpha value", alpha.trim()),
    })?;
    Ok(with_alpha(color.trim(), &alpha))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{ThemeBuilder, ThemeOptions};

    fn theme() -> Theme {
        let mut builder = ThemeBuilder::new();
        builder
            .set("--color-red-500", "#ef4444", ThemeOptions::empty())
            .set("--spacing", "0.25rem", ThemeOptions::empty())
            .set("--breakpoint-md", "48rem", ThemeOptions::empty());
        builder.build()
    }

    #[test]
    fn legacy_theme_inlines_values() {
        let theme = theme();
        assert_eq!(evaluate("theme(colors.red.500)", &theme).unwrap(), "#ef4444");
        assert_eq!(evaluate("theme('colors.red.500')", &theme).unwrap(), "#ef4444");
        assert_eq!(evaluate("theme(--color-red-500 / 50%)", &theme).unwrap(), "#ef444480");
        assert_eq!(
            evaluate("(width >= theme(screens.md))", &theme).unwrap(),
            "(width >= 48rem)"
        );
    }

    #[test]
    fn fallback_recovers_missing_paths() {
        let theme = theme();
        assert_eq!(
            evaluate("theme(colors.missing, theme(colors.red.500))", &theme).unwrap(),
            "#ef4444"
        );
        assert_eq!(evaluate("theme(colors.missing, 1px solid)", &theme).unwrap(), "1px solid");
        assert!(matches!(
            evaluate("theme(colors.missing)", &theme),
            Err(CompileError::ThemeResolution(_))
        ));
    }

    #[test]
    fn modern_functions() {
        let theme = theme();
        assert_eq!(
            evaluate("--theme(--color-red-500)", &theme).unwrap(),
            "var(--color-red-500)"
        );
        assert_eq!(evaluate("--theme(--color-red-500 inline)", &theme).unwrap(), "#ef4444");
        assert_eq!(
            evaluate("--spacing(4)", &theme).unwrap(),
            "calc(var(--spacing, 0.25rem) * 4)"
        );
        assert_eq!(
            evaluate("--alpha(var(--brand) / 50%)", &theme).unwrap(),
            "color-mix(in srgb, var(--brand) 50%, transparent)"
        );
    }

    #[test]
    fn identifier_tails_are_not_calls() {
        let theme = theme();
        assert_eq!(evaluate("my-theme(x)", &theme).unwrap(), "my-theme(x)");
    }

    #[test]
    fn walks_declarations_and_preludes() {
        let mut nodes = vec![AstNode::at_rule(
            "media",
            "(width >= theme(--breakpoint-md))",
            vec![AstNode::rule(
                ".a",
                vec![AstNode::decl("color", "theme(colors.red.500)")],
            )],
        )];
        substitute_functions(&mut nodes, &theme()).unwrap();
        assert_eq!(
            nodes,
            vec![AstNode::at_rule(
                "media",
                "(width >= 48rem)",
                vec![AstNode::rule(".a", vec![AstNode::decl("color", "#ef4444")])],
            )]
        );
    }
}
