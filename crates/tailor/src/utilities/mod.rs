//! The utility registry.
//!
//! Utilities are registered under a root name. Static roots (`flex`) match
//! exactly; functional roots (`bg`, `p`, `border-x`) take a value. A root
//! may have several utilities (`text` is both a size and a color utility);
//! the first one that produces output wins.
//!
//! Registration order is cascade order: every utility gets the next
//! `order`, and the pipeline sorts generated rules by it.

pub mod builtin;
pub mod custom;

use crate::candidate::{Candidate, CandidateKind, CandidateValue, Modifier};
use crate::color::{normalize_alpha, with_alpha};
use crate::theme::Theme;
use crate::value::{DataType, infer_data_type, is_fraction, is_spacing_multiplier};
use csstree::AstNode;
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UtilityKind {
    Static,
    Functional,
}

/// Generates the declarations for a candidate, or `None` if the candidate
/// does not fit this utility.
pub type CompileFn = Arc<dyn Fn(&Candidate, &Theme) -> Option<Vec<AstNode>> + Send + Sync>;

/// Boxes a closure as a [`CompileFn`].
pub fn compile_fn<F>(compile: F) -> CompileFn
where
    F: Fn(&Candidate, &Theme) -> Option<Vec<AstNode>> + Send + Sync + 'static,
{
    Arc::new(compile)
}

/// Turns a resolved value into declarations.
pub type HandleFn = Arc<dyn Fn(&str) -> Vec<AstNode> + Send + Sync>;

/// Resolves a bare (non-theme) named value such as the `10` in `z-10`.
pub type BareFn = fn(&Theme, &str) -> Option<String>;

#[derive(Clone)]
pub struct Utility {
    pub kind: UtilityKind,
    pub order: usize,
    pub compile: CompileFn,
}

impl fmt::Debug for Utility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Utility")
            .field("kind", &self.kind)
            .field("order", &self.order)
            .finish_non_exhaustive()
    }
}

/// How a functional utility resolves its value.
#[derive(Clone, Default)]
pub struct FunctionalOptions {
    /// Theme namespaces tried in order (`--padding`, `--spacing`).
    pub theme_keys: &'static [&'static str],
    /// Fixed named values (`auto`, `full`, `px`).
    pub keywords: &'static [(&'static str, &'static str)],
    /// Theme key consulted when no value is given (`--default-border-width`).
    pub default_key: Option<&'static str>,
    /// Literal used when no value is given and `default_key` is unset.
    pub default_value: Option<&'static str>,
    pub bare: Option<BareFn>,
    /// Types an arbitrary value must have. Empty accepts anything, including
    /// untyped `var()` references.
    pub types: &'static [DataType],
    pub supports_negative: bool,
    /// `w-1/2` → `calc(1/2 * 100%)`
    pub supports_fractions: bool,
}

impl FunctionalOptions {
    /// Resolves a candidate's value against these options.
    pub fn resolve(&self, candidate: &Candidate, theme: &Theme) -> Option<String> {
        let CandidateKind::Functional {
            value,
            modifier,
            negative,
            ..
        } = &candidate.kind
        else {
            return None;
        };
        if *negative && !self.supports_negative {
            return None;
        }

        let resolved = match value {
            None => {
                if modifier.is_some() {
                    return None;
                }
                self.default_key
                    .and_then(|key| theme.resolve(None, &[key]))
                    .or_else(|| self.default_value.map(str::to_string))
                    .or_else(|| {
                        self.theme_keys
                            .first()
                            .and_then(|key| theme.resolve(None, &[key]))
                    })?
            }
            Some(CandidateValue::Arbitrary { value, data_type }) => {
                if modifier.is_some() || !accepts_arbitrary(value, data_type.as_deref(), self.types) {
                    return None;
                }
                value.clone()
            }
            Some(CandidateValue::Named { value, fraction }) => {
                if let Some(fraction) = fraction {
                    if !self.supports_fractions || !is_fraction(fraction) {
                        return None;
                    }
                    theme
                        .resolve(Some(fraction), self.theme_keys)
                        .unwrap_or_else(|| format!("calc({} * 100%)", fraction))
                } else {
                    if modifier.is_some() {
                        return None;
                    }
                    self.keywords
                        .iter()
                        .find(|(keyword, _)| keyword == value)
                        .map(|(_, resolved)| resolved.to_string())
                        .or_else(|| theme.resolve(Some(value), self.theme_keys))
                        .or_else(|| self.bare.and_then(|bare| bare(theme, value)))?
                }
            }
        };

        Some(if *negative {
            negate(&resolved)
        } else {
            resolved
        })
    }
}

/// Checks an arbitrary value against the types a utility accepts.
pub fn accepts_arbitrary(value: &str, hint: Option<&str>, types: &[DataType]) -> bool {
    if types.is_empty() {
        return true;
    }
    match hint {
        Some(hint) => hint
            .parse::<DataType>()
            .is_ok_and(|hinted| types.contains(&hinted) || hinted == DataType::Any),
        None => infer_data_type(value, types).is_some(),
    }
}

/// Wraps a value in `calc(<value> * -1)`.
pub fn negate(value: &str) -> String {
    format!("calc({} * -1)", value)
}

/// Bare multiplier against the scalar `--spacing` value.
pub fn spacing_bare(theme: &Theme, value: &str) -> Option<String> {
    if !is_spacing_multiplier(value) {
        return None;
    }
    let multiplier = theme.resolve(None, &["--spacing"])?;
    Some(format!("calc({} * {})", multiplier, value))
}

/// Bare non-negative integer.
pub fn integer_bare(_: &Theme, value: &str) -> Option<String> {
    value.parse::<u32>().ok().map(|_| value.to_string())
}

/// Bare integer with a unit appended (`2` → `2px`).
pub fn px_bare(_: &Theme, value: &str) -> Option<String> {
    value.parse::<u32>().ok().map(|n| format!("{}px", n))
}

/// Bare number in 0.25 steps as a percentage (`50` → `50%`).
pub fn percent_bare(_: &Theme, value: &str) -> Option<String> {
    is_spacing_multiplier(value).then(|| format!("{}%", value))
}

pub fn degrees_bare(_: &Theme, value: &str) -> Option<String> {
    is_spacing_multiplier(value).then(|| format!("{}deg", value))
}

pub fn ms_bare(_: &Theme, value: &str) -> Option<String> {
    value.parse::<u32>().ok().map(|n| format!("{}ms", n))
}

/// Resolves a color value with an optional alpha modifier.
///
/// Named values go through the theme (`red-500` → `--color-red-500`) apart
/// from `current`, `inherit` and `transparent`.
pub fn resolve_color(
    value: &CandidateValue,
    modifier: Option<&Modifier>,
    theme: &Theme,
    theme_keys: &[&str],
) -> Option<String> {
    let base = match value {
        CandidateValue::Arbitrary { value, data_type } => {
            let accepted = match data_type.as_deref() {
                Some(hint) => hint == "color",
                None => value.starts_with("var(") || infer_data_type(value, &[DataType::Color]).is_some(),
            };
            if !accepted {
                return None;
            }
            value.clone()
        }
        CandidateValue::Named { value, .. } => match value.as_str() {
            "current" => "currentcolor".to_string(),
            "inherit" => "inherit".to_string(),
            "transparent" => "transparent".to_string(),
            other => theme.resolve(Some(other), theme_keys)?,
        },
    };

    let Some(modifier) = modifier else {
        return Some(base);
    };
    if base == "inherit" {
        return None;
    }
    let alpha = match modifier {
        Modifier::Named(named) => theme
            .resolve(Some(named), &["--opacity"])
            .or_else(|| normalize_alpha(named, false))?,
        Modifier::Arbitrary(arbitrary) => normalize_alpha(arbitrary, true)?,
    };
    Some(with_alpha(&base, &alpha))
}

/// Builds declarations from `(property, value)` pairs.
pub fn decls(pairs: &[(&str, &str)]) -> Vec<AstNode> {
    pairs
        .iter()
        .map(|(property, value)| AstNode::decl(*property, *value))
        .collect()
}

/// The utility registry.
#[derive(Clone, Default)]
pub struct Utilities {
    entries: IndexMap<String, Vec<Utility>>,
    next_order: usize,
}

impl fmt::Debug for Utilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

impl Utilities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a utility and returns its order.
    pub fn add(&mut self, name: &str, kind: UtilityKind, compile: CompileFn) -> usize {
        let order = self.next_order;
        self.next_order += 1;
        self.entries
            .entry(name.to_string())
            .or_default()
            .push(Utility {
                kind,
                order,
                compile,
            });
        order
    }

    pub fn static_utility(&mut self, name: &str, compile: CompileFn) -> usize {
        self.add(name, UtilityKind::Static, compile)
    }

    pub fn functional(&mut self, name: &str, compile: CompileFn) -> usize {
        self.add(name, UtilityKind::Functional, compile)
    }

    pub fn has(&self, name: &str, kind: UtilityKind) -> bool {
        self.entries
            .get(name)
            .is_some_and(|utilities| utilities.iter().any(|u| u.kind == kind))
    }

    pub fn get(&self, name: &str) -> &[Utility] {
        self.entries.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Order for arbitrary properties: after every registered utility.
    pub fn arbitrary_order(&self) -> usize {
        self.next_order
    }

    /// Static utility made of fixed declarations.
    pub fn static_decls(&mut self, name: &str, pairs: &[(&str, &str)]) {
        let nodes = decls(pairs);
        self.static_utility(
            name,
            compile_fn(move |candidate, _| (!candidate.negative()).then(|| nodes.clone())),
        );
    }

    /// Static utility whose output may contain nested rules or `@property`.
    pub fn static_nodes(&mut self, name: &str, nodes: Vec<AstNode>) {
        self.static_utility(
            name,
            compile_fn(move |candidate, _| (!candidate.negative()).then(|| nodes.clone())),
        );
    }

    /// Functional utility resolved through [`FunctionalOptions`].
    pub fn functional_utility<H>(&mut self, name: &str, options: FunctionalOptions, handle: H)
    where
        H: Fn(&str) -> Vec<AstNode> + Send + Sync + 'static,
    {
        self.functional(
            name,
            compile_fn(move |candidate, theme| {
                let value = options.resolve(candidate, theme)?;
                Some(handle(&value))
            }),
        );
    }

    /// Color utility with alpha modifier support.
    pub fn color_utility<H>(&mut self, name: &str, theme_keys: &'static [&'static str], handle: H)
    where
        H: Fn(&str) -> Vec<AstNode> + Send + Sync + 'static,
    {
        self.functional(
            name,
            compile_fn(move |candidate, theme| {
                if candidate.negative() {
                    return None;
                }
                let value = candidate.value()?;
                let color = resolve_color(value, candidate.modifier(), theme, theme_keys)?;
                Some(handle(&color))
            }),
        );
    }

    /// Spacing-scale utility (`p-4`, `mx-auto`, `-mt-2`).
    pub fn spacing_utility<H>(
        &mut self,
        name: &str,
        theme_keys: &'static [&'static str],
        supports_negative: bool,
        handle: H,
    ) where
        H: Fn(&str) -> Vec<AstNode> + Send + Sync + 'static,
    {
        self.functional_utility(
            name,
            FunctionalOptions {
                theme_keys,
                keywords: &[("px", "1px")],
                bare: Some(spacing_bare),
                supports_negative,
                ..Default::default()
            },
            handle,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{ThemeBuilder, ThemeOptions};

    fn functional(root: &str, value: Option<&str>, negative: bool) -> Candidate {
        Candidate {
            kind: CandidateKind::Functional {
                root: root.into(),
                value: value.map(|v| CandidateValue::Named {
                    value: v.into(),
                    fraction: None,
                }),
                modifier: None,
                negative,
            },
            variants: vec![],
            important: false,
            raw: root.into(),
        }
    }

    #[test]
    fn spacing_falls_back_to_multiplier() {
        let mut builder = ThemeBuilder::new();
        builder.set("--spacing", "0.25rem", ThemeOptions::empty());
        let theme = builder.build();
        assert_eq!(
            spacing_bare(&theme, "4").as_deref(),
            Some("calc(var(--spacing, 0.25rem) * 4)")
        );
        assert_eq!(spacing_bare(&theme, "4.1"), None);
        assert_eq!(spacing_bare(&Theme::default(), "4"), None);
    }

    #[test]
    fn negative_values_are_wrapped() {
        let options = FunctionalOptions {
            bare: Some(integer_bare),
            supports_negative: true,
            ..Default::default()
        };
        let theme = Theme::default();
        assert_eq!(
            options.resolve(&functional("z", Some("10"), true), &theme).as_deref(),
            Some("calc(10 * -1)")
        );
        let positive_only = FunctionalOptions {
            bare: Some(integer_bare),
            ..Default::default()
        };
        assert_eq!(positive_only.resolve(&functional("z", Some("10"), true), &theme), None);
    }

    #[test]
    fn default_value_for_bare_root() {
        let options = FunctionalOptions {
            default_key: Some("--default-border-width"),
            default_value: Some("1px"),
            ..Default::default()
        };
        assert_eq!(
            options.resolve(&functional("border", None, false), &Theme::default()).as_deref(),
            Some("1px")
        );
        let mut builder = ThemeBuilder::new();
        builder.set("--default-border-width", "2px", ThemeOptions::empty());
        assert_eq!(
            options.resolve(&functional("border", None, false), &builder.build()).as_deref(),
            Some("var(--default-border-width, 2px)")
        );
    }

    #[test]
    fn color_keywords_and_alpha() {
        let theme = Theme::default();
        let current = CandidateValue::Named {
            value: "current".into(),
            fraction: None,
        };
        assert_eq!(
            resolve_color(&current, None, &theme, &["--color"]).as_deref(),
            Some("currentcolor")
        );
        let hex = CandidateValue::Arbitrary {
            value: "#0088cc".into(),
            data_type: None,
        };
        assert_eq!(
            resolve_color(&hex, Some(&Modifier::Named("50".into())), &theme, &["--color"])
                .as_deref(),
            Some("#0088cc80")
        );
        let typed = CandidateValue::Arbitrary {
            value: "12px".into(),
            data_type: Some("length".into()),
        };
        assert_eq!(resolve_color(&typed, None, &theme, &["--color"]), None);
    }
}
