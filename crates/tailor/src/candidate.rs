//! Candidate parsing.
//!
//! A candidate is a class name such as `md:hover:bg-red-500/50!`. Parsing
//! splits it into variants (`md`, `hover`) and a utility part
//! (`bg-red-500/50`), then decides which utility root the rest belongs to.
//!
//! ```text
//! candidate := variant ':' candidate | '!'? utility '!'?
//! utility := static | functional ('-' value)? ('/' modifier)? | '[' property ':' value ']'
//! ```
//!
//! Roots are ambiguous (`border-x-2` vs `border-x` + `2`) so
//! [`parse_candidate`] yields every split, longest root first. Parsing never
//! fails loudly: anything that does not fit yields no candidates.

use crate::utilities::{UtilityKind, Utilities};
use crate::value::decode_arbitrary_value;
use crate::variants::{VariantKind, Variants};
use csstree::{is_balanced, segment};

/// A parsed utility class.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub kind: CandidateKind,
    /// Variants as written, left to right (outermost first).
    pub variants: Vec<Variant>,
    pub important: bool,
    /// The original class name.
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CandidateKind {
    /// `flex`, `-flex`
    Static { root: String, negative: bool },
    /// `bg-red-500/50`, `p-[3px]`, `shrink`
    Functional {
        root: String,
        value: Option<CandidateValue>,
        modifier: Option<Modifier>,
        negative: bool,
    },
    /// `[color:red]/50`
    Arbitrary {
        property: String,
        value: String,
        modifier: Option<Modifier>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum CandidateValue {
    /// A theme key or bare value. `w-1/2` has `value = "1"`, `fraction = "1/2"`.
    Named {
        value: String,
        fraction: Option<String>,
    },
    /// `[...]` or `(--var)`, already decoded. `data_type` holds a hint such
    /// as `length` from `[length:var(--x)]`.
    Arbitrary {
        value: String,
        data_type: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Modifier {
    Named(String),
    Arbitrary(String),
}

impl Modifier {
    pub fn value(&self) -> &str {
        match self {
            Modifier::Named(value) | Modifier::Arbitrary(value) => value,
        }
    }

    pub fn is_arbitrary(&self) -> bool {
        matches!(self, Modifier::Arbitrary(_))
    }
}

/// A parsed variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Variant {
    /// `hover`, `md`, `dark`
    Static { root: String },
    /// `aria-checked`, `data-[state=open]`, `@md/sidebar`
    Functional {
        root: String,
        value: Option<VariantValue>,
        modifier: Option<VariantValue>,
    },
    /// `group-hover`, `not-[@media_print]`, `has-[>img]`
    Compound {
        root: String,
        modifier: Option<VariantValue>,
        variant: Box<Variant>,
    },
    /// `[&_p]`, `[@media(width>=10px)]`
    Arbitrary { selector: String, relative: bool },
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VariantValue {
    Named(String),
    Arbitrary(String),
}

impl VariantValue {
    pub fn value(&self) -> &str {
        match self {
            VariantValue::Named(value) | VariantValue::Arbitrary(value) => value,
        }
    }
}

impl Variant {
    pub fn root(&self) -> Option<&str> {
        match self {
            Variant::Static { root }
            | Variant::Functional { root, .. }
            | Variant::Compound { root, .. } => Some(root),
            Variant::Arbitrary { .. } => None,
        }
    }
}

impl Candidate {
    /// The utility root, or `None` for arbitrary properties.
    pub fn root(&self) -> Option<&str> {
        match &self.kind {
            CandidateKind::Static { root, .. } | CandidateKind::Functional { root, .. } => {
                Some(root)
            }
            CandidateKind::Arbitrary { .. } => None,
        }
    }

    pub fn negative(&self) -> bool {
        match &self.kind {
            CandidateKind::Static { negative, .. } | CandidateKind::Functional { negative, .. } => {
                *negative
            }
            CandidateKind::Arbitrary { .. } => false,
        }
    }

    pub fn value(&self) -> Option<&CandidateValue> {
        match &self.kind {
            CandidateKind::Functional { value, .. } => value.as_ref(),
            _ => None,
        }
    }

    pub fn modifier(&self) -> Option<&Modifier> {
        match &self.kind {
            CandidateKind::Functional { modifier, .. }
            | CandidateKind::Arbitrary { modifier, .. } => modifier.as_ref(),
            CandidateKind::Static { .. } => None,
        }
    }
}

/// Parses a class name into every candidate it could be.
pub fn parse_candidate(input: &str, utilities: &Utilities, variants: &Variants) -> Vec<Candidate> {
    let mut result = Vec::new();
    let mut segments = segment(input, ':');
    let Some(base) = segments.pop() else {
        return result;
    };
    if segments.iter().any(|s| s.is_empty()) {
        return result;
    }

    let mut parsed_variants = Vec::with_capacity(segments.len());
    for raw_variant in &segments {
        match parse_variant(raw_variant, variants) {
            Some(variant) => parsed_variants.push(variant),
            None => {
                log::trace!("dropping `{}`: unknown variant `{}`", input, raw_variant);
                return result;
            }
        }
    }

    let (base, important) = if let Some(rest) = base.strip_suffix('!') {
        (rest, true)
    } else if let Some(rest) = base.strip_prefix('!') {
        (rest, true)
    } else {
        (base, false)
    };
    if base.is_empty() {
        return result;
    }

    let make = |kind: CandidateKind| Candidate {
        kind,
        variants: parsed_variants.clone(),
        important,
        raw: input.to_string(),
    };

    // Arbitrary properties: `[color:red]`, `[--my-var:1px]/50`
    if base.starts_with('[') {
        let parts = segment(base, '/');
        if parts.len() > 2 {
            return result;
        }
        let modifier = match parts.get(1) {
            Some(raw) => match parse_modifier(raw) {
                Some(modifier) => Some(modifier),
                None => return result,
            },
            None => None,
        };
        let Some(inner) = parts[0].strip_prefix('[').and_then(|s| s.strip_suffix(']')) else {
            return result;
        };
        if !inner.starts_with(|c: char| c == '-' || c.is_ascii_lowercase()) {
            return result;
        }
        let Some(idx) = inner.find(':') else {
            return result;
        };
        if idx == 0 || idx == inner.len() - 1 {
            return result;
        }
        let property = &inner[..idx];
        if !property
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return result;
        }
        let value = decode_arbitrary_value(&inner[idx + 1..]);
        if !is_valid_arbitrary(&value) {
            return result;
        }
        result.push(make(CandidateKind::Arbitrary {
            property: property.to_string(),
            value,
            modifier,
        }));
        return result;
    }

    let (base, negative) = match base.strip_prefix('-') {
        Some(rest) if !rest.starts_with('-') && !rest.is_empty() => (rest, true),
        _ => (base, false),
    };

    if utilities.has(base, UtilityKind::Static) && !base.contains('[') {
        result.push(make(CandidateKind::Static {
            root: base.to_string(),
            negative,
        }));
    }

    let parts = segment(base, '/');
    if parts.len() > 2 {
        return result;
    }
    let base_without_modifier = parts[0];
    let modifier = match parts.get(1) {
        Some(raw) => match parse_modifier(raw) {
            Some(modifier) => Some(modifier),
            None => return result,
        },
        None => None,
    };

    // `bg-[#0088cc]`, `bg-(--brand)`
    if base_without_modifier.ends_with(']') || base_without_modifier.ends_with(')') {
        let opener = if base_without_modifier.ends_with(']') {
            "-["
        } else {
            "-("
        };
        let Some(idx) = base_without_modifier.find(opener) else {
            return result;
        };
        let root = &base_without_modifier[..idx];
        if !utilities.has(root, UtilityKind::Functional) {
            return result;
        }
        let Some(value) = parse_arbitrary_value(&base_without_modifier[idx + 1..]) else {
            return result;
        };
        result.push(make(CandidateKind::Functional {
            root: root.to_string(),
            value: Some(value),
            modifier,
            negative,
        }));
        return result;
    }

    for (root, value) in find_roots(base_without_modifier, |root| {
        utilities.has(root, UtilityKind::Functional)
    }) {
        let value = match value {
            None => None,
            Some(value) if is_valid_named(value) => Some(CandidateValue::Named {
                value: value.to_string(),
                fraction: match &modifier {
                    Some(Modifier::Named(m)) => Some(format!("{}/{}", value, m)),
                    _ => None,
                },
            }),
            Some(_) => continue,
        };
        result.push(make(CandidateKind::Functional {
            root: root.to_string(),
            value,
            modifier: modifier.clone(),
            negative,
        }));
    }

    result
}

/// Parses `[...]` or `(--var)` including the brackets.
fn parse_arbitrary_value(input: &str) -> Option<CandidateValue> {
    if let Some(inner) = input.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        let (data_type, raw) = split_type_hint(inner);
        let mut value = decode_arbitrary_value(raw);
        if !is_valid_arbitrary(&value) {
            return None;
        }
        // `[--brand]` is shorthand for `[var(--brand)]`.
        if value.starts_with("--") && !value.contains([' ', '(', ',']) {
            value = format!("var({})", value);
        }
        return Some(CandidateValue::Arbitrary {
            value,
            data_type: data_type.map(str::to_string),
        });
    }

    let inner = input.strip_prefix('(')?.strip_suffix(')')?;
    let (data_type, raw) = split_type_hint(inner);
    if !raw.starts_with("--") || !is_balanced(raw) {
        return None;
    }
    Some(CandidateValue::Arbitrary {
        value: format!("var({})", decode_arbitrary_value(raw)),
        data_type: data_type.map(str::to_string),
    })
}

/// Splits a leading `type:` hint off an arbitrary value.
fn split_type_hint(input: &str) -> (Option<&str>, &str) {
    for (idx, c) in input.char_indices() {
        if c == ':' {
            if idx == 0 {
                break;
            }
            return (Some(&input[..idx]), &input[idx + 1..]);
        }
        if !(c.is_ascii_lowercase() || c == '-') {
            break;
        }
    }
    (None, input)
}

fn parse_modifier(input: &str) -> Option<Modifier> {
    if let Some(inner) = input.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        let value = decode_arbitrary_value(inner);
        return is_valid_arbitrary(&value).then_some(Modifier::Arbitrary(value));
    }
    if let Some(inner) = input.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
        return (inner.starts_with("--") && is_balanced(inner))
            .then(|| Modifier::Arbitrary(format!("var({})", inner)));
    }
    is_valid_named(input).then(|| Modifier::Named(input.to_string()))
}

fn is_valid_named(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '%'))
}

fn is_valid_arbitrary(value: &str) -> bool {
    !value.trim().is_empty() && is_balanced(value) && segment(value, ';').len() == 1
}

/// Parses one variant segment (the part between `:` separators).
pub fn parse_variant(input: &str, variants: &Variants) -> Option<Variant> {
    if let Some(inner) = input.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        if inner.starts_with('@') && inner.contains('&') {
            return None;
        }
        let selector = decode_arbitrary_value(inner);
        if !is_valid_arbitrary(&selector) {
            return None;
        }
        let selector = selector.trim().to_string();
        let relative = selector.starts_with(['>', '+', '~']);
        let selector = if !selector.starts_with('@') && !relative && !selector.contains('&') {
            format!("&:is({})", selector)
        } else {
            selector
        };
        return Some(Variant::Arbitrary { selector, relative });
    }

    let parts = segment(input, '/');
    if parts.len() > 2 {
        return None;
    }
    let without_modifier = parts[0];
    let modifier = parts.get(1).copied();

    for (root, value) in find_roots(without_modifier, |root| variants.has(root)) {
        match variants.kind(root)? {
            VariantKind::Static => {
                if value.is_some() || modifier.is_some() {
                    return None;
                }
                return Some(Variant::Static {
                    root: root.to_string(),
                });
            }
            VariantKind::Functional => {
                let modifier = match modifier {
                    Some(raw) => Some(parse_variant_value(raw)?),
                    None => None,
                };
                let value = match value {
                    Some(raw) => Some(parse_variant_value(raw)?),
                    None => None,
                };
                return Some(Variant::Functional {
                    root: root.to_string(),
                    value,
                    modifier,
                });
            }
            VariantKind::Compound => {
                let inner = parse_variant(value?, variants)?;
                if !variants.compounds_with(root, &inner) {
                    log::trace!("`{}` cannot compound with `{}`", root, value?);
                    return None;
                }
                let modifier = match modifier {
                    Some(raw) => Some(parse_variant_value(raw)?),
                    None => None,
                };
                return Some(Variant::Compound {
                    root: root.to_string(),
                    modifier,
                    variant: Box::new(inner),
                });
            }
            VariantKind::Arbitrary => return None,
        }
    }
    None
}

fn parse_variant_value(raw: &str) -> Option<VariantValue> {
    if let Some(inner) = raw.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        let value = decode_arbitrary_value(inner);
        return is_valid_arbitrary(&value).then_some(VariantValue::Arbitrary(value));
    }
    if let Some(inner) = raw.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
        return (inner.starts_with("--") && is_balanced(inner))
            .then(|| VariantValue::Arbitrary(format!("var({})", inner)));
    }
    is_valid_named(raw).then(|| VariantValue::Named(raw.to_string()))
}

/// Yields every `(root, value)` split of `input` whose root `exists`,
/// longest root first. `@md` also yields `("@", "md")`.
pub fn find_roots<'a, F>(input: &'a str, exists: F) -> Vec<(&'a str, Option<&'a str>)>
where
    F: Fn(&str) -> bool,
{
    let mut roots = Vec::new();
    if exists(input) {
        roots.push((input, None));
    }

    let mut end = input.len();
    while let Some(idx) = input[..end].rfind('-') {
        if idx == 0 {
            break;
        }
        let root = &input[..idx];
        if exists(root) {
            let value = &input[idx + 1..];
            if value.is_empty() {
                break;
            }
            roots.push((root, Some(value)));
        }
        end = idx;
    }

    if input.len() > 1 && input.starts_with('@') && exists("@") {
        roots.push(("@", Some(&input[1..])));
    }
    roots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ThemeBuilder;
    use crate::utilities::builtin;
    use crate::variants::DarkMode;
    use std::sync::Arc;

    fn registries() -> (Utilities, Variants) {
        let mut builder = ThemeBuilder::new();
        builder.set("--breakpoint-md", "48rem", Default::default());
        let theme = Arc::new(builder.build());
        (
            builtin::utilities(),
            Variants::defaults(theme, &DarkMode::Media),
        )
    }

    fn parse(input: &str) -> Vec<Candidate> {
        let (utilities, variants) = registries();
        parse_candidate(input, &utilities, &variants)
    }

    #[test]
    fn static_candidate() {
        let candidates = parse("flex");
        assert_eq!(
            candidates[0].kind,
            CandidateKind::Static {
                root: "flex".into(),
                negative: false
            }
        );
    }

    #[test]
    fn important_prefix_and_suffix() {
        assert!(parse("flex!")[0].important);
        assert!(parse("!flex")[0].important);
        assert!(!parse("flex")[0].important);
    }

    #[test]
    fn functional_with_fraction() {
        let candidates = parse("w-1/2");
        assert_eq!(
            candidates[0].kind,
            CandidateKind::Functional {
                root: "w".into(),
                value: Some(CandidateValue::Named {
                    value: "1".into(),
                    fraction: Some("1/2".into()),
                }),
                modifier: Some(Modifier::Named("2".into())),
                negative: false,
            }
        );
    }

    #[test]
    fn arbitrary_value_with_type_hint() {
        let candidates = parse("bg-[color:var(--x)]/50");
        assert_eq!(
            candidates[0].value(),
            Some(&CandidateValue::Arbitrary {
                value: "var(--x)".into(),
                data_type: Some("color".into()),
            })
        );
        assert_eq!(
            candidates[0].modifier(),
            Some(&Modifier::Named("50".into()))
        );
    }

    #[test]
    fn variable_shorthand() {
        let candidates = parse("bg-(--brand)");
        assert_eq!(
            candidates[0].value(),
            Some(&CandidateValue::Arbitrary {
                value: "var(--brand)".into(),
                data_type: None,
            })
        );
    }

    #[test]
    fn negative_values() {
        let candidates = parse("-z-10");
        assert!(candidates[0].negative());
        assert_eq!(candidates[0].root(), Some("z"));
    }

    #[test]
    fn arbitrary_property() {
        let candidates = parse("hover:[mask-type:luminance]");
        assert_eq!(
            candidates[0].kind,
            CandidateKind::Arbitrary {
                property: "mask-type".into(),
                value: "luminance".into(),
                modifier: None,
            }
        );
        assert_eq!(candidates[0].variants.len(), 1);
        assert!(parse("[color:red;background:blue]").is_empty());
    }

    #[test]
    fn roots_are_tried_longest_first() {
        let roots: Vec<_> = find_roots("border-x-2", |r| r == "border" || r == "border-x")
            .into_iter()
            .map(|(root, _)| root)
            .collect();
        assert_eq!(roots, vec!["border-x", "border"]);
    }

    #[test]
    fn variants_are_kept_in_written_order() {
        let candidates = parse("md:hover:flex");
        assert_eq!(
            candidates[0].variants,
            vec![
                Variant::Static { root: "md".into() },
                Variant::Static {
                    root: "hover".into()
                },
            ]
        );
    }

    #[test]
    fn colons_inside_brackets_do_not_split() {
        let candidates = parse("[@media(width>=123px)]:flex");
        assert_eq!(
            candidates[0].variants,
            vec![Variant::Arbitrary {
                selector: "@media(width>=123px)".into(),
                relative: false,
            }]
        );
    }

    #[test]
    fn compound_variants_wrap_inner_variant() {
        let candidates = parse("group-hover/sidebar:flex");
        assert_eq!(
            candidates[0].variants[0],
            Variant::Compound {
                root: "group".into(),
                modifier: Some(VariantValue::Named("sidebar".into())),
                variant: Box::new(Variant::Static {
                    root: "hover".into()
                }),
            }
        );
    }

    #[test]
    fn pseudo_elements_do_not_compound() {
        assert!(parse("group-before:flex").is_empty());
    }

    #[test]
    fn unparsable_candidates_yield_nothing() {
        assert!(parse("hover::flex").is_empty());
        assert!(parse("unknown-variant:flex").is_empty());
        assert!(parse("bg-[#fff").is_empty());
        assert!(parse("w-1/2/3").is_empty());
        assert!(parse("").is_empty());
    }
}
