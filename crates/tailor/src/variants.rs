//! The variant engine.
//!
//! Variants transform a utility's rule: `hover` nests the declarations in
//! `&:hover`, `md` wraps them in `@media (width >= 48rem)`, `group-hover`
//! rewrites the inner selector to `&:is(:where(.group):hover *)`.
//!
//! Every variant is registered with an `order`. Variants registered inside
//! a [`Variants::group`] share one order and are ranked against each other
//! by the group's compare function (breakpoints use their resolved size).
//! Registration order is what makes stacked variants sort deterministically.

use crate::candidate::{Variant, VariantValue};
use crate::property::property;
use crate::theme::Theme;
use bitflags::bitflags;
use csstree::{AstNode, escape, replace_nesting, replace_nodes, segment};
use indexmap::IndexMap;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

bitflags! {
    /// What a variant produces, and so what a compound variant may wrap.
    /// The empty set means the variant never compounds.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Compounds: u8 {
        const STYLE_RULES = 0b01;
        const AT_RULES    = 0b10;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantKind {
    Static,
    Functional,
    Compound,
    Arbitrary,
}

/// Rewrites the wrapper rule of a candidate. Returning `None` drops the
/// candidate.
pub type ApplyFn = Arc<dyn Fn(&mut AstNode, &Variant) -> Option<()> + Send + Sync>;

/// Boxes a closure as an [`ApplyFn`].
pub fn apply_fn<F>(apply: F) -> ApplyFn
where
    F: Fn(&mut AstNode, &Variant) -> Option<()> + Send + Sync + 'static,
{
    Arc::new(apply)
}

/// Ranks two variants that share a registration order.
pub type CompareFn = Arc<dyn Fn(&Variant, &Variant) -> Ordering + Send + Sync>;

#[derive(Clone)]
pub struct VariantEntry {
    pub kind: VariantKind,
    pub order: usize,
    pub apply: ApplyFn,
    /// What this variant produces.
    pub compounds: Compounds,
    /// For compound variants: what they accept as payload.
    pub compounds_with: Compounds,
}

impl fmt::Debug for VariantEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariantEntry")
            .field("kind", &self.kind)
            .field("order", &self.order)
            .field("compounds", &self.compounds)
            .field("compounds_with", &self.compounds_with)
            .finish_non_exhaustive()
    }
}

/// How the `dark` variant is expressed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DarkMode {
    /// `@media (prefers-color-scheme: dark)`
    #[default]
    Media,
    /// `&:where(<selector>, <selector> *)`
    Selector(String),
    /// Raw selectors or at-rules.
    Variant(Vec<String>),
}

/// Body of a variant declared with `@variant` / `@custom-variant`.
#[derive(Debug, Clone, PartialEq)]
pub enum CustomVariant {
    /// `@variant name (&:hover, &:focus);`
    Selectors(Vec<String>),
    /// `@variant name { &:hover { @slot; } }`
    Body(Vec<AstNode>),
}

/// The variant registry.
#[derive(Clone, Default)]
pub struct Variants {
    entries: IndexMap<String, VariantEntry>,
    compare_fns: HashMap<usize, CompareFn>,
    next_order: usize,
    group_order: Option<usize>,
}

impl fmt::Debug for Variants {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

impl Variants {
    pub fn new() -> Self {
        Self::default()
    }

    fn register(
        &mut self,
        name: &str,
        kind: VariantKind,
        apply: ApplyFn,
        compounds: Compounds,
        compounds_with: Compounds,
    ) {
        let order = match self.entries.get(name) {
            Some(existing) => existing.order,
            None => self.group_order.unwrap_or_else(|| {
                let order = self.next_order;
                self.next_order += 1;
                order
            }),
        };
        self.entries.insert(
            name.to_string(),
            VariantEntry {
                kind,
                order,
                apply,
                compounds,
                compounds_with,
            },
        );
    }

    /// Registers a static variant.
    pub fn static_variant(&mut self, name: &str, compounds: Compounds, apply: ApplyFn) {
        self.register(name, VariantKind::Static, apply, compounds, Compounds::empty());
    }

    /// Registers a static variant from selectors (`&:hover`) and/or at-rules
    /// (`@media print`).
    pub fn from_selectors(&mut self, name: &str, selectors: &[&str]) {
        let compounds = compounds_for_selectors(selectors);
        let selectors: Vec<String> = selectors.iter().map(|s| s.to_string()).collect();
        self.static_variant(
            name,
            compounds,
            apply_fn(move |node, _| wrap_selectors(node, &selectors)),
        );
    }

    pub fn functional(&mut self, name: &str, compounds: Compounds, apply: ApplyFn) {
        self.register(name, VariantKind::Functional, apply, compounds, Compounds::empty());
    }

    /// Registers a compound variant. `apply` is called once per rule or
    /// at-rule produced by the wrapped variant.
    pub fn compound(&mut self, name: &str, compounds_with: Compounds, apply: ApplyFn) {
        self.register(
            name,
            VariantKind::Compound,
            apply,
            Compounds::STYLE_RULES,
            compounds_with,
        );
    }

    /// Registers every variant added by `register` under a single order,
    /// ranked among themselves by `compare`.
    pub fn group<F>(&mut self, register: F, compare: Option<CompareFn>)
    where
        F: FnOnce(&mut Self),
    {
        let order = self.next_order;
        self.next_order += 1;
        self.group_order = Some(order);
        register(self);
        self.group_order = None;
        if let Some(compare) = compare {
            self.compare_fns.insert(order, compare);
        }
    }

    /// Adds (or replaces) a variant declared in CSS.
    pub fn add_custom(&mut self, name: &str, variant: CustomVariant) {
        match variant {
            CustomVariant::Selectors(selectors) => {
                let refs: Vec<&str> = selectors.iter().map(String::as_str).collect();
                self.from_selectors(name, &refs);
            }
            CustomVariant::Body(body) => {
                let compounds = compounds_for_body(&body);
                self.static_variant(
                    name,
                    compounds,
                    apply_fn(move |node, _| {
                        let children = take_children(node);
                        let mut body = body.clone();
                        replace_nodes(&mut body, &mut |child| {
                            child.is_at_rule("slot").then(|| children.clone())
                        });
                        set_children(node, body);
                        Some(())
                    }),
                );
            }
        }
    }

    pub fn has(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&VariantEntry> {
        self.entries.get(name)
    }

    pub fn kind(&self, name: &str) -> Option<VariantKind> {
        self.entries.get(name).map(|entry| entry.kind)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Returns `true` if compound variant `parent` may wrap `child`.
    pub fn compounds_with(&self, parent: &str, child: &Variant) -> bool {
        let Some(parent) = self.entries.get(parent) else {
            return false;
        };
        let child_compounds = match child {
            Variant::Arbitrary { selector, .. } => compounds_for_selectors(&[selector.as_str()]),
            other => match other.root().and_then(|root| self.entries.get(root)) {
                Some(entry) => entry.compounds,
                None => return false,
            },
        };
        !parent.compounds_with.is_empty()
            && !child_compounds.is_empty()
            && parent.compounds_with.intersects(child_compounds)
    }

    /// Applies `variant` to `node`, a rule whose children are the utility
    /// declarations (possibly already wrapped by inner variants).
    pub fn apply(&self, node: &mut AstNode, variant: &Variant) -> Option<()> {
        self.apply_within(node, variant, None)
    }

    fn apply_within(&self, node: &mut AstNode, variant: &Variant, parent: Option<&str>) -> Option<()> {
        match variant {
            Variant::Arbitrary { selector, relative } => {
                if *relative && parent != Some("has") {
                    return None;
                }
                let children = take_children(node);
                let wrapped = if selector.starts_with('@') {
                    AstNode::at_rule_from_text(selector, children)?
                } else {
                    AstNode::rule(selector.clone(), children)
                };
                set_children(node, vec![wrapped]);
                Some(())
            }
            Variant::Compound {
                root,
                variant: inner,
                ..
            } => {
                let entry = self.entries.get(root)?;
                let mut scratch = AstNode::rule("&", Vec::new());
                self.apply_within(&mut scratch, inner, Some(root))?;
                let mut isolated = take_children(&mut scratch);
                if root == "not" && isolated.len() > 1 {
                    return None;
                }
                for child in isolated.iter_mut() {
                    if !matches!(child, AstNode::Rule(_) | AstNode::AtRule(_)) {
                        return None;
                    }
                    (entry.apply)(child, variant)?;
                }
                let body = take_children(node);
                fill_empty(&mut isolated, &body);
                set_children(node, isolated);
                Some(())
            }
            Variant::Static { root } | Variant::Functional { root, .. } => {
                let entry = self.entries.get(root)?;
                (entry.apply)(node, variant)
            }
        }
    }

    fn order_of(&self, variant: &Variant) -> usize {
        variant
            .root()
            .and_then(|root| self.entries.get(root))
            .map(|entry| entry.order)
            .unwrap_or(usize::MAX)
    }

    /// Total order over variants.
    ///
    /// Arbitrary variants sort last (by selector text). Compound variants
    /// rank by the variant they wrap, after the bare variant.
    pub fn compare(&self, a: &Variant, b: &Variant) -> Ordering {
        if a == b {
            return Ordering::Equal;
        }
        match (a, b) {
            (
                Variant::Arbitrary { selector: left, .. },
                Variant::Arbitrary { selector: right, .. },
            ) => return left.cmp(right),
            (Variant::Arbitrary { .. }, _) => return Ordering::Greater,
            (_, Variant::Arbitrary { .. }) => return Ordering::Less,
            (
                Variant::Compound {
                    root: a_root,
                    modifier: a_modifier,
                    variant: a_inner,
                },
                Variant::Compound {
                    root: b_root,
                    modifier: b_modifier,
                    variant: b_inner,
                },
            ) => {
                return self
                    .compare(a_inner, b_inner)
                    .then_with(|| self.order_of(a).cmp(&self.order_of(b)))
                    .then_with(|| a_root.cmp(b_root))
                    .then_with(|| compare_optional(a_modifier, b_modifier));
            }
            (Variant::Compound { variant: inner, .. }, other) => {
                return self.compare(inner, other).then(Ordering::Greater);
            }
            (other, Variant::Compound { variant: inner, .. }) => {
                return self.compare(other, inner).then(Ordering::Less);
            }
            _ => {}
        }

        let a_order = self.order_of(a);
        let b_order = self.order_of(b);
        if a_order != b_order {
            return a_order.cmp(&b_order);
        }
        if let Some(compare) = self.compare_fns.get(&a_order) {
            let ordering = compare(a, b);
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        let a_root = a.root().unwrap_or_default();
        let b_root = b.root().unwrap_or_default();
        a_root
            .cmp(b_root)
            .then_with(|| compare_optional(&variant_value(a), &variant_value(b)))
            .then_with(|| compare_optional(&variant_modifier(a), &variant_modifier(b)))
    }

    /// The built-in variant set, in cascade order.
    pub fn defaults(theme: Arc<Theme>, dark_mode: &DarkMode) -> Self {
        let mut variants = Variants::new();

        // Pseudo-elements never compound.
        let never = Compounds::empty();
        for (name, selectors) in [
            ("first-letter", &["&::first-letter"][..]),
            ("first-line", &["&::first-line"][..]),
            ("marker", &["& *::marker", "&::marker"][..]),
            ("selection", &["& *::selection", "&::selection"][..]),
            ("file", &["&::file-selector-button"][..]),
            ("placeholder", &["&::placeholder"][..]),
            ("backdrop", &["&::backdrop"][..]),
        ] {
            variants.from_selectors(name, selectors);
        }
        for (name, selector) in [("before", "&::before"), ("after", "&::after")] {
            variants.static_variant(
                name,
                never,
                apply_fn(move |node, _| {
                    let mut children = vec![AstNode::decl("content", "var(--tw-content)")];
                    children.extend(take_children(node));
                    children.push(property("--tw-content", Some("\"\""), None));
                    set_children(node, vec![AstNode::rule(selector, children)]);
                    Some(())
                }),
            );
        }

        // Structural pseudo-classes.
        variants.static_variant(
            "*",
            never,
            apply_fn(|node, _| wrap_selectors(node, &[":is(& > *)".to_string()])),
        );
        for (name, selector) in [
            ("first", "&:first-child"),
            ("last", "&:last-child"),
            ("only", "&:only-child"),
            ("odd", "&:nth-child(odd)"),
            ("even", "&:nth-child(even)"),
            ("first-of-type", "&:first-of-type"),
            ("last-of-type", "&:last-of-type"),
            ("only-of-type", "&:only-of-type"),
            ("empty", "&:empty"),
        ] {
            variants.from_selectors(name, &[selector]);
        }

        // Form state and interaction.
        for (name, selector) in [
            ("visited", "&:visited"),
            ("target", "&:target"),
            ("open", "&:is([open], :popover-open, :open)"),
            ("default", "&:default"),
            ("checked", "&:checked"),
            ("indeterminate", "&:indeterminate"),
            ("placeholder-shown", "&:placeholder-shown"),
            ("autofill", "&:autofill"),
            ("optional", "&:optional"),
            ("required", "&:required"),
            ("valid", "&:valid"),
            ("invalid", "&:invalid"),
            ("in-range", "&:in-range"),
            ("out-of-range", "&:out-of-range"),
            ("read-only", "&:read-only"),
            ("focus-within", "&:focus-within"),
            ("hover", "&:hover"),
            ("focus", "&:focus"),
            ("focus-visible", "&:focus-visible"),
            ("active", "&:active"),
            ("enabled", "&:enabled"),
            ("disabled", "&:disabled"),
            ("inert", "&:is([inert], [inert] *)"),
        ] {
            variants.from_selectors(name, &[selector]);
        }

        register_compounds(&mut variants);
        register_attribute_variants(&mut variants);
        register_breakpoints(&mut variants, &theme);
        register_containers(&mut variants, &theme);

        for (name, selector) in [
            ("motion-safe", "@media (prefers-reduced-motion: no-preference)"),
            ("motion-reduce", "@media (prefers-reduced-motion: reduce)"),
            ("contrast-more", "@media (prefers-contrast: more)"),
            ("contrast-less", "@media (prefers-contrast: less)"),
            ("portrait", "@media (orientation: portrait)"),
            ("landscape", "@media (orientation: landscape)"),
            ("ltr", "&:where(:dir(ltr), [dir=\"ltr\"], [dir=\"ltr\"] *)"),
            ("rtl", "&:where(:dir(rtl), [dir=\"rtl\"], [dir=\"rtl\"] *)"),
        ] {
            variants.from_selectors(name, &[selector]);
        }

        match dark_mode {
            DarkMode::Media => {
                variants.from_selectors("dark", &["@media (prefers-color-scheme: dark)"])
            }
            DarkMode::Selector(selector) => {
                let selector = format!("&:where({}, {} *)", selector, selector);
                variants.from_selectors("dark", &[selector.as_str()]);
            }
            DarkMode::Variant(selectors) => {
                let refs: Vec<&str> = selectors.iter().map(String::as_str).collect();
                variants.from_selectors("dark", &refs);
            }
        }
        variants.static_variant(
            "starting",
            never,
            apply_fn(|node, _| wrap_selectors(node, &["@starting-style".to_string()])),
        );

        variants.from_selectors("print", &["@media print"]);
        variants.from_selectors("forced-colors", &["@media (forced-colors: active)"]);

        log::debug!("registered {} variants", variants.entries.len());
        variants
    }
}

fn compare_optional<T: Ord>(a: &Option<T>, b: &Option<T>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => a.cmp(b),
    }
}

fn variant_value(variant: &Variant) -> Option<String> {
    match variant {
        Variant::Functional {
            value: Some(value), ..
        } => Some(value.value().to_string()),
        _ => None,
    }
}

fn variant_modifier(variant: &Variant) -> Option<String> {
    match variant {
        Variant::Functional {
            modifier: Some(modifier),
            ..
        } => Some(modifier.value().to_string()),
        _ => None,
    }
}

fn compounds_for_selectors(selectors: &[&str]) -> Compounds {
    let mut compounds = Compounds::empty();
    for selector in selectors {
        if selector.starts_with('@') {
            if !["@media", "@supports", "@container"]
                .iter()
                .any(|prefix| selector.starts_with(prefix))
            {
                return Compounds::empty();
            }
            compounds |= Compounds::AT_RULES;
            continue;
        }
        if selector.contains("::") {
            return Compounds::empty();
        }
        compounds |= Compounds::STYLE_RULES;
    }
    compounds
}

fn compounds_for_body(body: &[AstNode]) -> Compounds {
    let mut compounds = Compounds::empty();
    for node in body {
        match node {
            AstNode::Rule(rule) => {
                if rule.selector.contains("::") {
                    return Compounds::empty();
                }
                compounds |= Compounds::STYLE_RULES;
            }
            AstNode::AtRule(at) if at.name == "slot" => {}
            AstNode::AtRule(at) => {
                if !matches!(at.name.as_str(), "media" | "supports" | "container") {
                    return Compounds::empty();
                }
                compounds |= Compounds::AT_RULES;
            }
            _ => {}
        }
    }
    compounds
}

pub(crate) fn take_children(node: &mut AstNode) -> Vec<AstNode> {
    node.children_mut().map(std::mem::take).unwrap_or_default()
}

pub(crate) fn set_children(node: &mut AstNode, children: Vec<AstNode>) {
    if let Some(slot) = node.children_mut() {
        *slot = children;
    }
}

/// Puts `body` into every rule or block at-rule that has no children yet.
fn fill_empty(nodes: &mut [AstNode], body: &[AstNode]) {
    for node in nodes.iter_mut() {
        if let Some(children) = node.children_mut() {
            if children.is_empty() {
                *children = body.to_vec();
            } else {
                fill_empty(children, body);
            }
        }
    }
}

/// Wraps the node's children in one rule for all style selectors, nested
/// inside each at-rule (outermost first).
fn wrap_selectors(node: &mut AstNode, selectors: &[String]) -> Option<()> {
    let (at_rules, style): (Vec<&String>, Vec<&String>) =
        selectors.iter().partition(|s| s.starts_with('@'));
    let mut inner = take_children(node);
    if !style.is_empty() {
        let joined: Vec<&str> = style.iter().map(|s| s.as_str()).collect();
        inner = vec![AstNode::rule(joined.join(", "), inner)];
    }
    for at_rule in at_rules.iter().rev() {
        inner = vec![AstNode::at_rule_from_text(at_rule, inner)?];
    }
    set_children(node, inner);
    Some(())
}

fn wrap_rule(node: &mut AstNode, selector: String) -> Option<()> {
    let children = take_children(node);
    set_children(node, vec![AstNode::rule(selector, children)]);
    Some(())
}

fn wrap_at_rule(node: &mut AstNode, name: &str, params: String) -> Option<()> {
    let children = take_children(node);
    set_children(node, vec![AstNode::at_rule(name, params, children)]);
    Some(())
}

/// `group-*`, `peer-*`, `not-*`, `has-*`, `in-*`.
fn register_compounds(variants: &mut Variants) {
    variants.compound(
        "not",
        Compounds::STYLE_RULES | Compounds::AT_RULES,
        apply_fn(|child, variant| {
            if compound_modifier(variant).is_some() {
                return None;
            }
            match child {
                AstNode::Rule(rule) => {
                    let negated: Vec<String> = segment(&rule.selector, ',')
                        .into_iter()
                        .map(str::trim)
                        .map(|selector| {
                            let nesting = selector.matches('&').count();
                            match selector.strip_prefix('&') {
                                Some(rest) if nesting == 1 => rest.to_string(),
                                _ => replace_nesting(selector, "*"),
                            }
                        })
                        .collect();
                    rule.selector = format!("&:not({})", negated.join(", "));
                    Some(())
                }
                AstNode::AtRule(at) => {
                    if !matches!(at.name.as_str(), "media" | "supports" | "container") {
                        return None;
                    }
                    at.params = negate_condition(&at.name, &at.params);
                    Some(())
                }
                _ => None,
            }
        }),
    );

    for (name, combinator) in [("group", " *"), ("peer", " ~ *")] {
        variants.compound(
            name,
            Compounds::STYLE_RULES,
            apply_fn(move |child, variant| {
                let AstNode::Rule(rule) = child else {
                    return None;
                };
                let marker = match compound_modifier(variant) {
                    Some(modifier) => {
                        format!(":where(.{}\\/{})", name, escape(modifier.value()))
                    }
                    None => format!(":where(.{})", name),
                };
                let mut selector = replace_nesting(&rule.selector, &marker);
                if segment(&selector, ',').len() > 1 {
                    selector = format!(":is({})", selector);
                }
                rule.selector = format!("&:is({}{})", selector, combinator);
                Some(())
            }),
        );
    }

    variants.compound(
        "has",
        Compounds::STYLE_RULES,
        apply_fn(|child, variant| {
            if compound_modifier(variant).is_some() {
                return None;
            }
            let AstNode::Rule(rule) = child else {
                return None;
            };
            rule.selector = format!("&:has({})", replace_nesting(&rule.selector, "*"));
            Some(())
        }),
    );

    variants.compound(
        "in",
        Compounds::STYLE_RULES,
        apply_fn(|child, variant| {
            if compound_modifier(variant).is_some() {
                return None;
            }
            let AstNode::Rule(rule) = child else {
                return None;
            };
            rule.selector = format!(":where({}) &", replace_nesting(&rule.selector, "*"));
            Some(())
        }),
    );
}

fn compound_modifier(variant: &Variant) -> Option<&VariantValue> {
    match variant {
        Variant::Compound { modifier, .. } => modifier.as_ref(),
        _ => None,
    }
}

fn negate_condition(name: &str, params: &str) -> String {
    if let Some(rest) = params.strip_prefix("not ") {
        return rest.to_string();
    }
    if name == "container" && !params.starts_with('(') {
        if let Some((container_name, query)) = params.split_once(' ') {
            return format!("{} not {}", container_name, query);
        }
    }
    format!("not {}", params)
}

/// Destructures a functional variant, rejecting modifiers.
fn functional_value(variant: &Variant) -> Option<&VariantValue> {
    match variant {
        Variant::Functional {
            value: Some(value),
            modifier: None,
            ..
        } => Some(value),
        _ => None,
    }
}

/// `aria-*`, `data-*`, `nth-*`, `supports-*`.
fn register_attribute_variants(variants: &mut Variants) {
    variants.functional(
        "aria",
        Compounds::STYLE_RULES,
        apply_fn(|node, variant| match functional_value(variant)? {
            VariantValue::Named(value) => wrap_rule(node, format!("&[aria-{}=\"true\"]", value)),
            VariantValue::Arbitrary(value) => wrap_rule(node, format!("&[aria-{}]", value)),
        }),
    );

    variants.functional(
        "data",
        Compounds::STYLE_RULES,
        apply_fn(|node, variant| {
            let value = functional_value(variant)?.value();
            wrap_rule(node, format!("&[data-{}]", value))
        }),
    );

    for (name, pseudo) in [
        ("nth", "nth-child"),
        ("nth-last", "nth-last-child"),
        ("nth-of-type", "nth-of-type"),
        ("nth-last-of-type", "nth-last-of-type"),
    ] {
        variants.functional(
            name,
            Compounds::STYLE_RULES,
            apply_fn(move |node, variant| {
                let value = match functional_value(variant)? {
                    VariantValue::Named(value) => {
                        value.parse::<u32>().ok()?;
                        value
                    }
                    VariantValue::Arbitrary(value) => value,
                };
                wrap_rule(node, format!("&:{}({})", pseudo, value))
            }),
        );
    }

    variants.functional(
        "supports",
        Compounds::AT_RULES,
        apply_fn(|node, variant| {
            let condition = match functional_value(variant)? {
                VariantValue::Named(value) => format!("({}: var(--tw))", value),
                VariantValue::Arbitrary(value) => {
                    let passthrough = ["not ", "selector(", "font-tech(", "font-format(", "("];
                    if passthrough.iter().any(|prefix| value.starts_with(prefix)) {
                        value.clone()
                    } else if value.contains(':') {
                        format!("({})", value)
                    } else {
                        format!("({}: var(--tw))", value)
                    }
                }
            };
            wrap_at_rule(node, "supports", condition)
        }),
    );
}

/// Fixed unit ranking for breakpoint sorting. Unknown units and
/// non-numeric expressions sort after these.
const UNIT_ORDER: &[&str] = &[
    "px", "em", "rem", "vh", "vw", "%", "ch", "ex", "lh", "rlh", "vmin", "vmax", "cqw", "cqh",
];

/// Sort key for a resolved size: `(unit rank, number, raw text)`.
fn size_key(value: &str) -> (usize, f64, String) {
    let value = value.trim();
    let end = value
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-'))
        .unwrap_or(value.len());
    let (number, unit) = value.split_at(end);
    match number.parse::<f64>() {
        Ok(number) => {
            let rank = UNIT_ORDER
                .iter()
                .position(|u| *u == unit)
                .unwrap_or(UNIT_ORDER.len());
            (rank, number, value.to_string())
        }
        Err(_) => (UNIT_ORDER.len() + 1, 0.0, value.to_string()),
    }
}

fn compare_sizes(a: &str, b: &str) -> Ordering {
    let (a_rank, a_number, a_raw) = size_key(a);
    let (b_rank, b_number, b_raw) = size_key(b);
    a_rank
        .cmp(&b_rank)
        .then_with(|| a_number.partial_cmp(&b_number).unwrap_or(Ordering::Equal))
        .then_with(|| a_raw.cmp(&b_raw))
}

/// Resolves a named or arbitrary size against a theme namespace.
fn resolve_size(theme: &Theme, namespace: &str, value: &VariantValue) -> Option<String> {
    match value {
        VariantValue::Named(name) => theme.resolve_value(Some(name), &[namespace]),
        VariantValue::Arbitrary(value) => Some(value.clone()),
    }
}

/// Breakpoint and container variants rank by resolved size, then prefix
/// (bare, `min-`, `max-`), then name.
fn size_compare(theme: Arc<Theme>, namespace: &'static str, prefixes: [&'static str; 3]) -> CompareFn {
    Arc::new(move |a: &Variant, b: &Variant| {
        let key = |variant: &Variant| -> (Option<String>, usize, String) {
            match variant {
                Variant::Static { root } => (
                    theme.resolve_value(Some(root), &[namespace]),
                    0,
                    root.clone(),
                ),
                Variant::Functional {
                    root,
                    value: Some(value),
                    ..
                } => {
                    let rank = prefixes
                        .iter()
                        .position(|prefix| *prefix == root.as_str())
                        .unwrap_or(0);
                    (
                        resolve_size(&theme, namespace, value),
                        rank,
                        value.value().to_string(),
                    )
                }
                _ => (None, 0, String::new()),
            }
        };
        let (a_size, a_rank, a_name) = key(a);
        let (b_size, b_rank, b_name) = key(b);
        let sizes = match (&a_size, &b_size) {
            (Some(a), Some(b)) => compare_sizes(a, b),
            _ => compare_optional(&a_size, &b_size),
        };
        sizes
            .then_with(|| a_rank.cmp(&b_rank))
            .then_with(|| a_name.cmp(&b_name))
    })
}

/// Theme breakpoints plus `min-*` and `max-*`.
fn register_breakpoints(variants: &mut Variants, theme: &Arc<Theme>) {
    let breakpoints: Vec<(String, String)> = theme
        .namespace("--breakpoint")
        .into_iter()
        .map(|(name, entry)| (name, entry.value.clone()))
        .collect();
    let compare = size_compare(Arc::clone(theme), "--breakpoint", ["", "min", "max"]);
    let min_theme = Arc::clone(theme);
    let max_theme = Arc::clone(theme);

    variants.group(
        move |variants| {
            for (name, value) in breakpoints {
                let query = format!("(width >= {})", value);
                variants.static_variant(
                    &name,
                    Compounds::AT_RULES,
                    apply_fn(move |node, _| wrap_at_rule(node, "media", query.clone())),
                );
            }
            variants.functional(
                "min",
                Compounds::AT_RULES,
                apply_fn(move |node, variant| {
                    let value = resolve_size(&min_theme, "--breakpoint", functional_value(variant)?)?;
                    wrap_at_rule(node, "media", format!("(width >= {})", value))
                }),
            );
            variants.functional(
                "max",
                Compounds::AT_RULES,
                apply_fn(move |node, variant| {
                    let value = resolve_size(&max_theme, "--breakpoint", functional_value(variant)?)?;
                    wrap_at_rule(node, "media", format!("(width < {})", value))
                }),
            );
        },
        Some(compare),
    );
}

/// `@md`, `@min-md`, `@max-md`, `@[400px]`, `@md/sidebar`.
fn register_containers(variants: &mut Variants, theme: &Arc<Theme>) {
    let compare = size_compare(Arc::clone(theme), "--container", ["@", "@min", "@max"]);
    let theme = Arc::clone(theme);
    variants.group(
        move |variants| {
            for (name, operator) in [("@", ">="), ("@min", ">="), ("@max", "<")] {
                let theme = Arc::clone(&theme);
                variants.functional(
                    name,
                    Compounds::AT_RULES,
                    apply_fn(move |node, variant| {
                        let Variant::Functional {
                            value: Some(value),
                            modifier,
                            ..
                        } = variant
                        else {
                            return None;
                        };
                        let size = resolve_size(&theme, "--container", value)?;
                        let query = format!("(width {} {})", operator, size);
                        let params = match modifier {
                            Some(container) => format!("{} {}", container.value(), query),
                            None => query,
                        };
                        wrap_at_rule(node, "container", params)
                    }),
                );
            }
        },
        Some(compare),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{ThemeBuilder, ThemeOptions};
    use csstree::{flatten, to_css};

    fn variants() -> Variants {
        let mut builder = ThemeBuilder::new();
        builder
            .set("--breakpoint-sm", "40rem", ThemeOptions::empty())
            .set("--breakpoint-md", "48rem", ThemeOptions::empty())
            .set("--container-md", "28rem", ThemeOptions::empty());
        Variants::defaults(Arc::new(builder.build()), &DarkMode::Media)
    }

    fn apply(variants: &Variants, variant: Variant) -> Option<String> {
        let mut node = AstNode::rule(".x", vec![AstNode::decl("display", "flex")]);
        variants.apply(&mut node, &variant)?;
        Some(to_css(&flatten(vec![node])))
    }

    fn named(root: &str) -> Variant {
        Variant::Static { root: root.into() }
    }

    fn compound(root: &str, inner: Variant) -> Variant {
        Variant::Compound {
            root: root.into(),
            modifier: None,
            variant: Box::new(inner),
        }
    }

    #[test]
    fn static_selector_variant() {
        let css = apply(&variants(), named("hover")).unwrap();
        assert_eq!(css, ".x:hover {\n  display: flex;\n}\n");
    }

    #[test]
    fn breakpoint_wraps_in_media() {
        let css = apply(&variants(), named("md")).unwrap();
        assert_eq!(css, "@media (width >= 48rem) {\n  .x {\n    display: flex;\n  }\n}\n");
    }

    #[test]
    fn group_with_name() {
        let variant = Variant::Compound {
            root: "group".into(),
            modifier: Some(VariantValue::Named("side".into())),
            variant: Box::new(named("hover")),
        };
        let css = apply(&variants(), variant).unwrap();
        assert!(css.starts_with(".x:is(:where(.group\\/side):hover *) {"));
    }

    #[test]
    fn peer_uses_sibling_combinator() {
        let css = apply(&variants(), compound("peer", named("focus"))).unwrap();
        assert!(css.starts_with(".x:is(:where(.peer):focus ~ *) {"));
    }

    #[test]
    fn not_negates_selectors_and_media() {
        let v = variants();
        let css = apply(&v, compound("not", named("hover"))).unwrap();
        assert!(css.starts_with(".x:not(:hover) {"));

        let css = apply(&v, compound("not", named("print"))).unwrap();
        assert!(css.starts_with("@media not print {"));

        let css = apply(
            &v,
            compound(
                "not",
                Variant::Functional {
                    root: "supports".into(),
                    value: Some(VariantValue::Named("grid".into())),
                    modifier: None,
                },
            ),
        )
        .unwrap();
        assert!(css.starts_with("@supports not (grid: var(--tw)) {"));
    }

    #[test]
    fn has_accepts_relative_selectors() {
        let v = variants();
        let relative = Variant::Arbitrary {
            selector: ">img".into(),
            relative: true,
        };
        assert!(apply(&v, relative.clone()).is_none());
        let css = apply(&v, compound("has", relative)).unwrap();
        assert!(css.starts_with(".x:has(>img) {"));
    }

    #[test]
    fn before_injects_content() {
        let css = apply(&variants(), named("before")).unwrap();
        assert!(css.contains(".x::before {\n  content: var(--tw-content);\n  display: flex;\n}"));
    }

    #[test]
    fn modifiers_are_rejected_where_unsupported() {
        let variant = Variant::Functional {
            root: "aria".into(),
            value: Some(VariantValue::Named("checked".into())),
            modifier: Some(VariantValue::Named("x".into())),
        };
        assert!(apply(&variants(), variant).is_none());
    }

    #[test]
    fn unknown_breakpoints_produce_nothing() {
        let variant = Variant::Functional {
            root: "min".into(),
            value: Some(VariantValue::Named("huge".into())),
            modifier: None,
        };
        assert!(apply(&variants(), variant).is_none());
    }

    #[test]
    fn named_container_query() {
        let variant = Variant::Functional {
            root: "@".into(),
            value: Some(VariantValue::Named("md".into())),
            modifier: Some(VariantValue::Named("sidebar".into())),
        };
        let css = apply(&variants(), variant).unwrap();
        assert!(css.starts_with("@container sidebar (width >= 28rem) {"));
    }

    #[test]
    fn category_order() {
        let v = variants();
        let ordered = [
            named("before"),
            named("first"),
            named("hover"),
            named("focus"),
            named("sm"),
            named("md"),
            named("dark"),
            named("print"),
            Variant::Arbitrary {
                selector: "&_p".into(),
                relative: false,
            },
        ];
        for pair in ordered.windows(2) {
            assert_eq!(
                v.compare(&pair[0], &pair[1]),
                Ordering::Less,
                "{:?} < {:?}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn breakpoints_sort_by_size_then_prefix() {
        let v = variants();
        let min = |value: &str| Variant::Functional {
            root: "min".into(),
            value: Some(VariantValue::Arbitrary(value.into())),
            modifier: None,
        };
        assert_eq!(v.compare(&named("sm"), &named("md")), Ordering::Less);
        assert_eq!(v.compare(&min("10px"), &min("10rem")), Ordering::Less);
        assert_eq!(v.compare(&min("10em"), &min("10rem")), Ordering::Less);
        assert_eq!(v.compare(&min("10rem"), &min("10vh")), Ordering::Less);
        assert_eq!(v.compare(&min("10vh"), &min("calc(1px+1rem)")), Ordering::Less);
        let min_md = Variant::Functional {
            root: "min".into(),
            value: Some(VariantValue::Named("md".into())),
            modifier: None,
        };
        assert_eq!(v.compare(&named("md"), &min_md), Ordering::Less);
    }

    #[test]
    fn compounds_sort_after_their_inner_variant() {
        let v = variants();
        let group_hover = compound("group", named("hover"));
        assert_eq!(v.compare(&named("hover"), &group_hover), Ordering::Less);
        assert_eq!(v.compare(&group_hover, &named("focus")), Ordering::Less);
    }

    #[test]
    fn redeclared_variant_keeps_its_position() {
        let mut v = variants();
        let before = v.get("hover").unwrap().order;
        v.add_custom("hover", CustomVariant::Selectors(vec!["&:hover:not(:disabled)".into()]));
        assert_eq!(v.get("hover").unwrap().order, before);
        let css = apply(&v, named("hover")).unwrap();
        assert!(css.starts_with(".x:hover:not(:disabled) {"));
    }

    #[test]
    fn slot_body_variant() {
        let mut v = variants();
        v.add_custom(
            "hocus",
            CustomVariant::Body(vec![AstNode::rule(
                "&:hover, &:focus",
                vec![AstNode::statement("slot", "")],
            )]),
        );
        let css = apply(&v, named("hocus")).unwrap();
        assert!(css.starts_with(".x:hover, .x:focus {"));
        let css = apply(&v, compound("not", named("hocus"))).unwrap();
        assert!(css.starts_with(".x:not(:hover, :focus) {"));
    }
}
