//! The theme store.
//!
//! A theme is a namespaced table of design tokens written as CSS custom
//! properties inside `@theme` blocks:
//!
//! ```css
//! @theme {
//!   --color-red-500: #ef4444;
//!   --spacing-4: 1rem;
//!   --breakpoint-md: 48rem;
//! }
//! ```
//!
//! The store is never edited in place. Directives are collected as an
//! ordered list of [`ThemeEvent`]s and folded once by [`ThemeBuilder`] into
//! an immutable [`Theme`].
//!
//! ## Lookup syntaxes
//!
//! | Syntax                 | Key                 |
//! |------------------------|---------------------|
//! | `--color-red-500`      | `--color-red-500`   |
//! | `colors.red.500`       | `--color-red-500`   |
//! | `colors[red][500]`     | `--color-red-500`   |
//! | `blur.DEFAULT`, `blur` | `--blur`            |
//! | `font.family`          | `--default-font-family` (fallback) |

use bitflags::bitflags;
use csstree::{AstNode, WalkAction, walk};
use indexmap::IndexMap;
use std::collections::HashSet;

bitflags! {
    /// Options attached to an `@theme` block.
    ///
    /// ```
    /// use tailor::theme::ThemeOptions;
    ///
    /// let options = ThemeOptions::parse("reference inline");
    /// assert!(options.contains(ThemeOptions::REFERENCE | ThemeOptions::INLINE));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct ThemeOptions: u8 {
        /// Resolve to the literal value instead of a `var()` reference.
        const INLINE    = 0b0000_0001;
        /// Usable for substitution but never emitted as a variable.
        const REFERENCE = 0b0000_0010;
        /// Never overrides an entry that was not itself a default.
        const DEFAULT   = 0b0000_0100;
        /// Always emitted, even when nothing reads it.
        const STATIC    = 0b0000_1000;
    }
}

impl ThemeOptions {
    /// Parses the option words that follow `@theme`.
    pub fn parse(params: &str) -> Self {
        let mut options = ThemeOptions::empty();
        for word in params.split_whitespace() {
            match word {
                "inline" => options |= ThemeOptions::INLINE,
                "reference" => options |= ThemeOptions::REFERENCE,
                "default" => options |= ThemeOptions::DEFAULT,
                "static" => options |= ThemeOptions::STATIC,
                _ => {}
            }
        }
        options
    }
}

/// A single theme value.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeEntry {
    /// Full custom property name, e.g. `--color-red-500`.
    pub key: String,
    pub value: String,
    pub options: ThemeOptions,
    /// Becomes `true` once any non-reference write happens for this key.
    emittable: bool,
}

impl ThemeEntry {
    /// Returns `true` if this entry may be emitted as a CSS variable.
    pub fn is_emittable(&self) -> bool {
        self.emittable
    }

    /// Renders the entry the way a utility consumes it: a `var()` with the
    /// literal as fallback, or just the literal for inline/reference entries.
    pub fn render(&self) -> String {
        if !self.emittable || self.options.contains(ThemeOptions::INLINE) {
            self.value.clone()
        } else {
            format!("var({}, {})", self.key, self.value)
        }
    }
}

/// `@keyframes` declared inside `@theme`.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeKeyframes {
    pub name: String,
    pub node: AstNode,
    pub options: ThemeOptions,
}

/// One step in building a theme.
#[derive(Debug, Clone, PartialEq)]
pub enum ThemeEvent {
    Set {
        key: String,
        value: String,
        options: ThemeOptions,
    },
    /// `--<namespace>-*: initial`. Holds `--<namespace>`.
    UnsetNamespace(String),
    /// `--*: initial`.
    UnsetAll,
    Keyframes(ThemeKeyframes),
}

impl ThemeEvent {
    /// Builds the event for a custom property declared in `@theme`.
    pub fn from_declaration(key: &str, value: &str, options: ThemeOptions) -> Self {
        let key = key.trim();
        let value = value.trim();
        if value == "initial" {
            if key == "--*" {
                return ThemeEvent::UnsetAll;
            }
            if let Some(namespace) = key.strip_suffix("-*") {
                return ThemeEvent::UnsetNamespace(namespace.to_string());
            }
        }
        ThemeEvent::Set {
            key: key.to_string(),
            value: value.to_string(),
            options,
        }
    }
}

/// Folds [`ThemeEvent`]s into a [`Theme`].
#[derive(Debug, Clone, Default)]
pub struct ThemeBuilder {
    events: Vec<ThemeEvent>,
}

impl ThemeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a theme from an ordered list of events.
    pub fn fold(events: impl IntoIterator<Item = ThemeEvent>) -> Theme {
        let mut builder = Self::new();
        builder.events.extend(events);
        builder.build()
    }

    pub fn push(&mut self, event: ThemeEvent) {
        self.events.push(event);
    }

    /// Convenience for `push(ThemeEvent::from_declaration(..))`.
    pub fn set(&mut self, key: &str, value: &str, options: ThemeOptions) -> &mut Self {
        self.push(ThemeEvent::from_declaration(key, value, options));
        self
    }

    /// Applies every event in order and freezes the result.
    pub fn build(self) -> Theme {
        let mut theme = Theme::default();
        let mut removed_animations: Vec<String> = Vec::new();

        for event in self.events {
            match event {
                ThemeEvent::Set {
                    key,
                    value,
                    options,
                } => {
                    if value == "initial" {
                        if let Some(old) = theme.entries.shift_remove(&key) {
                            note_animation(&old, &mut removed_animations);
                        }
                        continue;
                    }
                    match theme.entries.get_mut(&key) {
                        Some(existing) => {
                            if options.contains(ThemeOptions::DEFAULT)
                                && !existing.options.contains(ThemeOptions::DEFAULT)
                            {
                                continue;
                            }
                            existing.value = value;
                            existing.options = options;
                            existing.emittable |= !options.contains(ThemeOptions::REFERENCE);
                        }
                        None => {
                            let emittable = !options.contains(ThemeOptions::REFERENCE);
                            theme.entries.insert(
                                key.clone(),
                                ThemeEntry {
                                    key,
                                    value,
                                    options,
                                    emittable,
                                },
                            );
                        }
                    }
                }
                ThemeEvent::UnsetNamespace(namespace) => {
                    let prefix = format!("{}-", namespace);
                    theme.entries.retain(|key, entry| {
                        let matches = key == &namespace || key.starts_with(&prefix);
                        if matches {
                            note_animation(entry, &mut removed_animations);
                        }
                        !matches
                    });
                }
                ThemeEvent::UnsetAll => {
                    for entry in theme.entries.values() {
                        note_animation(entry, &mut removed_animations);
                    }
                    theme.entries.clear();
                }
                ThemeEvent::Keyframes(keyframes) => {
                    theme.keyframes.retain(|k| k.name != keyframes.name);
                    theme.keyframes.push(keyframes);
                }
            }
        }

        // Keyframes whose animation was unset go with it.
        if !removed_animations.is_empty() {
            let remaining: Vec<String> = theme
                .entries
                .values()
                .filter(|entry| entry.key.starts_with("--animate"))
                .map(|entry| entry.value.clone())
                .collect();
            theme.keyframes.retain(|keyframes| {
                let was_removed = removed_animations
                    .iter()
                    .any(|value| mentions_name(value, &keyframes.name));
                let still_used = remaining
                    .iter()
                    .any(|value| mentions_name(value, &keyframes.name));
                !was_removed || still_used
            });
        }

        log::debug!(
            "theme: {} entries, {} keyframes",
            theme.entries.len(),
            theme.keyframes.len()
        );
        theme
    }
}

fn note_animation(entry: &ThemeEntry, removed: &mut Vec<String>) {
    if entry.key.starts_with("--animate") {
        removed.push(entry.value.clone());
    }
}

fn mentions_name(value: &str, name: &str) -> bool {
    value
        .split(|c: char| c.is_whitespace() || c == ',')
        .any(|word| word == name)
}

/// An immutable, insertion-ordered theme.
#[derive(Debug, Clone, Default)]
pub struct Theme {
    entries: IndexMap<String, ThemeEntry>,
    keyframes: Vec<ThemeKeyframes>,
}

impl Theme {
    /// Returns the entry stored under an exact custom property name.
    pub fn get(&self, key: &str) -> Option<&ThemeEntry> {
        self.entries.get(key)
    }

    pub fn entries(&self) -> impl Iterator<Item = &ThemeEntry> {
        self.entries.values()
    }

    pub fn keyframes(&self) -> &[ThemeKeyframes] {
        &self.keyframes
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finds the entry for `value` inside `namespace` (`--color` + `red-500`).
    /// A `None` value looks up the bare namespace key.
    pub fn lookup(&self, namespace: &str, value: Option<&str>) -> Option<&ThemeEntry> {
        let Some(value) = value else {
            return self.entries.get(namespace);
        };
        if value.is_empty() || value.contains("--") {
            return None;
        }
        let escaped = format!("{}-{}", namespace, escape_key_segment(value));
        if let Some(entry) = self.entries.get(&escaped) {
            return Some(entry);
        }
        let raw = format!("{}-{}", namespace, value);
        if let Some(entry) = self.entries.get(&raw) {
            return Some(entry);
        }
        if value.contains('.') {
            let underscored = format!("{}-{}", namespace, value.replace('.', "_"));
            return self.entries.get(&underscored);
        }
        None
    }

    /// Resolves a candidate value against the first namespace that defines
    /// it and renders it for use in a declaration.
    pub fn resolve(&self, value: Option<&str>, namespaces: &[&str]) -> Option<String> {
        namespaces
            .iter()
            .find_map(|namespace| self.lookup(namespace, value))
            .map(ThemeEntry::render)
    }

    /// Like [`resolve`](Self::resolve) but returns the literal value.
    pub fn resolve_value(&self, value: Option<&str>, namespaces: &[&str]) -> Option<String> {
        namespaces
            .iter()
            .find_map(|namespace| self.lookup(namespace, value))
            .map(|entry| entry.value.clone())
    }

    /// Resolves a value together with its nested keys, e.g. `text-sm` with
    /// `--line-height` yields `--text-sm` and `--text-sm--line-height`.
    pub fn resolve_with(
        &self,
        value: &str,
        namespaces: &[&str],
        nested: &[&str],
    ) -> Option<(String, Vec<(String, String)>)> {
        for namespace in namespaces {
            let Some(entry) = self.lookup(namespace, Some(value)) else {
                continue;
            };
            let extra = nested
                .iter()
                .filter_map(|suffix| {
                    let key = format!("{}{}", entry.key, suffix);
                    self.entries
                        .get(&key)
                        .map(|nested| (suffix.to_string(), nested.render()))
                })
                .collect();
            return Some((entry.render(), extra));
        }
        None
    }

    /// Lists `(suffix, entry)` pairs in a namespace, skipping nested keys.
    pub fn namespace(&self, namespace: &str) -> Vec<(String, &ThemeEntry)> {
        let prefix = format!("{}-", namespace);
        self.entries
            .values()
            .filter_map(|entry| {
                let suffix = entry.key.strip_prefix(&prefix)?;
                if suffix.is_empty() || suffix.contains("--") {
                    return None;
                }
                Some((csstree::unescape(suffix), entry))
            })
            .collect()
    }

    /// Resolves any of the supported path syntaxes to an entry.
    pub fn resolve_path(&self, path: &str) -> Option<&ThemeEntry> {
        let path = path.trim();
        if path.starts_with("--") {
            return self.entries.get(path).or_else(|| {
                path.contains('.')
                    .then(|| self.entries.get(&path.replace('.', "\\.")))
                    .flatten()
            });
        }

        let segments = key_path(path)?;
        let key = key_path_to_property(&segments)?;
        if let Some(entry) = self
            .entries
            .get(&key)
            .or_else(|| self.entries.get(&key.replace('.', "\\.")))
            .or_else(|| self.entries.get(&key.replace('.', "_")))
        {
            return Some(entry);
        }
        let bare = key.trim_start_matches("--");
        self.resolve_default(bare)
    }

    /// Resolves a bare namespace: `--<namespace>` or `--default-<namespace>`.
    pub fn resolve_default(&self, namespace: &str) -> Option<&ThemeEntry> {
        self.entries
            .get(&format!("--{}", namespace))
            .or_else(|| self.entries.get(&format!("--default-{}", namespace)))
    }

    /// Returns every emittable key read by `nodes`, directly through
    /// `var(--key)` or transitively through other theme values, plus
    /// static entries. Keys are returned in theme order.
    pub fn entries_used(&self, nodes: &[AstNode]) -> Vec<String> {
        let mut used: HashSet<String> = HashSet::new();
        let mut pending: Vec<String> = Vec::new();

        walk(nodes, &mut |node| {
            match node {
                AstNode::Declaration(decl) => {
                    pending.extend(var_references(&decl.value));
                    if decl.property.starts_with("--") {
                        pending.extend(var_references(&decl.property));
                    }
                }
                AstNode::AtRule(at) => pending.extend(var_references(&at.params)),
                AstNode::Rule(rule) => pending.extend(var_references(&rule.selector)),
                AstNode::Comment(_) => {}
            }
            WalkAction::Continue
        });

        pending.extend(
            self.entries
                .values()
                .filter(|entry| entry.options.contains(ThemeOptions::STATIC))
                .map(|entry| entry.key.clone()),
        );

        while let Some(name) = pending.pop() {
            if used.contains(&name) {
                continue;
            }
            let Some(entry) = self.entries.get(&name) else {
                continue;
            };
            pending.extend(var_references(&entry.value));
            used.insert(name);
        }

        self.entries
            .values()
            .filter(|entry| entry.emittable && used.contains(&entry.key))
            .map(|entry| entry.key.clone())
            .collect()
    }
}

/// Escapes characters that may not appear unescaped in a custom property
/// name (`.`, `/`, ...). Leading digits are fine in custom properties.
pub fn escape_key_segment(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii() {
            out.push(c);
        } else {
            out.push('\\');
            out.push(c);
        }
    }
    out
}

/// Finds every `var(--name` reference in a value.
pub fn var_references(value: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut rest = value;
    while let Some(idx) = rest.find("var(") {
        let after = rest[idx + 4..].trim_start();
        if after.starts_with("--") {
            let end = after
                .char_indices()
                .find(|&(i, c)| {
                    !(c.is_alphanumeric() || c == '-' || c == '_' || c == '\\')
                        && !(i > 0 && after[..i].ends_with('\\'))
                })
                .map(|(i, _)| i)
                .unwrap_or(after.len());
            names.push(after[..end].to_string());
        }
        rest = &rest[idx + 4..];
    }
    names
}

/// Splits `colors.red.500`, `colors[red][500]` or `colors[red].500` into
/// path segments.
pub fn key_path(path: &str) -> Option<Vec<String>> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = path.chars();
    while let Some(c) = chars.next() {
        match c {
            '.' => {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
            }
            '[' => {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
                let mut inner = String::new();
                loop {
                    match chars.next() {
                        Some(']') => break,
                        Some(c) => inner.push(c),
                        None => return None,
                    }
                }
                let inner = inner.trim_matches(|c| c == '"' || c == '\'');
                segments.push(inner.to_string());
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    (!segments.is_empty()).then_some(segments)
}

/// Maps a legacy configuration key path onto a theme custom property.
pub fn key_path_to_property(path: &[String]) -> Option<String> {
    let (first, rest) = path.split_first()?;
    let namespace = match first.as_str() {
        "animation" => "animate",
        "aspectRatio" => "aspect",
        "borderRadius" => "radius",
        "boxShadow" => "shadow",
        "colors" => "color",
        "containers" => "container",
        "fontFamily" => "font",
        "fontSize" => "text",
        "letterSpacing" => "tracking",
        "lineHeight" => "leading",
        "maxWidth" => "container",
        "screens" => "breakpoint",
        "transitionTimingFunction" => "ease",
        other => other,
    };
    let mut parts = vec![kebab_case(namespace)];
    for (idx, part) in rest.iter().enumerate() {
        if part == "DEFAULT" && idx == rest.len() - 1 {
            continue;
        }
        if part.is_empty() {
            return None;
        }
        parts.push(kebab_case(part));
    }
    Some(format!("--{}", parts.join("-")))
}

fn kebab_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 2);
    let mut prev_lower = false;
    for c in input.chars() {
        if c.is_ascii_uppercase() && prev_lower {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
        prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn theme(events: &[(&str, &str, ThemeOptions)]) -> Theme {
        let mut builder = ThemeBuilder::new();
        for (key, value, options) in events {
            builder.set(key, value, *options);
        }
        builder.build()
    }

    #[test]
    fn last_write_wins() {
        let theme = theme(&[
            ("--color-red-500", "#f00", ThemeOptions::empty()),
            ("--color-red-500", "#f10", ThemeOptions::empty()),
        ]);
        assert_eq!(theme.resolve_path("colors.red.500").unwrap().value, "#f10");
    }

    #[test]
    fn path_syntaxes_normalize_to_the_same_key() {
        let theme = theme(&[("--color-red-500", "#f00", ThemeOptions::empty())]);
        for path in [
            "--color-red-500",
            "colors.red.500",
            "colors[red][500]",
            "colors[red].500",
            "color.red.500",
        ] {
            assert_eq!(theme.resolve_path(path).map(|e| e.value.as_str()), Some("#f00"), "{path}");
        }
        assert!(theme.resolve_path("colors.blue.500").is_none());
    }

    #[test]
    fn default_paths() {
        let theme = theme(&[
            ("--blur", "8px", ThemeOptions::empty()),
            ("--default-font-family", "Inter", ThemeOptions::empty()),
        ]);
        assert_eq!(theme.resolve_path("blur.DEFAULT").unwrap().value, "8px");
        assert_eq!(theme.resolve_path("blur").unwrap().value, "8px");
        assert_eq!(theme.resolve_path("font.family").unwrap().value, "Inter");
        assert_eq!(theme.resolve_path("fontFamily.DEFAULT"), None);
    }

    #[test]
    fn reference_becomes_emittable_after_normal_write() {
        let reference = theme(&[("--color-x", "v", ThemeOptions::REFERENCE)]);
        assert_eq!(reference.resolve(Some("x"), &["--color"]).unwrap(), "v");

        let overridden = theme(&[
            ("--color-x", "v", ThemeOptions::REFERENCE),
            ("--color-x", "w", ThemeOptions::empty()),
        ]);
        assert_eq!(
            overridden.resolve(Some("x"), &["--color"]).unwrap(),
            "var(--color-x, w)"
        );

        let later_reference = theme(&[
            ("--color-x", "w", ThemeOptions::empty()),
            ("--color-x", "v", ThemeOptions::REFERENCE),
        ]);
        let entry = later_reference.get("--color-x").unwrap();
        assert_eq!(entry.value, "v");
        assert!(entry.is_emittable());
    }

    #[test]
    fn unset_namespace_only_removes_earlier_entries() {
        let theme = theme(&[
            ("--color-red-500", "#f00", ThemeOptions::empty()),
            ("--colorful", "yes", ThemeOptions::empty()),
            ("--color-*", "initial", ThemeOptions::empty()),
            ("--color-blue-500", "#00f", ThemeOptions::empty()),
        ]);
        assert!(theme.get("--color-red-500").is_none());
        assert!(theme.get("--colorful").is_some());
        assert!(theme.get("--color-blue-500").is_some());
    }

    #[test]
    fn unset_all_clears_the_store() {
        let theme = theme(&[
            ("--color-red-500", "#f00", ThemeOptions::empty()),
            ("--*", "initial", ThemeOptions::empty()),
            ("--spacing", "0.25rem", ThemeOptions::empty()),
        ]);
        assert_eq!(theme.entries().count(), 1);
    }

    #[test]
    fn default_entries_do_not_override() {
        let theme = theme(&[
            ("--spacing-4", "2rem", ThemeOptions::empty()),
            ("--spacing-4", "1rem", ThemeOptions::DEFAULT),
        ]);
        assert_eq!(theme.get("--spacing-4").unwrap().value, "2rem");
    }

    #[test]
    fn dotted_values_use_escaped_or_underscored_keys() {
        let theme = theme(&[
            ("--spacing-2\\.5", "0.625rem", ThemeOptions::empty()),
            ("--spacing-3_5", "0.875rem", ThemeOptions::empty()),
        ]);
        assert_eq!(
            theme.resolve(Some("2.5"), &["--spacing"]).unwrap(),
            "var(--spacing-2\\.5, 0.625rem)"
        );
        assert_eq!(
            theme.resolve_value(Some("3.5"), &["--spacing"]).unwrap(),
            "0.875rem"
        );
    }

    #[test]
    fn unsetting_an_animation_prunes_its_keyframes() {
        let spin = ThemeKeyframes {
            name: "spin".into(),
            node: AstNode::at_rule("keyframes", "spin", vec![]),
            options: ThemeOptions::empty(),
        };
        let mut builder = ThemeBuilder::new();
        builder.set("--animate-spin", "spin 1s linear infinite", ThemeOptions::empty());
        builder.push(ThemeEvent::Keyframes(spin));
        builder.set("--animate-*", "initial", ThemeOptions::empty());
        assert!(builder.build().keyframes().is_empty());
    }

    #[test]
    fn var_references_are_found() {
        assert_eq!(
            var_references("calc(var(--spacing) * 4) var( --a, var(--b))"),
            vec!["--spacing", "--a", "--b"]
        );
    }

    #[test]
    fn used_entries_follow_references() {
        let theme = theme(&[
            ("--font-sans", "Inter", ThemeOptions::empty()),
            ("--default-font-family", "var(--font-sans)", ThemeOptions::empty()),
            ("--color-red-500", "#f00", ThemeOptions::empty()),
        ]);
        let nodes = vec![AstNode::rule(
            "html",
            vec![AstNode::decl("font-family", "var(--default-font-family)")],
        )];
        assert_eq!(
            theme.entries_used(&nodes),
            vec!["--font-sans".to_string(), "--default-font-family".to_string()]
        );
    }
}
