//! Plugins loaded with `@plugin`.
//!
//! A plugin receives a [`PluginApi`] once, while the compiler is being
//! built, and extends the utility and variant registries through it:
//!
//! ```rust
//! use tailor::plugin::{CssTree, PluginApi};
//!
//! fn tab_size(api: &mut PluginApi<'_>) -> tailor::Result<()> {
//!     api.add_utilities(vec![(".tab-4", vec![CssTree::decl("tab-size", "4")])])?;
//!     api.add_variant("hocus", ["&:hover", "&:focus"]);
//!     Ok(())
//! }
//! ```
//!
//! Any `Fn(&mut PluginApi) -> Result<()>` is a [`Plugin`].

use crate::candidate::{CandidateValue, Modifier};
use crate::config::Config;
use crate::error::{CompileError, Result};
use crate::theme::Theme;
use crate::utilities::{Utilities, accepts_arbitrary, compile_fn, negate};
use crate::value::DataType;
use crate::variants::{CustomVariant, Variants};
use csstree::AstNode;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Options passed in an `@plugin "id" { key: value; }` block.
pub type PluginOptions = Map<String, Value>;

/// A plugin module.
pub trait Plugin: Send + Sync {
    /// Extends the registries.
    fn register(&self, api: &mut PluginApi<'_>) -> Result<()>;

    /// Configuration the plugin contributes (theme values, dark mode).
    fn config(&self) -> Option<Config> {
        None
    }
}

impl<F> Plugin for F
where
    F: Fn(&mut PluginApi<'_>) -> Result<()> + Send + Sync,
{
    fn register(&self, api: &mut PluginApi<'_>) -> Result<()> {
        self(api)
    }
}

/// What a module id resolved to.
#[derive(Clone)]
pub enum Module {
    Plugin(Arc<dyn Plugin>),
    Config(Config),
}

impl Module {
    pub fn plugin(plugin: impl Plugin + 'static) -> Self {
        Module::Plugin(Arc::new(plugin))
    }
}

impl fmt::Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Module::Plugin(_) => f.write_str("Module::Plugin(..)"),
            Module::Config(config) => f.debug_tuple("Module::Config").field(config).finish(),
        }
    }
}

/// Resolves a subtree for a candidate's value and modifier.
pub type DynamicFn = Arc<dyn Fn(&str, Option<&str>) -> Vec<CssTree> + Send + Sync>;

/// CSS written by a plugin.
#[derive(Clone)]
pub enum CssTree {
    /// A declaration.
    Leaf { property: String, value: String },
    /// A nested rule (`&:hover`, `& > *`) or block at-rule (`@media ...`).
    Branch { selector: String, children: Vec<CssTree> },
    /// Computed from the candidate when it is compiled.
    Dynamic(DynamicFn),
}

impl fmt::Debug for CssTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CssTree::Leaf { property, value } => write!(f, "Leaf({}: {})", property, value),
            CssTree::Branch { selector, children } => f
                .debug_struct("Branch")
                .field("selector", selector)
                .field("children", children)
                .finish(),
            CssTree::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

impl CssTree {
    pub fn decl(property: impl Into<String>, value: impl Into<String>) -> Self {
        CssTree::Leaf {
            property: property.into(),
            value: value.into(),
        }
    }

    pub fn rule(selector: impl Into<String>, children: Vec<CssTree>) -> Self {
        CssTree::Branch {
            selector: selector.into(),
            children,
        }
    }

    pub fn dynamic<F>(resolve: F) -> Self
    where
        F: Fn(&str, Option<&str>) -> Vec<CssTree> + Send + Sync + 'static,
    {
        CssTree::Dynamic(Arc::new(resolve))
    }

    /// Turns trees into AST nodes, running dynamic leaves with `value` and
    /// `modifier`.
    pub fn resolve(trees: &[CssTree], value: &str, modifier: Option<&str>) -> Vec<AstNode> {
        let mut nodes = Vec::new();
        for tree in trees {
            match tree {
                CssTree::Leaf { property, value } => {
                    nodes.push(AstNode::decl(property.as_str(), value.as_str()))
                }
                CssTree::Branch { selector, children } => {
                    let children = CssTree::resolve(children, value, modifier);
                    let node = if selector.starts_with('@') {
                        AstNode::at_rule_from_text(selector, children)
                    } else {
                        Some(AstNode::rule(selector.as_str(), children))
                    };
                    nodes.extend(node);
                }
                CssTree::Dynamic(resolve) => {
                    let subtree = resolve(value, modifier);
                    nodes.extend(CssTree::resolve(&subtree, value, modifier));
                }
            }
        }
        nodes
    }
}

/// How [`PluginApi::match_utilities`] resolves values.
#[derive(Debug, Clone, Default)]
pub struct MatchOptions {
    /// Named values. `DEFAULT` is used when the candidate has no value.
    pub values: IndexMap<String, String>,
    /// Types accepted for arbitrary values. Empty accepts anything.
    pub types: Vec<DataType>,
    pub supports_negative: bool,
    /// Named modifiers. `None` rejects every modifier; arbitrary
    /// modifiers are accepted whenever this is `Some`.
    pub modifiers: Option<IndexMap<String, String>>,
}

/// The capability set handed to a plugin.
pub struct PluginApi<'a> {
    utilities: &'a mut Utilities,
    variants: &'a mut Variants,
    theme: &'a Theme,
    options: &'a PluginOptions,
}

impl<'a> PluginApi<'a> {
    pub fn new(
        utilities: &'a mut Utilities,
        variants: &'a mut Variants,
        theme: &'a Theme,
        options: &'a PluginOptions,
    ) -> Self {
        Self {
            utilities,
            variants,
            theme,
            options,
        }
    }

    /// Options from the `@plugin` block.
    pub fn options(&self) -> &PluginOptions {
        self.options
    }

    /// Looks up a theme value by any supported path syntax.
    pub fn theme(&self, path: &str) -> Option<String> {
        self.theme.resolve_path(path).map(|entry| entry.value.clone())
    }

    /// Every value in a theme namespace (`--color` yields `red-500` etc.).
    pub fn theme_values(&self, namespace: &str) -> IndexMap<String, String> {
        let namespace = if namespace.starts_with("--") {
            namespace.to_string()
        } else {
            format!("--{}", namespace)
        };
        self.theme
            .namespace(&namespace)
            .into_iter()
            .map(|(suffix, entry)| (suffix, entry.render()))
            .collect()
    }

    /// Registers static utilities keyed by class selector (`.tab-4`). A
    /// selector tail after the class name becomes a nested rule.
    pub fn add_utilities(&mut self, utilities: Vec<(&str, Vec<CssTree>)>) -> Result<()> {
        for (selector, tree) in utilities {
            let (name, rest) = split_class_selector(selector)?;
            let mut nodes = CssTree::resolve(&tree, "", None);
            if !rest.is_empty() {
                nodes = vec![AstNode::rule(format!("&{}", rest), nodes)];
            }
            log::debug!("plugin utility `{}`", name);
            self.utilities.static_nodes(&name, nodes);
        }
        Ok(())
    }

    /// Registers a functional utility resolving values from `options`.
    pub fn match_utilities(&mut self, name: &str, options: MatchOptions, tree: Vec<CssTree>) {
        log::debug!("plugin functional utility `{}`", name);
        self.utilities.functional(
            name,
            compile_fn(move |candidate, _| {
                if candidate.negative() && !options.supports_negative {
                    return None;
                }
                let mut consumed_modifier = false;
                let value = match candidate.value() {
                    None => options.values.get("DEFAULT")?.clone(),
                    Some(CandidateValue::Arbitrary { value, data_type }) => {
                        accepts_arbitrary(value, data_type.as_deref(), &options.types)
                            .then(|| value.clone())?
                    }
                    Some(CandidateValue::Named { value, fraction }) => {
                        match fraction.as_deref().and_then(|f| options.values.get(f)) {
                            Some(found) => {
                                consumed_modifier = true;
                                found.clone()
                            }
                            None => options.values.get(value.as_str())?.clone(),
                        }
                    }
                };
                let modifier = match candidate.modifier() {
                    None => None,
                    Some(_) if consumed_modifier => None,
                    Some(modifier) => {
                        let modifiers = options.modifiers.as_ref()?;
                        match modifier {
                            Modifier::Named(named) => Some(modifiers.get(named.as_str())?.clone()),
                            Modifier::Arbitrary(arbitrary) => Some(arbitrary.clone()),
                        }
                    }
                };
                let value = if candidate.negative() {
                    negate(&value)
                } else {
                    value
                };
                let nodes = CssTree::resolve(&tree, &value, modifier.as_deref());
                (!nodes.is_empty()).then_some(nodes)
            }),
        );
    }

    /// Registers a variant from selectors and at-rules, e.g.
    /// `["&:hover", "@media (hover: hover)"]`.
    pub fn add_variant<I, S>(&mut self, name: &str, selectors: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let selectors = selectors.into_iter().map(Into::into).collect();
        self.variants.add_custom(name, CustomVariant::Selectors(selectors));
    }
}

fn split_class_selector(selector: &str) -> Result<(String, &str)> {
    let invalid = || CompileError::InvalidDirective {
        directive: "plugin",
        message: format!("`{}` is not a class selector", selector),
    };
    let body = selector.trim().strip_prefix('.').ok_or_else(invalid)?;
    let mut end = body.len();
    let mut chars = body.char_indices();
    while let Some((idx, c)) = chars.next() {
        if c == '\\' {
            chars.next();
            continue;
        }
        if !(c.is_alphanumeric() || c == '-' || c == '_') {
            end = idx;
            break;
        }
    }
    if end == 0 {
        return Err(invalid());
    }
    Ok((csstree::unescape(&body[..end]), &body[end..]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::{Candidate, CandidateKind};
    use crate::theme::{ThemeBuilder, ThemeOptions};

    fn candidate(root: &str, value: Option<CandidateValue>, modifier: Option<Modifier>) -> Candidate {
        Candidate {
            kind: CandidateKind::Functional {
                root: root.into(),
                value,
                modifier,
                negative: false,
            },
            variants: vec![],
            important: false,
            raw: root.into(),
        }
    }

    fn named(value: &str) -> Option<CandidateValue> {
        Some(CandidateValue::Named {
            value: value.into(),
            fraction: None,
        })
    }

    fn run(utilities: &Utilities, candidate: &Candidate) -> Option<Vec<AstNode>> {
        utilities
            .get(candidate.root()?)
            .iter()
            .find_map(|utility| (utility.compile)(candidate, &Theme::default()))
    }

    #[test]
    fn closures_are_plugins() {
        let mut utilities = Utilities::new();
        let mut variants = Variants::new();
        let theme = Theme::default();
        let options = PluginOptions::new();
        let plugin = |api: &mut PluginApi<'_>| -> Result<()> {
            api.add_utilities(vec![
                (".content-auto", vec![CssTree::decl("content-visibility", "auto")]),
                (".scroll-snap > *", vec![CssTree::decl("scroll-snap-align", "start")]),
            ])?;
            api.add_variant("hocus", ["&:hover", "&:focus"]);
            Ok(())
        };
        plugin
            .register(&mut PluginApi::new(&mut utilities, &mut variants, &theme, &options))
            .unwrap();

        assert!(variants.has("hocus"));
        let static_candidate = Candidate {
            kind: CandidateKind::Static {
                root: "scroll-snap".into(),
                negative: false,
            },
            variants: vec![],
            important: false,
            raw: "scroll-snap".into(),
        };
        assert_eq!(
            run(&utilities, &static_candidate).unwrap(),
            vec![AstNode::rule(
                "& > *",
                vec![AstNode::decl("scroll-snap-align", "start")]
            )]
        );
    }

    #[test]
    fn match_utilities_resolves_values_and_modifiers() {
        let mut utilities = Utilities::new();
        let mut variants = Variants::new();
        let theme = Theme::default();
        let options = PluginOptions::new();
        let mut api = PluginApi::new(&mut utilities, &mut variants, &theme, &options);
        api.match_utilities(
            "tab",
            MatchOptions {
                values: IndexMap::from([
                    ("DEFAULT".to_string(), "4".to_string()),
                    ("wide".to_string(), "8".to_string()),
                ]),
                types: vec![DataType::Integer],
                modifiers: Some(IndexMap::from([("tight".to_string(), "0".to_string())])),
                ..Default::default()
            },
            vec![CssTree::dynamic(|value, modifier| {
                let mut out = vec![CssTree::decl("tab-size", value)];
                if let Some(modifier) = modifier {
                    out.push(CssTree::decl("letter-spacing", modifier));
                }
                out
            })],
        );

        assert_eq!(
            run(&utilities, &candidate("tab", None, None)).unwrap(),
            vec![AstNode::decl("tab-size", "4")]
        );
        assert_eq!(
            run(&utilities, &candidate("tab", named("wide"), Some(Modifier::Named("tight".into()))))
                .unwrap(),
            vec![AstNode::decl("tab-size", "8"), AstNode::decl("letter-spacing", "0")]
        );
        let arbitrary = Some(CandidateValue::Arbitrary {
            value: "3".into(),
            data_type: None,
        });
        assert_eq!(
            run(&utilities, &candidate("tab", arbitrary, None)).unwrap(),
            vec![AstNode::decl("tab-size", "3")]
        );
        assert!(run(&utilities, &candidate("tab", named("huge"), None)).is_none());
        assert!(
            run(&utilities, &candidate("tab", named("wide"), Some(Modifier::Named("loose".into()))))
                .is_none()
        );
    }

    #[test]
    fn theme_access() {
        let mut builder = ThemeBuilder::new();
        builder
            .set("--color-red-500", "#ef4444", ThemeOptions::empty())
            .set("--color-blue-500", "#3b82f6", ThemeOptions::INLINE);
        let theme = builder.build();
        let mut utilities = Utilities::new();
        let mut variants = Variants::new();
        let options = PluginOptions::new();
        let api = PluginApi::new(&mut utilities, &mut variants, &theme, &options);

        assert_eq!(api.theme("colors.red.500").as_deref(), Some("#ef4444"));
        assert_eq!(api.theme("--color-blue-500").as_deref(), Some("#3b82f6"));
        assert_eq!(
            api.theme_values("color"),
            IndexMap::from([
                ("red-500".to_string(), "var(--color-red-500, #ef4444)".to_string()),
                ("blue-500".to_string(), "#3b82f6".to_string()),
            ])
        );
    }

    #[test]
    fn rejects_non_class_selectors() {
        let mut utilities = Utilities::new();
        let mut variants = Variants::new();
        let theme = Theme::default();
        let options = PluginOptions::new();
        let mut api = PluginApi::new(&mut utilities, &mut variants, &theme, &options);
        assert!(api.add_utilities(vec![("div", vec![])]).is_err());
    }
}
