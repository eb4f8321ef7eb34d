//! The property registry.
//!
//! Utilities that compose a declaration from cooperating `--tw-*`
//! variables (transforms, filters, shadows, ...) register each variable
//! with an `@property` node placed in their output:
//!
//! ```css
//! @property --tw-blur { syntax: "*"; inherits: false; }
//! ```
//!
//! After sorting, the pipeline pulls those nodes out of the utilities and
//! emits each property once, plus a fallback block that initializes every
//! variable for browsers without `@property` support.

use csstree::AstNode;
use indexmap::IndexMap;

/// Feature query matching browsers that lack `@property` support.
pub const PROPERTY_FALLBACK_QUERY: &str = "((-webkit-hyphens: none) and (not (margin-trim: inline))) or ((-moz-orient: inline) and (not (color:rgb(from red r g b))))";

/// Builds an `@property` node for a `--tw-*` variable.
///
/// `syntax` defaults to `"*"`. A missing initial value leaves the variable
/// guaranteed-invalid until a utility sets it.
pub fn property(name: &str, initial: Option<&str>, syntax: Option<&str>) -> AstNode {
    let mut nodes = vec![
        AstNode::decl("syntax", syntax.unwrap_or("\"*\"")),
        AstNode::decl("inherits", "false"),
    ];
    if let Some(initial) = initial {
        nodes.push(AstNode::decl("initial-value", initial));
    }
    AstNode::at_rule("property", name, nodes)
}

/// Metadata of a registered custom property.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDefinition {
    pub syntax: String,
    pub inherits: bool,
    pub initial: Option<String>,
}

/// Distinct `@property` definitions in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct PropertyRegistry {
    properties: IndexMap<String, PropertyDefinition>,
}

impl PropertyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a property. The first definition of a name wins.
    pub fn register(&mut self, name: &str, definition: PropertyDefinition) {
        self.properties
            .entry(name.to_string())
            .or_insert(definition);
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&PropertyDefinition> {
        self.properties.get(name)
    }

    /// Removes every `@property` node (at any depth) from `nodes` and
    /// registers it.
    pub fn extract(&mut self, nodes: &mut Vec<AstNode>) {
        nodes.retain_mut(|node| {
            if let AstNode::AtRule(at) = node {
                if at.name == "property" && at.params.starts_with("--") {
                    let definition = definition_from(at.nodes.as_deref().unwrap_or_default());
                    self.register(at.params.trim(), definition);
                    return false;
                }
            }
            if let Some(children) = node.children_mut() {
                self.extract(children);
            }
            true
        });
    }

    /// Emits the fallback initializer block followed by one `@property`
    /// rule per registered property.
    pub fn to_nodes(&self) -> Vec<AstNode> {
        if self.properties.is_empty() {
            return Vec::new();
        }

        let initializers: Vec<AstNode> = self
            .properties
            .iter()
            .map(|(name, definition)| {
                AstNode::decl(
                    name.as_str(),
                    definition.initial.as_deref().unwrap_or("initial"),
                )
            })
            .collect();
        let fallback = AstNode::at_rule(
            "supports",
            PROPERTY_FALLBACK_QUERY,
            vec![AstNode::at_rule(
                "layer",
                "base",
                vec![AstNode::rule("*, ::before, ::after, ::backdrop", initializers)],
            )],
        );

        let mut nodes = vec![fallback];
        nodes.extend(self.properties.iter().map(|(name, definition)| {
            let mut body = vec![
                AstNode::decl("syntax", definition.syntax.as_str()),
                AstNode::decl("inherits", if definition.inherits { "true" } else { "false" }),
            ];
            if let Some(initial) = &definition.initial {
                body.push(AstNode::decl("initial-value", initial.as_str()));
            }
            AstNode::at_rule("property", name.as_str(), body)
        }));
        nodes
    }
}

fn definition_from(nodes: &[AstNode]) -> PropertyDefinition {
    let mut definition = PropertyDefinition {
        syntax: "\"*\"".to_string(),
        inherits: false,
        initial: None,
    };
    for node in nodes {
        if let AstNode::Declaration(decl) = node {
            match decl.property.as_str() {
                "syntax" => definition.syntax = decl.value.clone(),
                "inherits" => definition.inherits = decl.value == "true",
                "initial-value" => definition.initial = Some(decl.value.clone()),
                _ => {}
            }
        }
    }
    definition
}

#[cfg(test)]
mod tests {
    use super::*;
    use csstree::to_css;

    #[test]
    fn extracts_nested_properties_once() {
        let mut nodes = vec![
            AstNode::rule(
                ".blur",
                vec![
                    AstNode::decl("--tw-blur", "blur(8px)"),
                    property("--tw-blur", None, None),
                ],
            ),
            AstNode::rule(
                ".grayscale",
                vec![
                    AstNode::decl("--tw-grayscale", "grayscale(100%)"),
                    property("--tw-blur", None, None),
                    property("--tw-grayscale", None, None),
                ],
            ),
        ];
        let mut registry = PropertyRegistry::new();
        registry.extract(&mut nodes);

        assert_eq!(registry.len(), 2);
        assert_eq!(nodes[0].children().unwrap().len(), 1);
        assert_eq!(nodes[1].children().unwrap().len(), 1);
    }

    #[test]
    fn emits_fallback_block_and_rules() {
        let mut registry = PropertyRegistry::new();
        registry.register(
            "--tw-content",
            PropertyDefinition {
                syntax: "\"*\"".into(),
                inherits: false,
                initial: Some("\"\"".into()),
            },
        );
        let css = to_css(&registry.to_nodes());
        assert!(css.contains("@layer base {\n    *, ::before, ::after, ::backdrop {\n      --tw-content: \"\";\n"));
        assert!(css.ends_with(
            "@property --tw-content {\n  syntax: \"*\";\n  inherits: false;\n  initial-value: \"\";\n}\n"
        ));
    }

    #[test]
    fn empty_registry_emits_nothing() {
        assert!(PropertyRegistry::new().to_nodes().is_empty());
    }
}
