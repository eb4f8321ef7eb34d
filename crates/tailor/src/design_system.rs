//! The frozen registries a compiler resolves candidates against.

use crate::candidate::{Candidate, CandidateKind, Modifier, Variant, parse_candidate, parse_variant};
use crate::color::{normalize_alpha, with_alpha};
use crate::theme::Theme;
use crate::utilities::{UtilityKind, Utilities, builtin};
use crate::variants::{DarkMode, Variants, take_children};
use csstree::{AstNode, escape, walk_mut, WalkAction};
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::sync::Arc;

/// Theme, utilities and variants for one compile.
#[derive(Debug, Clone)]
pub struct DesignSystem {
    pub theme: Arc<Theme>,
    pub utilities: Utilities,
    pub variants: Variants,
}

/// A candidate turned into CSS, ready to be sorted.
#[derive(Debug, Clone)]
pub struct CompiledCandidate {
    pub candidate: Candidate,
    /// Rule nodes relative to `&`, the element the class is applied to.
    pub nodes: Vec<AstNode>,
    /// Registration order of the utility that produced `nodes`.
    pub order: usize,
    /// Variants sorted from highest to lowest rank.
    chain: SmallVec<[Variant; 4]>,
}

impl CompiledCandidate {
    /// Wraps the nodes in a rule for the class selector.
    pub fn to_rule(&self) -> AstNode {
        AstNode::rule(format!(".{}", escape(&self.candidate.raw)), self.nodes.clone())
    }
}

impl DesignSystem {
    /// Builds the default registries for a theme.
    pub fn new(theme: Theme, dark_mode: &DarkMode) -> Self {
        let theme = Arc::new(theme);
        Self {
            variants: Variants::defaults(Arc::clone(&theme), dark_mode),
            utilities: builtin::utilities(),
            theme,
        }
    }

    /// Parses a class name, returning the interpretation that generates
    /// CSS.
    pub fn parse_candidate(&self, raw: &str) -> Option<Candidate> {
        self.compile_candidate(raw).map(|compiled| compiled.candidate)
    }

    /// Every syntactically valid interpretation of a class name.
    pub fn candidates(&self, raw: &str) -> Vec<Candidate> {
        parse_candidate(raw, &self.utilities, &self.variants)
    }

    pub fn parse_variant(&self, raw: &str) -> Option<Variant> {
        parse_variant(raw, &self.variants)
    }

    /// Compiles a class name, or returns `None` if nothing matches.
    pub fn compile_candidate(&self, raw: &str) -> Option<CompiledCandidate> {
        self.candidates(raw)
            .into_iter()
            .find_map(|candidate| self.compile(candidate))
    }

    fn compile(&self, candidate: Candidate) -> Option<CompiledCandidate> {
        let (mut nodes, order) = self.generate(&candidate)?;
        if candidate.important {
            mark_important(&mut nodes);
        }

        let mut wrapper = AstNode::rule("&", nodes);
        for variant in candidate.variants.iter().rev() {
            self.variants.apply(&mut wrapper, variant)?;
        }

        let mut chain: SmallVec<[Variant; 4]> = candidate.variants.iter().cloned().collect();
        chain.sort_by(|a, b| self.variants.compare(b, a));
        Some(CompiledCandidate {
            nodes: take_children(&mut wrapper),
            order,
            chain,
            candidate,
        })
    }

    /// Runs the candidate through the utilities registered for its root.
    fn generate(&self, candidate: &Candidate) -> Option<(Vec<AstNode>, usize)> {
        let kind = match &candidate.kind {
            CandidateKind::Arbitrary {
                property,
                value,
                modifier,
            } => {
                let value = match modifier {
                    None => value.clone(),
                    Some(modifier) => {
                        let alpha = match modifier {
                            Modifier::Named(named) => self
                                .theme
                                .resolve(Some(named), &["--opacity"])
                                .or_else(|| normalize_alpha(named, false))?,
                            Modifier::Arbitrary(arbitrary) => normalize_alpha(arbitrary, true)?,
                        };
                        with_alpha(value, &alpha)
                    }
                };
                return Some((
                    vec![AstNode::decl(property.as_str(), value)],
                    self.utilities.arbitrary_order(),
                ));
            }
            CandidateKind::Static { .. } => UtilityKind::Static,
            CandidateKind::Functional { .. } => UtilityKind::Functional,
        };
        let root = candidate.root()?;
        self.utilities
            .get(root)
            .iter()
            .filter(|utility| utility.kind == kind)
            .find_map(|utility| {
                let nodes = (utility.compile)(candidate, &self.theme)?;
                (!nodes.is_empty()).then_some((nodes, utility.order))
            })
    }

    /// Total order over compiled candidates: variants first, then the
    /// utility's registration order, then the class name.
    pub fn compare(&self, a: &CompiledCandidate, b: &CompiledCandidate) -> Ordering {
        self.compare_chains(&a.chain, &b.chain)
            .then_with(|| a.order.cmp(&b.order))
            .then_with(|| a.candidate.raw.cmp(&b.candidate.raw))
    }

    fn compare_chains(&self, a: &[Variant], b: &[Variant]) -> Ordering {
        for (left, right) in a.iter().zip(b) {
            let ordering = self.variants.compare(left, right);
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        a.len().cmp(&b.len())
    }
}

fn mark_important(nodes: &mut [AstNode]) {
    walk_mut(nodes, &mut |node| match node {
        AstNode::Declaration(decl) => {
            decl.important = true;
            WalkAction::Continue
        }
        AstNode::AtRule(at) if at.name == "property" => WalkAction::Skip,
        _ => WalkAction::Continue,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{ThemeBuilder, ThemeOptions};
    use csstree::{flatten, to_css};

    fn system() -> DesignSystem {
        let mut builder = ThemeBuilder::new();
        builder
            .set("--spacing", "0.25rem", ThemeOptions::empty())
            .set("--color-red-500", "#ef4444", ThemeOptions::empty())
            .set("--breakpoint-md", "48rem", ThemeOptions::empty());
        DesignSystem::new(builder.build(), &DarkMode::Media)
    }

    fn css(system: &DesignSystem, raw: &str) -> String {
        let compiled = system.compile_candidate(raw).unwrap();
        to_css(&flatten(vec![compiled.to_rule()]))
    }

    #[test]
    fn important_marks_every_declaration() {
        assert_eq!(css(&system(), "flex!"), ".flex\\! {\n  display: flex !important;\n}\n");
        assert_eq!(css(&system(), "!flex"), ".\\!flex {\n  display: flex !important;\n}\n");
    }

    #[test]
    fn variants_wrap_from_the_inside_out() {
        assert_eq!(
            css(&system(), "md:hover:flex"),
            "@media (width >= 48rem) {\n  .md\\:hover\\:flex:hover {\n    display: flex;\n  }\n}\n"
        );
    }

    #[test]
    fn arbitrary_properties_take_alpha() {
        assert_eq!(
            css(&system(), "[color:#0088cc]/50"),
            ".\\[color\\:\\#0088cc\\]\\/50 {\n  color: #0088cc80;\n}\n"
        );
    }

    #[test]
    fn parse_candidate_picks_the_matching_root() {
        let system = system();
        let candidate = system.parse_candidate("bg-red-500").unwrap();
        assert_eq!(candidate.root(), Some("bg"));
        assert!(system.parse_candidate("bg-not-a-color").is_none());
    }

    #[test]
    fn unprefixed_candidates_sort_before_variants() {
        let system = system();
        let plain = system.compile_candidate("grid").unwrap();
        let hover = system.compile_candidate("hover:flex").unwrap();
        let md = system.compile_candidate("md:flex").unwrap();
        assert_eq!(system.compare(&plain, &hover), Ordering::Less);
        assert_eq!(system.compare(&hover, &md), Ordering::Less);
    }
}
