//! The compile pipeline.
//!
//! [`compile`] runs once per stylesheet:
//!
//! 1. Resolve `@import`, `@config` and `@plugin` through the [`Resolver`].
//! 2. Fold every `@theme` block into a frozen [`Theme`](crate::Theme).
//! 3. Register custom variants, plugins and `@utility` declarations.
//! 4. Expand `@apply`, nested `@variant` blocks and CSS functions.
//!
//! The resulting [`Compiler`] turns any list of candidates into CSS with
//! [`Compiler::build`], which never fails and never re-runs the steps above.

use crate::apply::{substitute_apply, substitute_variant_blocks};
use crate::design_system::{CompiledCandidate, DesignSystem};
use crate::error::{CompileError, Result};
use crate::functions::substitute_functions;
use crate::plugin::{Module, PluginApi, PluginOptions};
use crate::property::PropertyRegistry;
use crate::resolver::{CompileOptions, ModuleKind, Resolver};
use crate::theme::{ThemeBuilder, ThemeEvent, ThemeKeyframes, ThemeOptions};
use crate::utilities::custom;
use crate::variants::{CustomVariant, DarkMode, take_children};
use csstree::{
    AstNode, AtRule, WalkAction, flatten, parse, replace_nodes, segment, to_css, walk,
};
use futures::future::{BoxFuture, FutureExt};
use rayon::prelude::*;
use serde_json::Value;
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

/// Imports nested deeper than this are treated as runaway recursion.
const MAX_IMPORT_DEPTH: usize = 50;

/// Compiles a stylesheet into a reusable [`Compiler`].
///
/// ```rust
/// use tailor::{compile, CompileOptions};
///
/// let runtime = tokio::runtime::Runtime::new().unwrap();
/// let compiler = runtime
///     .block_on(compile("@tailwind utilities;", "", CompileOptions::default()))
///     .unwrap();
/// assert_eq!(compiler.build(["flex"]), ".flex {\n  display: flex;\n}\n");
/// ```
pub async fn compile(css: &str, base: &str, options: CompileOptions) -> Result<Compiler> {
    let mut ast = parse(css)?;
    let mut loader = Loader::new(options.resolver);
    loader.load(&mut ast, base.to_string(), 0, Vec::new()).await?;
    Compiler::new(ast, loader)
}

/// A compiled stylesheet, ready to generate utilities.
#[derive(Debug, Clone)]
pub struct Compiler {
    system: DesignSystem,
    ast: Vec<AstNode>,
    plugins: Vec<String>,
    host: bool,
}

impl Compiler {
    fn new(ast: Vec<AstNode>, loader: Loader) -> Result<Self> {
        let mut events = Vec::new();
        let mut placed = false;
        let mut ast = collect_theme(ast, ThemeOptions::empty(), &mut events, &mut placed)?;

        let mut dark_mode = DarkMode::default();
        for loaded in &loader.modules {
            let config = match &loaded.module {
                Module::Config(config) => Some(config.clone()),
                Module::Plugin(plugin) => plugin.config(),
            };
            let Some(config) = config else {
                continue;
            };
            events.extend(config.theme_events());
            if let Some(mode) = config.dark_mode()? {
                dark_mode = mode;
            }
        }

        let mut system = DesignSystem::new(ThemeBuilder::fold(events), &dark_mode);

        register_variants(&mut ast, &mut system)?;
        for loaded in &loader.modules {
            let Module::Plugin(plugin) = &loaded.module else {
                continue;
            };
            log::debug!("running plugin `{}`", loaded.id);
            let DesignSystem {
                theme,
                utilities,
                variants,
            } = &mut system;
            plugin.register(&mut PluginApi::new(utilities, variants, &**theme, &loaded.options))?;
        }
        register_utilities(&mut ast, &mut system)?;

        substitute_variant_blocks(&mut ast, &system)?;
        substitute_apply(&mut ast, &system)?;
        substitute_functions(&mut ast, &system.theme)?;

        let mut seen_marker = false;
        replace_nodes(&mut ast, &mut |node| {
            if !is_utilities_marker(node) {
                return None;
            }
            if seen_marker {
                return Some(Vec::new());
            }
            seen_marker = true;
            None
        });

        let mut host = false;
        walk(&ast, &mut |node| {
            if let AstNode::Rule(rule) = node {
                host |= rule.selector.contains(":host");
            }
            WalkAction::Continue
        });

        log::debug!(
            "compiled stylesheet: {} top-level nodes, {} plugins",
            ast.len(),
            loader.plugins.len()
        );
        Ok(Self {
            system,
            ast,
            plugins: loader.plugins,
            host,
        })
    }

    /// Plugin ids named by `@plugin` directives, in source order.
    pub fn plugins(&self) -> &[String] {
        &self.plugins
    }

    pub fn design_system(&self) -> &DesignSystem {
        &self.system
    }

    /// Generates the stylesheet for a set of candidates.
    ///
    /// The output depends only on the set: order and duplicates in
    /// `candidates` are irrelevant, and candidates that match nothing are
    /// skipped.
    pub fn build<I, S>(&self, candidates: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let unique: Vec<String> = candidates
            .into_iter()
            .map(|candidate| candidate.as_ref().trim().to_string())
            .filter(|candidate| !candidate.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut compiled: Vec<CompiledCandidate> = unique
            .par_iter()
            .filter_map(|raw| {
                let compiled = self.system.compile_candidate(raw);
                if compiled.is_none() {
                    log::trace!("skipping candidate `{}`", raw);
                }
                compiled
            })
            .collect();
        compiled.sort_by(|a, b| self.system.compare(a, b));
        log::debug!(
            "build: {} of {} candidates generated CSS",
            compiled.len(),
            unique.len()
        );

        let mut utilities: Option<Vec<AstNode>> =
            Some(compiled.iter().map(CompiledCandidate::to_rule).collect());
        let mut tree = self.ast.clone();
        replace_nodes(&mut tree, &mut |node| {
            is_utilities_marker(node).then(|| utilities.take().unwrap_or_default())
        });

        let mut properties = PropertyRegistry::new();
        properties.extract(&mut tree);
        let mut tree = flatten(tree);

        let mut theme_nodes = Some(self.theme_nodes(&tree));
        replace_nodes(&mut tree, &mut |node| {
            is_theme_marker(node).then(|| theme_nodes.take().unwrap_or_default())
        });
        if let Some(nodes) = theme_nodes {
            tree.splice(0..0, nodes);
        }
        tree.extend(properties.to_nodes());
        to_css(&tree)
    }

    /// The `:root` block for every theme variable `tree` reads, followed by
    /// the keyframes its animations use.
    fn theme_nodes(&self, tree: &[AstNode]) -> Vec<AstNode> {
        let theme = &self.system.theme;
        let mut nodes = Vec::new();
        let variables: Vec<AstNode> = theme
            .entries_used(tree)
            .iter()
            .filter_map(|key| theme.get(key))
            .map(|entry| AstNode::decl(entry.key.as_str(), entry.value.as_str()))
            .collect();
        if !variables.is_empty() {
            let selector = if self.host { ":root, :host" } else { ":root" };
            nodes.push(AstNode::rule(selector, variables));
        }

        let mut names = HashSet::new();
        for scope in [tree, nodes.as_slice()] {
            walk(scope, &mut |node| {
                if let AstNode::Declaration(decl) = node {
                    if decl.property.starts_with("animation") || decl.property.starts_with("--animate")
                    {
                        names.extend(identifiers(&decl.value));
                    }
                }
                WalkAction::Continue
            });
        }
        let keyframes: Vec<AstNode> = theme
            .keyframes()
            .iter()
            .filter(|keyframes| keyframes_emitted(keyframes, &names))
            .map(|keyframes| keyframes.node.clone())
            .collect();
        nodes.extend(keyframes);
        nodes
    }
}

fn keyframes_emitted(keyframes: &ThemeKeyframes, used: &HashSet<String>) -> bool {
    if keyframes.options.contains(ThemeOptions::REFERENCE) {
        return false;
    }
    keyframes.options.contains(ThemeOptions::STATIC) || used.contains(&keyframes.name)
}

fn identifiers(value: &str) -> impl Iterator<Item = String> + '_ {
    value
        .split(|c: char| !(c.is_alphanumeric() || c == '-' || c == '_'))
        .filter(|word| !word.is_empty())
        .map(str::to_string)
}

fn is_utilities_marker(node: &AstNode) -> bool {
    match node {
        AstNode::AtRule(at) => {
            at.name == "tailwind" && at.params.trim() == "utilities" && at.nodes.is_none()
        }
        _ => false,
    }
}

/// Where the first `@theme` block was; replaced by the `:root` variables.
fn theme_marker() -> AstNode {
    AstNode::statement("theme", "")
}

fn is_theme_marker(node: &AstNode) -> bool {
    matches!(node, AstNode::AtRule(at) if at.name == "theme" && at.nodes.is_none())
}

fn excerpt(node: &AstNode) -> String {
    to_css(std::slice::from_ref(node)).trim().to_string()
}

fn unquote(value: &str) -> Option<&str> {
    let value = value.trim();
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
}

// Theme blocks

fn is_grouping(name: &str) -> bool {
    matches!(name, "layer" | "media" | "supports" | "container")
}

/// Pulls every `@theme` block out of `nodes` (and out of grouping
/// at-rules), leaving a marker where the first one was.
fn collect_theme(
    nodes: Vec<AstNode>,
    inherited: ThemeOptions,
    events: &mut Vec<ThemeEvent>,
    placed: &mut bool,
) -> Result<Vec<AstNode>> {
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            AstNode::AtRule(AtRule {
                name,
                params,
                nodes: Some(body),
            }) if name == "theme" => {
                read_theme_block(body, ThemeOptions::parse(&params) | inherited, events)?;
                place_marker(&mut out, placed);
            }
            AstNode::AtRule(AtRule {
                name,
                params,
                nodes: Some(body),
            }) if name == "media" && params.trim() == "reference" => {
                for child in body {
                    match child {
                        AstNode::AtRule(AtRule {
                            name,
                            params,
                            nodes: Some(theme),
                        }) if name == "theme" => {
                            let options =
                                ThemeOptions::parse(&params) | inherited | ThemeOptions::REFERENCE;
                            read_theme_block(theme, options, events)?;
                        }
                        AstNode::Comment(_) => {}
                        other => return Err(CompileError::InvalidReferenceMedia(excerpt(&other))),
                    }
                }
                place_marker(&mut out, placed);
            }
            AstNode::AtRule(AtRule {
                name,
                params,
                nodes: Some(body),
            }) if is_grouping(&name) => {
                let body = collect_theme(body, inherited, events, placed)?;
                out.push(AstNode::AtRule(AtRule {
                    name,
                    params,
                    nodes: Some(body),
                }));
            }
            other => out.push(other),
        }
    }
    Ok(out)
}

fn place_marker(out: &mut Vec<AstNode>, placed: &mut bool) {
    if !*placed {
        out.push(theme_marker());
        *placed = true;
    }
}

fn read_theme_block(body: Vec<AstNode>, options: ThemeOptions, events: &mut Vec<ThemeEvent>) -> Result<()> {
    for child in body {
        match child {
            AstNode::Declaration(decl) if decl.property.starts_with("--") => {
                events.push(ThemeEvent::from_declaration(&decl.property, &decl.value, options));
            }
            AstNode::AtRule(at) if at.name == "keyframes" => {
                let name = at.params.trim().to_string();
                events.push(ThemeEvent::Keyframes(ThemeKeyframes {
                    name,
                    node: AstNode::AtRule(at),
                    options,
                }));
            }
            AstNode::Comment(_) => {}
            other => return Err(CompileError::InvalidTheme(excerpt(&other))),
        }
    }
    Ok(())
}

// Custom variants and utilities

fn invalid_directive(directive: &'static str, message: String) -> CompileError {
    CompileError::InvalidDirective { directive, message }
}

/// Registers top-level `@variant` / `@custom-variant` declarations.
fn register_variants(ast: &mut Vec<AstNode>, system: &mut DesignSystem) -> Result<()> {
    for node in std::mem::take(ast) {
        match node {
            AstNode::AtRule(at) if at.name == "variant" || at.name == "custom-variant" => {
                let (name, variant) = parse_custom_variant(&at.params, at.nodes)?;
                log::debug!("registering @{} `{}`", at.name, name);
                system.variants.add_custom(&name, variant);
            }
            other => ast.push(other),
        }
    }
    Ok(())
}

fn parse_custom_variant(params: &str, body: Option<Vec<AstNode>>) -> Result<(String, CustomVariant)> {
    let params = params.trim();
    let (name, rest) = match params.find(|c: char| c.is_whitespace() || c == '(') {
        Some(idx) => (&params[..idx], params[idx..].trim()),
        None => (params, ""),
    };
    let valid = !name.is_empty()
        && !name.starts_with('-')
        && !name.ends_with('-')
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
    if !valid {
        return Err(invalid_directive(
            "variant",
            format!("`{}` is not a valid variant name", name),
        ));
    }

    match body {
        Some(body) if rest.is_empty() => {
            let mut has_slot = false;
            walk(&body, &mut |node| {
                has_slot |= node.is_at_rule("slot");
                WalkAction::Continue
            });
            if !has_slot {
                return Err(invalid_directive(
                    "variant",
                    format!("`{}` must contain `@slot`", name),
                ));
            }
            Ok((name.to_string(), CustomVariant::Body(body)))
        }
        None => {
            let inner = rest
                .strip_prefix('(')
                .and_then(|r| r.strip_suffix(')'))
                .ok_or_else(|| {
                    invalid_directive(
                        "variant",
                        format!("`{}` needs a selector list or a body", name),
                    )
                })?;
            let selectors: Vec<String> = segment(inner, ',')
                .into_iter()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            if selectors.is_empty() {
                return Err(invalid_directive(
                    "variant",
                    format!("`{}` has an empty selector list", name),
                ));
            }
            Ok((name.to_string(), CustomVariant::Selectors(selectors)))
        }
        Some(_) => Err(invalid_directive(
            "variant",
            format!("`{}` cannot have both a selector list and a body", name),
        )),
    }
}

/// Registers top-level `@utility` declarations, in source order.
fn register_utilities(ast: &mut Vec<AstNode>, system: &mut DesignSystem) -> Result<()> {
    for node in std::mem::take(ast) {
        match node {
            AstNode::AtRule(at) if at.name == "utility" => {
                let Some(body) = at.nodes else {
                    return Err(invalid_directive(
                        "utility",
                        format!("`{}` needs a body", at.params.trim()),
                    ));
                };
                // Expand relative to the element the utility is applied to.
                let mut wrapper = vec![AstNode::rule("&", body)];
                substitute_variant_blocks(&mut wrapper, system)?;
                substitute_apply(&mut wrapper, system)?;
                substitute_functions(&mut wrapper, &system.theme)?;
                let body = wrapper
                    .first_mut()
                    .map(take_children)
                    .unwrap_or_default();
                custom::register(&mut system.utilities, &at.params, body)?;
            }
            other => ast.push(other),
        }
    }
    Ok(())
}

// Loading

/// A resolved `@config` or `@plugin` module.
struct LoadedModule {
    id: String,
    module: Module,
    options: PluginOptions,
}

/// Resolves imports and modules, recursively and in source order.
struct Loader {
    resolver: Arc<dyn Resolver>,
    modules: Vec<LoadedModule>,
    plugins: Vec<String>,
}

enum Directive {
    Import(String),
    Config(String),
    Plugin(String, Option<Vec<AstNode>>),
}

impl Loader {
    fn new(resolver: Arc<dyn Resolver>) -> Self {
        Self {
            resolver,
            modules: Vec::new(),
            plugins: Vec::new(),
        }
    }

    /// Resolves the top-level directives of `nodes`. `chain` identifies the
    /// stylesheets currently being imported, outermost first.
    fn load<'a>(
        &'a mut self,
        nodes: &'a mut Vec<AstNode>,
        base: String,
        depth: usize,
        chain: Vec<String>,
    ) -> BoxFuture<'a, Result<()>> {
        async move {
            let mut idx = 0;
            while idx < nodes.len() {
                let directive = match &nodes[idx] {
                    AstNode::AtRule(at) if at.name == "import" && at.nodes.is_none() => {
                        Directive::Import(at.params.clone())
                    }
                    AstNode::AtRule(at) if at.name == "config" && at.nodes.is_none() => {
                        Directive::Config(at.params.clone())
                    }
                    AstNode::AtRule(at) if at.name == "plugin" => {
                        Directive::Plugin(at.params.clone(), at.nodes.clone())
                    }
                    _ => {
                        idx += 1;
                        continue;
                    }
                };

                match directive {
                    Directive::Import(params) => {
                        let Some(import) = Import::parse(&params) else {
                            idx += 1;
                            continue;
                        };
                        let imported = self.import(&import, &base, depth, &chain).await?;
                        let wrapped = import.wrap(imported);
                        let len = wrapped.len();
                        nodes.splice(idx..idx + 1, wrapped);
                        idx += len;
                    }
                    Directive::Config(params) => {
                        self.load_config(&params, &base).await?;
                        nodes.remove(idx);
                    }
                    Directive::Plugin(params, body) => {
                        self.load_plugin(&params, body, &base).await?;
                        nodes.remove(idx);
                    }
                }
            }
            Ok(())
        }
        .boxed()
    }

    async fn import(
        &mut self,
        import: &Import,
        base: &str,
        depth: usize,
        chain: &[String],
    ) -> Result<Vec<AstNode>> {
        let error = |reason: String| CompileError::Import {
            id: import.uri.clone(),
            reason,
        };
        if depth >= MAX_IMPORT_DEPTH {
            return Err(error(format!(
                "exceeded the maximum import depth of {}",
                MAX_IMPORT_DEPTH
            )));
        }
        let resolved = self
            .resolver
            .resolve_import(&import.uri, base)
            .await
            .map_err(|e| error(e.to_string()))?;

        let key = format!("{}\n{}", resolved.base, resolved.content);
        if chain.contains(&key) {
            return Err(error("circular import".to_string()));
        }
        let mut chain = chain.to_vec();
        chain.push(key);

        log::debug!("importing `{}` from `{}`", import.uri, resolved.base);
        let mut nodes = parse(&resolved.content)?;
        self.load(&mut nodes, resolved.base, depth + 1, chain).await?;
        Ok(nodes)
    }

    async fn load_config(&mut self, params: &str, base: &str) -> Result<()> {
        let id = module_id("config", params)?;
        let resolved = self
            .resolver
            .resolve_module(&id, base, ModuleKind::Config)
            .await
            .map_err(|e| module_error(&id, e.to_string()))?;
        let Module::Config(config) = &resolved.module else {
            return Err(module_error(&id, "expected a configuration".to_string()));
        };
        let plugins = config.plugins.clone();
        log::debug!("loaded config `{}` with {} plugins", id, plugins.len());
        self.modules.push(LoadedModule {
            id,
            module: resolved.module,
            options: PluginOptions::new(),
        });

        for plugin in plugins {
            let module = self
                .resolver
                .resolve_module(&plugin, &resolved.base, ModuleKind::Plugin)
                .await
                .map_err(|e| module_error(&plugin, e.to_string()))?
                .module;
            self.modules.push(LoadedModule {
                id: plugin,
                module,
                options: PluginOptions::new(),
            });
        }
        Ok(())
    }

    async fn load_plugin(&mut self, params: &str, body: Option<Vec<AstNode>>, base: &str) -> Result<()> {
        let id = module_id("plugin", params)?;
        let options = plugin_options(&id, body.unwrap_or_default())?;
        let resolved = self
            .resolver
            .resolve_module(&id, base, ModuleKind::Plugin)
            .await
            .map_err(|e| module_error(&id, e.to_string()))?;
        if !matches!(resolved.module, Module::Plugin(_)) {
            return Err(module_error(&id, "expected a plugin".to_string()));
        }
        self.plugins.push(id.clone());
        self.modules.push(LoadedModule {
            id,
            module: resolved.module,
            options,
        });
        Ok(())
    }
}

fn module_id(directive: &'static str, params: &str) -> Result<String> {
    unquote(params).map(str::to_string).ok_or_else(|| {
        invalid_directive(
            directive,
            format!("expected a quoted module id, found `{}`", params.trim()),
        )
    })
}

fn module_error(id: &str, reason: String) -> CompileError {
    CompileError::Module {
        id: id.to_string(),
        reason,
    }
}

fn plugin_options(id: &str, body: Vec<AstNode>) -> Result<PluginOptions> {
    let mut options = PluginOptions::new();
    for node in body {
        match node {
            AstNode::Declaration(decl) => {
                options.insert(decl.property, option_value(&decl.value));
            }
            AstNode::Comment(_) => {}
            other => {
                return Err(invalid_directive(
                    "plugin",
                    format!(
                        "options for `{}` may only contain declarations, found: {}",
                        id,
                        excerpt(&other)
                    ),
                ));
            }
        }
    }
    Ok(options)
}

/// `a, b` becomes a list, quoted text a string, JSON literals themselves.
fn option_value(raw: &str) -> Value {
    let parts = segment(raw, ',');
    if parts.len() > 1 {
        return Value::Array(parts.into_iter().map(option_value).collect());
    }
    let raw = raw.trim();
    if let Some(text) = unquote(raw) {
        return Value::String(text.to_string());
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(value @ (Value::Bool(_) | Value::Number(_) | Value::Null)) => value,
        _ => Value::String(raw.to_string()),
    }
}

/// A parsed `@import` prelude.
#[derive(Debug, Clone, Default, PartialEq)]
struct Import {
    uri: String,
    layer: Option<String>,
    supports: Option<String>,
    media: Option<String>,
    theme: Option<String>,
}

impl Import {
    /// Returns `None` for imports that pass through untouched: `url(...)`
    /// and remote stylesheets.
    fn parse(params: &str) -> Option<Self> {
        let mut parts = segment(params.trim(), ' ')
            .into_iter()
            .map(str::trim)
            .filter(|part| !part.is_empty());
        let uri = unquote(parts.next()?)?;
        if uri.starts_with("http://") || uri.starts_with("https://") || uri.starts_with("//") {
            return None;
        }

        let mut import = Import {
            uri: uri.to_string(),
            ..Default::default()
        };
        let mut media = Vec::new();
        for part in parts {
            if part == "layer" {
                import.layer = Some(String::new());
            } else if let Some(layer) = function_args(part, "layer") {
                import.layer = Some(layer.to_string());
            } else if let Some(supports) = function_args(part, "supports") {
                import.supports = Some(if supports.contains('(') {
                    supports.to_string()
                } else {
                    format!("({})", supports)
                });
            } else if let Some(theme) = function_args(part, "theme") {
                import.theme = Some(theme.to_string());
            } else if function_args(part, "source").is_none() {
                media.push(part);
            }
        }
        if !media.is_empty() {
            import.media = Some(media.join(" "));
        }
        Some(import)
    }

    /// Wraps imported nodes in the import's media, supports and layer
    /// conditions, innermost first.
    fn wrap(&self, mut nodes: Vec<AstNode>) -> Vec<AstNode> {
        if let Some(theme) = &self.theme {
            add_theme_options(&mut nodes, theme);
        }
        if let Some(media) = &self.media {
            nodes = vec![AstNode::at_rule("media", media.as_str(), nodes)];
        }
        if let Some(supports) = &self.supports {
            nodes = vec![AstNode::at_rule("supports", supports.as_str(), nodes)];
        }
        if let Some(layer) = &self.layer {
            nodes = vec![AstNode::at_rule("layer", layer.as_str(), nodes)];
        }
        nodes
    }
}

fn function_args<'a>(part: &'a str, name: &str) -> Option<&'a str> {
    part.strip_prefix(name)?
        .strip_prefix('(')?
        .strip_suffix(')')
        .map(str::trim)
}

fn add_theme_options(nodes: &mut [AstNode], options: &str) {
    for node in nodes.iter_mut() {
        if let AstNode::AtRule(at) = node {
            if at.name == "theme" && at.nodes.is_some() {
                at.params = format!("{} {}", at.params.trim(), options).trim().to_string();
                continue;
            }
        }
        if let Some(children) = node.children_mut() {
            add_theme_options(children, options);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_import_preludes() {
        assert_eq!(
            Import::parse("\"theme.css\" layer(theme) theme(reference)"),
            Some(Import {
                uri: "theme.css".into(),
                layer: Some("theme".into()),
                theme: Some("reference".into()),
                ..Default::default()
            })
        );
        assert_eq!(
            Import::parse("'print.css' supports(display: grid) screen and (width >= 40rem)"),
            Some(Import {
                uri: "print.css".into(),
                supports: Some("(display: grid)".into()),
                media: Some("screen and (width >= 40rem)".into()),
                ..Default::default()
            })
        );
        assert_eq!(Import::parse("url(\"fonts.css\")"), None);
        assert_eq!(Import::parse("\"https://example.com/a.css\""), None);
    }

    #[test]
    fn wraps_imports_innermost_first() {
        let import = Import::parse("\"a.css\" layer(base) supports(display: grid) print").unwrap();
        let wrapped = import.wrap(vec![AstNode::rule(".a", vec![AstNode::decl("color", "red")])]);
        assert_eq!(
            wrapped,
            vec![AstNode::at_rule(
                "layer",
                "base",
                vec![AstNode::at_rule(
                    "supports",
                    "(display: grid)",
                    vec![AstNode::at_rule(
                        "media",
                        "print",
                        vec![AstNode::rule(".a", vec![AstNode::decl("color", "red")])],
                    )],
                )],
            )]
        );
    }

    #[test]
    fn plugin_option_values() {
        assert_eq!(option_value("true"), Value::Bool(true));
        assert_eq!(option_value("12"), serde_json::json!(12));
        assert_eq!(option_value("'tw-'"), Value::String("tw-".into()));
        assert_eq!(option_value("base"), Value::String("base".into()));
        assert_eq!(option_value("a, 'b', 3"), serde_json::json!(["a", "b", 3]));
    }

    #[test]
    fn custom_variant_declarations() {
        let (name, variant) = parse_custom_variant("hocus (&:hover, &:focus)", None).unwrap();
        assert_eq!(name, "hocus");
        assert_eq!(
            variant,
            CustomVariant::Selectors(vec!["&:hover".into(), "&:focus".into()])
        );

        let body = parse("&:where(.theme-midnight *) { @slot; }").unwrap();
        let (_, variant) = parse_custom_variant("midnight", Some(body.clone())).unwrap();
        assert_eq!(variant, CustomVariant::Body(body));

        assert!(parse_custom_variant("Hocus (&:hover)", None).is_err());
        assert!(parse_custom_variant("hocus", None).is_err());
        assert!(parse_custom_variant("hocus", Some(vec![AstNode::decl("color", "red")])).is_err());
    }

    #[test]
    fn theme_blocks_become_events() {
        let ast = parse(
            "@theme { --color-red-500: red; } .a { color: red; } @media reference { @theme { --spacing: 4px; } }",
        )
        .unwrap();
        let mut events = Vec::new();
        let mut placed = false;
        let ast = collect_theme(ast, ThemeOptions::empty(), &mut events, &mut placed).unwrap();
        assert!(is_theme_marker(&ast[0]));
        assert_eq!(ast.len(), 2);
        assert_eq!(
            events,
            vec![
                ThemeEvent::from_declaration("--color-red-500", "red", ThemeOptions::empty()),
                ThemeEvent::from_declaration("--spacing", "4px", ThemeOptions::REFERENCE),
            ]
        );
    }

    #[test]
    fn theme_rejects_rules() {
        let ast = parse("@theme { .a { color: red; } }").unwrap();
        let result = collect_theme(ast, ThemeOptions::empty(), &mut Vec::new(), &mut false);
        assert!(matches!(result, Err(CompileError::InvalidTheme(_))));

        let ast = parse("@media reference { .a { color: red; } }").unwrap();
        let result = collect_theme(ast, ThemeOptions::empty(), &mut Vec::new(), &mut false);
        assert!(matches!(result, Err(CompileError::InvalidReferenceMedia(_))));
    }
}
