//! Loading of `@import`, `@config` and `@plugin` targets.
//!
//! The compiler never touches the filesystem or the network itself. Every
//! external reference goes through a [`Resolver`] supplied in
//! [`CompileOptions`]; the default one rejects everything, so a stylesheet
//! that imports nothing compiles without any setup.

use crate::error::ResolveError;
use crate::plugin::Module;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// The contents of an imported stylesheet.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStylesheet {
    pub content: String,
    /// Base that imports inside `content` resolve against.
    pub base: String,
}

/// What a module reference is expected to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleKind {
    Config,
    Plugin,
}

/// A loaded `@config` or `@plugin` module.
#[derive(Debug, Clone)]
pub struct ResolvedModule {
    pub module: Module,
    pub base: String,
}

/// Resolves stylesheet imports and modules.
#[async_trait]
pub trait Resolver: Send + Sync {
    async fn resolve_import(&self, id: &str, _base: &str) -> Result<ResolvedStylesheet, ResolveError> {
        Err(ResolveError::Unsupported(id.to_string()))
    }

    async fn resolve_module(
        &self,
        id: &str,
        _base: &str,
        _kind: ModuleKind,
    ) -> Result<ResolvedModule, ResolveError> {
        Err(ResolveError::Unsupported(id.to_string()))
    }
}

/// Rejects every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoResolver;

#[async_trait]
impl Resolver for NoResolver {}

/// Serves stylesheets and modules from memory, keyed by id.
///
/// Useful for hosts that bundle their stylesheets, and for tests.
///
/// ```rust
/// use tailor::{compile, CompileOptions, MemoryResolver};
///
/// let resolver = MemoryResolver::new()
///     .with_stylesheet("buttons.css", ".btn { @apply flex; }");
/// let runtime = tokio::runtime::Runtime::new().unwrap();
/// let compiler = runtime
///     .block_on(compile(
///         "@import \"buttons.css\";",
///         "",
///         CompileOptions::new().with_resolver(resolver),
///     ))
///     .unwrap();
/// assert_eq!(compiler.build(Vec::<String>::new()), ".btn {\n  display: flex;\n}\n");
/// ```
#[derive(Clone, Default)]
pub struct MemoryResolver {
    stylesheets: HashMap<String, String>,
    modules: HashMap<String, Module>,
}

impl MemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stylesheet(mut self, id: impl Into<String>, content: impl Into<String>) -> Self {
        self.stylesheets.insert(id.into(), content.into());
        self
    }

    pub fn with_module(mut self, id: impl Into<String>, module: Module) -> Self {
        self.modules.insert(id.into(), module);
        self
    }
}

impl fmt::Debug for MemoryResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryResolver")
            .field("stylesheets", &self.stylesheets.keys().collect::<Vec<_>>())
            .field("modules", &self.modules.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[async_trait]
impl Resolver for MemoryResolver {
    async fn resolve_import(&self, id: &str, base: &str) -> Result<ResolvedStylesheet, ResolveError> {
        let content = self
            .stylesheets
            .get(id)
            .ok_or_else(|| ResolveError::NotFound(id.to_string()))?;
        Ok(ResolvedStylesheet {
            content: content.clone(),
            base: base.to_string(),
        })
    }

    async fn resolve_module(
        &self,
        id: &str,
        base: &str,
        _kind: ModuleKind,
    ) -> Result<ResolvedModule, ResolveError> {
        let module = self
            .modules
            .get(id)
            .ok_or_else(|| ResolveError::NotFound(id.to_string()))?;
        Ok(ResolvedModule {
            module: module.clone(),
            base: base.to_string(),
        })
    }
}

/// Options for [`compile`](crate::compile).
#[derive(Clone)]
pub struct CompileOptions {
    pub resolver: Arc<dyn Resolver>,
}

impl CompileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resolver(mut self, resolver: impl Resolver + 'static) -> Self {
        self.resolver = Arc::new(resolver);
        self
    }
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            resolver: Arc::new(NoResolver),
        }
    }
}

impl fmt::Debug for CompileOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompileOptions").finish_non_exhaustive()
    }
}
