//! Filesystem resolution for hosts that compile stylesheets from disk.

use async_trait::async_trait;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use tailor::{
    Config, Module, ModuleKind, ResolveError, ResolvedModule, ResolvedStylesheet, Resolver,
};

/// Resolves `@import` and `@config` against the filesystem.
///
/// Ids are joined onto the directory of the importing file. Imports without
/// an extension get `.css`. Config modules are read as JSON. Plugins are
/// Rust values and have to be registered up front with
/// [`FsResolver::with_plugin`].
#[derive(Debug, Clone, Default)]
pub struct FsResolver {
    plugins: HashMap<String, Module>,
}

impl FsResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_plugin(mut self, id: impl Into<String>, plugin: Module) -> Self {
        self.plugins.insert(id.into(), plugin);
        self
    }
}

#[async_trait]
impl Resolver for FsResolver {
    async fn resolve_import(&self, id: &str, base: &str) -> Result<ResolvedStylesheet, ResolveError> {
        let mut path = Path::new(base).join(id);
        if path.extension().is_none() {
            path.set_extension("css");
        }
        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| read_error(id, &path, e))?;
        log::debug!("read stylesheet {}", path.display());
        Ok(ResolvedStylesheet {
            content,
            base: parent_of(&path),
        })
    }

    async fn resolve_module(
        &self,
        id: &str,
        base: &str,
        kind: ModuleKind,
    ) -> Result<ResolvedModule, ResolveError> {
        if let Some(module) = self.plugins.get(id) {
            return Ok(ResolvedModule {
                module: module.clone(),
                base: base.to_string(),
            });
        }

        let path = Path::new(base).join(id);
        let is_json = path.extension().is_some_and(|ext| ext == "json");
        if kind == ModuleKind::Plugin || !is_json {
            return Err(ResolveError::Unsupported(id.to_string()));
        }
        let source = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| read_error(id, &path, e))?;
        let config = Config::from_json(id, &source).map_err(|e| ResolveError::Other(e.to_string()))?;
        Ok(ResolvedModule {
            module: Module::Config(config),
            base: parent_of(&path),
        })
    }
}

fn parent_of(path: &Path) -> String {
    path.parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(PathBuf::new)
        .to_string_lossy()
        .into_owned()
}

fn read_error(id: &str, path: &Path, error: io::Error) -> ResolveError {
    match error.kind() {
        io::ErrorKind::NotFound => ResolveError::NotFound(id.to_string()),
        _ => ResolveError::Other(format!("{}: {}", path.display(), error)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tailor::{CssTree, PluginApi};

    async fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("tailor-{}-{}", name, std::process::id()));
        tokio::fs::create_dir_all(dir.join("components")).await.unwrap();
        dir
    }

    #[tokio::test]
    async fn imports_resolve_relative_to_the_importing_file() {
        let dir = scratch_dir("imports").await;
        tokio::fs::write(dir.join("app.css"), "@import \"components/buttons\";\n@tailwind utilities;")
            .await
            .unwrap();
        tokio::fs::write(dir.join("components/buttons.css"), "@import \"./base.css\";\n.btn { @apply flex; }")
            .await
            .unwrap();
        tokio::fs::write(dir.join("components/base.css"), ".base { color: red; }")
            .await
            .unwrap();

        let output = crate::compile_file(dir.join("app.css"), FsResolver::new())
            .await
            .unwrap()
            .build(["grid"]);
        assert_eq!(
            output,
            ".base {\n  color: red;\n}\n.btn {\n  display: flex;\n}\n.grid {\n  display: grid;\n}\n"
        );
        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn configs_load_from_json_and_plugins_from_the_registry() {
        let dir = scratch_dir("config").await;
        tokio::fs::write(
            dir.join("tailwind.config.json"),
            r##"{ "theme": { "colors": { "brand": "#0088cc" } }, "plugins": ["slant"] }"##,
        )
        .await
        .unwrap();
        tokio::fs::write(dir.join("app.css"), "@config \"./tailwind.config.json\";\n@tailwind utilities;")
            .await
            .unwrap();

        let slant = Module::plugin(|api: &mut PluginApi<'_>| -> tailor::Result<()> {
            api.add_utilities(vec![(".slant", vec![CssTree::decl("transform", "skewY(-6deg)")])])
        });
        let output = crate::compile_file(dir.join("app.css"), FsResolver::new().with_plugin("slant", slant))
            .await
            .unwrap()
            .build(["bg-brand", "slant"]);
        assert!(output.contains("background-color: #0088cc;"));
        assert!(output.contains("transform: skewY(-6deg);"));
        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn missing_files_and_script_modules() {
        let resolver = FsResolver::new();
        assert_eq!(
            resolver.resolve_import("nope.css", "/definitely/not/here").await,
            Err(ResolveError::NotFound("nope.css".into()))
        );
        assert!(matches!(
            resolver.resolve_module("./plugin.js", "/", ModuleKind::Plugin).await,
            Err(ResolveError::Unsupported(_))
        ));
    }
}
