//! # tailor - utility-class stylesheet compiler
//!
//! Compiles a stylesheet written with utility-class directives into plain
//! CSS for a set of class names found in markup.
//!
//! - **Directives**: `@theme`, `@tailwind utilities`, `@apply`, `@import`,
//!   `@utility`, `@variant`, `@custom-variant`, `@plugin`, `@config`
//! - **Functions**: `theme()`, `--theme()`, `--spacing()`, `--alpha()`
//! - **Output**: deterministic, cascade-ordered, independent of the order
//!   candidates are passed in
//!
//! ## Quick Start
//!
//! ```rust
//! use tailor::{compile, CompileOptions};
//!
//! let css = r#"
//!     @theme { --color-brand: #0088cc; }
//!     @tailwind utilities;
//! "#;
//!
//! let runtime = tokio::runtime::Runtime::new().unwrap();
//! let compiler = runtime.block_on(compile(css, "", CompileOptions::default())).unwrap();
//!
//! let output = compiler.build(["bg-brand/50", "hover:underline", "not-a-utility"]);
//! assert!(output.contains(".bg-brand\\/50 {"));
//! assert!(output.contains(".hover\\:underline:hover {"));
//! assert!(!output.contains("not-a-utility"));
//! ```
//!
//! ## Modules
//!
//! - [`compile`]: the pipeline and [`Compiler`]
//! - [`theme`]: the theme store
//! - [`candidate`]: class name parsing
//! - [`variants`]: the variant engine
//! - [`utilities`]: the utility registry and built-in utilities
//! - [`plugin`] and [`config`]: extension points loaded by `@plugin` / `@config`
//! - [`resolver`]: the async boundary for imports and modules

pub mod apply;
pub mod candidate;
pub mod color;
pub mod compile;
pub mod config;
pub mod design_system;
pub mod error;
pub mod functions;
pub mod plugin;
pub mod property;
pub mod resolver;
pub mod theme;
pub mod utilities;
pub mod value;
pub mod variants;

pub use candidate::{Candidate, CandidateKind, Variant};
pub use compile::{Compiler, compile};
pub use config::Config;
pub use design_system::DesignSystem;
pub use error::{CompileError, ResolveError, Result};
pub use plugin::{CssTree, Module, Plugin, PluginApi};
pub use resolver::{
    CompileOptions, MemoryResolver, ModuleKind, ResolvedModule, ResolvedStylesheet, Resolver,
};
pub use theme::{Theme, ThemeOptions};
pub use variants::DarkMode;
