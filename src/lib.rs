//! # tailor-rs
//!
//! Host-side entry point for the `tailor` stylesheet compiler: reads
//! stylesheets from disk, resolves their imports and configs, and wires the
//! compiler's logs into a file.
//!
//! ```rust,no_run
//! use tailor_rs::{FsResolver, compile_file};
//!
//! # async fn run() -> tailor_rs::error::Result<()> {
//! let compiler = compile_file("styles/app.css", FsResolver::new()).await?;
//! let css = compiler.build(["flex", "md:grid", "hover:underline"]);
//! tokio::fs::write("dist/app.css", css).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod fs;
pub mod log_init;

pub use csstree;
pub use log;
pub use tailor::*;

pub use fs::FsResolver;
pub use log_init::init_logger;

use std::path::Path;

/// Reads the stylesheet at `path` and compiles it. Imports and configs
/// resolve relative to the file's directory.
pub async fn compile_file(
    path: impl AsRef<Path>,
    resolver: impl Resolver + 'static,
) -> error::Result<Compiler> {
    let path = path.as_ref();
    let css = tokio::fs::read_to_string(path).await?;
    let base = path
        .parent()
        .map(|parent| parent.to_string_lossy().into_owned())
        .unwrap_or_default();
    log::debug!("compiling {}", path.display());
    let compiler = compile(&css, &base, CompileOptions::new().with_resolver(resolver)).await?;
    Ok(compiler)
}
