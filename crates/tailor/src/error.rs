//! Error types for stylesheet compilation.
//!
//! Only directive processing can fail. Once a [`Compiler`](crate::Compiler)
//! exists, building utilities never errors: unknown candidates are dropped.

use thiserror::Error;

/// Fatal errors that abort a compile.
///
/// # Examples
///
/// ```rust
/// use tailor::{compile, CompileError, CompileOptions};
///
/// let runtime = tokio::runtime::Runtime::new().unwrap();
/// let result = runtime.block_on(compile(
///     ".btn { @apply bg-not-found; }",
///     "",
///     CompileOptions::default(),
/// ));
/// assert!(matches!(result, Err(CompileError::UnknownUtility(_))));
/// ```
#[derive(Error, Debug)]
pub enum CompileError {
    /// The source (or an imported file) is not valid CSS.
    #[error(transparent)]
    Css(#[from] csstree::CssError),

    /// An `@theme` block contains something other than custom properties
    /// and `@keyframes`.
    #[error("`@theme` blocks may only contain custom properties or `@keyframes`, found: {0}")]
    InvalidTheme(String),

    /// `@media reference` wraps something other than `@theme`.
    #[error("`@media reference` may only contain `@theme` blocks, found: {0}")]
    InvalidReferenceMedia(String),

    /// `@apply` names a utility that does not exist.
    #[error("cannot apply unknown utility class `{0}`")]
    UnknownUtility(String),

    /// `@apply` or `@variant` names a variant that does not exist.
    #[error("cannot apply unknown variant `{0}`")]
    UnknownVariant(String),

    /// A `theme()` call could not be resolved and has no fallback.
    #[error("could not resolve value for theme function: `{0}`")]
    ThemeResolution(String),

    /// A CSS function such as `--alpha()` has malformed arguments.
    #[error("invalid `{function}()` call: {message}")]
    InvalidFunction {
        function: &'static str,
        message: String,
    },

    /// A `@variant` / `@utility` declaration is malformed.
    #[error("invalid `@{directive}` declaration: {message}")]
    InvalidDirective {
        directive: &'static str,
        message: String,
    },

    /// An `@import` could not be resolved or forms a cycle.
    #[error("failed to import `{id}`: {reason}")]
    Import { id: String, reason: String },

    /// A `@config` or `@plugin` module could not be loaded.
    #[error("failed to load module `{id}`: {reason}")]
    Module { id: String, reason: String },
}

/// Errors returned by a [`Resolver`](crate::Resolver).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    /// The resolver does not support this kind of request.
    #[error("no resolver configured for `{0}`")]
    Unsupported(String),

    /// The target does not exist.
    #[error("`{0}` not found")]
    NotFound(String),

    /// The resolver failed for some other reason.
    #[error("{0}")]
    Other(String),
}

// Create a type alias for convenience
pub type Result<T> = std::result::Result<T, CompileError>;
