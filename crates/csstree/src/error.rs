//! Error types for CSS parsing.

use thiserror::Error;

/// Errors that can occur while parsing CSS source text.
///
/// # Examples
///
/// ```rust
/// use csstree::parse;
///
/// // Missing closing brace
/// let result = parse(".a { color: red;");
/// assert!(result.is_err());
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CssError {
    /// Invalid CSS syntax was encountered during parsing.
    ///
    /// The string contains details about what was unexpected.
    #[error("CSS syntax error: {0}")]
    InvalidSyntax(String),

    /// A block was opened but never closed.
    #[error("missing closing brace for `{0}`")]
    UnclosedBlock(String),

    /// A string literal or comment ran to the end of the input.
    #[error("unterminated {0}")]
    Unterminated(&'static str),
}
