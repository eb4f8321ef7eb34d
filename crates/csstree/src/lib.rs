//! # csstree - CSS syntax trees
//!
//! A small CSS toolkit used by the `tailor` compiler. It treats selectors
//! and values as text and focuses on the structural work a utility
//! compiler needs:
//!
//! - **Parsing**: Convert CSS source into a tree of [`AstNode`]s
//! - **Printing**: Turn a tree back into CSS text with [`to_css`]
//! - **Flattening**: Resolve `&` nesting into flat rules with [`flatten`]
//! - **Escaping**: CSSOM-compatible identifier escaping with [`escape`]
//! - **Segmenting**: Bracket-aware splitting with [`segment`]
//!
//! ## Quick Start
//!
//! ```rust
//! use csstree::{flatten, parse, to_css};
//!
//! let nodes = parse(".btn { color: red; &:hover { color: blue; } }").unwrap();
//! let css = to_css(&flatten(nodes));
//! assert_eq!(css, ".btn {\n  color: red;\n}\n.btn:hover {\n  color: blue;\n}\n");
//! ```

pub mod ast;
pub mod error;
pub mod escape;
pub mod flatten;
pub mod parser;
pub mod printer;
pub mod segment;

pub use ast::{
    AstNode, AtRule, Comment, Declaration, StyleRule, WalkAction, replace_nodes, walk, walk_mut,
};
pub use error::CssError;
pub use escape::{escape, unescape};
pub use flatten::{combine_selectors, flatten, replace_nesting};
pub use parser::{parse, strip_comments};
pub use printer::to_css;
pub use segment::{is_balanced, segment};
