//! A recovering parser for the OpenGL Shading Language.
//!
//! Parsing always produces a tree: syntactically invalid input is wrapped in
//! recovery nodes and reported through [`ParsedTree::errors`] instead of
//! aborting, which is what an editor-facing analyzer needs.
//!
//! The tree is a flat array of nodes ([`Tree`]). Every node has a stable
//! index, a [`Tag`] and a byte span; nonterminal nodes hold a contiguous,
//! source-ordered range of child indices, and every node links back to its
//! parent. Consumers navigate with node indices rather than pointers:
//!
//! ```rust
//! use glsl_parser::{Parser, Tag};
//!
//! let parsed = Parser::new("uniform vec4 color;").parse();
//! assert!(parsed.errors().is_empty());
//!
//! let tree = parsed.tree();
//! let declaration = tree.children(tree.root()).next().unwrap();
//! assert_eq!(tree.tag(declaration), Tag::Declaration);
//! assert_eq!(tree.parent(declaration), Some(tree.root()));
//! ```

mod error;
mod lexer;
mod limit;
mod parser;
mod tag;

pub use crate::error::Error;
pub use crate::lexer::{Lexer, Token};
pub use crate::limit::LimitTracker;
pub use crate::parser::{NodeIndex, ParsedTree, Parser, Span, Tree};
pub use crate::tag::Tag;
