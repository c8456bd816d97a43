//! Semantic analysis for GLSL, built on the flat parse trees of
//! [`glsl_parser`].
//!
//! Three layers, leaves first:
//!
//! * [`syntax`]: a typed, lazily projected view over parse tree nodes;
//! * [`analysis`]: the lexical scope resolver mapping identifier
//!   occurrences to their declarations;
//! * [`types`](type_of): reconstruction of a reference's declared type and
//!   its canonical single-line rendering.
//!
//! Everything is synchronous and pure over the immutable tree. Resolution
//! misses are empty results, never errors; the only error surface is asking
//! the [`Workspace`] for a document it does not hold.
//!
//! ## Example
//! ```rust
//! use glsl_analyzer::{find_definition, type_of, Workspace};
//! use glsl_parser::Tag;
//!
//! let mut workspace = Workspace::new();
//! workspace.open_document(
//!     "file:///shader.frag",
//!     "layout(location = 1) uniform vec4 color; void main() { color; }",
//! );
//! let document = workspace.document("file:///shader.frag").unwrap();
//! let source = document.source();
//! let tree = document.parse_tree().tree();
//!
//! // The last `color` in the source is the use inside `main`.
//! let usage = (0..tree.len())
//!     .filter(|&n| tree.tag(n) == Tag::Identifier && tree.text(n, source) == "color")
//!     .max_by_key(|&n| tree.span(n).start)
//!     .unwrap();
//!
//! let mut definitions = Vec::new();
//! find_definition(document, usage, &mut definitions);
//! let ty = type_of(&definitions[0]).unwrap();
//! assert_eq!(
//!     ty.format(tree, source).to_string(),
//!     "layout(location = 1) uniform vec4 ",
//! );
//! ```

pub mod analysis;
pub mod format;
pub mod syntax;

mod types;
mod workspace;

pub use crate::analysis::{find_definition, visible_symbols, Reference};
pub use crate::types::{parameter_type, type_of, Type, TypeDisplay};
pub use crate::workspace::{Document, Error, Workspace};
