//! Typed view over the flat parse tree.
//!
//! Every grammar production the analyzer cares about is described by a
//! schema type implementing [`Syntax`]. A schema answers two questions about
//! a node: does it match, and if so, what are its children? Extraction is
//! deliberately shallow: a projection records which child index fills each
//! of its named slots, and accessors re-run the match on that child at call
//! time. Nothing is projected eagerly, so the mutually recursive productions
//! (expressions containing expressions, struct fields containing
//! declarations containing struct specifiers) cost nothing to break;
//! [`Lazy`] just makes the policy explicit at the recursive seams.
//!
//! Field matching is positional and forgiving: fields are ordered optional
//! slots, scanned left to right over the child range. Recovery nodes are
//! skipped, a mismatched slot stays unset without consuming the child, and
//! an absent slot simply yields `None` from its accessor. Trees produced by
//! a recovering parser contain holes; this keeps projections useful anyway.
//!
//! ## Example
//! ```rust
//! use glsl_analyzer::syntax::{Declaration, Syntax, TypeSpecifier};
//! use glsl_parser::Parser;
//!
//! let source = "uniform vec4 color;";
//! let parsed = Parser::new(source).parse();
//! let tree = parsed.tree();
//!
//! let node = tree.children(tree.root()).next().unwrap();
//! let declaration = Declaration::try_extract(tree, node).unwrap();
//! let specifier = declaration.specifier(tree).unwrap();
//! match specifier {
//!     TypeSpecifier::Identifier(name) => assert_eq!(name.text(tree, source), "vec4"),
//!     _ => unreachable!(),
//! }
//! ```

use std::marker::PhantomData;
use std::ops::Range;

use glsl_parser::{NodeIndex, Tree};

/// The main trait to go from an untyped node index to a typed projection.
pub trait Syntax: Sized {
    /// Shallow check: could `node` be this production? Looks only at tags,
    /// never at children, so it is cheap enough to run during field scans.
    fn matches(tree: &Tree, node: NodeIndex) -> bool;

    /// Project `node`, or `None` when it does not match.
    fn try_extract(tree: &Tree, node: NodeIndex) -> Option<Self>;

    /// The underlying node index.
    fn node(&self) -> NodeIndex;
}

/// Positional forgiving scan: for each matcher in order, advance past
/// recovery children and either record the current child (on match) or
/// leave the slot unset without consuming it.
pub(crate) fn match_fields<const N: usize>(
    tree: &Tree,
    node: NodeIndex,
    matchers: [fn(&Tree, NodeIndex) -> bool; N],
) -> [Option<NodeIndex>; N] {
    let mut fields = [None; N];
    let mut children = tree.children(node);
    let mut current = children.next();
    for (matches, slot) in matchers.iter().zip(fields.iter_mut()) {
        while let Some(child) = current {
            if tree.tag(child).is_recovery() {
                current = children.next();
            } else {
                break;
            }
        }
        let Some(child) = current else { break };
        if matches(tree, child) {
            *slot = Some(child);
            current = children.next();
        }
    }
    fields
}

/// Defers matching to access time: stores just the node index and re-runs
/// the match when dereferenced. This is what breaks the cycles in the
/// schema graph.
pub struct Lazy<N> {
    node: NodeIndex,
    marker: PhantomData<N>,
}

impl<N: Syntax> Lazy<N> {
    /// Run the deferred match.
    pub fn get(&self, tree: &Tree) -> Option<N> {
        N::try_extract(tree, self.node)
    }
}

impl<N: Syntax> Syntax for Lazy<N> {
    fn matches(tree: &Tree, node: NodeIndex) -> bool {
        N::matches(tree, node)
    }

    fn try_extract(tree: &Tree, node: NodeIndex) -> Option<Self> {
        Self::matches(tree, node).then_some(Lazy {
            node,
            marker: PhantomData,
        })
    }

    fn node(&self) -> NodeIndex {
        self.node
    }
}

impl<N> Clone for Lazy<N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N> Copy for Lazy<N> {}

impl<N> std::fmt::Debug for Lazy<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Lazy({})", self.node)
    }
}

impl<N> PartialEq for Lazy<N> {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
    }
}

impl<N> Eq for Lazy<N> {}

/// An iterator over the children of a node that project as `N`. Separators
/// and recovery nodes simply do not match and are skipped.
#[derive(Debug, Clone)]
pub struct ListIter<'t, N> {
    tree: &'t Tree,
    range: Range<NodeIndex>,
    marker: PhantomData<N>,
}

impl<'t, N> ListIter<'t, N> {
    pub(crate) fn new(tree: &'t Tree, range: Range<NodeIndex>) -> Self {
        Self {
            tree,
            range,
            marker: PhantomData,
        }
    }
}

impl<N: Syntax> Iterator for ListIter<'_, N> {
    type Item = N;

    fn next(&mut self) -> Option<N> {
        for node in self.range.by_ref() {
            if let Some(item) = N::try_extract(self.tree, node) {
                return Some(item);
            }
        }
        None
    }
}

/// A schema matching one token tag.
macro_rules! token_schema {
    ($(#[$meta:meta])* $name:ident, $tag:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name {
            node: NodeIndex,
        }

        impl $name {
            pub fn text<'s>(&self, tree: &Tree, source: &'s str) -> &'s str {
                tree.text(self.node, source)
            }
        }

        impl Syntax for $name {
            fn matches(tree: &Tree, node: NodeIndex) -> bool {
                tree.tag(node) == $tag
            }

            fn try_extract(tree: &Tree, node: NodeIndex) -> Option<Self> {
                Self::matches(tree, node).then_some(Self { node })
            }

            fn node(&self) -> NodeIndex {
                self.node
            }
        }
    };
}

/// A schema matching one nonterminal tag, with no projected fields.
macro_rules! node_schema {
    ($(#[$meta:meta])* $name:ident, $tag:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name {
            node: NodeIndex,
        }

        impl Syntax for $name {
            fn matches(tree: &Tree, node: NodeIndex) -> bool {
                tree.tag(node) == $tag
            }

            fn try_extract(tree: &Tree, node: NodeIndex) -> Option<Self> {
                Self::matches(tree, node).then_some(Self { node })
            }

            fn node(&self) -> NodeIndex {
                self.node
            }
        }
    };
}

macro_rules! count_fields {
    () => { 0usize };
    ($head:ident $($tail:ident)*) => { 1usize + count_fields!($($tail)*) };
}

macro_rules! field_accessors {
    ($index:expr;) => {};
    ($index:expr; $(#[$meta:meta])* $field:ident: $schema:ty; $($rest:tt)*) => {
        $(#[$meta])*
        pub fn $field(&self, tree: &Tree) -> Option<$schema> {
            self.fields[$index]
                .and_then(|child| <$schema as Syntax>::try_extract(tree, child))
        }
        field_accessors!($index + 1usize; $($rest)*);
    };
}

/// An extractor: matches a nonterminal tag and projects its children onto
/// named, optionally present slots via the positional scan.
macro_rules! extractor {
    (
        $(#[$meta:meta])*
        $name:ident($tag:expr) {
            $($(#[$field_meta:meta])* $field:ident: $schema:ty,)*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name {
            node: NodeIndex,
            fields: [Option<NodeIndex>; count_fields!($($field)*)],
        }

        impl Syntax for $name {
            fn matches(tree: &Tree, node: NodeIndex) -> bool {
                tree.tag(node) == $tag
            }

            fn try_extract(tree: &Tree, node: NodeIndex) -> Option<Self> {
                if !Self::matches(tree, node) {
                    return None;
                }
                let fields =
                    match_fields(tree, node, [$(<$schema as Syntax>::matches),*]);
                Some(Self { node, fields })
            }

            fn node(&self) -> NodeIndex {
                self.node
            }
        }

        impl $name {
            field_accessors!(0usize; $($(#[$field_meta])* $field: $schema;)*);
        }
    };
}

/// A discriminated union over schemas: matching picks the first variant
/// whose schema matches.
macro_rules! union_schema {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($variant:ident($schema:ty),)*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant($schema),)*
        }

        impl Syntax for $name {
            fn matches(tree: &Tree, node: NodeIndex) -> bool {
                false $(|| <$schema as Syntax>::matches(tree, node))*
            }

            fn try_extract(tree: &Tree, node: NodeIndex) -> Option<Self> {
                $(
                    if let Some(inner) = <$schema as Syntax>::try_extract(tree, node) {
                        return Some(Self::$variant(inner));
                    }
                )*
                None
            }

            fn node(&self) -> NodeIndex {
                match self {
                    $(Self::$variant(inner) => inner.node(),)*
                }
            }
        }
    };
}

/// A list node: an optional prefix token, an interior iterated as the item
/// schema, and an optional suffix token. A missing prefix or suffix (empty
/// or recovering body) is allowed.
macro_rules! list_schema {
    (
        $(#[$meta:meta])*
        $name:ident($tag:expr) {
            prefix: $prefix:expr,
            item: $item:ty,
            suffix: $suffix:expr,
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name {
            node: NodeIndex,
        }

        impl Syntax for $name {
            fn matches(tree: &Tree, node: NodeIndex) -> bool {
                tree.tag(node) == $tag
            }

            fn try_extract(tree: &Tree, node: NodeIndex) -> Option<Self> {
                Self::matches(tree, node).then_some(Self { node })
            }

            fn node(&self) -> NodeIndex {
                self.node
            }
        }

        impl $name {
            /// The prefix token, when present.
            pub fn prefix(&self, tree: &Tree) -> Option<NodeIndex> {
                let prefix: Option<Tag> = $prefix;
                let first = tree.children(self.node).next()?;
                (Some(tree.tag(first)) == prefix).then_some(first)
            }

            /// The suffix token, when present.
            pub fn suffix(&self, tree: &Tree) -> Option<NodeIndex> {
                let suffix: Option<Tag> = $suffix;
                let last = tree.children(self.node).next_back()?;
                (Some(tree.tag(last)) == suffix).then_some(last)
            }

            /// Iterate the interior items in source order.
            pub fn iter<'t>(&self, tree: &'t Tree) -> ListIter<'t, $item> {
                let mut range = tree.children(self.node);
                if self.prefix(tree).is_some() {
                    range.next();
                }
                if self.suffix(tree).is_some() {
                    range.next_back();
                }
                ListIter::new(tree, range)
            }
        }
    };
}

mod node_ext;
mod nodes;

pub use nodes::*;
