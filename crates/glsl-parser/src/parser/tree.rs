use std::fmt;
use std::fmt::Write as _;
use std::ops::Range;

use crate::{Error, Tag};

/// Half-open byte range into the source buffer.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start as usize..self.end as usize]
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Index of a node in a [`Tree`].
pub type NodeIndex = u32;

const NO_PARENT: u32 = u32::MAX;

/// The parse tree, stored as a flat array of nodes.
///
/// Every node has a stable index, a [`Tag`], and a byte [`Span`]; nonterminal
/// nodes additionally have a half-open range of child indices. Children are
/// contiguous and appear in source order, so iterating a child range
/// downward walks a scope in reverse source order.
pub struct Tree {
    tags: Vec<Tag>,
    spans: Vec<Span>,
    ranges: Vec<(u32, u32)>,
    parents: Vec<u32>,
}

impl Tree {
    /// Number of nodes. The root (`file`) is index 0.
    pub fn len(&self) -> u32 {
        self.tags.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn root(&self) -> NodeIndex {
        0
    }

    pub fn tag(&self, node: NodeIndex) -> Tag {
        self.tags[node as usize]
    }

    pub fn span(&self, node: NodeIndex) -> Span {
        self.spans[node as usize]
    }

    /// The span of a token node, `None` for nonterminals.
    pub fn token(&self, node: NodeIndex) -> Option<Span> {
        if self.tag(node).is_nonterminal() {
            None
        } else {
            Some(self.span(node))
        }
    }

    /// Child index range. Empty for tokens.
    pub fn children(&self, node: NodeIndex) -> Range<NodeIndex> {
        let (start, end) = self.ranges[node as usize];
        start..end
    }

    pub fn parent(&self, node: NodeIndex) -> Option<NodeIndex> {
        match self.parents[node as usize] {
            NO_PARENT => None,
            parent => Some(parent),
        }
    }

    /// Source text covered by `node`.
    pub fn text<'a>(&self, node: NodeIndex, source: &'a str) -> &'a str {
        self.span(node).text(source)
    }

    /// Indented dump of the subtree at `node`, tokens with their text.
    pub fn dump(&self, node: NodeIndex, source: &str) -> String {
        let mut out = String::new();
        self.dump_node(&mut out, node, source, 0);
        out
    }

    fn dump_node(&self, out: &mut String, node: NodeIndex, source: &str, indent: usize) {
        let _ = write!(out, "{:indent$}", "", indent = indent);
        let tag = self.tag(node);
        let span = self.span(node);
        if self.children(node).is_empty() && !tag.is_nonterminal() {
            let _ = writeln!(out, "- {:?}@{:?} {:?}", tag, span, span.text(source));
        } else {
            let _ = writeln!(out, "- {tag:?}@{span:?}");
            for child in self.children(node) {
                self.dump_node(out, child, source, indent + 4);
            }
        }
    }
}

impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn print(f: &mut fmt::Formatter<'_>, tree: &Tree, node: NodeIndex, indent: usize) -> fmt::Result {
            write!(f, "{:indent$}", "", indent = indent)?;
            writeln!(f, "- {:?}@{:?}", tree.tag(node), tree.span(node))?;
            for child in tree.children(node) {
                print(f, tree, child, indent + 4)?;
            }
            Ok(())
        }
        if self.is_empty() {
            return Ok(());
        }
        print(f, self, self.root(), 0)
    }
}

/// A [`Tree`] bundled with everything else a parse produces: the spans of
/// ignored trivia (comments and whitespace, in source order) and the syntax
/// errors encountered along the way.
pub struct ParsedTree {
    pub(crate) tree: Tree,
    pub(crate) ignored: Vec<Span>,
    pub(crate) errors: Vec<Error>,
}

impl ParsedTree {
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Spans of comments and whitespace, in source order.
    pub fn ignored(&self) -> &[Span] {
        &self.ignored
    }

    pub fn errors(&self) -> &[Error] {
        &self.errors
    }
}

impl fmt::Debug for ParsedTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.tree, f)?;
        for err in &self.errors {
            writeln!(f, "- {err:?}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
enum Event {
    Open { tag: Tag, offset: u32 },
    Token { tag: Tag, span: Span },
    Close,
}

/// Event-collecting builder for the flat tree.
///
/// Grammar code drives it strictly nested (`start_node`/`finish_node`), with
/// checkpoints for wrapping already-built nodes after the fact, the way
/// expression postfixes need. `finish` lays the nodes out breadth-first so
/// that every node's children occupy one contiguous index range.
#[derive(Debug, Default)]
pub(crate) struct TreeBuilder {
    events: Vec<Event>,
}

impl TreeBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Start a new node and make it current.
    pub(crate) fn start_node(&mut self, tag: Tag, offset: u32) {
        self.events.push(Event::Open { tag, offset });
    }

    /// Finish the current node and restore its parent as current.
    pub(crate) fn finish_node(&mut self) {
        self.events.push(Event::Close);
    }

    /// Add a token to the current node.
    pub(crate) fn token(&mut self, tag: Tag, span: Span) {
        self.events.push(Event::Token { tag, span });
    }

    /// Remember the current position so a node started later can wrap
    /// everything built since.
    pub(crate) fn checkpoint(&self) -> usize {
        self.events.len()
    }

    /// Open a node retroactively at `checkpoint`. The matching
    /// `finish_node` closes it around everything built since the checkpoint.
    pub(crate) fn wrap_node(&mut self, checkpoint: usize, tag: Tag, offset: u32) {
        self.events.insert(checkpoint, Event::Open { tag, offset });
    }

    pub(crate) fn finish(self) -> Tree {
        struct Raw {
            tag: Tag,
            span: Span,
            children: Vec<usize>,
        }

        let mut arena: Vec<Raw> = Vec::new();
        let mut stack: Vec<usize> = Vec::new();
        let mut roots: Vec<usize> = Vec::new();

        let attach = |arena: &mut Vec<Raw>, stack: &[usize], roots: &mut Vec<usize>, id: usize| {
            match stack.last() {
                Some(&parent) => arena[parent].children.push(id),
                None => roots.push(id),
            }
        };

        for event in self.events {
            match event {
                Event::Open { tag, offset } => {
                    let id = arena.len();
                    arena.push(Raw {
                        tag,
                        span: Span::new(offset, offset),
                        children: Vec::new(),
                    });
                    attach(&mut arena, &stack, &mut roots, id);
                    stack.push(id);
                }
                Event::Token { tag, span } => {
                    let id = arena.len();
                    arena.push(Raw {
                        tag,
                        span,
                        children: Vec::new(),
                    });
                    attach(&mut arena, &stack, &mut roots, id);
                }
                Event::Close => {
                    if let Some(id) = stack.pop() {
                        if let (Some(&first), Some(&last)) =
                            (arena[id].children.first(), arena[id].children.last())
                        {
                            arena[id].span = Span::new(arena[first].span.start, arena[last].span.end);
                        }
                    }
                }
            }
        }
        // Close anything the grammar left open.
        while let Some(id) = stack.pop() {
            if let (Some(&first), Some(&last)) =
                (arena[id].children.first(), arena[id].children.last())
            {
                arena[id].span = Span::new(arena[first].span.start, arena[last].span.end);
            }
        }

        let mut tree = Tree {
            tags: Vec::with_capacity(arena.len()),
            spans: Vec::with_capacity(arena.len()),
            ranges: Vec::with_capacity(arena.len()),
            parents: Vec::with_capacity(arena.len()),
        };
        let Some(&root) = roots.first() else {
            return tree;
        };

        // Breadth-first layout: appending each node's children as one run
        // keeps them contiguous and in source order.
        let mut order = vec![root];
        tree.tags.push(arena[root].tag);
        tree.spans.push(arena[root].span);
        tree.ranges.push((0, 0));
        tree.parents.push(NO_PARENT);

        let mut next = 0;
        while next < order.len() {
            let raw = order[next];
            let start = order.len() as u32;
            for &child in &arena[raw].children {
                order.push(child);
                tree.tags.push(arena[child].tag);
                tree.spans.push(arena[child].span);
                tree.ranges.push((0, 0));
                tree.parents.push(next as u32);
            }
            tree.ranges[next] = (start, order.len() as u32);
            next += 1;
        }
        tree
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn children_are_contiguous_and_in_source_order() {
        let mut builder = TreeBuilder::new();
        builder.start_node(Tag::File, 0);
        builder.start_node(Tag::Declaration, 0);
        builder.token(Tag::Identifier, Span::new(0, 3));
        builder.token(Tag::Identifier, Span::new(4, 5));
        builder.token(Tag::Semicolon, Span::new(5, 6));
        builder.finish_node();
        builder.start_node(Tag::Declaration, 7);
        builder.token(Tag::Identifier, Span::new(7, 10));
        builder.token(Tag::Semicolon, Span::new(10, 11));
        builder.finish_node();
        builder.finish_node();

        let tree = builder.finish();
        assert_eq!(tree.tag(tree.root()), Tag::File);
        assert_eq!(tree.span(tree.root()), Span::new(0, 11));

        let file_children: Vec<_> = tree.children(tree.root()).collect();
        assert_eq!(file_children.len(), 2);
        let first = file_children[0];
        let second = file_children[1];
        assert!(first < second);
        assert_eq!(tree.span(first), Span::new(0, 6));
        assert_eq!(tree.span(second), Span::new(7, 11));

        let decl_children: Vec<_> = tree.children(first).collect();
        assert_eq!(decl_children.len(), 3);
        // Contiguous run.
        assert_eq!(decl_children[1], decl_children[0] + 1);
        assert_eq!(decl_children[2], decl_children[1] + 1);
        // Parent links close the loop.
        for child in decl_children {
            assert_eq!(tree.parent(child), Some(first));
        }
        assert_eq!(tree.parent(tree.root()), None);
    }

    #[test]
    fn wrap_node_encloses_everything_since_the_checkpoint() {
        let mut builder = TreeBuilder::new();
        builder.start_node(Tag::File, 0);
        let checkpoint = builder.checkpoint();
        builder.token(Tag::Identifier, Span::new(0, 1));
        builder.wrap_node(checkpoint, Tag::Infix, 0);
        builder.token(Tag::Plus, Span::new(2, 3));
        builder.token(Tag::Identifier, Span::new(4, 5));
        builder.finish_node();
        builder.finish_node();

        let tree = builder.finish();
        let infix = tree.children(tree.root()).next().unwrap();
        assert_eq!(tree.tag(infix), Tag::Infix);
        assert_eq!(tree.span(infix), Span::new(0, 5));
        let tags: Vec<_> = tree.children(infix).map(|c| tree.tag(c)).collect();
        assert_eq!(tags, vec![Tag::Identifier, Tag::Plus, Tag::Identifier]);
    }

    #[test]
    fn empty_nonterminals_get_a_zero_width_span() {
        let mut builder = TreeBuilder::new();
        builder.start_node(Tag::File, 0);
        builder.start_node(Tag::ParameterList, 4);
        builder.finish_node();
        builder.finish_node();

        let tree = builder.finish();
        let list = tree.children(tree.root()).next().unwrap();
        assert_eq!(tree.span(list), Span::new(4, 4));
        assert!(tree.children(list).is_empty());
        assert_eq!(tree.token(list), None);
    }
}
