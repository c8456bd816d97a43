mod tree;

pub(crate) mod grammar;

use std::cell::RefCell;
use std::rc::Rc;

use crate::lexer::{Lexer, Token};
use crate::{Error, LimitTracker, Tag};

pub use tree::{NodeIndex, ParsedTree, Span, Tree};
pub(crate) use tree::TreeBuilder;

/// Parse GLSL source into a [`ParsedTree`].
///
/// The parser always produces a tree: unexpected input is wrapped in
/// recovery nodes and reported through [`ParsedTree::errors`] rather than
/// aborting the parse.
///
/// ## Example
/// ```rust
/// use glsl_parser::{Parser, Tag};
///
/// let parsed = Parser::new("void main() { gl_Position = vec4(0.0); }").parse();
/// assert!(parsed.errors().is_empty());
///
/// let tree = parsed.tree();
/// let kinds: Vec<Tag> = tree.children(tree.root()).map(|n| tree.tag(n)).collect();
/// assert_eq!(kinds, vec![Tag::FunctionDeclaration]);
/// ```
pub struct Parser<'input> {
    source: &'input str,
    /// Token stream with trivia already stripped.
    tokens: Vec<Token>,
    pos: usize,
    /// The in-progress tree.
    builder: Rc<RefCell<TreeBuilder>>,
    /// Spans of comments and whitespace, in source order.
    ignored: Vec<Span>,
    /// The list of syntax errors accumulated so far.
    errors: Vec<Error>,
    /// The nesting limit to apply while parsing.
    pub(crate) recursion_limit: LimitTracker,
}

impl<'input> Parser<'input> {
    /// Create a new instance of a parser given an input string.
    pub fn new(input: &'input str) -> Self {
        let (raw_tokens, errors) = Lexer::new(input).lex();

        let mut tokens = Vec::with_capacity(raw_tokens.len());
        let mut ignored = Vec::new();
        for token in raw_tokens {
            if token.tag().is_trivia() {
                ignored.push(token.span());
            } else {
                tokens.push(token);
            }
        }

        Self {
            source: input,
            tokens,
            pos: 0,
            builder: Rc::new(RefCell::new(TreeBuilder::new())),
            ignored,
            errors,
            recursion_limit: LimitTracker::default(),
        }
    }

    /// Configure the nesting limit to use while parsing.
    pub fn recursion_limit(mut self, recursion_limit: usize) -> Self {
        self.recursion_limit = LimitTracker::new(recursion_limit);
        self
    }

    /// Parse the tokens.
    pub fn parse(mut self) -> ParsedTree {
        grammar::file(&mut self);

        let builder = Rc::try_unwrap(self.builder)
            .expect("more than one reference to builder left")
            .into_inner();

        ParsedTree {
            tree: builder.finish(),
            ignored: self.ignored,
            errors: self.errors,
        }
    }

    pub(crate) fn peek(&self) -> Option<Tag> {
        self.tokens.get(self.pos).map(Token::tag)
    }

    pub(crate) fn peek_n(&self, n: usize) -> Option<Tag> {
        self.tokens.get(self.pos + n).map(Token::tag)
    }

    pub(crate) fn at(&self, tag: Tag) -> bool {
        self.peek() == Some(tag)
    }

    /// Byte offset of the current token, or the end of input.
    pub(crate) fn current_offset(&self) -> u32 {
        self.tokens
            .get(self.pos)
            .map(|token| token.span().start)
            .unwrap_or(self.source.len() as u32)
    }

    /// Add the current token to the current node and advance.
    pub(crate) fn bump(&mut self) {
        if let Some(token) = self.tokens.get(self.pos) {
            self.builder.borrow_mut().token(token.tag(), token.span());
            self.pos += 1;
        }
    }

    /// Consume the current token if it is `tag`.
    pub(crate) fn eat(&mut self, tag: Tag) -> bool {
        if self.at(tag) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Consume `tag` or record an error without consuming anything.
    pub(crate) fn expect(&mut self, tag: Tag) {
        if !self.eat(tag) {
            self.err(&format!("expected {tag:?}"));
        }
    }

    /// Record an error at the current token. Consumes nothing.
    pub(crate) fn err(&mut self, message: &str) {
        let (data, index) = match self.tokens.get(self.pos) {
            Some(token) => (
                token.text(self.source).to_string(),
                token.span().start as usize,
            ),
            None => ("EOF".to_string(), self.source.len()),
        };
        self.errors.push(Error::with_loc(message, data, index));
    }

    /// Record an error and skip the offending token inside an `unknown`
    /// recovery node.
    pub(crate) fn err_and_bump(&mut self, message: &str) {
        self.err(message);
        if self.pos < self.tokens.len() {
            let _g = self.start_node(Tag::Unknown);
            self.bump();
        }
    }

    /// Record an error and stash the offending token in an `invalid` node,
    /// standing in for a production that could not be built.
    pub(crate) fn err_invalid(&mut self, message: &str) {
        self.err(message);
        if self.pos < self.tokens.len() {
            let _g = self.start_node(Tag::Invalid);
            self.bump();
        }
    }

    pub(crate) fn limit_err(&mut self, message: &str) {
        let index = self.current_offset() as usize;
        self.errors
            .push(Error::with_loc(message, String::new(), index));
    }

    /// Start a new node. The node closes when the guard drops.
    pub(crate) fn start_node(&mut self, tag: Tag) -> NodeGuard {
        let offset = self.current_offset();
        self.builder.borrow_mut().start_node(tag, offset);
        NodeGuard {
            builder: Rc::clone(&self.builder),
        }
    }

    /// Remember this position so a node can wrap everything parsed after it.
    pub(crate) fn checkpoint_node(&self) -> Checkpoint {
        Checkpoint {
            builder: Rc::clone(&self.builder),
            index: self.builder.borrow().checkpoint(),
            offset: self.current_offset(),
        }
    }

    /// How many tokens have been consumed. Loop guards use this to verify
    /// forward progress.
    pub(crate) fn consumed(&self) -> usize {
        self.pos
    }
}

/// Closes its node when dropped.
pub(crate) struct NodeGuard {
    builder: Rc<RefCell<TreeBuilder>>,
}

impl Drop for NodeGuard {
    fn drop(&mut self) {
        self.builder.borrow_mut().finish_node();
    }
}

/// A builder position captured by [`Parser::checkpoint_node`].
pub(crate) struct Checkpoint {
    builder: Rc<RefCell<TreeBuilder>>,
    index: usize,
    offset: u32,
}

impl Checkpoint {
    /// Open a `tag` node around everything parsed since the checkpoint.
    /// Wrapping the same checkpoint again nests outward, which is exactly
    /// the left-associative shape infix chains need.
    pub(crate) fn wrap_node(&self, tag: Tag) -> NodeGuard {
        self.builder
            .borrow_mut()
            .wrap_node(self.index, tag, self.offset);
        NodeGuard {
            builder: Rc::clone(&self.builder),
        }
    }
}

#[cfg(test)]
mod test {
    use expect_test::expect;

    use crate::Parser;

    #[test]
    fn it_lays_the_tree_out_flat() {
        let source = "int x;";
        let parsed = Parser::new(source).parse();
        assert!(parsed.errors().is_empty());

        let tree = parsed.tree();
        expect![[r#"
            - File@0..6
                - Declaration@0..6
                    - Identifier@0..3 "int"
                    - VariableDeclarationList@4..5
                        - VariableDeclaration@4..5
                            - Identifier@4..5 "x"
                    - Semicolon@5..6 ";"
        "#]]
        .assert_eq(&tree.dump(tree.root(), source));
    }

    #[test]
    fn ignored_spans_cover_trivia_in_source_order() {
        let source = "int a; /* one */ int b; // two";
        let parsed = Parser::new(source).parse();

        let comments: Vec<&str> = parsed
            .ignored()
            .iter()
            .map(|span| span.text(source))
            .filter(|text| text.starts_with("/*") || text.starts_with("//"))
            .collect();
        assert_eq!(comments, vec!["/* one */", "// two"]);
    }
}
