//! Open documents and their cached parse trees.

use std::cell::OnceCell;

use glsl_parser::{ParsedTree, Parser};
use indexmap::IndexMap;
use triomphe::Arc;

/// Failure modes of workspace lookups.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// No parse tree can exist for a document that was never opened.
    #[error("`{0}` is not an open document")]
    UnknownDocument(String),
}

/// All open documents, keyed by URI in insertion order.
#[derive(Default)]
pub struct Workspace {
    documents: IndexMap<String, Document>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a document, replacing any previous content under the same URI.
    pub fn open_document(&mut self, uri: impl Into<String>, text: impl Into<String>) -> &Document {
        let uri = uri.into();
        let document = Document::new(uri.clone(), text.into());
        self.documents.insert(uri.clone(), document);
        &self.documents[&uri]
    }

    pub fn close_document(&mut self, uri: &str) -> bool {
        self.documents.shift_remove(uri).is_some()
    }

    /// Look up an open document. Analysis requires a parsed document, so an
    /// unknown URI is a precondition violation, not an empty result.
    pub fn document(&self, uri: &str) -> Result<&Document, Error> {
        self.documents
            .get(uri)
            .ok_or_else(|| Error::UnknownDocument(uri.to_string()))
    }

    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.documents.values()
    }
}

/// One open shader source.
///
/// The parse tree is built lazily on first access and cached until the text
/// changes. Resolution borrows the tree, so callers must serialize
/// [`Document::update`] with any resolution in progress against the same
/// document; within one thread the borrow checker already enforces this.
#[derive(Debug)]
pub struct Document {
    uri: String,
    source: Arc<String>,
    parsed: OnceCell<ParsedTree>,
}

impl Document {
    fn new(uri: String, text: String) -> Self {
        Self {
            uri,
            source: Arc::new(text),
            parsed: OnceCell::new(),
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Shared handle to the source text, for callers that outlive a borrow.
    pub fn source_arc(&self) -> Arc<String> {
        Arc::clone(&self.source)
    }

    /// The parse tree, parsing on first access.
    pub fn parse_tree(&self) -> &ParsedTree {
        self.parsed.get_or_init(|| Parser::new(&self.source).parse())
    }

    /// Replace the text and drop the cached parse.
    pub fn update(&mut self, text: impl Into<String>) {
        self.source = Arc::new(text.into());
        self.parsed = OnceCell::new();
    }
}

#[cfg(test)]
mod test {
    use super::{Error, Workspace};

    #[test]
    fn unknown_documents_are_a_precondition_error() {
        let workspace = Workspace::new();
        let error = workspace.document("file:///missing.glsl").unwrap_err();
        assert_eq!(
            error,
            Error::UnknownDocument("file:///missing.glsl".to_string())
        );
    }

    #[test]
    fn updates_invalidate_the_cached_parse() {
        let mut workspace = Workspace::new();
        workspace.open_document("file:///a.glsl", "int a;");
        {
            let document = workspace.document("file:///a.glsl").unwrap();
            assert_eq!(document.parse_tree().errors().len(), 0);
        }

        // Reopening under the same URI replaces the content.
        workspace.open_document("file:///a.glsl", "int b = ;");
        let document = workspace.document("file:///a.glsl").unwrap();
        assert_eq!(document.source(), "int b = ;");
        assert!(!document.parse_tree().errors().is_empty());
    }

    #[test]
    fn update_replaces_text_in_place() {
        let mut workspace = Workspace::new();
        workspace.open_document("file:///a.glsl", "int a;");
        let uri = "file:///a.glsl".to_string();
        let document = workspace.documents.get_mut(&uri).unwrap();
        document.parse_tree();
        document.update("float b;");
        assert_eq!(document.source(), "float b;");
        assert!(document.parse_tree().errors().is_empty());
    }
}
