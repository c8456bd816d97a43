//! Lexical scope resolution: which declarations are visible at a node, and
//! which of them define a given identifier.
//!
//! The resolver walks the tree twice over. An outer loop ascends the
//! ancestor chain of the query node; at each level an inner recursion walks
//! the earlier siblings' subtrees, collecting declared names. `block` and
//! `statement` nodes are scope barriers: the recursion never descends into
//! them, so names declared inside stay invisible from outside. The `file`
//! root is the deliberate exception: its scope is the whole file, so every
//! top-level declaration is collected regardless of source order.

use glsl_parser::{NodeIndex, Tag, Tree};

use crate::syntax::{Syntax, VariableDeclaration, VariableName};
use crate::workspace::Document;

/// An occurrence of a declared name: the identifier token, paired with the
/// enclosing declaration-like node so the type reconstructor can recover
/// its declared type. Borrows from the document's parse tree; produced on
/// demand, never stored.
#[derive(Clone, Copy)]
pub struct Reference<'doc> {
    pub document: &'doc Document,
    /// The declaring identifier token.
    pub node: NodeIndex,
    /// The enclosing function, variable, block, parameter or struct
    /// declaration.
    pub parent_declaration: NodeIndex,
}

impl<'doc> Reference<'doc> {
    /// The referenced name, as spelled in the source.
    pub fn name(&self) -> &'doc str {
        let tree = self.document.parse_tree().tree();
        tree.text(self.node, self.document.source())
    }
}

impl PartialEq for Reference<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.document, other.document)
            && self.node == other.node
            && self.parent_declaration == other.parent_declaration
    }
}

impl Eq for Reference<'_> {}

impl std::fmt::Debug for Reference<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reference")
            .field("name", &self.name())
            .field("node", &self.node)
            .field("parent_declaration", &self.parent_declaration)
            .finish()
    }
}

#[derive(Clone, Copy)]
struct Options {
    /// Whether parameter lists and field declaration lists should be
    /// entered. Off while collecting at file scope, where parameters and
    /// struct fields stay scoped inside their owning declaration, and switched
    /// back on inside interface blocks, whose fields do become global
    /// names.
    check_children: bool,
    parent_declaration: Option<NodeIndex>,
}

/// Append the symbols visible at `node`: innermost scope first, reverse
/// source order within each scope.
pub fn visible_symbols<'doc>(
    document: &'doc Document,
    node: NodeIndex,
    symbols: &mut Vec<Reference<'doc>>,
) {
    let tree = document.parse_tree().tree();
    if tree.is_empty() || node >= tree.len() {
        return;
    }

    let options = |parent: NodeIndex| Options {
        check_children: tree.tag(parent) != Tag::File,
        parent_declaration: None,
    };

    let mut current = node;
    while let Some(parent) = tree.parent(current) {
        let range = tree.children(parent);
        // Only siblings up to `current` are in scope, except at file level
        // where every top-level declaration is visible. The sentinel is one
        // past the first node to visit because the loop decrements first.
        let mut child = if tree.tag(parent) == Tag::File {
            range.end
        } else {
            current + 1
        };
        while child > range.start {
            child -= 1;
            find_visible_symbols(document, tree, child, symbols, options(parent));
        }
        current = parent;
    }
}

/// Collect the declared names in the subtree at `index`, pruning at scope
/// boundaries.
fn find_visible_symbols<'doc>(
    document: &'doc Document,
    tree: &Tree,
    index: NodeIndex,
    symbols: &mut Vec<Reference<'doc>>,
    options: Options,
) {
    let tag = tree.tag(index);
    let options = Options {
        check_children: options.check_children || tag == Tag::BlockDeclaration,
        parent_declaration: if declares_scope(tag) {
            Some(index)
        } else {
            options.parent_declaration
        },
    };

    match tag {
        // These carry their declared names as direct children.
        Tag::FunctionDeclaration | Tag::StructSpecifier => {
            let range = tree.children(index);
            let mut child = range.end;
            while child > range.start {
                child -= 1;
                if let Some(name) = VariableName::try_extract(tree, child) {
                    if let Some(identifier) = name.identifier(tree) {
                        symbols.push(Reference {
                            document,
                            node: identifier.node(),
                            parent_declaration: options.parent_declaration.unwrap_or(index),
                        });
                    }
                } else {
                    find_visible_symbols(document, tree, child, symbols, options);
                }
            }
        }
        // A declarator's children also include its initializer, and a bare
        // identifier initializer (`int y = x;`) has the same shape as the
        // declared name. Only the name slot declares anything.
        Tag::VariableDeclaration => {
            let name = VariableDeclaration::try_extract(tree, index)
                .and_then(|declarator| declarator.name(tree));
            if let Some(identifier) = name.and_then(|name| name.identifier(tree)) {
                symbols.push(Reference {
                    document,
                    node: identifier.node(),
                    parent_declaration: options.parent_declaration.unwrap_or(index),
                });
            }
        }
        // Inner scopes: declarations inside are not visible from here.
        Tag::Block | Tag::Statement => {}
        Tag::Invalid | Tag::Unknown => {}
        // Parameters and struct fields stay scoped to their declaration
        // unless we got here through the declaration's own body.
        Tag::ParameterList | Tag::FieldDeclarationList if !options.check_children => {}
        tag if tag.is_token() => {}
        _ => {
            let range = tree.children(index);
            let mut child = range.end;
            while child > range.start {
                child -= 1;
                find_visible_symbols(document, tree, child, symbols, options);
            }
        }
    }
}

fn declares_scope(tag: Tag) -> bool {
    matches!(
        tag,
        Tag::Declaration
            | Tag::Parameter
            | Tag::FunctionDeclaration
            | Tag::BlockDeclaration
            | Tag::StructSpecifier
    )
}

/// Append the definitions of the identifier at `node`, innermost first.
/// Taking the first element resolves shadowing. Returns nothing (and no
/// error) when `node` is not an identifier or nothing with that name is in
/// scope.
pub fn find_definition<'doc>(
    document: &'doc Document,
    node: NodeIndex,
    references: &mut Vec<Reference<'doc>>,
) {
    let tree = document.parse_tree().tree();
    if tree.is_empty() || node >= tree.len() || tree.tag(node) != Tag::Identifier {
        return;
    }
    let name = tree.text(node, document.source());

    let mut symbols = Vec::new();
    visible_symbols(document, node, &mut symbols);

    for symbol in symbols {
        if tree.tag(symbol.node) == Tag::Identifier && symbol.name() == name {
            references.push(symbol);
        }
    }
}

#[cfg(test)]
mod test {
    use super::visible_symbols;
    use crate::workspace::Workspace;
    use glsl_parser::Tag;

    /// Names visible at the first identifier occurrence of `at`, in
    /// resolution order.
    fn visible_names(source: &str, at: &str) -> Vec<String> {
        let mut workspace = Workspace::new();
        workspace.open_document("file:///test.glsl", source);
        let document = workspace.document("file:///test.glsl").unwrap();
        let tree = document.parse_tree().tree();

        let node = (0..tree.len())
            .filter(|&n| tree.tag(n) == Tag::Identifier && tree.text(n, source) == at)
            .max_by_key(|&n| tree.span(n).start)
            .expect("query identifier not found");

        let mut symbols = Vec::new();
        visible_symbols(document, node, &mut symbols);
        symbols.iter().map(|s| s.name().to_string()).collect()
    }

    #[test]
    fn locals_come_before_globals_in_reverse_source_order() {
        let names = visible_names(
            "int g = 0; void main() { int a = 1; int b = 2; b; }",
            "b",
        );
        let a = names.iter().position(|n| n == "a").unwrap();
        let b = names.iter().position(|n| n == "b").unwrap();
        let g = names.iter().position(|n| n == "g").unwrap();
        assert!(b < a, "{names:?}");
        assert!(a < g, "{names:?}");
    }

    #[test]
    fn block_contents_are_invisible_from_outside() {
        let names = visible_names(
            "void main() { { int hidden = 1; } int after = 2; after; }",
            "after",
        );
        assert!(!names.contains(&"hidden".to_string()), "{names:?}");
    }

    #[test]
    fn identifier_initializers_are_not_declared() {
        let names = visible_names("float x = 1.0; void main() { int y = x; x; }", "x");
        // One `x`: the global. The `x` inside `int y = x;` is a use, not a
        // declarator.
        assert_eq!(names.iter().filter(|name| *name == "x").count(), 1);
    }

    #[test]
    fn later_siblings_are_not_visible() {
        let names = visible_names(
            "void main() { int before = 1; before; int after = 2; }",
            "before",
        );
        assert!(names.contains(&"before".to_string()), "{names:?}");
        assert!(!names.contains(&"after".to_string()), "{names:?}");
    }
}
