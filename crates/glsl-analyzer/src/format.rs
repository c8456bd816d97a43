//! Single-line rendering of subtrees, used by the type formatter.

use std::fmt::{self, Write};

use glsl_parser::{NodeIndex, Tag, Tree};

/// Displays the tokens of the subtree at `node` on one line: single spaces
/// between tokens, none around tightly binding punctuation. Recovery nodes
/// are omitted. Pure over the immutable tree, so rendering twice yields
/// byte-identical output.
pub fn single_line<'a>(tree: &'a Tree, node: NodeIndex, source: &'a str) -> SingleLine<'a> {
    SingleLine { tree, node, source }
}

pub struct SingleLine<'a> {
    tree: &'a Tree,
    node: NodeIndex,
    source: &'a str,
}

impl fmt::Display for SingleLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut previous = None;
        write_tokens(f, self.tree, self.node, self.source, &mut previous)
    }
}

fn write_tokens(
    f: &mut fmt::Formatter<'_>,
    tree: &Tree,
    node: NodeIndex,
    source: &str,
    previous: &mut Option<Tag>,
) -> fmt::Result {
    let tag = tree.tag(node);
    if tag.is_recovery() {
        return Ok(());
    }
    if let Some(span) = tree.token(node) {
        if let Some(previous) = *previous {
            if needs_space(previous, tag) {
                f.write_char(' ')?;
            }
        }
        f.write_str(span.text(source))?;
        *previous = Some(tag);
        return Ok(());
    }
    for child in tree.children(node) {
        write_tokens(f, tree, child, source, previous)?;
    }
    Ok(())
}

fn needs_space(previous: Tag, current: Tag) -> bool {
    !matches!(previous, Tag::LParen | Tag::LBracket | Tag::Dot)
        && !matches!(
            current,
            Tag::LParen
                | Tag::LBracket
                | Tag::RParen
                | Tag::RBracket
                | Tag::Dot
                | Tag::Comma
                | Tag::Semicolon
        )
}
