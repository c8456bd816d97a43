pub(crate) mod declaration;
pub(crate) mod expression;
pub(crate) mod parameter;
pub(crate) mod qualifier;
pub(crate) mod statement;
pub(crate) mod ty;

use crate::parser::Parser;
use crate::Tag;

/// *TranslationUnit*: the `file` root node, a sequence of external
/// declarations. Whole-file scope: the resolver treats every child as
/// visible everywhere in the file.
pub(crate) fn file(p: &mut Parser) {
    let _g = p.start_node(Tag::File);
    while p.peek().is_some() {
        let before = p.consumed();
        declaration::external_declaration(p);
        if p.consumed() == before {
            p.err_and_bump("expected a declaration");
        }
    }
}
