use crate::parser::grammar::expression;
use crate::parser::Parser;
use crate::Tag;
use crate::T;

/// Whether the current token can begin a type qualifier list.
pub(crate) fn at_qualifier(p: &Parser) -> bool {
    matches!(p.peek(), Some(tag) if tag.is_qualifier_keyword() || tag == T![layout])
}

/// *TypeQualifierList*: one or more qualifier keywords or layout qualifiers,
/// e.g. `layout(location = 1) uniform`. Produces no node when the source has
/// no qualifier, so the slot stays absent in extracted declarations.
pub(crate) fn type_qualifier_list(p: &mut Parser) -> bool {
    if !at_qualifier(p) {
        return false;
    }
    let _g = p.start_node(Tag::TypeQualifierList);
    loop {
        match p.peek() {
            Some(tag) if tag.is_qualifier_keyword() => p.bump(),
            Some(T![layout]) => layout_qualifier(p),
            _ => break,
        }
    }
    true
}

/// *LayoutQualifier*: **layout** **(** layout-qualifier-ids **)**
fn layout_qualifier(p: &mut Parser) {
    let _g = p.start_node(Tag::LayoutQualifier);
    p.bump();
    if p.at(T!['(']) {
        layout_qualifiers_list(p);
    } else {
        p.err("expected `(` after `layout`");
    }
}

/// Each qualifier id is either a bare identifier (`std140`) or an
/// assignment (`location = 1`); the expression grammar covers both.
fn layout_qualifiers_list(p: &mut Parser) {
    let _g = p.start_node(Tag::LayoutQualifiersList);
    p.bump();
    while !p.at(T![')']) && p.peek().is_some() {
        let before = p.consumed();
        expression::assignment(p);
        p.eat(T![,]);
        if p.consumed() == before {
            p.err_and_bump("expected a layout qualifier");
        }
    }
    p.expect(T![')']);
}
