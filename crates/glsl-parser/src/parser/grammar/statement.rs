use crate::parser::grammar::{declaration, expression};
use crate::parser::Parser;
use crate::Tag;
use crate::T;

/// *CompoundStatement*: **{** statements **}**
///
/// A scope barrier: the resolver never descends into a `block` from outside,
/// so names declared here stay invisible to enclosing scopes.
pub(crate) fn block(p: &mut Parser) {
    let _g = p.start_node(Tag::Block);
    p.bump();
    while !p.at(T!['}']) && p.peek().is_some() {
        let before = p.consumed();
        statement_or_declaration(p);
        if p.consumed() == before {
            p.err_and_bump("expected a statement");
        }
    }
    p.expect(T!['}']);
}

/// Declarations stay direct children of their scope so the sibling walk can
/// see them; control flow and expressions are wrapped in a `statement` node,
/// which shields anything declared further in from the outside.
pub(crate) fn statement_or_declaration(p: &mut Parser) {
    if p.recursion_limit.check_and_increment() {
        p.limit_err("parser recursion limit reached");
        return;
    }
    match p.peek() {
        Some(T!['{']) => block(p),
        _ if declaration::starts_declaration(p) => declaration::declaration(p),
        _ => statement(p),
    }
    p.recursion_limit.decrement();
}

fn statement(p: &mut Parser) {
    let _g = p.start_node(Tag::Statement);
    match p.peek() {
        Some(T![if]) => {
            p.bump();
            condition_list(p);
            statement_or_declaration(p);
            if p.eat(T![else]) {
                statement_or_declaration(p);
            }
        }
        Some(T![while]) => {
            p.bump();
            condition_list(p);
            statement_or_declaration(p);
        }
        Some(T![do]) => {
            p.bump();
            statement_or_declaration(p);
            p.expect(T![while]);
            condition_list(p);
            p.expect(T![;]);
        }
        Some(T![for]) => {
            p.bump();
            condition_list(p);
            statement_or_declaration(p);
        }
        Some(T![switch]) => {
            p.bump();
            condition_list(p);
            statement_or_declaration(p);
        }
        Some(T![case]) => {
            p.bump();
            expression::conditional(p);
            p.expect(T![:]);
        }
        Some(T![default]) => {
            p.bump();
            p.expect(T![:]);
        }
        Some(T![return]) => {
            p.bump();
            if !p.at(T![;]) {
                expression::expression(p);
            }
            p.expect(T![;]);
        }
        Some(T![break]) | Some(T![continue]) | Some(T![discard]) => {
            p.bump();
            p.expect(T![;]);
        }
        Some(T![;]) => p.bump(),
        _ => {
            expression::expression(p);
            p.expect(T![;]);
        }
    }
}

/// *ConditionList*: the parenthesized head of `if`/`while`/`for`/`switch`.
///
/// Deliberately loose: a `for` init declaration, its condition and its
/// increment all land here as siblings, the declaration with its own
/// terminating `;`. That keeps loop variables visible to the loop body
/// through the ordinary sibling walk.
pub(crate) fn condition_list(p: &mut Parser) {
    let _g = p.start_node(Tag::ConditionList);
    if !p.eat(T!['(']) {
        p.err("expected `(`");
        return;
    }
    while !p.at(T![')']) && p.peek().is_some() {
        let before = p.consumed();
        if declaration::starts_declaration(p) {
            declaration::declaration(p);
        } else if p.at(T![;]) {
            p.bump();
        } else {
            expression::expression(p);
        }
        if p.consumed() == before {
            p.err_and_bump("expected an expression");
        }
    }
    p.expect(T![')']);
}
