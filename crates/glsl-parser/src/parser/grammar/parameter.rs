use crate::parser::grammar::{qualifier, ty};
use crate::parser::Parser;
use crate::Tag;
use crate::T;

/// *ParameterList*: **(** parameters **)**, commas between parameters.
pub(crate) fn parameter_list(p: &mut Parser) {
    let _g = p.start_node(Tag::ParameterList);
    p.bump();
    while !p.at(T![')']) && p.peek().is_some() {
        let before = p.consumed();
        parameter(p);
        p.eat(T![,]);
        if p.consumed() == before {
            p.err_and_bump("expected a parameter");
        }
    }
    p.expect(T![')']);
}

/// *Parameter*: qualifiers? specifier declarator?
///
/// The declared name, when present, is wrapped in a `variable_declaration`
/// just like any other declarator, so the scope resolver picks it up through
/// the same rule.
fn parameter(p: &mut Parser) {
    let _g = p.start_node(Tag::Parameter);
    qualifier::type_qualifier_list(p);
    match p.peek() {
        Some(T![ident]) | Some(T![struct]) => ty::type_specifier(p),
        _ => {
            p.err("expected a parameter type");
            return;
        }
    }
    if p.at(T![ident]) {
        let _g = p.start_node(Tag::VariableDeclaration);
        ty::variable_name(p);
    }
}
