use crate::parser::grammar::{expression, parameter, qualifier, statement, ty};
use crate::parser::Parser;
use crate::Tag;
use crate::T;

/// Everything that can appear at file scope: functions, variable and struct
/// declarations, interface blocks.
pub(crate) fn external_declaration(p: &mut Parser) {
    match p.peek() {
        None => {}
        Some(T![;]) => {
            // A stray semicolon is an empty declaration.
            let _g = p.start_node(Tag::Declaration);
            p.bump();
        }
        Some(T![struct]) | Some(T![ident]) => declaration_or_function(p),
        Some(tag) if tag.is_qualifier_keyword() || tag == T![layout] => {
            declaration_or_function(p)
        }
        Some(_) => p.err_and_bump("expected a declaration"),
    }
}

/// Qualifiers first, then disambiguate on what follows: a name directly
/// followed by `{` is an interface block, a specifier followed by
/// `name (` is a function, anything else is a plain declaration.
fn declaration_or_function(p: &mut Parser) {
    let checkpoint = p.checkpoint_node();
    qualifier::type_qualifier_list(p);

    match p.peek() {
        Some(T![ident]) if p.peek_n(1) == Some(T!['{']) => {
            // *BlockDeclaration*:
            //     qualifiers name **{** fields **}** instance-name? **;**
            let _g = checkpoint.wrap_node(Tag::BlockDeclaration);
            p.bump();
            ty::field_declaration_list(p);
            if p.at(T![ident]) {
                let _g = p.start_node(Tag::VariableDeclaration);
                ty::variable_name(p);
            }
            p.expect(T![;]);
        }
        Some(T![ident]) | Some(T![struct]) => {
            ty::type_specifier(p);
            if p.at(T![ident]) && p.peek_n(1) == Some(T!['(']) {
                // *FunctionDeclaration*:
                //     qualifiers? specifier name parameter-list (block | **;**)
                let _g = checkpoint.wrap_node(Tag::FunctionDeclaration);
                p.bump();
                parameter::parameter_list(p);
                if p.at(T!['{']) {
                    statement::block(p);
                } else {
                    p.expect(T![;]);
                }
            } else {
                let _g = checkpoint.wrap_node(Tag::Declaration);
                if p.at(T![ident]) {
                    variable_declaration_list(p);
                }
                p.expect(T![;]);
            }
        }
        // Qualifiers with nothing to qualify, e.g. `precise;`.
        _ => {
            let _g = checkpoint.wrap_node(Tag::Declaration);
            p.expect(T![;]);
        }
    }
}

/// *Declaration*: qualifiers? specifier declarators? **;**
///
/// Used everywhere a declaration cannot be a function: statement position,
/// struct fields, interface block fields, `for` initializers. Only call
/// after [`starts_declaration`] accepted the lookahead.
pub(crate) fn declaration(p: &mut Parser) {
    let _g = p.start_node(Tag::Declaration);
    qualifier::type_qualifier_list(p);
    match p.peek() {
        Some(T![ident]) | Some(T![struct]) => {
            ty::type_specifier(p);
            if p.at(T![ident]) {
                variable_declaration_list(p);
            }
            p.expect(T![;]);
        }
        Some(T![;]) => p.bump(),
        _ => p.err("expected a declaration"),
    }
}

/// A declaration starts here if the token is a qualifier, `layout`,
/// `struct`, or a type name followed by another identifier. A lone
/// identifier is an expression; so is `a[0] = ...`, which means arrayed
/// specifiers (`float[2] x;`) are not recognized in statement position.
pub(crate) fn starts_declaration(p: &Parser) -> bool {
    match p.peek() {
        Some(T![layout]) | Some(T![struct]) => true,
        Some(T![ident]) => p.peek_n(1) == Some(T![ident]),
        Some(tag) => tag.is_qualifier_keyword(),
        None => false,
    }
}

/// *VariableDeclarationList*: declarator (**,** declarator)*
pub(crate) fn variable_declaration_list(p: &mut Parser) {
    let _g = p.start_node(Tag::VariableDeclarationList);
    variable_declaration(p);
    while p.eat(T![,]) {
        let before = p.consumed();
        variable_declaration(p);
        if p.consumed() == before {
            break;
        }
    }
}

/// *VariableDeclaration*: name dimensions? (**=** initializer)?
pub(crate) fn variable_declaration(p: &mut Parser) {
    let _g = p.start_node(Tag::VariableDeclaration);
    ty::variable_name(p);
    if p.eat(T![=]) {
        initializer(p);
    }
}

fn initializer(p: &mut Parser) {
    if p.at(T!['{']) {
        initializer_list(p);
    } else {
        expression::assignment(p);
    }
}

/// *InitializerList*: **{** initializers **}**, trailing comma allowed.
fn initializer_list(p: &mut Parser) {
    let _g = p.start_node(Tag::InitializerList);
    p.bump();
    while !p.at(T!['}']) && p.peek().is_some() {
        let before = p.consumed();
        initializer(p);
        p.eat(T![,]);
        if p.consumed() == before {
            p.err_and_bump("expected an initializer");
        }
    }
    p.expect(T!['}']);
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::{Parser, Tag};

    #[test]
    fn it_parses_functions_and_declarations_at_file_scope() {
        let parsed = Parser::new("uniform vec4 color; void main() {}").parse();
        assert!(parsed.errors().is_empty(), "{:?}", parsed.errors());

        let tree = parsed.tree();
        let kinds: Vec<Tag> = tree.children(tree.root()).map(|n| tree.tag(n)).collect();
        assert_eq!(kinds, vec![Tag::Declaration, Tag::FunctionDeclaration]);
    }

    #[test]
    fn it_parses_function_prototypes() {
        let parsed = Parser::new("float brightness(vec3 color);").parse();
        assert!(parsed.errors().is_empty(), "{:?}", parsed.errors());

        let tree = parsed.tree();
        let function = tree.children(tree.root()).next().unwrap();
        assert_eq!(tree.tag(function), Tag::FunctionDeclaration);
        let kinds: Vec<Tag> = tree.children(function).map(|n| tree.tag(n)).collect();
        assert_eq!(
            kinds,
            vec![Tag::Identifier, Tag::Identifier, Tag::ParameterList, Tag::Semicolon]
        );
    }

    #[test]
    fn it_parses_multiple_declarators() {
        let source = "int x = 1, y, z = x;";
        let parsed = Parser::new(source).parse();
        assert!(parsed.errors().is_empty(), "{:?}", parsed.errors());

        let tree = parsed.tree();
        let declaration = tree.children(tree.root()).next().unwrap();
        let list = tree
            .children(declaration)
            .find(|&n| tree.tag(n) == Tag::VariableDeclarationList)
            .unwrap();
        let declarators: Vec<Tag> = tree
            .children(list)
            .map(|n| tree.tag(n))
            .filter(|&tag| tag == Tag::VariableDeclaration)
            .collect();
        assert_eq!(declarators.len(), 3);
    }

    #[test]
    fn it_parses_interface_blocks() {
        let source = "layout(std140) uniform Matrices { mat4 projection; } matrices;";
        let parsed = Parser::new(source).parse();
        assert!(parsed.errors().is_empty(), "{:?}", parsed.errors());

        let tree = parsed.tree();
        let block = tree.children(tree.root()).next().unwrap();
        assert_eq!(tree.tag(block), Tag::BlockDeclaration);
        let kinds: Vec<Tag> = tree.children(block).map(|n| tree.tag(n)).collect();
        assert_eq!(
            kinds,
            vec![
                Tag::TypeQualifierList,
                Tag::Identifier,
                Tag::FieldDeclarationList,
                Tag::VariableDeclaration,
                Tag::Semicolon,
            ]
        );
    }

    #[test]
    fn it_recovers_from_garbage_between_declarations() {
        let parsed = Parser::new("int a; ) int b;").parse();
        assert_eq!(parsed.errors().len(), 1);

        let tree = parsed.tree();
        let kinds: Vec<Tag> = tree.children(tree.root()).map(|n| tree.tag(n)).collect();
        assert_eq!(kinds, vec![Tag::Declaration, Tag::Unknown, Tag::Declaration]);
    }
}
