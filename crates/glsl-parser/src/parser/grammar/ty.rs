use crate::parser::grammar::{declaration, expression};
use crate::parser::Parser;
use crate::Tag;
use crate::T;

/// *TypeSpecifier*: a plain type name, an arrayed type name, or a struct
/// specifier:
///
/// ```glsl
/// vec4
/// float[2]
/// struct Light { vec3 position; }
/// ```
///
/// Type names are ordinary identifiers; the built-in types are not keywords.
pub(crate) fn type_specifier(p: &mut Parser) {
    match p.peek() {
        Some(T![struct]) => struct_specifier(p),
        Some(T![ident]) => {
            let checkpoint = p.checkpoint_node();
            p.bump();
            if p.at(T!['[']) {
                let _g = checkpoint.wrap_node(Tag::ArraySpecifier);
                while p.at(T!['[']) {
                    array(p);
                }
            }
        }
        _ => p.err("expected a type specifier"),
    }
}

/// *StructSpecifier*: **struct** identifier? **{** field declarations **}**
pub(crate) fn struct_specifier(p: &mut Parser) {
    let _g = p.start_node(Tag::StructSpecifier);
    p.bump();
    if p.at(T![ident]) {
        p.bump();
    }
    if p.at(T!['{']) {
        field_declaration_list(p);
    } else {
        p.err("expected `{` in a struct specifier");
    }
}

/// *FieldDeclarationList*: the braced body of a struct specifier or an
/// interface block. Fields are plain declarations.
pub(crate) fn field_declaration_list(p: &mut Parser) {
    let _g = p.start_node(Tag::FieldDeclarationList);
    p.bump();
    while !p.at(T!['}']) && p.peek().is_some() {
        let before = p.consumed();
        declaration::declaration(p);
        if p.consumed() == before {
            p.err_and_bump("expected a field declaration");
        }
    }
    p.expect(T!['}']);
}

/// *Array*: **[** constant-expression? **]**
pub(crate) fn array(p: &mut Parser) {
    let _g = p.start_node(Tag::Array);
    p.bump();
    if !p.at(T![']']) {
        expression::conditional(p);
    }
    p.expect(T![']']);
}

/// A declared name with optional trailing dimensions. `x` stays a bare
/// identifier; `x[3]` becomes an array specifier wrapping the identifier and
/// one `array` node per dimension.
pub(crate) fn variable_name(p: &mut Parser) {
    let checkpoint = p.checkpoint_node();
    if !p.eat(T![ident]) {
        p.err("expected a variable name");
        return;
    }
    if p.at(T!['[']) {
        let _g = checkpoint.wrap_node(Tag::ArraySpecifier);
        while p.at(T!['[']) {
            array(p);
        }
    }
}

#[cfg(test)]
mod test {
    use crate::{Parser, Tag};

    #[test]
    fn it_parses_arrayed_variable_names() {
        let source = "float weights[4][2];";
        let parsed = Parser::new(source).parse();
        assert!(parsed.errors().is_empty(), "{:?}", parsed.errors());

        let tree = parsed.tree();
        let declaration = tree.children(tree.root()).next().unwrap();
        let list = tree
            .children(declaration)
            .find(|&n| tree.tag(n) == Tag::VariableDeclarationList)
            .unwrap();
        let variable = tree.children(list).next().unwrap();
        assert_eq!(tree.tag(variable), Tag::VariableDeclaration);

        let name = tree.children(variable).next().unwrap();
        assert_eq!(tree.tag(name), Tag::ArraySpecifier);
        let kinds: Vec<Tag> = tree.children(name).map(|n| tree.tag(n)).collect();
        assert_eq!(kinds, vec![Tag::Identifier, Tag::Array, Tag::Array]);
    }

    #[test]
    fn it_parses_struct_specifiers_with_fields() {
        let source = "struct Light { vec3 position; float intensity; };";
        let parsed = Parser::new(source).parse();
        assert!(parsed.errors().is_empty(), "{:?}", parsed.errors());

        let tree = parsed.tree();
        let declaration = tree.children(tree.root()).next().unwrap();
        assert_eq!(tree.tag(declaration), Tag::Declaration);

        let spec = tree.children(declaration).next().unwrap();
        assert_eq!(tree.tag(spec), Tag::StructSpecifier);
        let kinds: Vec<Tag> = tree.children(spec).map(|n| tree.tag(n)).collect();
        assert_eq!(
            kinds,
            vec![Tag::KeywordStruct, Tag::Identifier, Tag::FieldDeclarationList]
        );

        let fields = tree
            .children(spec)
            .find(|&n| tree.tag(n) == Tag::FieldDeclarationList)
            .unwrap();
        let declarations: Vec<Tag> = tree.children(fields).map(|n| tree.tag(n)).collect();
        assert_eq!(
            declarations,
            vec![Tag::LBrace, Tag::Declaration, Tag::Declaration, Tag::RBrace]
        );
    }
}
