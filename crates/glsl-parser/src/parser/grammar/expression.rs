use crate::parser::grammar::ty;
use crate::parser::Parser;
use crate::Tag;
use crate::T;

/// *Expression*: assignment expressions joined by the comma operator.
pub(crate) fn expression(p: &mut Parser) {
    let checkpoint = p.checkpoint_node();
    assignment(p);
    if p.at(T![,]) {
        let _g = checkpoint.wrap_node(Tag::ExpressionSequence);
        while p.eat(T![,]) {
            assignment(p);
        }
    }
}

/// *AssignmentExpression*: right-associative over the assignment operator
/// family.
pub(crate) fn assignment(p: &mut Parser) {
    let checkpoint = p.checkpoint_node();
    conditional(p);
    if matches!(p.peek(), Some(tag) if tag.is_assignment_op()) {
        let _g = checkpoint.wrap_node(Tag::Assignment);
        p.bump();
        assignment(p);
    }
}

/// *ConditionalExpression*: `condition ? consequent : alternate`
pub(crate) fn conditional(p: &mut Parser) {
    let checkpoint = p.checkpoint_node();
    binary(p, 0);
    if p.at(T![?]) {
        let _g = checkpoint.wrap_node(Tag::Conditional);
        p.bump();
        expression(p);
        p.expect(T![:]);
        assignment(p);
    }
}

fn precedence(tag: Tag) -> Option<u8> {
    let precedence = match tag {
        T![||] => 1,
        T![^^] => 2,
        T![&&] => 3,
        T![|] => 4,
        T![^] => 5,
        T![&] => 6,
        T![==] | T![!=] => 7,
        T![<] | T![>] | T![<=] | T![>=] => 8,
        T![<<] | T![>>] => 9,
        T![+] | T![-] => 10,
        T![*] | T![/] | T![%] => 11,
        _ => return None,
    };
    Some(precedence)
}

/// Precedence climbing over the infix operator family. Re-wrapping the same
/// checkpoint builds the left-associative chain.
fn binary(p: &mut Parser, min_precedence: u8) {
    let checkpoint = p.checkpoint_node();
    unary(p);
    while let Some(precedence) = p.peek().and_then(precedence) {
        if precedence < min_precedence {
            break;
        }
        let _g = checkpoint.wrap_node(Tag::Infix);
        p.bump();
        binary(p, precedence + 1);
    }
}

fn unary(p: &mut Parser) {
    if p.recursion_limit.check_and_increment() {
        p.limit_err("parser recursion limit reached");
        p.err_invalid("expression nests too deeply");
        return;
    }
    match p.peek() {
        Some(tag) if tag.is_prefix_op() => {
            let _g = p.start_node(Tag::Prefix);
            p.bump();
            unary(p);
        }
        _ => postfix(p),
    }
    p.recursion_limit.decrement();
}

fn postfix(p: &mut Parser) {
    let checkpoint = p.checkpoint_node();
    primary(p);
    loop {
        match p.peek() {
            Some(T!['(']) => {
                let _g = checkpoint.wrap_node(Tag::Call);
                arguments_list(p);
            }
            Some(T!['[']) => {
                let _g = checkpoint.wrap_node(Tag::ArraySpecifier);
                while p.at(T!['[']) {
                    ty::array(p);
                }
            }
            Some(T![.]) => {
                let _g = checkpoint.wrap_node(Tag::Selection);
                p.bump();
                if !p.eat(T![ident]) {
                    p.err("expected a field name after `.`");
                }
            }
            Some(T![++]) | Some(T![--]) => {
                let _g = checkpoint.wrap_node(Tag::Postfix);
                p.bump();
            }
            _ => break,
        }
    }
}

fn primary(p: &mut Parser) {
    match p.peek() {
        Some(T![ident]) | Some(T![number]) => p.bump(),
        Some(T!['(']) => {
            let _g = p.start_node(Tag::Parenthized);
            p.bump();
            expression(p);
            p.expect(T![')']);
        }
        // Never consume a closing token here; the enclosing production
        // still needs it.
        Some(T![')']) | Some(T![']']) | Some(T!['}']) | Some(T![;]) | Some(T![,]) | None => {
            p.err("expected an expression")
        }
        Some(_) => p.err_invalid("expected an expression"),
    }
}

/// *ArgumentsList*: **(** arguments **)**, each argument its own node.
fn arguments_list(p: &mut Parser) {
    let _g = p.start_node(Tag::ArgumentsList);
    p.bump();
    while !p.at(T![')']) && p.peek().is_some() {
        let before = p.consumed();
        {
            let _g = p.start_node(Tag::Argument);
            assignment(p);
        }
        p.eat(T![,]);
        if p.consumed() == before {
            p.err_and_bump("expected an argument");
        }
    }
    p.expect(T![')']);
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::{Parser, Tag};

    /// Parse `source` inside a statement and return the parse plus the
    /// expression node (first child of the statement).
    fn expr(source: &str) -> (crate::ParsedTree, u32) {
        let wrapped = format!("void main() {{ {source}; }}");
        let parsed = Parser::new(&wrapped).parse();
        assert!(parsed.errors().is_empty(), "{:?}", parsed.errors());
        let node = {
            let tree = parsed.tree();
            let function = tree.children(tree.root()).next().unwrap();
            let block = tree
                .children(function)
                .find(|&n| tree.tag(n) == Tag::Block)
                .unwrap();
            let statement = tree
                .children(block)
                .find(|&n| tree.tag(n) == Tag::Statement)
                .unwrap();
            tree.children(statement).next().unwrap()
        };
        (parsed, node)
    }

    #[test]
    fn infix_chains_are_left_associative() {
        let (parsed, node) = expr("a - b - c");
        let tree = parsed.tree();
        assert_eq!(tree.tag(node), Tag::Infix);
        let kinds: Vec<Tag> = tree.children(node).map(|n| tree.tag(n)).collect();
        assert_eq!(kinds, vec![Tag::Infix, Tag::Minus, Tag::Identifier]);
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let (parsed, node) = expr("a + b * c");
        let tree = parsed.tree();
        assert_eq!(tree.tag(node), Tag::Infix);
        let kinds: Vec<Tag> = tree.children(node).map(|n| tree.tag(n)).collect();
        assert_eq!(kinds, vec![Tag::Identifier, Tag::Plus, Tag::Infix]);
    }

    #[test]
    fn assignment_is_right_associative() {
        let (parsed, node) = expr("a = b = c");
        let tree = parsed.tree();
        assert_eq!(tree.tag(node), Tag::Assignment);
        let kinds: Vec<Tag> = tree.children(node).map(|n| tree.tag(n)).collect();
        assert_eq!(kinds, vec![Tag::Identifier, Tag::Equal, Tag::Assignment]);
    }

    #[test]
    fn calls_wrap_their_callee() {
        let (parsed, node) = expr("texture(sampler, uv).rgb");
        let tree = parsed.tree();
        assert_eq!(tree.tag(node), Tag::Selection);
        let call = tree.children(node).next().unwrap();
        assert_eq!(tree.tag(call), Tag::Call);
        let kinds: Vec<Tag> = tree.children(call).map(|n| tree.tag(n)).collect();
        assert_eq!(kinds, vec![Tag::Identifier, Tag::ArgumentsList]);

        let arguments = tree.children(call).nth(1).unwrap();
        let argument_count = tree
            .children(arguments)
            .filter(|&n| tree.tag(n) == Tag::Argument)
            .count();
        assert_eq!(argument_count, 2);
    }

    #[test]
    fn indexing_reuses_the_array_specifier_shape() {
        let (parsed, node) = expr("weights[i][j] = 0.5");
        let tree = parsed.tree();
        assert_eq!(tree.tag(node), Tag::Assignment);
        let target = tree.children(node).next().unwrap();
        assert_eq!(tree.tag(target), Tag::ArraySpecifier);
        let kinds: Vec<Tag> = tree.children(target).map(|n| tree.tag(n)).collect();
        assert_eq!(kinds, vec![Tag::Identifier, Tag::Array, Tag::Array]);
    }

    #[test]
    fn conditional_and_sequence_expressions() {
        let (parsed, node) = expr("a ? b : c");
        let tree = parsed.tree();
        assert_eq!(tree.tag(node), Tag::Conditional);

        let (parsed, node) = expr("a++, --b");
        let tree = parsed.tree();
        assert_eq!(tree.tag(node), Tag::ExpressionSequence);
        let kinds: Vec<Tag> = tree.children(node).map(|n| tree.tag(n)).collect();
        assert_eq!(kinds, vec![Tag::Postfix, Tag::Comma, Tag::Prefix]);
    }

    #[test]
    fn an_unexpected_operator_becomes_an_invalid_node() {
        let wrapped = "void main() { x = * 2; }";
        let parsed = Parser::new(wrapped).parse();
        assert!(!parsed.errors().is_empty());
        let tree = parsed.tree();
        let has_invalid = (0..tree.len()).any(|n| tree.tag(n) == Tag::Invalid);
        assert!(has_invalid, "{parsed:?}");
    }
}
