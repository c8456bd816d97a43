use super::{match_fields, Lazy, ListIter, Syntax};
use glsl_parser::{NodeIndex, Tag, Tree};

token_schema!(
    /// A single `identifier` token. Type names, variable names and field
    /// names are all plain identifiers; the built-in types are not keywords.
    Identifier,
    Tag::Identifier
);
token_schema!(Number, Tag::Number);
token_schema!(Equal, Tag::Equal);
token_schema!(Semicolon, Tag::Semicolon);
token_schema!(StructKeyword, Tag::KeywordStruct);

node_schema!(
    /// A `type_qualifier_list` subtree. The analyzer never projects
    /// individual qualifiers; the list is rendered wholesale.
    QualifierList,
    Tag::TypeQualifierList
);
node_schema!(
    /// One `[expr]` or `[]` dimension.
    Array,
    Tag::Array
);
node_schema!(
    /// An identifier or expression with trailing `array` dimensions,
    /// either a declared name (`x[3]`) or an indexing expression (`a[i]`).
    ArraySpecifier,
    Tag::ArraySpecifier
);
node_schema!(Infix, Tag::Infix);
node_schema!(Prefix, Tag::Prefix);
node_schema!(Postfix, Tag::Postfix);
node_schema!(Conditional, Tag::Conditional);
node_schema!(
    /// Field selection, `expr.field`.
    Selection,
    Tag::Selection
);
node_schema!(Assignment, Tag::Assignment);
node_schema!(Parenthized, Tag::Parenthized);
node_schema!(ExpressionSequence, Tag::ExpressionSequence);
node_schema!(InitializerList, Tag::InitializerList);

union_schema!(
    /// A declared name: a bare identifier, or an identifier with array
    /// dimensions attached.
    VariableName {
        Identifier(Identifier),
        Arrayed(ArraySpecifier),
    }
);

union_schema!(
    /// The base type of a declaration.
    TypeSpecifier {
        Identifier(Identifier),
        Arrayed(ArraySpecifier),
        Struct(StructSpecifier),
    }
);

union_schema!(
    /// Any expression production. Recursive positions go through [`Lazy`],
    /// so building one of these never walks the tree.
    Expression {
        Identifier(Identifier),
        Number(Number),
        Call(Call),
        ArraySpecifier(ArraySpecifier),
        Selection(Selection),
        Infix(Infix),
        Prefix(Prefix),
        Postfix(Postfix),
        Conditional(Conditional),
        Assignment(Assignment),
        Sequence(ExpressionSequence),
        Parenthized(Parenthized),
        InitializerList(InitializerList),
    }
);

extractor!(
    /// A function call: the callee expression followed by its arguments.
    Call(Tag::Call) {
        callee: Lazy<Expression>,
        arguments: ArgumentsList,
    }
);

extractor!(
    Argument(Tag::Argument) {
        expression: Lazy<Expression>,
    }
);

list_schema!(
    ArgumentsList(Tag::ArgumentsList) {
        prefix: Some(Tag::LParen),
        item: Argument,
        suffix: Some(Tag::RParen),
    }
);

list_schema!(
    ParameterList(Tag::ParameterList) {
        prefix: Some(Tag::LParen),
        item: Parameter,
        suffix: Some(Tag::RParen),
    }
);

list_schema!(
    /// The braced field list of a struct specifier or interface block.
    FieldList(Tag::FieldDeclarationList) {
        prefix: Some(Tag::LBrace),
        item: Declaration,
        suffix: Some(Tag::RBrace),
    }
);

list_schema!(
    VariableDeclarationList(Tag::VariableDeclarationList) {
        prefix: None,
        item: VariableDeclaration,
        suffix: None,
    }
);

extractor!(
    /// One declarator: the declared name, optionally `= initializer`.
    VariableDeclaration(Tag::VariableDeclaration) {
        name: VariableName,
        equal: Equal,
        initializer: Lazy<Expression>,
    }
);

extractor!(
    /// A plain declaration: `qualifiers? specifier declarators? ;`.
    ///
    /// Used for globals, locals, struct fields and interface block fields
    /// alike.
    Declaration(Tag::Declaration) {
        qualifiers: QualifierList,
        specifier: TypeSpecifier,
        variables: VariableDeclarationList,
        semicolon: Semicolon,
    }
);

extractor!(
    StructSpecifier(Tag::StructSpecifier) {
        keyword: StructKeyword,
        name: Identifier,
        fields: FieldList,
    }
);

extractor!(
    /// One function parameter. The declared name, when present, sits in a
    /// nested `variable_declaration` like any other declarator.
    Parameter(Tag::Parameter) {
        qualifiers: QualifierList,
        specifier: TypeSpecifier,
        variable: VariableDeclaration,
    }
);

extractor!(
    FunctionDeclaration(Tag::FunctionDeclaration) {
        qualifiers: QualifierList,
        specifier: TypeSpecifier,
        name: Identifier,
        parameters: ParameterList,
    }
);

extractor!(
    /// An interface block: `qualifiers Name { fields } instance?;`.
    /// Both the field names and the instance name are globally visible.
    BlockDeclaration(Tag::BlockDeclaration) {
        qualifiers: QualifierList,
        specifier: Identifier,
        fields: FieldList,
        variable: VariableDeclaration,
        semicolon: Semicolon,
    }
);

/// Dispatch union over everything a reference's parent declaration can be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnyDeclaration {
    Function(FunctionDeclaration),
    Struct(StructSpecifier),
    Variable(Declaration),
    Block(BlockDeclaration),
    Parameter(Parameter),
}

impl AnyDeclaration {
    pub fn try_extract(tree: &Tree, node: NodeIndex) -> Option<Self> {
        match tree.tag(node) {
            Tag::FunctionDeclaration => {
                FunctionDeclaration::try_extract(tree, node).map(Self::Function)
            }
            Tag::StructSpecifier => StructSpecifier::try_extract(tree, node).map(Self::Struct),
            Tag::Declaration => Declaration::try_extract(tree, node).map(Self::Variable),
            Tag::BlockDeclaration => BlockDeclaration::try_extract(tree, node).map(Self::Block),
            Tag::Parameter => Parameter::try_extract(tree, node).map(Self::Parameter),
            // A reference can point at a bare declarator when the scope walk
            // started inside its declarator list; the declared type lives on
            // the enclosing declaration.
            Tag::VariableDeclaration => {
                let mut parent = tree.parent(node)?;
                if tree.tag(parent) == Tag::VariableDeclarationList {
                    parent = tree.parent(parent)?;
                }
                match tree.tag(parent) {
                    Tag::Declaration | Tag::Parameter | Tag::BlockDeclaration => {
                        Self::try_extract(tree, parent)
                    }
                    _ => None,
                }
            }
            _ => None,
        }
    }
}
