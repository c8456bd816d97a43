use super::{Array, ArraySpecifier, Identifier, ListIter, Parameter, Syntax, VariableName};
use glsl_parser::Tree;

impl ArraySpecifier {
    /// The declared identifier when this is a name with dimensions
    /// (`x[3]`), `None` for computed bases (`a.b[i]`).
    pub fn identifier(&self, tree: &Tree) -> Option<Identifier> {
        let first = tree
            .children(self.node())
            .find(|&child| !tree.tag(child).is_recovery())?;
        Identifier::try_extract(tree, first)
    }

    /// The `array` dimension nodes, in source order.
    pub fn arrays<'t>(&self, tree: &'t Tree) -> ListIter<'t, Array> {
        ListIter::new(tree, tree.children(self.node()))
    }
}

impl VariableName {
    /// The declaring identifier token itself.
    pub fn identifier(&self, tree: &Tree) -> Option<Identifier> {
        match self {
            Self::Identifier(identifier) => Some(*identifier),
            Self::Arrayed(arrayed) => arrayed.identifier(tree),
        }
    }

    /// The dimensions attached to the name, when there are any.
    pub fn array_specifier(&self) -> Option<ArraySpecifier> {
        match self {
            Self::Identifier(_) => None,
            Self::Arrayed(arrayed) => Some(*arrayed),
        }
    }
}

impl Parameter {
    /// The parameter's declared name, skipping over the declarator wrapper.
    pub fn variable_name(&self, tree: &Tree) -> Option<VariableName> {
        self.variable(tree)?.name(tree)
    }
}

#[cfg(test)]
mod test {
    use crate::syntax::{Syntax, VariableDeclaration, VariableName};
    use glsl_parser::{Parser, Tag};

    #[test]
    fn arrayed_names_expose_their_identifier_and_dimensions() {
        let source = "float weights[4][2];";
        let parsed = Parser::new(source).parse();
        let tree = parsed.tree();
        let declarator = (0..tree.len())
            .find(|&node| tree.tag(node) == Tag::VariableDeclaration)
            .unwrap();

        let name = VariableDeclaration::try_extract(tree, declarator)
            .unwrap()
            .name(tree)
            .unwrap();
        let identifier = name.identifier(tree).unwrap();
        assert_eq!(identifier.text(tree, source), "weights");

        let arrays = name.array_specifier().unwrap();
        assert_eq!(arrays.arrays(tree).count(), 2);
    }

    #[test]
    fn bare_names_have_no_dimensions() {
        let parsed = Parser::new("int x;").parse();
        let tree = parsed.tree();
        let declarator = (0..tree.len())
            .find(|&node| tree.tag(node) == Tag::VariableDeclaration)
            .unwrap();

        let name = VariableDeclaration::try_extract(tree, declarator)
            .unwrap()
            .name(tree)
            .unwrap();
        assert!(matches!(name, VariableName::Identifier(_)));
        assert!(name.array_specifier().is_none());
    }
}
