//! Reconstruction of declared types from resolved references.

use std::fmt::{self, Write};

use glsl_parser::{NodeIndex, Tree};

use crate::analysis::Reference;
use crate::format::single_line;
use crate::syntax::{
    AnyDeclaration, ArraySpecifier, Parameter, ParameterList, Syntax, TypeSpecifier, VariableName,
};

/// The declared type of a resolved reference. All fields borrow from the
/// tree by index; [`Type::format`] re-reads the subtrees on demand, and the
/// rendered `String` is the only long-lived product.
///
/// A function reference carries `qualifiers`, `specifier` and `parameters`;
/// a struct reference only a struct `specifier`; everything else
/// `qualifiers`, `specifier` and possibly `arrays`.
#[derive(Debug, Clone, Copy)]
pub struct Type {
    /// The declaration's `type_qualifier_list` node.
    pub qualifiers: Option<NodeIndex>,
    pub specifier: Option<TypeSpecifier>,
    /// Dimensions attached to the declared name rather than the specifier.
    pub arrays: Option<ArraySpecifier>,
    /// The `parameter_list` node of a function declaration.
    pub parameters: Option<NodeIndex>,
}

impl Type {
    /// Canonical single-line rendering; see the crate docs for examples.
    pub fn format<'a>(&'a self, tree: &'a Tree, source: &'a str) -> TypeDisplay<'a> {
        TypeDisplay {
            ty: self,
            tree,
            source,
        }
    }
}

/// The declared type of `reference`, or `None` when its parent declaration
/// does not extract as any declaration variant.
pub fn type_of(reference: &Reference<'_>) -> Option<Type> {
    let tree = reference.document.parse_tree().tree();
    let ty = match AnyDeclaration::try_extract(tree, reference.parent_declaration)? {
        AnyDeclaration::Function(function) => Type {
            qualifiers: function.qualifiers(tree).map(|q| q.node()),
            specifier: function.specifier(tree),
            arrays: None,
            parameters: function.parameters(tree).map(|p| p.node()),
        },
        AnyDeclaration::Struct(specifier) => Type {
            qualifiers: None,
            specifier: Some(TypeSpecifier::Struct(specifier)),
            arrays: None,
            parameters: None,
        },
        AnyDeclaration::Variable(declaration) => Type {
            qualifiers: declaration.qualifiers(tree).map(|q| q.node()),
            specifier: declaration.specifier(tree),
            arrays: name_arrays(tree, reference.node),
            parameters: None,
        },
        AnyDeclaration::Block(block) => Type {
            qualifiers: block.qualifiers(tree).map(|q| q.node()),
            specifier: block.specifier(tree).map(TypeSpecifier::Identifier),
            arrays: name_arrays(tree, reference.node),
            parameters: None,
        },
        AnyDeclaration::Parameter(parameter) => Type {
            qualifiers: parameter.qualifiers(tree).map(|q| q.node()),
            specifier: parameter.specifier(tree),
            arrays: name_arrays(tree, reference.node),
            parameters: None,
        },
    };
    Some(ty)
}

/// The reconstructed type of one parameter.
pub fn parameter_type(parameter: &Parameter, tree: &Tree) -> Type {
    Type {
        qualifiers: parameter.qualifiers(tree).map(|q| q.node()),
        specifier: parameter.specifier(tree),
        arrays: parameter
            .variable_name(tree)
            .and_then(|name| name.array_specifier()),
        parameters: None,
    }
}

/// Dimensions on the declared name: in `vec4 color[2]` the `[2]` sits on
/// the name, not the specifier.
fn name_arrays(tree: &Tree, identifier: NodeIndex) -> Option<ArraySpecifier> {
    let parent = tree.parent(identifier)?;
    VariableName::try_extract(tree, parent)?.array_specifier()
}

pub struct TypeDisplay<'a> {
    ty: &'a Type,
    tree: &'a Tree,
    source: &'a str,
}

impl fmt::Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_base(f, self.ty, self.tree, self.source)?;
        if let Some(parameters) = self.ty.parameters {
            f.write_str(" (")?;
            if let Some(list) = ParameterList::try_extract(self.tree, parameters) {
                let mut first = true;
                for parameter in list.iter(self.tree) {
                    if !first {
                        f.write_str(", ")?;
                    }
                    first = false;
                    let ty = parameter_type(&parameter, self.tree);
                    write_base(f, &ty, self.tree, self.source)?;
                }
            }
            f.write_char(')')?;
        } else {
            // The declared name conventionally follows a non-function type.
            f.write_char(' ')?;
        }
        Ok(())
    }
}

/// Qualifiers, specifier, then array suffixes concatenated directly.
fn write_base(f: &mut fmt::Formatter<'_>, ty: &Type, tree: &Tree, source: &str) -> fmt::Result {
    if let Some(qualifiers) = ty.qualifiers {
        write!(f, "{} ", single_line(tree, qualifiers, source))?;
    }
    if let Some(specifier) = &ty.specifier {
        write!(f, "{}", single_line(tree, specifier.node(), source))?;
    }
    if let Some(arrays) = &ty.arrays {
        for array in arrays.arrays(tree) {
            write!(f, "{}", single_line(tree, array.node(), source))?;
        }
    }
    Ok(())
}
