//! Semantic services of the external front end.
//!
//! The tree builder never reads symbol information off syntax nodes
//! directly; it asks a [`SemanticModel`] passed alongside each source unit.

use crate::syntax::{DeclarationSyntax, DeclaredSymbol, DocAttributeSyntax, SymbolHandle, TypeSyntax};

/// Symbol resolution for one source unit.
pub trait SemanticModel {
    /// The symbol a declaration introduces.
    fn declared_symbol(&self, node: &DeclarationSyntax) -> Option<DeclaredSymbol>;

    /// Qualified display name of the type a usage refers to.
    fn type_of(&self, ty: &TypeSyntax) -> Option<String>;

    /// The symbol a `cref` attribute refers to.
    fn cref_symbol(&self, attribute: &DocAttributeSyntax) -> Option<SymbolHandle>;
}

/// Reads the symbol information the front end embedded in the source unit.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedSemantics;

impl SemanticModel for EmbeddedSemantics {
    fn declared_symbol(&self, node: &DeclarationSyntax) -> Option<DeclaredSymbol> {
        node.symbol
            .clone()
            .filter(|symbol| !symbol.qualified_name.is_empty())
    }

    fn type_of(&self, ty: &TypeSyntax) -> Option<String> {
        ty.symbol.clone().filter(|symbol| !symbol.is_empty())
    }

    fn cref_symbol(&self, attribute: &DocAttributeSyntax) -> Option<SymbolHandle> {
        attribute
            .symbol
            .clone()
            .filter(|symbol| !symbol.qualified_name.is_empty())
    }
}
