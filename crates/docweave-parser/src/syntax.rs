//! Source units as delivered by the external compiler front end.
//!
//! The front end tokenizes and type-checks the code base, then hands over
//! one JSON document per source file. Each document lists the declarations
//! of the file in document order, the documentation comment of each
//! declaration as structured nodes, and the symbol information it resolved.
//!
//! ```json
//! {
//!   "project": "Shapes",
//!   "path": "src/Circle.cs",
//!   "nodes": [
//!     { "kind": "namespace", "name": "Shapes", "members": [
//!       { "kind": "class", "name": "Circle", "modifiers": ["public"],
//!         "symbol": { "qualified_name": "Shapes.Circle" },
//!         "doc": [ { "node": "element", "name": "summary",
//!                    "children": [ { "node": "text", "text": "A circle." } ] } ],
//!         "members": [
//!           { "kind": "property", "name": "Radius",
//!             "type": { "text": "double" }, "accessors": ["get"] }
//!         ] }
//!     ] }
//!   ]
//! }
//! ```
//!
//! Unknown fields are ignored. Unknown declaration kinds deserialize to
//! [`SyntaxKind::Unknown`] and are skipped by the tree builder.

use serde::Deserialize;

/// One source file.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceUnit {
    /// Project the file belongs to, matched against excluded projects.
    #[serde(default)]
    pub project: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub nodes: Vec<DeclarationSyntax>,
}

/// The declaration kinds the front end reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyntaxKind {
    Namespace,
    FileScopedNamespace,
    Class,
    Struct,
    Interface,
    Record,
    Enum,
    Delegate,
    Method,
    Constructor,
    Destructor,
    Operator,
    ConversionOperator,
    Field,
    Property,
    #[serde(other)]
    Unknown,
}

/// Position of a declaration in the original source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Location {
    pub line: usize,
    #[serde(default)]
    pub column: usize,
}

/// Symbol information the front end resolved for a declaration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeclaredSymbol {
    /// Fully qualified display name, e.g. `Shapes.Grid<T>`.
    pub qualified_name: String,
    /// Number of type parameters.
    #[serde(default)]
    pub arity: usize,
    /// Qualified display name of the containing type, for members.
    #[serde(default)]
    pub containing_type: Option<String>,
    /// Number of type parameters of the containing type.
    #[serde(default)]
    pub containing_arity: usize,
}

/// A type as written at a usage site.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TypeSyntax {
    /// Source text, e.g. `List<Circle>` or `System.String`.
    pub text: String,
    /// Qualified display name of the resolved type symbol, if the front end
    /// could resolve it.
    #[serde(default)]
    pub symbol: Option<String>,
    /// Generic type arguments, in order.
    #[serde(default)]
    pub arguments: Vec<TypeSyntax>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParameterSyntax {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeSyntax,
}

/// A declaration node. Which fields are meaningful depends on `kind`.
#[derive(Debug, Clone, Deserialize)]
pub struct DeclarationSyntax {
    pub kind: SyntaxKind,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub symbol: Option<DeclaredSymbol>,
    #[serde(default)]
    pub modifiers: Vec<String>,
    #[serde(default)]
    pub type_parameters: Vec<String>,
    #[serde(default)]
    pub return_type: Option<TypeSyntax>,
    /// Type of fields and properties, target type of conversion operators.
    #[serde(default, rename = "type")]
    pub declared_type: Option<TypeSyntax>,
    /// Parameters of method-like declarations, positional parameters of
    /// records.
    #[serde(default)]
    pub parameters: Vec<ParameterSyntax>,
    /// Variable names of a field declaration.
    #[serde(default)]
    pub variables: Vec<String>,
    #[serde(default)]
    pub accessors: Vec<String>,
    #[serde(default)]
    pub enum_members: Vec<String>,
    #[serde(default)]
    pub members: Vec<DeclarationSyntax>,
    #[serde(default)]
    pub doc: Vec<DocNode>,
    #[serde(default)]
    pub location: Option<Location>,
}

impl DeclarationSyntax {
    pub fn has_modifier(&self, modifier: &str) -> bool {
        self.modifiers.iter().any(|m| m == modifier)
    }
}

/// A node of a structured documentation comment.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum DocNode {
    Text {
        text: String,
    },
    Element {
        name: String,
        #[serde(default)]
        attributes: Vec<DocAttributeSyntax>,
        #[serde(default)]
        children: Vec<DocNode>,
    },
}

/// An attribute of a documentation tag.
///
/// For `cref` attributes the front end attaches the symbol it resolved.
#[derive(Debug, Clone, Deserialize)]
pub struct DocAttributeSyntax {
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub symbol: Option<SymbolHandle>,
}

/// A symbol resolved from a cross-reference attribute.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SymbolHandle {
    /// Fully qualified display name, e.g. `Shapes.Grid<T>`.
    pub qualified_name: String,
    /// Simple name; derived from `qualified_name` when empty.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub type_parameters: Vec<String>,
}
