//! Identity factories for declarations and type usages.
//!
//! Declarations and usages derive their qualified names through the same
//! normalization ([`normalize_full_name`]), so a usage of `Grid<Cell>` and
//! the declaration of `Grid<T>` both land on `Shapes.Grid<1>`.

use docweave_core::identity::{Identity, PlainIdentity, normalize_full_name};

use crate::{
    semantic::SemanticModel,
    syntax::{DeclarationSyntax, DeclaredSymbol, SymbolHandle, TypeSyntax},
};

/// Identity of a class, struct, interface, record, enum or delegate.
///
/// Falls back to `owner.name` when the front end reported no symbol.
pub(crate) fn type_identity(
    node: &DeclarationSyntax,
    symbol: Option<&DeclaredSymbol>,
    owner: Option<&str>,
) -> Identity {
    let arity = node.type_parameters.len();
    let qualified = match symbol {
        Some(symbol) => normalize_full_name(&symbol.qualified_name, arity.max(symbol.arity)),
        None => with_arity(&qualify(owner, &node.name), arity),
    };
    with_type_parameters(&node.name, qualified, &node.type_parameters)
}

/// Identity of a method, constructor, destructor or operator:
/// `Container.Name<arity>(ParameterType, ...)`.
///
/// The parameter list keeps overloads apart. It is taken from the front
/// end's display name when that carries one, else from the declared
/// parameter types.
pub(crate) fn callable_identity(
    node: &DeclarationSyntax,
    name: &str,
    symbol: Option<&DeclaredSymbol>,
    owner: Option<&str>,
) -> Identity {
    let arity = node.type_parameters.len();
    let qualified = match symbol {
        Some(symbol) if symbol.qualified_name.contains('(') => {
            normalize_full_name(&symbol.qualified_name, arity)
        }
        _ => {
            let container = symbol
                .and_then(|symbol| {
                    symbol
                        .containing_type
                        .as_deref()
                        .map(|containing| normalize_full_name(containing, symbol.containing_arity))
                })
                .or_else(|| owner.map(str::to_string));
            let parameters: Vec<_> = node
                .parameters
                .iter()
                .map(|parameter| parameter.ty.text.trim())
                .collect();
            format!(
                "{}({})",
                qualify(container.as_deref(), &with_arity(name, arity)),
                parameters.join(", ")
            )
        }
    };
    with_type_parameters(name, qualified, &node.type_parameters)
}

/// Identity of a field, property or parameter, qualified by its owner.
pub(crate) fn member_identity(name: &str, owner: Option<&str>) -> Identity {
    Identity::plain(name, owner.map(|owner| qualify(Some(owner), name)))
}

/// Identity of a type usage. Generic arguments become sub-identities.
pub(crate) fn usage_identity(ty: &TypeSyntax, semantics: &dyn SemanticModel) -> Identity {
    let qualified = semantics
        .type_of(ty)
        .map(|display| normalize_full_name(&display, ty.arguments.len()));

    if ty.arguments.is_empty() {
        let name = if ty.text.contains('<') {
            simple_name(&ty.text)
        } else {
            ty.text.rsplit('.').next().unwrap_or_default().trim().to_string()
        };
        Identity::plain(name, qualified)
    } else {
        Identity::generic(
            PlainIdentity::new(simple_name(&ty.text), qualified),
            ty.arguments
                .iter()
                .map(|argument| usage_identity(argument, semantics))
                .collect(),
        )
    }
}

/// Identity of the symbol a `cref` attribute resolved to.
pub(crate) fn cref_identity(symbol: &SymbolHandle) -> Identity {
    let name = if symbol.name.is_empty() {
        simple_name(&symbol.qualified_name)
    } else {
        symbol.name.clone()
    };
    let qualified = normalize_full_name(&symbol.qualified_name, symbol.type_parameters.len());
    with_type_parameters(&name, qualified, &symbol.type_parameters)
}

fn with_type_parameters(name: &str, qualified: String, type_parameters: &[String]) -> Identity {
    let main = PlainIdentity::new(name, Some(qualified));
    if type_parameters.is_empty() {
        Identity::Plain(main)
    } else {
        Identity::generic(
            main,
            type_parameters
                .iter()
                .map(|parameter| Identity::plain(parameter.clone(), None))
                .collect(),
        )
    }
}

fn qualify(owner: Option<&str>, name: &str) -> String {
    match owner {
        Some(owner) if !owner.is_empty() => format!("{owner}.{name}"),
        _ => name.to_string(),
    }
}

fn with_arity(name: &str, arity: usize) -> String {
    if arity > 0 {
        format!("{name}<{arity}>")
    } else {
        name.to_string()
    }
}

/// `Shapes.Grid<Cell>` becomes `Grid`.
fn simple_name(text: &str) -> String {
    let head = text.split('<').next().unwrap_or_default();
    head.rsplit('.').next().unwrap_or_default().trim().to_string()
}
