//! Code elements: the nodes of the declaration graph.
//!
//! Elements live in a [`CodeModel`](crate::model::CodeModel) arena and refer
//! to each other (parent links, members, parameters) through [`ElementId`].

use std::{fmt, str::FromStr};

use serde::Deserialize;
use thiserror::Error;

use crate::{docs::DocBlock, identity::Identity};

/// Stable index of an element inside its [`CodeModel`](crate::model::CodeModel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(usize);

impl ElementId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

/// The closed set of declaration kinds.
///
/// The variant order is the grouping order used when members are sorted and
/// rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Namespace,
    Property,
    Field,
    Constructor,
    Destructor,
    Method,
    Operator,
    Delegate,
    Interface,
    Class,
    Struct,
    Record,
    Enum,
}

impl ElementKind {
    /// Every kind, in grouping order.
    pub const ALL: [ElementKind; 13] = [
        ElementKind::Namespace,
        ElementKind::Property,
        ElementKind::Field,
        ElementKind::Constructor,
        ElementKind::Destructor,
        ElementKind::Method,
        ElementKind::Operator,
        ElementKind::Delegate,
        ElementKind::Interface,
        ElementKind::Class,
        ElementKind::Struct,
        ElementKind::Record,
        ElementKind::Enum,
    ];

    /// Lower-case keyword, also used as the configuration key.
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Namespace => "namespace",
            ElementKind::Property => "property",
            ElementKind::Field => "field",
            ElementKind::Constructor => "constructor",
            ElementKind::Destructor => "destructor",
            ElementKind::Method => "method",
            ElementKind::Operator => "operator",
            ElementKind::Delegate => "delegate",
            ElementKind::Interface => "interface",
            ElementKind::Class => "class",
            ElementKind::Struct => "struct",
            ElementKind::Record => "record",
            ElementKind::Enum => "enum",
        }
    }

    /// Group heading for a run of members of this kind.
    pub fn plural(&self) -> &'static str {
        match self {
            ElementKind::Namespace => "Namespaces",
            ElementKind::Property => "Properties",
            ElementKind::Field => "Variables",
            ElementKind::Constructor => "Constructors",
            ElementKind::Destructor => "Destructors",
            ElementKind::Method => "Methods",
            ElementKind::Operator => "Operators",
            ElementKind::Delegate => "Delegates",
            ElementKind::Interface => "Interfaces",
            ElementKind::Class => "Classes",
            ElementKind::Struct => "Structs",
            ElementKind::Record => "Records",
            ElementKind::Enum => "Enums",
        }
    }

    /// Class, struct, interface and record: kinds that own members.
    pub fn is_composite_type(&self) -> bool {
        matches!(
            self,
            ElementKind::Interface | ElementKind::Class | ElementKind::Struct | ElementKind::Record
        )
    }

    /// Kinds registered as reference targets.
    pub fn is_declaration_target(&self) -> bool {
        self.is_composite_type()
            || matches!(
                self,
                ElementKind::Namespace | ElementKind::Enum | ElementKind::Delegate
            )
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no [`ElementKind`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown element kind `{0}`")]
pub struct UnknownKind(pub String);

impl FromStr for ElementKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ElementKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

/// Kind-specific payload of an [`Element`].
#[derive(Debug, Clone)]
pub enum ElementBody {
    /// Top-level types of a namespace.
    Namespace { types: Vec<ElementId> },
    /// Members of a class, struct, interface or record.
    Type { members: Vec<ElementId> },
    Enum { items: Vec<String> },
    Delegate {
        return_type: Identity,
        parameters: Vec<ElementId>,
    },
    Method {
        return_type: Identity,
        parameters: Vec<ElementId>,
    },
    Constructor { parameters: Vec<ElementId> },
    Destructor,
    /// Conversion operators have no return type; their name is the target type.
    Operator {
        return_type: Option<Identity>,
        parameters: Vec<ElementId>,
    },
    Property {
        value_type: Identity,
        accessors: Vec<String>,
    },
    /// Fields and parameters. A field declaration may declare several names.
    Field {
        value_type: Identity,
        names: Vec<String>,
    },
}

/// A declaration in the code model.
#[derive(Debug, Clone)]
pub struct Element {
    kind: ElementKind,
    declaration: Identity,
    modifiers: Option<String>,
    documentation: Option<DocBlock>,
    parent: Option<ElementId>,
    body: ElementBody,
}

impl Element {
    /// Creates a detached element. The parent link is set when the element is
    /// added to a [`CodeModel`](crate::model::CodeModel).
    pub fn new(kind: ElementKind, declaration: Identity, body: ElementBody) -> Self {
        Self {
            kind,
            declaration,
            modifiers: None,
            documentation: None,
            parent: None,
            body,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Option<String>) -> Self {
        self.modifiers = modifiers.filter(|m| !m.is_empty());
        self
    }

    pub fn with_documentation(mut self, documentation: Option<DocBlock>) -> Self {
        self.documentation = documentation;
        self
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn declaration(&self) -> &Identity {
        &self.declaration
    }

    pub fn name(&self) -> &str {
        self.declaration.name()
    }

    pub fn modifiers(&self) -> Option<&str> {
        self.modifiers.as_deref()
    }

    pub fn documentation(&self) -> Option<&DocBlock> {
        self.documentation.as_ref()
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    pub fn body(&self) -> &ElementBody {
        &self.body
    }

    /// Owned children: namespace types or type members.
    pub fn children(&self) -> &[ElementId] {
        match &self.body {
            ElementBody::Namespace { types } => types,
            ElementBody::Type { members } => members,
            _ => &[],
        }
    }

    /// Parameters of method-like elements.
    pub fn parameters(&self) -> &[ElementId] {
        match &self.body {
            ElementBody::Delegate { parameters, .. }
            | ElementBody::Method { parameters, .. }
            | ElementBody::Constructor { parameters }
            | ElementBody::Operator { parameters, .. } => parameters,
            _ => &[],
        }
    }

    /// Declared return type of methods, delegates and operators.
    pub fn return_type(&self) -> Option<&Identity> {
        match &self.body {
            ElementBody::Delegate { return_type, .. } | ElementBody::Method { return_type, .. } => {
                Some(return_type)
            }
            ElementBody::Operator { return_type, .. } => return_type.as_ref(),
            _ => None,
        }
    }

    /// Type of fields, parameters and properties.
    pub fn value_type(&self) -> Option<&Identity> {
        match &self.body {
            ElementBody::Property { value_type, .. } | ElementBody::Field { value_type, .. } => {
                Some(value_type)
            }
            _ => None,
        }
    }

    pub(crate) fn set_parent(&mut self, parent: ElementId) {
        self.parent = Some(parent);
    }

    pub(crate) fn set_documentation(&mut self, documentation: DocBlock) {
        self.documentation = Some(documentation);
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<ElementId>> {
        match &mut self.body {
            ElementBody::Namespace { types } => Some(types),
            ElementBody::Type { members } => Some(members),
            _ => None,
        }
    }

    pub(crate) fn parameters_mut(&mut self) -> Option<&mut Vec<ElementId>> {
        match &mut self.body {
            ElementBody::Delegate { parameters, .. }
            | ElementBody::Method { parameters, .. }
            | ElementBody::Constructor { parameters }
            | ElementBody::Operator { parameters, .. } => Some(parameters),
            _ => None,
        }
    }
}
