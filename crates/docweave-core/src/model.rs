//! Arena of code elements.

use std::ops::Index;

use thiserror::Error;

use crate::{
    docs::DocBlock,
    element::{Element, ElementId, ElementKind},
};

/// Structural errors raised while wiring elements together.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("{kind} `{name}` cannot own members")]
    NotAContainer { kind: ElementKind, name: String },

    #[error("{kind} `{name}` cannot take parameters")]
    NotCallable { kind: ElementKind, name: String },
}

/// Owns every [`Element`] of a build. Elements are never removed, so an
/// [`ElementId`] stays valid for the lifetime of the model.
#[derive(Debug, Default)]
pub struct CodeModel {
    elements: Vec<Element>,
}

impl CodeModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.index())
    }

    /// Iterates over all elements in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &Element)> {
        self.elements
            .iter()
            .enumerate()
            .map(|(index, element)| (ElementId::new(index), element))
    }

    /// Adds a root element (a namespace) without a parent.
    pub fn insert_root(&mut self, element: Element) -> ElementId {
        let id = ElementId::new(self.elements.len());
        self.elements.push(element);
        id
    }

    /// Adds `element` as the last child of `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NotAContainer`] if `parent` is neither a
    /// namespace nor a composite type.
    pub fn add_child(&mut self, parent: ElementId, element: Element) -> Result<ElementId, ModelError> {
        let id = ElementId::new(self.elements.len());
        let owner = &mut self.elements[parent.index()];
        let kind = owner.kind();
        let Some(children) = owner.children_mut() else {
            return Err(ModelError::NotAContainer {
                kind,
                name: owner.name().to_string(),
            });
        };
        children.push(id);
        self.push_with_parent(parent, element);
        Ok(id)
    }

    /// Adds `parameter` to the parameter list of `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NotCallable`] if `owner` has no parameter list.
    pub fn add_parameter(
        &mut self,
        owner: ElementId,
        parameter: Element,
    ) -> Result<ElementId, ModelError> {
        let id = ElementId::new(self.elements.len());
        let callable = &mut self.elements[owner.index()];
        let kind = callable.kind();
        let Some(parameters) = callable.parameters_mut() else {
            return Err(ModelError::NotCallable {
                kind,
                name: callable.name().to_string(),
            });
        };
        parameters.push(id);
        self.push_with_parent(owner, parameter);
        Ok(id)
    }

    /// Finds a child of `parent` by kind and name.
    pub fn find_child(&self, parent: ElementId, kind: ElementKind, name: &str) -> Option<ElementId> {
        self[parent]
            .children()
            .iter()
            .copied()
            .find(|&child| self[child].kind() == kind && self[child].name() == name)
    }

    /// Stable-sorts the children of `parent` by kind. Relative order within a
    /// kind is preserved.
    pub fn sort_children_by_kind(&mut self, parent: ElementId) {
        let Some(children) = self.elements[parent.index()].children_mut() else {
            return;
        };
        let mut sorted = std::mem::take(children);
        sorted.sort_by_key(|child| self.elements[child.index()].kind());
        if let Some(children) = self.elements[parent.index()].children_mut() {
            *children = sorted;
        }
    }

    /// Attaches documentation to an element that has none yet.
    pub fn merge_documentation(&mut self, id: ElementId, documentation: Option<DocBlock>) {
        let element = &mut self.elements[id.index()];
        if element.documentation().is_some() {
            return;
        }
        if let Some(documentation) = documentation {
            element.set_documentation(documentation);
        }
    }

    /// Walks the parent chain of `id`, nearest ancestor first.
    pub fn ancestors(&self, id: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        std::iter::successors(self[id].parent(), move |&current| self[current].parent())
    }

    fn push_with_parent(&mut self, parent: ElementId, mut element: Element) {
        element.set_parent(parent);
        self.elements.push(element);
    }
}

impl Index<ElementId> for CodeModel {
    type Output = Element;

    fn index(&self, id: ElementId) -> &Self::Output {
        &self.elements[id.index()]
    }
}
