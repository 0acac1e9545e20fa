//! docweave core types
//!
//! This crate provides the foundational types shared by the docweave
//! pipeline:
//!
//! - **Identity**: plain and generic declaration identities with stable
//!   hashes ([`identity`] module)
//! - **Docs**: parsed documentation comments ([`docs`] module)
//! - **Elements**: the code-element model and its arena ([`element`] and
//!   [`model`] modules)
//! - **References**: two-phase reference resolution ([`reference`] module)
//! - **Index**: namespaces keyed by dotted path ([`index`] module)

pub mod docs;
pub mod element;
pub mod identity;
pub mod index;
pub mod model;
pub mod reference;

use index::ProjectIndex;
use model::CodeModel;

/// A fully built and resolved project: the element arena plus the namespace
/// index used to enumerate it. Immutable once built.
#[derive(Debug, Default)]
pub struct ProjectTree {
    model: CodeModel,
    index: ProjectIndex,
}

impl ProjectTree {
    pub fn new(model: CodeModel, index: ProjectIndex) -> Self {
        Self { model, index }
    }

    pub fn model(&self) -> &CodeModel {
        &self.model
    }

    pub fn index(&self) -> &ProjectIndex {
        &self.index
    }
}
