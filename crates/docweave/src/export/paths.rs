//! Output-unit file names and cross-link targets.
//!
//! Every element lives in exactly one output unit: the file of its nearest
//! self-or-ancestor whose kind is configured as separate, or the index
//! document when there is none. A link is the unit file name followed by
//! `#HASH`; the file name is left out when the link stays inside the unit it
//! is rendered into.

use docweave_core::{
    element::ElementId,
    identity::Identity,
    model::CodeModel,
};

use crate::config::SeparateUnits;

/// File name of the index document.
pub const INDEX_FILE: &str = "README.md";

/// The separate element whose output unit contains `id`, if any.
pub fn containing_unit(model: &CodeModel, separate: &SeparateUnits, id: ElementId) -> Option<ElementId> {
    std::iter::once(id)
        .chain(model.ancestors(id))
        .find(|&candidate| separate.is_separate(model[candidate].kind()))
}

/// File name of the output unit written for the separate element `unit`.
///
/// The name joins the enclosing chain of separate ancestors, outermost first,
/// and ends with the hash of `unit`. Generic ancestors are preceded by an
/// `x{N}` arity segment, a generic `unit` by `T{N}`.
pub fn unit_file(model: &CodeModel, separate: &SeparateUnits, unit: ElementId) -> String {
    let mut segments = Vec::new();
    push_segment(&mut segments, model[unit].declaration(), 'T');

    for ancestor in model.ancestors(unit) {
        let element = &model[ancestor];
        if !separate.is_separate(element.kind()) {
            break;
        }
        push_segment(&mut segments, element.declaration(), 'x');
    }

    segments.reverse();
    format!("{}{}.md", segments.join("."), model[unit].declaration().hash())
}

/// Path part of a link to `target` rendered inside the unit of
/// `current_parent`. Empty when the target is in the same unit.
pub fn link_path(
    model: &CodeModel,
    separate: &SeparateUnits,
    target: ElementId,
    current_parent: Option<ElementId>,
) -> String {
    match containing_unit(model, separate, target) {
        unit if unit == current_parent => String::new(),
        Some(unit) => unit_file(model, separate, unit),
        None => INDEX_FILE.to_string(),
    }
}

/// Full link (`path#HASH`) to `target`.
pub fn link(
    model: &CodeModel,
    separate: &SeparateUnits,
    target: ElementId,
    current_parent: Option<ElementId>,
) -> String {
    format!(
        "{}#{}",
        link_path(model, separate, target, current_parent),
        model[target].declaration().hash()
    )
}

/// "Go back" target of a separate unit whose element is a child of `parent`.
pub fn back_link(model: &CodeModel, separate: &SeparateUnits, parent: Option<ElementId>) -> String {
    let Some(parent) = parent else {
        return INDEX_FILE.to_string();
    };
    let file = match containing_unit(model, separate, parent) {
        Some(unit) => unit_file(model, separate, unit),
        None => INDEX_FILE.to_string(),
    };
    format!("{file}#{}", model[parent].declaration().hash())
}

/// Keeps `[A-Za-z0-9_.]`.
pub fn clean_file_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.'))
        .collect()
}

// Segments are collected innermost first and reversed by the caller, so the
// arity marker is pushed after the name to end up ahead of it.
fn push_segment(segments: &mut Vec<String>, declaration: &Identity, marker: char) {
    segments.push(clean_file_name(declaration.name()));
    if declaration.is_generic() {
        segments.push(format!("{marker}{}", declaration.arity()));
    }
}
