//! Documentation comment parser.
//!
//! Turns the structured comment nodes of one declaration into a
//! [`DocBlock`]. Nested tags become positional placeholders in the text of
//! their parent, and `cref` attributes are resolved through the
//! [`SemanticModel`] and queued for reference resolution like any other
//! type usage.

use std::sync::LazyLock;

use log::trace;
use regex::Regex;

use docweave_core::{
    docs::{CREF, DocBlock, DocElement, DocElementKind},
    identity::Identity,
    reference::ReferenceTable,
};

use crate::{
    declaration::cref_identity,
    error::{Diagnostic, DiagnosticCollector, ErrorCode},
    semantic::SemanticModel,
    syntax::{DocAttributeSyntax, DocNode},
};

/// Tag that removes a declaration and its subtree from the model.
const SKIP: &str = "skip";

/// `///` comment prefixes at the start of a line.
static LINE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*///").expect("valid prefix pattern"));

/// A line break with the blanks around it.
static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]*\r?\n[ \t]*").expect("valid line break pattern"));

static BLANKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]{2,}").expect("valid blank pattern"));

/// Prefix plus the single space after it; `code` blocks keep their lines.
static CODE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*/// ?").expect("valid code prefix pattern"));

/// Parses documentation comments of one source unit.
pub(crate) struct DocCommentParser<'a> {
    semantics: &'a dyn SemanticModel,
    references: &'a mut ReferenceTable,
    diagnostics: &'a mut DiagnosticCollector,
}

impl<'a> DocCommentParser<'a> {
    pub(crate) fn new(
        semantics: &'a dyn SemanticModel,
        references: &'a mut ReferenceTable,
        diagnostics: &'a mut DiagnosticCollector,
    ) -> Self {
        Self {
            semantics,
            references,
            diagnostics,
        }
    }

    /// Parses the comment of the declaration described by `owner`.
    ///
    /// Returns `None` for declarations without a comment. A `skip` tag
    /// anywhere at the top level yields a skipped block before any other tag
    /// is looked at.
    pub(crate) fn parse(&mut self, nodes: &[DocNode], owner: &str) -> Option<DocBlock> {
        if nodes.is_empty() {
            return None;
        }
        if nodes.iter().any(is_skip) {
            return Some(DocBlock::skipped());
        }

        let mut block = DocBlock::default();
        for node in nodes {
            let DocNode::Element {
                name,
                attributes,
                children,
            } = node
            else {
                continue;
            };
            let Some(kind) = DocElementKind::from_tag(name).filter(is_section) else {
                trace!(tag = name.as_str(), owner; "Ignoring top-level documentation tag");
                continue;
            };

            let element = self.parse_element(kind, attributes, children, owner);
            match kind {
                DocElementKind::Summary => block.summary = Some(element),
                DocElementKind::Remarks => block.remarks = Some(element),
                DocElementKind::Returns => block.returns = Some(element),
                DocElementKind::Param | DocElementKind::Typeparam => {
                    if element.name().is_none_or(str::is_empty) {
                        self.diagnostics.emit(
                            Diagnostic::warning(format!("`{kind}` tag on {owner} has no name"))
                                .with_code(ErrorCode::E100)
                                .with_help("add a `name` attribute naming the parameter"),
                        );
                    }
                    block.parameters.push(element);
                }
                DocElementKind::Exception => block.exceptions.push(element),
                DocElementKind::Example => block.examples.push(element),
                DocElementKind::SeeAlso => block.see_also.push(element),
                _ => {}
            }
        }

        block
            .parameters
            .sort_by_key(|parameter| parameter.kind() == DocElementKind::Typeparam);
        Some(block)
    }

    fn parse_element(
        &mut self,
        kind: DocElementKind,
        attributes: &[DocAttributeSyntax],
        children: &[DocNode],
        owner: &str,
    ) -> DocElement {
        let mut element = DocElement::new(kind);

        for attribute in attributes {
            if attribute.name == CREF {
                let identity = self.cross_reference(attribute, owner);
                element.insert_attribute(CREF, identity);
            } else {
                element.insert_attribute(
                    attribute.name.clone(),
                    Identity::plain(attribute.value.clone(), None),
                );
            }
        }

        for child in children {
            match child {
                DocNode::Text { text } => element.push_text(&clean_text(text, kind)),
                DocNode::Element {
                    name,
                    attributes,
                    children,
                } => match DocElementKind::from_tag(name) {
                    Some(nested) => {
                        let sub_element = self.parse_element(nested, attributes, children, owner);
                        element.push_nested(sub_element);
                    }
                    None => trace!(tag = name.as_str(), owner; "Dropping unknown nested tag"),
                },
            }
        }

        element.trim();
        element
    }

    /// Resolves a `cref` attribute. Unresolvable references keep their text
    /// as an unqualified identity so they still render as plain text.
    fn cross_reference(&mut self, attribute: &DocAttributeSyntax, owner: &str) -> Identity {
        match self.semantics.cref_symbol(attribute) {
            Some(symbol) => {
                let identity = cref_identity(&symbol);
                self.references.enqueue(&identity);
                identity
            }
            None => {
                self.diagnostics.emit(
                    Diagnostic::warning(format!(
                        "cannot resolve cross-reference `{}` on {owner}",
                        attribute.value
                    ))
                    .with_code(ErrorCode::E101)
                    .with_help("the target is not declared in any loaded source unit"),
                );
                Identity::plain(attribute.value.clone(), None)
            }
        }
    }
}

fn is_skip(node: &DocNode) -> bool {
    matches!(node, DocNode::Element { name, .. } if name == SKIP)
}

/// Tags that populate a field of [`DocBlock`].
fn is_section(kind: &DocElementKind) -> bool {
    matches!(
        kind,
        DocElementKind::Summary
            | DocElementKind::Remarks
            | DocElementKind::Returns
            | DocElementKind::Param
            | DocElementKind::Typeparam
            | DocElementKind::Exception
            | DocElementKind::Example
            | DocElementKind::SeeAlso
    )
}

fn clean_text(text: &str, kind: DocElementKind) -> String {
    if kind == DocElementKind::Code {
        return CODE_PREFIX.replace_all(text, "").into_owned();
    }
    let text = LINE_PREFIX.replace_all(text, "");
    let text = LINE_BREAK.replace_all(&text, " ");
    BLANKS.replace_all(&text, " ").into_owned()
}
