//! XML export backend.
//!
//! Writes the whole tree to one `docs.xml` document. Namespaces nest the way
//! their dotted paths do; separate-unit configuration does not apply.

use std::path::Path;

use log::info;
use quick_xml::{
    Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};

use docweave_core::{
    ProjectTree,
    docs::{DocBlock, DocElement},
    element::{ElementBody, ElementId, ElementKind},
    identity::Identity,
    index::IndexNodeId,
};

use crate::{
    config::ExportFormat,
    export::{Error, ExportSummary, Exporter, OutputSink, WriteSet},
};

/// Name of the generated document.
pub const XML_FILE: &str = "docs.xml";

/// XML exporter.
#[derive(Debug, Clone, Copy, Default)]
pub struct Xml;

impl Exporter for Xml {
    fn format(&self) -> ExportFormat {
        ExportFormat::Xml
    }

    async fn export(&self, tree: &ProjectTree, output_dir: &Path) -> Result<ExportSummary, Error> {
        info!(output_dir:?; "Exporting XML");
        let mut writes = WriteSet::new(output_dir);
        writes.schedule(XML_FILE.to_string(), render(tree)?);
        let files = writes.join().await?;
        Ok(ExportSummary::new(ExportFormat::Xml, output_dir.to_path_buf(), files))
    }
}

/// Renders `tree` as one XML document.
///
/// # Errors
///
/// Returns [`Error::Render`] if the document cannot be written.
pub fn render(tree: &ProjectTree) -> Result<String, Error> {
    let mut xml = XmlWriter {
        tree,
        writer: Writer::new_with_indent(Vec::new(), b' ', 2),
    };

    xml.event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    xml.start("documentation", &[])?;
    let index = tree.index();
    let root = index.node(index.root());
    if let Some(global) = root.namespace() {
        xml.namespace(global, &[])?;
    }
    for &child in root.children() {
        xml.index_node(child)?;
    }
    xml.end("documentation")?;

    String::from_utf8(xml.writer.into_inner()).map_err(|err| Error::Render(err.to_string()))
}

struct XmlWriter<'a> {
    tree: &'a ProjectTree,
    writer: Writer<Vec<u8>>,
}

impl XmlWriter<'_> {
    /// Writes the namespace bound to `id`, with nested namespaces inside it.
    /// Path segments without a namespace pass their children through.
    fn index_node(&mut self, id: IndexNodeId) -> Result<(), Error> {
        let tree = self.tree;
        let node = tree.index().node(id);
        match node.namespace() {
            Some(namespace) => self.namespace(namespace, node.children()),
            None => node.children().iter().try_for_each(|&child| self.index_node(child)),
        }
    }

    fn namespace(&mut self, id: ElementId, nested: &[IndexNodeId]) -> Result<(), Error> {
        let tree = self.tree;
        let namespace = &tree.model()[id];
        self.start("namespace", &[])?;
        self.declaration("name", namespace.declaration())?;
        self.documentation(namespace.documentation())?;
        self.members(namespace.children())?;
        for &child in nested {
            self.index_node(child)?;
        }
        self.end("namespace")
    }

    fn element(&mut self, id: ElementId) -> Result<(), Error> {
        let tree = self.tree;
        let element = &tree.model()[id];
        let kind = element.kind();
        let tag = kind.as_str();

        match kind {
            ElementKind::Enum => {
                let items = match element.body() {
                    ElementBody::Enum { items } => items.as_slice(),
                    _ => &[],
                };
                let count = items.len().to_string();
                self.start(tag, &[("nrOfElements", count.as_str())])?;
                self.declaration("name", element.declaration())?;
                self.modifiers(element.modifiers())?;
                self.start("items", &[])?;
                for item in items {
                    self.text_element("item", &[], item)?;
                }
                self.end("items")?;
            }
            ElementKind::Property | ElementKind::Field => {
                self.start(tag, &[])?;
                if let Some(value_type) = element.value_type() {
                    self.declaration("type", value_type)?;
                }
                self.modifiers(element.modifiers())?;
                self.start("variables", &[])?;
                match element.body() {
                    ElementBody::Field { names, .. } => {
                        for name in names {
                            self.text_element("variable", &[], name)?;
                        }
                    }
                    _ => self.text_element("variable", &[], element.name())?,
                }
                self.end("variables")?;
                if let ElementBody::Property { accessors, .. } = element.body() {
                    self.start("accessors", &[])?;
                    for accessor in accessors {
                        self.text_element("accessor", &[], accessor)?;
                    }
                    self.end("accessors")?;
                }
            }
            ElementKind::Namespace => {
                return Err(Error::Unhandled {
                    kind,
                    separate: false,
                });
            }
            _ => {
                self.start(tag, &[])?;
                self.declaration("name", element.declaration())?;
                if let Some(return_type) = element.return_type() {
                    self.declaration("returnType", return_type)?;
                }
                self.modifiers(element.modifiers())?;
                if !element.parameters().is_empty() {
                    self.start("parameters", &[])?;
                    for &parameter in element.parameters() {
                        self.element(parameter)?;
                    }
                    self.end("parameters")?;
                }
                self.members(element.children())?;
            }
        }

        self.documentation(element.documentation())?;
        self.end(tag)
    }

    fn members(&mut self, members: &[ElementId]) -> Result<(), Error> {
        if members.is_empty() {
            return Ok(());
        }
        self.start("members", &[])?;
        for &member in members {
            self.element(member)?;
        }
        self.end("members")
    }

    /// `<declaration type=".." name="Display<Name>">` around the identity.
    fn declaration(&mut self, role: &str, identity: &Identity) -> Result<(), Error> {
        let display = identity.to_string();
        self.start("declaration", &[("type", role), ("name", display.as_str())])?;
        self.identity(identity)?;
        self.end("declaration")
    }

    fn identity(&mut self, identity: &Identity) -> Result<(), Error> {
        let main = identity.main();
        let full_name = main.qualified_name().unwrap_or(main.name());
        if !identity.is_generic() {
            return self.text_element("regularDeclaration", &[("fullName", full_name)], main.name());
        }

        let arity = identity.arity().to_string();
        self.start(
            "genericDeclaration",
            &[("fullName", full_name), ("nrOfTypeParams", arity.as_str())],
        )?;
        self.event(Event::Text(BytesText::new(main.name())))?;
        for sub_type in identity.sub_types() {
            self.identity(sub_type)?;
        }
        self.end("genericDeclaration")
    }

    fn modifiers(&mut self, modifiers: Option<&str>) -> Result<(), Error> {
        let Some(modifiers) = modifiers else {
            return Ok(());
        };
        self.start("modifiers", &[])?;
        for modifier in modifiers.split_whitespace() {
            self.text_element("modifier", &[], modifier)?;
        }
        self.end("modifiers")
    }

    fn documentation(&mut self, docs: Option<&DocBlock>) -> Result<(), Error> {
        let Some(docs) = docs.filter(|docs| !docs.is_empty()) else {
            return Ok(());
        };
        self.start("documentation", &[])?;
        let sections = [&docs.summary, &docs.returns, &docs.remarks]
            .into_iter()
            .flatten()
            .chain(&docs.parameters)
            .chain(&docs.exceptions)
            .chain(&docs.examples)
            .chain(&docs.see_also);
        for section in sections {
            self.doc_element(section)?;
        }
        self.end("documentation")
    }

    fn doc_element(&mut self, element: &DocElement) -> Result<(), Error> {
        let name = element.name();
        let cref = element.cref().map(|cref| {
            cref.qualified_name()
                .unwrap_or_else(|| cref.name())
                .to_string()
        });
        let mut attributes = Vec::new();
        if let Some(name) = name {
            attributes.push(("name", name));
        }
        if let Some(cref) = &cref {
            attributes.push(("cref", cref.as_str()));
        }
        self.text_element(element.kind().tag(), &attributes, &element.plain_text())
    }

    fn text_element(&mut self, tag: &str, attributes: &[(&str, &str)], text: &str) -> Result<(), Error> {
        self.start(tag, attributes)?;
        self.event(Event::Text(BytesText::new(text)))?;
        self.end(tag)
    }

    fn start(&mut self, tag: &str, attributes: &[(&str, &str)]) -> Result<(), Error> {
        let start = BytesStart::new(tag).with_attributes(attributes.iter().copied());
        self.event(Event::Start(start))
    }

    fn end(&mut self, tag: &str) -> Result<(), Error> {
        self.event(Event::End(BytesEnd::new(tag)))
    }

    fn event(&mut self, event: Event<'_>) -> Result<(), Error> {
        self.writer
            .write_event(event)
            .map_err(|err| Error::Render(err.to_string()))
    }
}
