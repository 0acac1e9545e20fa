//! Markdown export backend.
//!
//! The index document (`README.md`) opens with a namespace menu followed by
//! the content of every namespace. Elements whose kind is configured as
//! separate are written to their own output unit and leave only a display
//! header behind in the document that references them.

use std::path::Path;

use log::{debug, info};

use docweave_core::{
    ProjectTree,
    docs::{DocBlock, DocElement, DocElementKind},
    element::{ElementBody, ElementId, ElementKind},
    identity::Identity,
    index::{IndexNodeId, ProjectIndex},
    model::CodeModel,
};

use crate::{
    config::{ExportFormat, SeparateUnits},
    export::{Error, ExportSummary, Exporter, OutputSink, WriteSet, paths},
};

const STYLE_LINK: &str = "<link rel=\"stylesheet\" href=\"style.css\">";
const STYLE_FILE: &str = "style.css";
const STYLE_SHEET: &str = include_str!("style.css");
const NO_CONTENT: &str = "This type has no content";

const NAMESPACE_SELECTOR: &str = "NamespaceDeclaration";
const TYPE_SELECTOR: &str = "TypeDeclaration";
const METHOD_SELECTOR: &str = "MethodDeclaration";
const PARAMETER_NAME_SELECTOR: &str = "MethodParameterName";
const VARIABLE_NAME_SELECTOR: &str = "VariableName";
const KEYWORD_SELECTOR: &str = "Keyword";
const TYPE_PARAMETER_SELECTOR: &str = "TypeParameter";
const LIST_ELEMENT_SELECTOR: &str = "ListElement";
const LIST_HEADER_SELECTOR: &str = "ListHeader";

/// Indentation added per nesting level of inline members.
const NESTING: &str = "  ";

/// Markdown exporter.
#[derive(Debug, Clone, Default)]
pub struct Markdown {
    separate: SeparateUnits,
}

impl Markdown {
    pub fn new(separate: SeparateUnits) -> Self {
        Self { separate }
    }
}

impl Exporter for Markdown {
    fn format(&self) -> ExportFormat {
        ExportFormat::Md
    }

    async fn export(&self, tree: &ProjectTree, output_dir: &Path) -> Result<ExportSummary, Error> {
        info!(output_dir:?; "Exporting markdown");
        let mut writes = WriteSet::new(output_dir);
        render(tree, &self.separate, &mut writes)?;
        let files = writes.join().await?;
        Ok(ExportSummary::new(ExportFormat::Md, output_dir.to_path_buf(), files))
    }
}

/// Renders `tree` and hands every output unit to `sink`.
///
/// The index document is scheduled last, after all separate units.
///
/// # Errors
///
/// Returns [`Error::Unhandled`] if an element has no converter for its
/// placement.
pub fn render(tree: &ProjectTree, separate: &SeparateUnits, sink: &mut dyn OutputSink) -> Result<(), Error> {
    let mut renderer = Renderer {
        model: tree.model(),
        index: tree.index(),
        separate,
        sink,
        units: 0,
    };

    let mut index = format!("{STYLE_LINK}\n\n");
    index.push_str(&renderer.menu());
    for namespace in tree.index().namespaces() {
        index.push_str(&renderer.namespace(namespace)?);
    }

    debug!(units = renderer.units; "Separate output units rendered");
    renderer.sink.schedule(paths::INDEX_FILE.to_string(), index);
    renderer.sink.schedule(STYLE_FILE.to_string(), STYLE_SHEET.to_string());
    Ok(())
}

/// How an element is converted, chosen by kind and placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Converter {
    Property,
    Field,
    Callable,
    MemberUnit,
    Delegate,
    DelegateUnit,
    Type,
    TypeUnit,
    Enum,
    EnumUnit,
}

/// Namespaces are rendered by the index walk and never reach a converter.
fn converter(kind: ElementKind, separate: bool) -> Option<Converter> {
    let converter = match (kind, separate) {
        (ElementKind::Namespace, _) => return None,
        (ElementKind::Property, false) => Converter::Property,
        (ElementKind::Field, false) => Converter::Field,
        (
            ElementKind::Constructor
            | ElementKind::Destructor
            | ElementKind::Method
            | ElementKind::Operator,
            false,
        ) => Converter::Callable,
        (
            ElementKind::Property
            | ElementKind::Field
            | ElementKind::Constructor
            | ElementKind::Destructor
            | ElementKind::Method
            | ElementKind::Operator,
            true,
        ) => Converter::MemberUnit,
        (ElementKind::Delegate, false) => Converter::Delegate,
        (ElementKind::Delegate, true) => Converter::DelegateUnit,
        (
            ElementKind::Interface | ElementKind::Class | ElementKind::Struct | ElementKind::Record,
            false,
        ) => Converter::Type,
        (
            ElementKind::Interface | ElementKind::Class | ElementKind::Struct | ElementKind::Record,
            true,
        ) => Converter::TypeUnit,
        (ElementKind::Enum, false) => Converter::Enum,
        (ElementKind::Enum, true) => Converter::EnumUnit,
    };
    Some(converter)
}

/// Parts of a converted element.
#[derive(Debug, Default)]
struct Converted {
    header: String,
    documentation: String,
    content: String,
    /// What a separate element leaves behind in the referencing document.
    display_header: Option<String>,
}

impl Converted {
    fn full(&self) -> String {
        format!("{}{}{}", self.header, self.documentation, self.content)
    }
}

struct Renderer<'a> {
    model: &'a CodeModel,
    index: &'a ProjectIndex,
    separate: &'a SeparateUnits,
    sink: &'a mut dyn OutputSink,
    units: usize,
}

impl Renderer<'_> {
    /// Converts `id` for the unit of `current_parent`.
    ///
    /// Separate elements are scheduled as their own output unit; the display
    /// header is returned in their place.
    fn convert(&mut self, id: ElementId, current_parent: Option<ElementId>, indent: &str) -> Result<String, Error> {
        let model = self.model;
        let element = &model[id];
        let kind = element.kind();
        let separate = self.separate.is_separate(kind);
        let converter = converter(kind, separate).ok_or(Error::Unhandled { kind, separate })?;

        let converted = match converter {
            Converter::Property => self.property(id, current_parent, indent),
            Converter::Field => self.field(id, current_parent, indent),
            Converter::Callable => self.callable(id, current_parent, indent),
            Converter::MemberUnit => self.member_unit(id, current_parent),
            Converter::Delegate => self.delegate(id, current_parent, indent),
            Converter::DelegateUnit => self.delegate_unit(id, current_parent),
            Converter::Type => self.type_inline(id, current_parent, indent)?,
            Converter::TypeUnit => self.type_unit(id, current_parent)?,
            Converter::Enum => self.enumeration(id, current_parent, indent),
            Converter::EnumUnit => self.enumeration_unit(id, current_parent),
        };

        if !separate {
            return Ok(converted.full());
        }

        let file = paths::unit_file(self.model, self.separate, id);
        let back = paths::back_link(self.model, self.separate, element.parent());
        debug!(file = file.as_str(), kind:?; "Scheduling output unit");
        self.sink.schedule(
            file,
            format!("{STYLE_LINK}\n\n### [&#x21E6; Go Back]({back})\n{}", converted.full()),
        );
        self.units += 1;
        Ok(converted.display_header.unwrap_or(converted.header))
    }

    fn namespace(&mut self, id: ElementId) -> Result<String, Error> {
        let model = self.model;
        let namespace = &model[id];
        let name = namespace.name();
        let hash = namespace.declaration().hash();
        let mut content = format!(
            "***\n\n<h1><strong><span class=\"{NAMESPACE_SELECTOR}\"><a name=\"{name}\" id=\"{hash}\">{name}</a></span></strong></h1>\n\n"
        );
        content.push_str(&self.documentation(namespace.documentation(), None, ""));

        let mut current_kind = None;
        for &child in namespace.children() {
            let kind = self.model[child].kind();
            let separate = self.separate.is_separate(kind);
            if current_kind != Some(kind) {
                content.push_str(&format!("\n# {}\n\n", kind.plural()));
                if separate {
                    content.push_str("| Name | Description |\n| --- | --- |\n");
                }
                current_kind = Some(kind);
            }

            let converted = self.convert(child, None, "")?;
            if separate {
                let summary = self.model[child]
                    .documentation()
                    .and_then(|docs| docs.summary.as_ref())
                    .map(|summary| self.doc_text(summary, None))
                    .unwrap_or_default();
                content.push_str(&format!("| {converted} | {summary} |\n"));
            } else {
                content.push_str(&converted);
                content.push_str("\n\n");
            }
        }

        if namespace.children().is_empty() {
            content.push_str(NO_CONTENT);
            content.push('\n');
        }
        Ok(content)
    }

    fn property(&self, id: ElementId, current_parent: Option<ElementId>, indent: &str) -> Converted {
        let element = &self.model[id];
        let mut header = self.modifiers(element.modifiers());
        if let ElementBody::Property { value_type, accessors } = element.body() {
            header.push_str(&self.identity(value_type, current_parent, TYPE_SELECTOR, TYPE_SELECTOR, false));
            header.push(' ');
            header.push_str(&span(VARIABLE_NAME_SELECTOR, element.name()));
            let accessors: Vec<_> = accessors
                .iter()
                .map(|accessor| format!("{};", span(KEYWORD_SELECTOR, accessor)))
                .collect();
            header.push_str(&format!(" {{ {} }}", accessors.join(" ")));
        }
        Converted {
            header,
            documentation: self.member_documentation(id, current_parent, indent),
            ..Converted::default()
        }
    }

    fn field(&self, id: ElementId, current_parent: Option<ElementId>, indent: &str) -> Converted {
        let element = &self.model[id];
        let mut header = self.modifiers(element.modifiers());
        if let ElementBody::Field { value_type, names } = element.body() {
            header.push_str(&self.identity(value_type, current_parent, TYPE_SELECTOR, TYPE_SELECTOR, false));
            header.push(' ');
            header.push_str(&span(VARIABLE_NAME_SELECTOR, &names.join(", ")));
        }
        Converted {
            header,
            documentation: self.member_documentation(id, current_parent, indent),
            ..Converted::default()
        }
    }

    /// Constructors, destructors, methods and operators.
    fn callable(&self, id: ElementId, current_parent: Option<ElementId>, indent: &str) -> Converted {
        let element = &self.model[id];
        let mut header = self.modifiers(element.modifiers());
        if let Some(return_type) = element.return_type() {
            header.push_str(&self.identity(return_type, current_parent, TYPE_SELECTOR, TYPE_SELECTOR, false));
            header.push(' ');
        }
        if element.kind() == ElementKind::Operator {
            header.push_str(&span(KEYWORD_SELECTOR, "operator"));
            header.push(' ');
        }
        header.push_str(&self.identity(
            element.declaration(),
            current_parent,
            METHOD_SELECTOR,
            TYPE_PARAMETER_SELECTOR,
            false,
        ));
        header.push_str(&self.parameters(id, current_parent));
        Converted {
            header,
            documentation: self.member_documentation(id, current_parent, indent),
            ..Converted::default()
        }
    }

    /// A property, field or callable written to its own unit. The signature
    /// in the unit links relative to the unit; the caller gets a link to it.
    fn member_unit(&self, id: ElementId, current_parent: Option<ElementId>) -> Converted {
        let element = &self.model[id];
        let unit = Some(id);
        let inline = match element.kind() {
            ElementKind::Property => self.property(id, unit, ""),
            ElementKind::Field => self.field(id, unit, ""),
            _ => self.callable(id, unit, ""),
        };
        let hash = element.declaration().hash();
        let selector = match element.kind() {
            ElementKind::Property | ElementKind::Field => VARIABLE_NAME_SELECTOR,
            _ => METHOD_SELECTOR,
        };
        let display_header = span(
            selector,
            &format!(
                "[{}]({})",
                element.name(),
                paths::link(self.model, self.separate, id, current_parent)
            ),
        );
        Converted {
            header: format!("<a name=\"{hash}\" id=\"{hash}\"></a>\n\n## {}\n\n", inline.header),
            documentation: inline.documentation,
            content: String::new(),
            display_header: Some(display_header),
        }
    }

    fn delegate(&self, id: ElementId, current_parent: Option<ElementId>, indent: &str) -> Converted {
        let signature = self.delegate_signature(id, current_parent, false);
        Converted {
            header: type_header(&signature, indent),
            documentation: self.member_documentation(id, current_parent, indent),
            ..Converted::default()
        }
    }

    fn delegate_unit(&self, id: ElementId, current_parent: Option<ElementId>) -> Converted {
        let unit = Some(id);
        Converted {
            header: type_header(&self.delegate_signature(id, unit, true), ""),
            documentation: self.member_documentation(id, unit, ""),
            content: String::new(),
            display_header: Some(self.delegate_display(id, current_parent)),
        }
    }

    fn delegate_signature(&self, id: ElementId, current_parent: Option<ElementId>, anchor: bool) -> String {
        let element = &self.model[id];
        let mut signature = self.modifiers(element.modifiers());
        signature.push_str(&span(KEYWORD_SELECTOR, "delegate"));
        signature.push(' ');
        signature.push_str(&self.delegate_body(id, current_parent, anchor));
        signature
    }

    fn delegate_display(&self, id: ElementId, current_parent: Option<ElementId>) -> String {
        self.delegate_body(id, current_parent, false)
    }

    /// Return type, name and parameters of a delegate.
    fn delegate_body(&self, id: ElementId, current_parent: Option<ElementId>, anchor: bool) -> String {
        let element = &self.model[id];
        let mut body = String::new();
        if let Some(return_type) = element.return_type() {
            body.push_str(&self.identity(return_type, current_parent, TYPE_SELECTOR, TYPE_SELECTOR, false));
            body.push(' ');
        }
        body.push_str(&self.identity(
            element.declaration(),
            current_parent,
            TYPE_SELECTOR,
            TYPE_PARAMETER_SELECTOR,
            anchor,
        ));
        body.push_str(&self.parameters(id, current_parent));
        body
    }

    fn type_inline(&mut self, id: ElementId, current_parent: Option<ElementId>, indent: &str) -> Result<Converted, Error> {
        let model = self.model;
        let element = &model[id];
        let declaration = self.identity(
            element.declaration(),
            current_parent,
            TYPE_SELECTOR,
            TYPE_PARAMETER_SELECTOR,
            true,
        );
        let header_indent = if indent.is_empty() {
            String::new()
        } else {
            format!("{indent}{NESTING}")
        };
        let member_indent = format!("{header_indent}{NESTING}");

        let mut content = String::new();
        let mut current_kind = None;
        for &member in element.children() {
            let kind = self.model[member].kind();
            if current_kind != Some(kind) {
                content.push_str(&format!(
                    "{header_indent}- <span class=\"{LIST_HEADER_SELECTOR}\"> __{}__ </span>\n",
                    kind.plural()
                ));
                current_kind = Some(kind);
            }
            let converted = self.convert(member, current_parent, &member_indent)?;
            content.push_str(&format!(
                "{member_indent}- <span class=\"{LIST_ELEMENT_SELECTOR}\"> {converted}{member_indent}  </span>\n"
            ));
        }
        if element.children().is_empty() {
            content.push_str(&format!("{header_indent}- {NO_CONTENT}\n"));
        }

        let documentation = match element.documentation() {
            Some(docs) => format!(
                "{header_indent}- __Documentation__\n{header_indent}{}\n",
                self.documentation(Some(docs), current_parent, &format!("{header_indent}{NESTING}"))
            ),
            None => String::new(),
        };

        Ok(Converted {
            header: type_header(&declaration, indent),
            documentation,
            content,
            display_header: None,
        })
    }

    /// A type written to its own unit; its members link relative to it.
    fn type_unit(&mut self, id: ElementId, current_parent: Option<ElementId>) -> Result<Converted, Error> {
        let model = self.model;
        let element = &model[id];
        let unit = Some(id);
        let header = self.identity(element.declaration(), unit, TYPE_SELECTOR, TYPE_PARAMETER_SELECTOR, true);
        let display_header = self.identity(
            element.declaration(),
            current_parent,
            TYPE_SELECTOR,
            TYPE_PARAMETER_SELECTOR,
            false,
        );

        let mut content = String::from("\n\n");
        let mut current_kind = None;
        for &member in element.children() {
            let kind = self.model[member].kind();
            if current_kind != Some(kind) {
                content.push_str(&format!(
                    "\n\n<span class=\"{LIST_HEADER_SELECTOR}\"> __{}__ </span>\n\n",
                    kind.plural()
                ));
                current_kind = Some(kind);
            }
            let converted = self.convert(member, unit, NESTING)?;
            content.push_str(&format!(
                "- <span class=\"{LIST_ELEMENT_SELECTOR}\"> {converted}  </span>\n"
            ));
        }
        if element.children().is_empty() {
            content.push_str(&format!("- {NO_CONTENT}\n"));
        }

        let documentation = match element.documentation() {
            Some(docs) => format!(
                "\n- __Documentation__\n{}\n",
                self.documentation(Some(docs), unit, NESTING)
            ),
            None => String::new(),
        };

        Ok(Converted {
            header: type_header(&header, ""),
            documentation,
            content,
            display_header: Some(display_header),
        })
    }

    fn enumeration(&self, id: ElementId, current_parent: Option<ElementId>, indent: &str) -> Converted {
        let element = &self.model[id];
        let declaration = self.identity(
            element.declaration(),
            current_parent,
            TYPE_SELECTOR,
            TYPE_PARAMETER_SELECTOR,
            true,
        );
        let mut content = format!("{indent}Elements:\n{indent}");
        match enum_items(element.body()) {
            [] => content.push_str(&format!("- {NO_CONTENT}\n")),
            items => content.push_str(&items.join(", ")),
        }
        Converted {
            header: type_header(&declaration, indent),
            documentation: self.member_documentation(id, current_parent, indent),
            content,
            display_header: None,
        }
    }

    fn enumeration_unit(&self, id: ElementId, current_parent: Option<ElementId>) -> Converted {
        let element = &self.model[id];
        let unit = Some(id);
        let header = self.identity(element.declaration(), unit, TYPE_SELECTOR, TYPE_PARAMETER_SELECTOR, true);
        let display_header = self.identity(
            element.declaration(),
            current_parent,
            TYPE_SELECTOR,
            TYPE_PARAMETER_SELECTOR,
            false,
        );
        let mut content = String::from("\n\nElements:\n");
        match enum_items(element.body()) {
            [] => content.push_str(&format!("- {NO_CONTENT}\n")),
            items => {
                for item in items {
                    content.push_str(&format!("- {item}\n"));
                }
            }
        }
        Converted {
            header: type_header(&header, ""),
            documentation: self.member_documentation(id, unit, ""),
            content,
            display_header: Some(display_header),
        }
    }

    fn parameters(&self, id: ElementId, current_parent: Option<ElementId>) -> String {
        let parameters: Vec<_> = self.model[id]
            .parameters()
            .iter()
            .map(|&parameter| {
                let parameter = &self.model[parameter];
                let mut out = self.modifiers(parameter.modifiers());
                if let ElementBody::Field { value_type, names } = parameter.body() {
                    out.push_str(&self.identity(value_type, current_parent, TYPE_SELECTOR, TYPE_SELECTOR, false));
                    out.push(' ');
                    out.push_str(&span(PARAMETER_NAME_SELECTOR, &names.join(", ")));
                }
                out
            })
            .collect();
        format!("({})", parameters.join(", "))
    }

    fn modifiers(&self, modifiers: Option<&str>) -> String {
        modifiers
            .map(|modifiers| format!("{} ", span(KEYWORD_SELECTOR, modifiers)))
            .unwrap_or_default()
    }

    /// Renders an identity. Resolved names become links to their target; in
    /// `anchor` mode the main name is the link target itself.
    fn identity(
        &self,
        identity: &Identity,
        current_parent: Option<ElementId>,
        selector: &str,
        sub_selector: &str,
        anchor: bool,
    ) -> String {
        let main = identity.main();
        let mut out = match main.resolved_target() {
            Some(target) => {
                let content = if anchor {
                    let hash = self.model[target].declaration().hash();
                    format!("<a name=\"{hash}\" id=\"{hash}\">{}</a>", main.name())
                } else {
                    format!(
                        "[{}]({})",
                        main.name(),
                        paths::link(self.model, self.separate, target, current_parent)
                    )
                };
                match kind_selector(self.model[target].kind()) {
                    Some(kind) => span(&format!("{selector} {kind}"), &content),
                    None => span(selector, &content),
                }
            }
            None => span(selector, main.name()),
        };

        if identity.is_generic() {
            let sub_types: Vec<_> = identity
                .sub_types()
                .iter()
                .map(|sub| self.identity(sub, current_parent, sub_selector, sub_selector, false))
                .collect();
            out.push_str(&format!("&lt;{}&gt;", sub_types.join(", ")));
        }
        out
    }

    fn member_documentation(&self, id: ElementId, current_parent: Option<ElementId>, indent: &str) -> String {
        let indent = format!("{indent}{NESTING}");
        self.documentation(self.model[id].documentation(), current_parent, &indent)
    }

    /// The `| Name | Description |` table of a documentation block.
    fn documentation(&self, docs: Option<&DocBlock>, current_parent: Option<ElementId>, indent: &str) -> String {
        let Some(docs) = docs.filter(|docs| !docs.is_empty()) else {
            return String::new();
        };

        let mut table = format!("\n{indent}\n{indent}| Name | Description |\n{indent}| --- | --- |\n");
        let single = [
            ("Description", &docs.summary),
            ("Returns", &docs.returns),
            ("Remarks", &docs.remarks),
        ];
        for (name, element) in single {
            if let Some(element) = element {
                table.push_str(&format!(
                    "{indent}| __{name}__ | {} |\n",
                    self.doc_text(element, current_parent)
                ));
            }
        }

        let lists = [
            ("Parameters", &docs.parameters),
            ("Exceptions", &docs.exceptions),
            ("Examples", &docs.examples),
            ("See Also", &docs.see_also),
        ];
        for (name, elements) in lists {
            if elements.is_empty() {
                continue;
            }
            let items: String = elements
                .iter()
                .map(|element| self.list_item(element, current_parent))
                .collect();
            table.push_str(&format!("{indent}| __{name}__ | <ul>{items}</ul> |\n"));
        }
        table
    }

    fn list_item(&self, element: &DocElement, current_parent: Option<ElementId>) -> String {
        let text = self.doc_text(element, current_parent);
        let label = match element.kind() {
            DocElementKind::Param | DocElementKind::Typeparam => element.name().map(str::to_string),
            _ => element
                .cref()
                .map(|cref| self.identity(cref, current_parent, TYPE_SELECTOR, TYPE_PARAMETER_SELECTOR, false)),
        };
        match label {
            Some(label) if text.is_empty() => format!("<li>{label}</li>"),
            Some(label) => format!("<li>{label} - {text}</li>"),
            None => format!("<li>{text}</li>"),
        }
    }

    /// Prose of a documentation element, safe for a table cell.
    fn doc_text(&self, element: &DocElement, current_parent: Option<ElementId>) -> String {
        self.expand(element, current_parent)
            .replace('|', "\\|")
            .replace('\n', "<br>")
    }

    fn expand(&self, element: &DocElement, current_parent: Option<ElementId>) -> String {
        element.expand(|sub| self.inline(sub, current_parent))
    }

    fn inline(&self, element: &DocElement, current_parent: Option<ElementId>) -> String {
        match element.kind() {
            DocElementKind::Paramref | DocElementKind::Typeparamref => {
                format!("<b><i>{}</i></b>", element.name().unwrap_or_default())
            }
            DocElementKind::C | DocElementKind::Code => {
                format!("<code>{}</code>", self.expand(element, current_parent).replace('\n', "<br>"))
            }
            DocElementKind::Para => format!("<p>{}</p>", self.expand(element, current_parent)),
            DocElementKind::See | DocElementKind::SeeAlso => {
                let text = self.expand(element, current_parent);
                match element.cref() {
                    Some(cref) => match cref.resolved_target() {
                        Some(target) if !text.is_empty() => span(
                            TYPE_SELECTOR,
                            &format!(
                                "[{text}]({})",
                                paths::link(self.model, self.separate, target, current_parent)
                            ),
                        ),
                        _ => self.identity(cref, current_parent, TYPE_SELECTOR, TYPE_PARAMETER_SELECTOR, false),
                    },
                    None => text,
                }
            }
            _ => self.expand(element, current_parent),
        }
    }

    /// Namespace tree of the index document.
    ///
    /// Path segments without a namespace of their own and with exactly one
    /// child are folded into their child's label (`A.B`).
    fn menu(&self) -> String {
        let root = self.index.node(self.index.root());
        let mut menu = String::new();

        if let Some(global) = root.namespace() {
            let symbol = if root.children().is_empty() { LAST } else { BRANCH };
            let declaration = self.model[global].declaration();
            menu.push_str(&format!(
                "{symbol} [{}](#{})  \n",
                declaration.name(),
                declaration.hash()
            ));
        }

        let count = root.children().len();
        for (i, &child) in root.children().iter().enumerate() {
            self.menu_node(child, "", "", i + 1 == count, &mut menu);
        }
        menu
    }

    fn menu_node(&self, id: IndexNodeId, indent: &str, prefix: &str, last: bool, menu: &mut String) {
        let node = self.index.node(id);
        let path = if prefix.is_empty() {
            node.name().to_string()
        } else {
            format!("{prefix}.{}", node.name())
        };

        let (indent, prefix) = if node.children().len() != 1 || node.namespace().is_some() {
            let symbol = if last { LAST } else { BRANCH };
            match node.namespace() {
                Some(namespace) => menu.push_str(&format!(
                    "{indent}{symbol} [{path}](#{})  \n",
                    self.model[namespace].declaration().hash()
                )),
                None => menu.push_str(&format!("{indent}{symbol} {path}  \n")),
            }
            let continuation = if last { "&emsp;&emsp;" } else { "║&emsp;&emsp;" };
            (format!("{indent}{continuation}"), String::new())
        } else {
            (indent.to_string(), path)
        };

        let count = node.children().len();
        for (i, &child) in node.children().iter().enumerate() {
            self.menu_node(child, &indent, &prefix, i + 1 == count, menu);
        }
    }
}

const BRANCH: &str = "╠═";
const LAST: &str = "╚═";

fn span(selector: &str, content: &str) -> String {
    format!("<span class=\"{selector}\">{content}</span>")
}

/// Top-level headers become markdown headings; nested ones stay inline.
fn type_header(content: &str, indent: &str) -> String {
    if indent.is_empty() {
        format!("## {content}\n\n")
    } else {
        format!("{content}\n\n")
    }
}

fn kind_selector(kind: ElementKind) -> Option<&'static str> {
    match kind {
        ElementKind::Class | ElementKind::Record => Some("ClassDeclaration"),
        ElementKind::Struct => Some("StructDeclaration"),
        ElementKind::Interface => Some("InterfaceDeclaration"),
        ElementKind::Delegate => Some("DelegateDeclaration"),
        ElementKind::Enum => Some("EnumDeclaration"),
        _ => None,
    }
}

fn enum_items(body: &ElementBody) -> &[String] {
    match body {
        ElementBody::Enum { items } => items,
        _ => &[],
    }
}
