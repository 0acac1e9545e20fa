//! Parsed documentation comments.
//!
//! A [`DocBlock`] holds the top-level sections of one documentation comment.
//! Each section is a [`DocElement`] whose `text` is a template: nested markup
//! is replaced by positional `{i}` placeholders that refer to
//! [`DocElement::sub_elements`]. Literal braces in prose are stored doubled
//! (`{{`, `}}`) so they never collide with placeholders.

use std::fmt;

use indexmap::IndexMap;

use crate::identity::Identity;

/// Attribute key under which a resolved cross-reference is stored.
pub const CREF: &str = "cref";

/// Attribute key of `param`, `typeparam`, `paramref` and `typeparamref` tags.
pub const NAME: &str = "name";

/// Recognized documentation tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocElementKind {
    Summary,
    Remarks,
    Returns,
    Param,
    Paramref,
    Exception,
    Value,
    Para,
    List,
    ListHeader,
    Item,
    Term,
    Description,
    C,
    Code,
    Example,
    See,
    SeeAlso,
    Typeparam,
    Typeparamref,
}

impl DocElementKind {
    /// Looks up a tag by its name as written in the comment.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let kind = match tag {
            "summary" => DocElementKind::Summary,
            "remarks" => DocElementKind::Remarks,
            "returns" => DocElementKind::Returns,
            "param" => DocElementKind::Param,
            "paramref" => DocElementKind::Paramref,
            "exception" => DocElementKind::Exception,
            "value" => DocElementKind::Value,
            "para" => DocElementKind::Para,
            "list" => DocElementKind::List,
            "listheader" => DocElementKind::ListHeader,
            "item" => DocElementKind::Item,
            "term" => DocElementKind::Term,
            "description" => DocElementKind::Description,
            "c" => DocElementKind::C,
            "code" => DocElementKind::Code,
            "example" => DocElementKind::Example,
            "see" => DocElementKind::See,
            "seealso" => DocElementKind::SeeAlso,
            "typeparam" => DocElementKind::Typeparam,
            "typeparamref" => DocElementKind::Typeparamref,
            _ => return None,
        };
        Some(kind)
    }

    /// The tag name, as used in the structured XML output.
    pub fn tag(&self) -> &'static str {
        match self {
            DocElementKind::Summary => "summary",
            DocElementKind::Remarks => "remarks",
            DocElementKind::Returns => "returns",
            DocElementKind::Param => "param",
            DocElementKind::Paramref => "paramref",
            DocElementKind::Exception => "exception",
            DocElementKind::Value => "value",
            DocElementKind::Para => "para",
            DocElementKind::List => "list",
            DocElementKind::ListHeader => "listheader",
            DocElementKind::Item => "item",
            DocElementKind::Term => "term",
            DocElementKind::Description => "description",
            DocElementKind::C => "c",
            DocElementKind::Code => "code",
            DocElementKind::Example => "example",
            DocElementKind::See => "see",
            DocElementKind::SeeAlso => "seealso",
            DocElementKind::Typeparam => "typeparam",
            DocElementKind::Typeparamref => "typeparamref",
        }
    }
}

impl fmt::Display for DocElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// One documentation tag with its prose and nested markup.
#[derive(Debug, Clone)]
pub struct DocElement {
    kind: DocElementKind,
    text: String,
    sub_elements: Vec<DocElement>,
    attributes: IndexMap<String, Identity>,
}

impl DocElement {
    pub fn new(kind: DocElementKind) -> Self {
        Self {
            kind,
            text: String::new(),
            sub_elements: Vec::new(),
            attributes: IndexMap::new(),
        }
    }

    pub fn kind(&self) -> DocElementKind {
        self.kind
    }

    /// The raw template, with `{i}` placeholders and doubled literal braces.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn sub_elements(&self) -> &[DocElement] {
        &self.sub_elements
    }

    pub fn attributes(&self) -> &IndexMap<String, Identity> {
        &self.attributes
    }

    pub fn attribute(&self, key: &str) -> Option<&Identity> {
        self.attributes.get(key)
    }

    /// The cross-reference target of `see`, `seealso` and `exception` tags.
    pub fn cref(&self) -> Option<&Identity> {
        self.attribute(CREF)
    }

    /// The `name` attribute of parameter tags.
    pub fn name(&self) -> Option<&str> {
        self.attribute(NAME).map(Identity::name)
    }

    /// Appends prose, escaping braces.
    pub fn push_text(&mut self, text: &str) {
        for c in text.chars() {
            match c {
                '{' => self.text.push_str("{{"),
                '}' => self.text.push_str("}}"),
                c => self.text.push(c),
            }
        }
    }

    /// Appends a nested element and its placeholder.
    pub fn push_nested(&mut self, element: DocElement) {
        self.text.push('{');
        self.text.push_str(&self.sub_elements.len().to_string());
        self.text.push('}');
        self.sub_elements.push(element);
    }

    pub fn insert_attribute(&mut self, key: impl Into<String>, value: Identity) {
        self.attributes.insert(key.into(), value);
    }

    /// Trims leading and trailing whitespace of the template.
    pub fn trim(&mut self) {
        let trimmed = self.text.trim();
        if trimmed.len() != self.text.len() {
            self.text = trimmed.to_string();
        }
    }

    /// Substitutes every placeholder with `render(sub_element)` and unescapes
    /// literal braces. Placeholders without a matching sub-element are kept
    /// verbatim.
    pub fn expand<F>(&self, mut render: F) -> String
    where
        F: FnMut(&DocElement) -> String,
    {
        let mut out = String::with_capacity(self.text.len());
        let mut chars = self.text.char_indices().peekable();

        while let Some((start, c)) = chars.next() {
            match c {
                '{' if chars.peek().is_some_and(|&(_, next)| next == '{') => {
                    chars.next();
                    out.push('{');
                }
                '}' if chars.peek().is_some_and(|&(_, next)| next == '}') => {
                    chars.next();
                    out.push('}');
                }
                '{' => {
                    let rest = &self.text[start + 1..];
                    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
                    let closed = rest[digits..].starts_with('}');
                    let element = rest[..digits]
                        .parse::<usize>()
                        .ok()
                        .filter(|_| closed)
                        .and_then(|i| self.sub_elements.get(i));
                    match element {
                        Some(element) => {
                            out.push_str(&render(element));
                            for _ in 0..=digits {
                                chars.next();
                            }
                        }
                        None => out.push('{'),
                    }
                }
                c => out.push(c),
            }
        }

        out
    }

    /// Prose with nested markup flattened to its own plain text.
    pub fn plain_text(&self) -> String {
        self.expand(|sub| {
            let text = sub.plain_text();
            if text.is_empty() {
                sub.cref()
                    .map(|cref| cref.name().to_string())
                    .or_else(|| sub.name().map(str::to_string))
                    .unwrap_or_default()
            } else {
                text
            }
        })
    }
}

/// A parsed documentation comment.
#[derive(Debug, Clone, Default)]
pub struct DocBlock {
    pub summary: Option<DocElement>,
    pub remarks: Option<DocElement>,
    pub returns: Option<DocElement>,
    /// `param` entries followed by `typeparam` entries.
    pub parameters: Vec<DocElement>,
    pub exceptions: Vec<DocElement>,
    pub examples: Vec<DocElement>,
    pub see_also: Vec<DocElement>,
    pub skip: bool,
}

impl DocBlock {
    /// A block carrying only the skip directive.
    pub fn skipped() -> Self {
        Self {
            skip: true,
            ..Self::default()
        }
    }

    pub fn is_skipped(&self) -> bool {
        self.skip
    }

    pub fn is_empty(&self) -> bool {
        self.summary.is_none()
            && self.remarks.is_none()
            && self.returns.is_none()
            && self.parameters.is_empty()
            && self.exceptions.is_empty()
            && self.examples.is_empty()
            && self.see_also.is_empty()
    }
}
