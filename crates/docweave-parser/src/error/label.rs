//! Positions attached to diagnostics.
//!
//! A load diagnostic points into the JSON text of the source unit with a
//! [`Label`]. A build diagnostic cannot: the declaration text belongs to the
//! external front end, so it carries the [`Origin`] the front end recorded.

use std::fmt;

use crate::span::Span;

/// A message attached to a span of the source unit's JSON text.
///
/// ```text
/// error[E002]: invalid source unit structure: invalid type: map, expected a sequence
///   --> 1:12
///    |
///  1 | { "nodes": { "kind": "class" } }
///    |            ^ unexpected value
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    span: Span,
    message: String,
}

impl Label {
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// The C# file and position a declaration was read from.
///
/// Displays as `path:line:column`, or just `path` when the front end
/// exported no position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    path: String,
    position: Option<(usize, usize)>,
}

impl Origin {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            position: None,
        }
    }

    /// Pin the origin to a line and column.
    pub fn at(mut self, line: usize, column: usize) -> Self {
        self.position = Some((line, column));
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn line(&self) -> Option<usize> {
        self.position.map(|(line, _)| line)
    }

    pub fn column(&self) -> Option<usize> {
        self.position.map(|(_, column)| column)
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position {
            Some((line, column)) => write!(f, "{}:{line}:{column}", self.path),
            None => f.write_str(&self.path),
        }
    }
}
