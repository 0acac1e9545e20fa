//! The core diagnostic type.
//!
//! A [`Diagnostic`] is a single error or warning with an optional error code
//! and help text. Load diagnostics (E0xx) label a span of the source unit's
//! JSON; documentation and build diagnostics (E1xx, E2xx) name the C#
//! position of the declaration they concern.

use std::fmt;

use crate::{
    error::{
        Severity,
        error_code::ErrorCode,
        label::{Label, Origin},
    },
    span::Span,
};

/// A diagnostic message with optional location information.
///
/// ```text
/// error[E201]: field `count` has no type
///   = help: export the declared `type` of the member (declared in src/Counter.cs:12:5)
/// ```
#[derive(Debug, Clone)]
pub struct Diagnostic {
    severity: Severity,
    code: Option<ErrorCode>,
    message: String,
    label: Option<Label>,
    origin: Option<Origin>,
    help: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    ///
    /// ```
    /// # use docweave_parser::error::{Diagnostic, ErrorCode, Origin};
    /// let diag = Diagnostic::error("namespace declaration has no name")
    ///     .with_code(ErrorCode::E200)
    ///     .with_origin(Origin::new("src/Lib.cs").at(1, 1));
    /// assert!(diag.severity().is_error());
    /// ```
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The span of the source unit text this diagnostic points at.
    pub fn label(&self) -> Option<&Label> {
        self.label.as_ref()
    }

    /// Where in the C# sources the offending declaration was read from.
    pub fn origin(&self) -> Option<&Origin> {
        self.origin.as_ref()
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Set the error code.
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Point at a span of the source unit text.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.label = Some(Label::new(span, message));
        self
    }

    /// Record the declaration's position in the C# sources.
    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Set the help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            label: None,
            origin: None,
            help: None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // "error[E201]: message" or "warning: message"
        write!(f, "{}", self.severity)?;
        if let Some(code) = self.code {
            write!(f, "[{code}]")?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for Diagnostic {}
