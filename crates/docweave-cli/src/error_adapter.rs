//! Rendering docweave failures as miette reports.
//!
//! Every diagnostic inside a [`DocweaveError::Parse`] becomes its own
//! [`Report`]. Load diagnostics show a snippet of the source unit JSON under
//! their label. Documentation and build diagnostics have no JSON to show, so
//! their C# origin is folded into the help line instead.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use docweave::DocweaveError;
use docweave_parser::{Diagnostic, Severity, Span};

/// One report for the terminal.
#[derive(Debug)]
pub struct Report<'a> {
    message: String,
    code: Option<String>,
    severity: miette::Severity,
    help: Option<String>,
    /// Source unit text, present only when the label can point into it.
    src: Option<&'a str>,
    label: Option<LabeledSpan>,
    cause: Option<&'a (dyn std::error::Error + 'static)>,
}

impl<'a> Report<'a> {
    /// Report a diagnostic raised while loading `src` or building from it.
    pub fn from_diagnostic(diag: &Diagnostic, src: &'a str) -> Self {
        let src = (!src.is_empty()).then_some(src);
        let label = src.and(diag.label()).map(|label| {
            LabeledSpan::new_primary_with_span(
                Some(label.message().to_string()),
                span_to_miette(label.span()),
            )
        });
        let help = match (diag.help(), diag.origin()) {
            (Some(help), Some(origin)) => Some(format!("{help} (declared in {origin})")),
            (Some(help), None) => Some(help.to_string()),
            (None, Some(origin)) => Some(format!("declared in {origin}")),
            (None, None) => None,
        };

        Self {
            message: diag.message().to_string(),
            code: diag.code().map(|code| code.to_string()),
            severity: match diag.severity() {
                Severity::Error => miette::Severity::Error,
                Severity::Warning => miette::Severity::Warning,
            },
            help,
            src: label.as_ref().and(src),
            label,
            cause: None,
        }
    }

    /// Report an I/O, export or configuration failure.
    pub fn from_error(err: &'a DocweaveError) -> Self {
        let code = match err {
            DocweaveError::Io(_) => Some("docweave::io"),
            DocweaveError::Parse { .. } => None,
            DocweaveError::Export(_) => Some("docweave::export"),
            DocweaveError::Config(_) => Some("docweave::config"),
        };

        Self {
            message: err.to_string(),
            code: code.map(str::to_string),
            severity: miette::Severity::Error,
            help: None,
            src: None,
            label: None,
            cause: std::error::Error::source(err),
        }
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Report<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
    }
}

impl MietteDiagnostic for Report<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.code
            .as_ref()
            .map(|code| Box::new(code) as Box<dyn fmt::Display>)
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(self.severity)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.help
            .as_ref()
            .map(|help| Box::new(help) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        self.src.as_ref().map(|src| src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        self.label
            .clone()
            .map(|label| Box::new(std::iter::once(label)) as Box<dyn Iterator<Item = LabeledSpan>>)
    }
}

fn span_to_miette(span: Span) -> SourceSpan {
    SourceSpan::new(span.start().into(), span.len())
}

/// Split a [`DocweaveError`] into the reports to print, one per diagnostic.
pub fn to_reports(err: &DocweaveError) -> Vec<Report<'_>> {
    match err {
        DocweaveError::Parse { err: parse_err, src } => parse_err
            .diagnostics()
            .iter()
            .map(|diag| Report::from_diagnostic(diag, src))
            .collect(),
        _ => vec![Report::from_error(err)],
    }
}

#[cfg(test)]
mod tests {
    use docweave_parser::{ErrorCode, Origin, ParseError};

    use super::*;

    #[test]
    fn test_load_error_shows_its_label() {
        let diag = Diagnostic::error("malformed source unit: expected value")
            .with_code(ErrorCode::E001)
            .with_label(Span::new(2..5), "here")
            .with_help("source units must be valid JSON");
        let err = DocweaveError::new_parse_error(ParseError::from(diag), "{ bad");

        let reports = to_reports(&err);
        assert_eq!(reports.len(), 1);

        let report = &reports[0];
        assert_eq!(report.to_string(), "malformed source unit: expected value");
        assert_eq!(report.code().map(|c| c.to_string()).as_deref(), Some("E001"));
        assert!(report.source_code().is_some());
        let labels: Vec<_> = report.labels().expect("labelled").collect();
        assert_eq!(labels.len(), 1);
        assert!(labels[0].primary());
        assert_eq!(labels[0].label(), Some("here"));
        assert_eq!(labels[0].offset(), 2);
        assert_eq!(
            report.help().map(|h| h.to_string()).as_deref(),
            Some("source units must be valid JSON")
        );
    }

    #[test]
    fn test_build_errors_name_their_origin() {
        let diags = vec![
            Diagnostic::error("field `A` has no type")
                .with_code(ErrorCode::E201)
                .with_origin(Origin::new("Shapes.cs").at(4, 9))
                .with_help("export the declared `type` of the member"),
            Diagnostic::error("method `B` has no return type")
                .with_code(ErrorCode::E202)
                .with_origin(Origin::new("Shapes.cs")),
        ];
        let err = DocweaveError::new_parse_error(ParseError::from(diags), "");

        let reports = to_reports(&err);

        assert_eq!(reports.len(), 2);
        assert!(reports[0].source_code().is_none());
        assert!(reports[0].labels().is_none());
        assert_eq!(
            reports[0].help().map(|h| h.to_string()).as_deref(),
            Some("export the declared `type` of the member (declared in Shapes.cs:4:9)")
        );
        assert_eq!(reports[1].code().map(|c| c.to_string()).as_deref(), Some("E202"));
        assert_eq!(
            reports[1].help().map(|h| h.to_string()).as_deref(),
            Some("declared in Shapes.cs")
        );
    }

    #[test]
    fn test_label_without_source_is_dropped() {
        let diag = Diagnostic::error("malformed source unit")
            .with_code(ErrorCode::E001)
            .with_label(Span::new(0..1), "here");

        let report = Report::from_diagnostic(&diag, "");

        assert!(report.source_code().is_none());
        assert!(report.labels().is_none());
    }

    #[test]
    fn test_unresolved_cref_is_a_warning() {
        let diag = Diagnostic::warning("cannot resolve cross-reference `T:A.Gone` on `A.Foo`")
            .with_code(ErrorCode::E101);

        let report = Report::from_diagnostic(&diag, "");

        assert_eq!(report.severity(), Some(miette::Severity::Warning));
        assert!(report.help().is_none());
    }

    #[test]
    fn test_non_parse_error() {
        let err = DocweaveError::Config("bad value".to_string());

        let reports = to_reports(&err);

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].to_string(), "Configuration error: bad value");
        assert_eq!(
            reports[0].code().map(|c| c.to_string()).as_deref(),
            Some("docweave::config")
        );
        assert_eq!(reports[0].severity(), Some(miette::Severity::Error));
    }
}
