//! Diagnostics for source-unit loading and tree building.
//!
//! This module provides an error handling system with:
//! - Error codes for documentation and searchability
//! - A labeled span into the source unit text for load errors
//! - The C# origin of the declaration for build errors
//! - Severity levels
//! - Diagnostic collector for accumulating multiple errors and warnings
//!
//! # Overview
//!
//! The error system is built around the [`Diagnostic`] type, which represents
//! a single error or warning message with optional error code, source
//! locations, and help text. Fatal diagnostics are wrapped in [`ParseError`]
//! when a build fails; warnings travel with a successful
//! [`BuildOutput`](crate::BuildOutput).
//!
//! # Example
//!
//! ```
//! # use docweave_parser::error::{Diagnostic, ErrorCode};
//! # use docweave_parser::Span;
//!
//! let diag = Diagnostic::error("expected `,` or `]`")
//!     .with_code(ErrorCode::E001)
//!     .with_label(Span::new(40..41), "unexpected character")
//!     .with_help("source units must be valid JSON");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::{Label, Origin};
pub use parse_error::{ParseError, Result};
pub use severity::Severity;
