//! Error codes for docweave diagnostics.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Source unit loading errors
//! - `E1xx` - Documentation comment warnings
//! - `E2xx` - Tree building errors

use std::fmt;

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Source Unit Errors (E0xx)
    // =========================================================================
    /// Malformed source unit.
    ///
    /// The text is not valid JSON, or ends before the document is complete.
    E001,

    /// Invalid source unit structure.
    ///
    /// The JSON is well formed but does not describe a source unit: a
    /// required field is missing or a value has the wrong type.
    E002,

    // =========================================================================
    // Documentation Comment Warnings (E1xx)
    // =========================================================================
    /// Parameter tag without a name.
    ///
    /// A `param` or `typeparam` tag has no `name` attribute, so it cannot be
    /// matched to a parameter.
    E100,

    /// Unresolved cross-reference.
    ///
    /// The front end could not resolve the `cref` attribute of a tag to a
    /// symbol. The attribute is dropped and the tag renders as plain text.
    E101,

    // =========================================================================
    // Tree Building Errors (E2xx)
    // =========================================================================
    /// Namespace without a name.
    E200,

    /// Field or property without a type.
    E201,

    /// Method or delegate without a return type.
    E202,

    /// Declaration nested where it cannot be owned.
    ///
    /// For example, a member declared inside an enum.
    E203,
}

impl ErrorCode {
    /// Returns the code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            // Source unit errors
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            // Documentation comment warnings
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            // Tree building errors
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
            ErrorCode::E203 => "E203",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "malformed source unit",
            ErrorCode::E002 => "invalid source unit structure",
            ErrorCode::E100 => "parameter tag without a name",
            ErrorCode::E101 => "unresolved cross-reference",
            ErrorCode::E200 => "namespace without a name",
            ErrorCode::E201 => "member without a type",
            ErrorCode::E202 => "missing return type",
            ErrorCode::E203 => "misplaced declaration",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
