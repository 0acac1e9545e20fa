//! # docweave Parser
//!
//! Turns the source units delivered by an external compiler front end into a
//! resolved [`ProjectTree`](docweave_core::ProjectTree). This crate provides the pipeline from JSON text
//! to the code-element model:
//!
//! 1. **Load** - Deserialize a source unit ([`load_unit`])
//! 2. **Visit** - Walk every declaration, parsing documentation comments and
//!    creating elements ([`TreeBuilder::add_unit`])
//! 3. **Resolve** - Fill every queued reference once all units are in
//!    ([`TreeBuilder::finish`])
//!
//! ## Usage
//!
//! ```
//! # use docweave_parser::{BuildConfig, ParseError, build, load_unit};
//!
//! fn main() -> Result<(), ParseError> {
//!     let unit = load_unit(r#"{
//!         "project": "Shapes",
//!         "path": "Circle.cs",
//!         "nodes": [ { "kind": "namespace", "name": "Shapes", "members": [
//!             { "kind": "class", "name": "Circle" }
//!         ] } ]
//!     }"#)?;
//!
//!     let output = build(&[unit], BuildConfig::default())?;
//!     assert_eq!(output.tree().model().len(), 2);
//!     Ok(())
//! }
//! ```

mod builder;
#[cfg(test)]
mod builder_tests;
mod declaration;
mod doc_comment;
pub mod error;
mod semantic;
mod span;
pub mod syntax;

pub use builder::{BuildConfig, BuildOutput, GLOBAL_NAMESPACE, TreeBuilder};
pub use error::{Diagnostic, ErrorCode, Label, Origin, ParseError, Severity};
pub use semantic::{EmbeddedSemantics, SemanticModel};
pub use span::Span;
pub use syntax::SourceUnit;

use log::trace;

/// Deserialize one source unit from its JSON text.
///
/// # Errors
///
/// Returns a [`ParseError`] labelled at the offending position when the text
/// is not valid JSON ([`ErrorCode::E001`]) or does not have the shape of a
/// source unit ([`ErrorCode::E002`]).
pub fn load_unit(source: &str) -> Result<SourceUnit, ParseError> {
    let unit: SourceUnit = serde_json::from_str(source).map_err(|err| {
        let span = Span::at_line_column(source, err.line(), err.column());
        let diagnostic = if err.is_data() {
            Diagnostic::error(format!("invalid source unit structure: {err}"))
                .with_code(ErrorCode::E002)
                .with_label(span, "unexpected value")
                .with_help("source units list their declarations under `nodes`")
        } else {
            Diagnostic::error(format!("malformed source unit: {err}"))
                .with_code(ErrorCode::E001)
                .with_label(span, "here")
                .with_help("source units must be valid JSON")
        };
        ParseError::from(diagnostic)
    })?;
    trace!(path = unit.path.as_str(), declarations = unit.nodes.len(); "Loaded source unit");
    Ok(unit)
}

/// Build a project tree from source units, reading symbol information
/// embedded in the units.
///
/// Units are visited in order; references between them are resolved after
/// the last one, so a type may be used before the unit declaring it.
///
/// # Errors
///
/// Returns every diagnostic if any declaration was malformed.
pub fn build(units: &[SourceUnit], config: BuildConfig) -> Result<BuildOutput, ParseError> {
    let mut builder = TreeBuilder::new(config);
    for unit in units {
        builder.add_unit(unit, &EmbeddedSemantics);
    }
    builder.finish()
}
