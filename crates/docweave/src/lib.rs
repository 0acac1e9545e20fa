//! docweave - cross-linked reference documentation from declared code.
//!
//! Loads the source units reported by a compiler front end, builds and
//! resolves the code-element model, and renders it as linked Markdown and as
//! XML.

pub mod config;
pub mod export;

mod error;

pub use docweave_core::{ProjectTree, docs, element, identity, index, model, reference};
pub use docweave_parser::{BuildOutput, Diagnostic, ErrorCode, ParseError, Severity, SourceUnit};

pub use error::DocweaveError;

use std::path::Path;

use indexmap::IndexMap;
use log::{debug, info, warn};

use config::{AppConfig, ExportFormat};
use export::{ExportSummary, Exporter, MemorySink};

/// Builder for loading source units and generating their documentation.
///
/// # Examples
///
/// ```rust,no_run
/// use docweave::{DocsBuilder, config::AppConfig};
///
/// # async fn run() -> Result<(), docweave::DocweaveError> {
/// let source = r#"{ "path": "Foo.cs", "nodes": [
///     { "kind": "namespace", "name": "A", "members": [ { "kind": "class", "name": "Foo" } ] }
/// ] }"#;
///
/// let builder = DocsBuilder::new(AppConfig::default());
/// let unit = builder.load(source)?;
/// let output = builder.build(&[unit])?;
///
/// let summaries = builder.generate(output.tree(), "docs").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct DocsBuilder {
    config: AppConfig,
}

impl DocsBuilder {
    /// Create a new builder with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Excluded projects, output formats and output placement
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Load one source unit from its JSON text.
    ///
    /// # Errors
    ///
    /// Returns `DocweaveError::Parse` carrying `source`, so the labels of the
    /// diagnostics can be shown against it.
    pub fn load(&self, source: &str) -> Result<SourceUnit, DocweaveError> {
        docweave_parser::load_unit(source).map_err(|err| DocweaveError::new_parse_error(err, source))
    }

    /// Build and resolve the project tree of `units`.
    ///
    /// Warnings (such as unresolved cross-references) are logged and kept in
    /// the returned [`BuildOutput`].
    ///
    /// # Errors
    ///
    /// Returns `DocweaveError::Parse` with every diagnostic if any declaration
    /// was malformed.
    pub fn build(&self, units: &[SourceUnit]) -> Result<BuildOutput, DocweaveError> {
        info!(units = units.len(); "Building project tree");
        let output = docweave_parser::build(units, self.config.build_config())
            .map_err(|err| DocweaveError::new_parse_error(err, ""))?;

        for warning in output.warnings() {
            warn!(code:? = warning.code(); "{}", warning.message());
        }
        debug!(elements = output.tree().model().len(); "Project tree built");
        Ok(output)
    }

    /// Render the Markdown output units of `tree` in memory, keyed by file
    /// name.
    ///
    /// # Errors
    ///
    /// Returns `DocweaveError::Export` if an element cannot be rendered.
    pub fn render_markdown(&self, tree: &ProjectTree) -> Result<IndexMap<String, String>, DocweaveError> {
        let mut sink = MemorySink::new();
        export::markdown::render(tree, self.config.separate_units(), &mut sink)?;
        Ok(sink.into_units())
    }

    /// Render `tree` as one XML document.
    ///
    /// # Errors
    ///
    /// Returns `DocweaveError::Export` if the document cannot be written.
    pub fn render_xml(&self, tree: &ProjectTree) -> Result<String, DocweaveError> {
        Ok(export::xml::render(tree)?)
    }

    /// Write every configured format below `output_dir`, each into its own
    /// sub-directory.
    ///
    /// Must be awaited inside a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `DocweaveError::Io` if a directory cannot be created and
    /// `DocweaveError::Export` if rendering or writing fails.
    pub async fn generate(
        &self,
        tree: &ProjectTree,
        output_dir: impl AsRef<Path>,
    ) -> Result<Vec<ExportSummary>, DocweaveError> {
        let output_dir = output_dir.as_ref();
        let mut summaries = Vec::with_capacity(self.config.extensions().len());

        for &format in self.config.extensions() {
            let directory = output_dir.join(format.dir_name());
            tokio::fs::create_dir_all(&directory).await?;

            let summary = match format {
                ExportFormat::Md => {
                    export::markdown::Markdown::new(self.config.separate_units().clone())
                        .export(tree, &directory)
                        .await?
                }
                ExportFormat::Xml => export::xml::Xml.export(tree, &directory).await?,
            };
            info!(format:%, files = summary.files(); "Documentation written");
            summaries.push(summary);
        }

        Ok(summaries)
    }
}
