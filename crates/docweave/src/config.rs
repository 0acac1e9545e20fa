//! Configuration types for docweave documentation runs.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from an
//! external TOML file; every field has a default.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration of a run.
//! - [`ExportFormat`] - The output formats to generate.
//! - [`SeparateUnits`] - Which element kinds get their own output unit.
//!
//! # Example
//!
//! ```
//! # use docweave::config::{AppConfig, ExportFormat};
//! # use docweave::element::ElementKind;
//! let config = AppConfig::default();
//! assert_eq!(config.extensions(), &[ExportFormat::Md, ExportFormat::Xml]);
//! assert!(!config.separate_units().is_separate(ElementKind::Class));
//! ```

use std::{
    collections::HashMap,
    fmt,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use docweave_core::element::{ElementKind, UnknownKind};
use docweave_parser::BuildConfig;

/// Top-level configuration of a documentation run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Projects whose source units are skipped.
    excluded_projects: Vec<String>,

    /// Output formats to generate.
    extensions: Vec<ExportFormat>,

    /// Element kinds written to their own output unit.
    separate_units: SeparateUnits,

    /// Root directory of the generated documentation.
    output_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            excluded_projects: Vec::new(),
            extensions: vec![ExportFormat::Md, ExportFormat::Xml],
            separate_units: SeparateUnits::default(),
            output_dir: PathBuf::from("docs"),
        }
    }
}

impl AppConfig {
    /// Creates a configuration writing to the default output directory.
    ///
    /// # Arguments
    ///
    /// * `excluded_projects` - Projects whose source units are skipped.
    /// * `extensions` - Output formats to generate.
    /// * `separate_units` - Element kinds written to their own output unit.
    pub fn new(
        excluded_projects: Vec<String>,
        extensions: Vec<ExportFormat>,
        separate_units: SeparateUnits,
    ) -> Self {
        Self {
            excluded_projects,
            extensions,
            separate_units,
            ..Self::default()
        }
    }

    /// Replaces the output directory.
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn excluded_projects(&self) -> &[String] {
        &self.excluded_projects
    }

    pub fn extensions(&self) -> &[ExportFormat] {
        &self.extensions
    }

    pub fn separate_units(&self) -> &SeparateUnits {
        &self.separate_units
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Settings for the tree builder.
    pub fn build_config(&self) -> BuildConfig {
        BuildConfig::new(self.excluded_projects.clone())
    }
}

/// An output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Linked markdown, optionally split into several output units.
    Md,
    /// One nested XML document.
    Xml,
}

impl ExportFormat {
    /// Sub-directory of the output directory the format is written to.
    pub fn dir_name(&self) -> &'static str {
        match self {
            ExportFormat::Md => "md",
            ExportFormat::Xml => "xml",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Which element kinds are written to their own output unit.
///
/// Kinds that are not listed are rendered inline. Namespaces are always
/// rendered inline into the index document.
///
/// ```toml
/// [separate_units]
/// class = true
/// enum = true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "HashMap<String, bool>")]
pub struct SeparateUnits {
    kinds: HashMap<ElementKind, bool>,
}

impl SeparateUnits {
    /// Marks `kind` as separate (or inline).
    pub fn with(mut self, kind: ElementKind, separate: bool) -> Self {
        self.kinds.insert(kind, separate);
        self
    }

    pub fn is_separate(&self, kind: ElementKind) -> bool {
        kind != ElementKind::Namespace && self.kinds.get(&kind).copied().unwrap_or(false)
    }
}

impl TryFrom<HashMap<String, bool>> for SeparateUnits {
    type Error = UnknownKind;

    fn try_from(table: HashMap<String, bool>) -> Result<Self, Self::Error> {
        let kinds = table
            .into_iter()
            .map(|(kind, separate)| Ok((kind.parse::<ElementKind>()?, separate)))
            .collect::<Result<_, UnknownKind>>()?;
        Ok(Self { kinds })
    }
}

impl FromIterator<ElementKind> for SeparateUnits {
    fn from_iter<I: IntoIterator<Item = ElementKind>>(kinds: I) -> Self {
        Self {
            kinds: kinds.into_iter().map(|kind| (kind, true)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_kinds_are_inline() {
        let units = SeparateUnits::default().with(ElementKind::Class, true);

        assert!(units.is_separate(ElementKind::Class));
        assert!(!units.is_separate(ElementKind::Struct));
        assert!(!units.is_separate(ElementKind::Method));
    }

    #[test]
    fn test_namespaces_never_separate() {
        let units: SeparateUnits = [ElementKind::Namespace, ElementKind::Enum].into_iter().collect();

        assert!(!units.is_separate(ElementKind::Namespace));
        assert!(units.is_separate(ElementKind::Enum));
    }

    #[test]
    fn test_table_keys_are_case_insensitive() {
        let table = HashMap::from([("Class".to_string(), true), ("method".to_string(), false)]);
        let units = SeparateUnits::try_from(table).expect("known kinds");

        assert!(units.is_separate(ElementKind::Class));
        assert!(!units.is_separate(ElementKind::Method));
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let table = HashMap::from([("module".to_string(), true)]);

        let err = SeparateUnits::try_from(table).unwrap_err();
        assert_eq!(err, UnknownKind("module".to_string()));
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert!(config.excluded_projects().is_empty());
        assert_eq!(config.output_dir(), Path::new("docs"));
        assert_eq!(ExportFormat::Xml.dir_name(), "xml");
    }
}
