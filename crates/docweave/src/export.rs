//! Export functionality for docweave project trees.
//!
//! This module provides the [`Exporter`] trait that defines the interface for
//! writing a resolved [`ProjectTree`] to an output format. It is the final
//! stage in the docweave pipeline.
//!
//! # Pipeline Position
//!
//! ```text
//! Source Units (JSON)
//!     ↓ load
//! Declaration Syntax
//!     ↓ build + resolve
//! ProjectTree
//!     ↓ export (this module)
//! Output Files
//! ```
//!
//! # Available Backends
//!
//! - [`markdown`] - linked markdown, split into output units per
//!   [`SeparateUnits`](crate::config::SeparateUnits)
//! - [`xml`] - one nested XML document
//!
//! # Error Handling
//!
//! Export operations return [`Error`], covering rendering failures,
//! unhandled element kinds and I/O errors. [`Error`] converts into
//! [`DocweaveError::Export`] at the crate boundary.
//!
//! [`DocweaveError::Export`]: crate::DocweaveError::Export

pub mod markdown;
pub mod paths;
pub mod xml;

mod write_set;

pub use write_set::{MemorySink, OutputSink, WriteSet};

use std::{
    fmt,
    future::Future,
    io,
    path::{Path, PathBuf},
};

use docweave_core::{ProjectTree, element::ElementKind};

use crate::config::ExportFormat;

/// Abstraction for documentation export backends.
///
/// Implementors render a [`ProjectTree`] and write the result below
/// `output_dir`. Every file is written by its own task; `export` returns
/// once all of them completed.
pub trait Exporter {
    /// The format this exporter produces.
    fn format(&self) -> ExportFormat;

    /// Renders `tree` and writes the output files into `output_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unhandled`] if an element reaches a converter table
    /// without an entry for it, [`Error::Render`] if the tree cannot be
    /// converted to the target format, or [`Error::Io`] if writing any of the
    /// output files fails.
    fn export(
        &self,
        tree: &ProjectTree,
        output_dir: &Path,
    ) -> impl Future<Output = Result<ExportSummary, Error>> + Send;
}

/// What an export produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    format: ExportFormat,
    directory: PathBuf,
    files: usize,
}

impl ExportSummary {
    pub fn new(format: ExportFormat, directory: PathBuf, files: usize) -> Self {
        Self {
            format,
            directory,
            files,
        }
    }

    pub fn format(&self) -> ExportFormat {
        self.format
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Number of files written.
    pub fn files(&self) -> usize {
        self.files
    }
}

/// Errors that can occur during documentation export.
///
/// This type is converted into [`DocweaveError::Export`] at the crate
/// boundary via its [`From`] implementation.
///
/// [`DocweaveError::Export`]: crate::DocweaveError::Export
#[derive(Debug)]
pub enum Error {
    /// A rendering or conversion failure described by `message`.
    Render(String),
    /// No converter exists for an element of `kind` with the given placement.
    Unhandled { kind: ElementKind, separate: bool },
    /// An I/O error encountered while writing `path`.
    Io { path: PathBuf, source: io::Error },
    /// A write task panicked or was cancelled.
    Join(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Render(msg) => write!(f, "Render error: {msg}"),
            Self::Unhandled { kind, separate } => {
                let placement = if *separate { "separate" } else { "inline" };
                write!(f, "No converter for {placement} {kind} elements")
            }
            Self::Io { path, source } => write!(f, "I/O error writing {}: {source}", path.display()),
            Self::Join(msg) => write!(f, "Write task failed: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Render(_) | Self::Unhandled { .. } | Self::Join(_) => None,
        }
    }
}
