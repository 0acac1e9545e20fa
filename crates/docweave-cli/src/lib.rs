//! docweave CLI library
//!
//! This module contains the core CLI logic for the docweave documentation
//! generator.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, info};

use docweave::{DocsBuilder, DocweaveError};

/// Run the docweave CLI application
///
/// Loads every source unit named by `args`, builds the project tree and
/// writes each configured output format below the output directory.
///
/// # Errors
///
/// Returns `DocweaveError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Source unit and tree building errors
/// - Rendering and writing errors
pub async fn run(args: &Args) -> Result<(), DocweaveError> {
    let mut app_config = config::load_config(args.config.as_ref())?;
    if let Some(output) = &args.output {
        app_config = app_config.with_output_dir(output);
    }

    let inputs = collect_inputs(&args.inputs)?;
    info!(
        inputs = inputs.len(),
        output_dir = app_config.output_dir().display().to_string();
        "Generating documentation"
    );

    let builder = DocsBuilder::new(app_config);
    let mut units = Vec::with_capacity(inputs.len());
    for path in &inputs {
        debug!(path = path.display().to_string(); "Loading source unit");
        let source = tokio::fs::read_to_string(path).await?;
        units.push(builder.load(&source)?);
    }

    let output = builder.build(&units)?;
    let summaries = builder
        .generate(output.tree(), builder.config().output_dir())
        .await?;

    for summary in &summaries {
        info!(
            format:% = summary.format(),
            files = summary.files();
            "Documentation exported successfully"
        );
    }

    Ok(())
}

/// Expands `inputs` into the list of source unit files.
///
/// Files are taken as given; directories are searched recursively for
/// `*.json` files. The result is sorted and free of duplicates.
fn collect_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>, DocweaveError> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            collect_json_files(input, &mut files)?;
        } else {
            files.push(input.clone());
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

fn collect_json_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), DocweaveError> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_json_files(&path, files)?;
        } else if path.extension().and_then(|s| s.to_str()) == Some("json") {
            files.push(path);
        }
    }
    Ok(())
}
