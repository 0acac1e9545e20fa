//! Command-line argument definitions for the docweave CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the source units to document, the output
//! directory, the configuration file and the logging verbosity.

use std::path::PathBuf;

use clap::Parser;

/// Command-line arguments for the docweave documentation generator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Source unit files (JSON) or directories searched for them
    #[arg(required = true, help = "Source unit files or directories")]
    pub inputs: Vec<PathBuf>,

    /// Output directory; overrides `output_dir` from the configuration
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
