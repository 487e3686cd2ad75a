//! Command-line argument definitions for the Umbra CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control the model to check, an optional path
//! to re-save it to, configuration file selection, and logging verbosity.

use clap::Parser;

/// Command-line arguments for the Umbra model tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the model file
    #[arg(help = "Path to the input model file")]
    pub input: String,

    /// Re-save the loaded model to this path
    #[arg(short, long)]
    pub output: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
