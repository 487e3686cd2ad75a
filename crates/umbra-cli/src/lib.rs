//! CLI logic for the Umbra model tool.
//!
//! This module contains the core CLI logic: load a model, summarize it,
//! and optionally re-save it.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::collections::BTreeMap;

use log::info;

use umbra::{LoadReport, ModelStore, UmbraError, factory::ElementFactory};

/// Run the Umbra CLI application
///
/// Loads the input model, logs how many elements of each type it holds
/// and writes it back to the output path when one is given.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `UmbraError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Models that cannot be loaded
/// - Models that cannot be saved
pub fn run(args: &Args) -> Result<LoadReport, UmbraError> {
    info!(
        input_path = args.input,
        output_path:? = args.output;
        "Processing model"
    );

    let app_config = config::load_config(args.config.as_ref())?;
    let store = ModelStore::new(app_config);

    let (factory, report) = store.open(&args.input)?;
    log_census(&factory);
    info!(
        elements = report.elements(),
        items = report.items(),
        connections = report.connections(),
        diagnostics = report.diagnostics().len();
        "Model loaded"
    );

    if let Some(output) = &args.output {
        let saved = store.save(output, &factory)?;
        info!(
            output_file = output,
            diagnostics = saved.diagnostics().len();
            "Model saved"
        );
    }

    Ok(report)
}

fn log_census(factory: &ElementFactory) {
    let mut census: BTreeMap<&str, usize> = BTreeMap::new();
    for element in factory.iter() {
        *census.entry(element.class().name()).or_default() += 1;
    }
    for (type_name, count) in census {
        info!(type_name, count; "Element census");
    }
}
