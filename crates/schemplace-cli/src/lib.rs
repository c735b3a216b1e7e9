//! CLI logic for the schemplace placement tool.
//!
//! This module contains the core CLI logic: load configuration, read a JSON
//! scene, lay it out and write the placed scene back as JSON.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::info;

use schemplace::{
    Placer, SchemplaceError,
    config::{AppConfig, OutputConfig},
};

/// Run the schemplace CLI application
///
/// This function processes the input scene through the placement pipeline
/// and writes the resulting scene to the output file.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `SchemplaceError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Scene parsing errors
/// - Layout errors
pub fn run(args: &Args) -> Result<(), SchemplaceError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing scene"
    );

    // Load configuration
    let mut app_config = config::load_config(args.config.as_ref())?;
    if args.pretty {
        app_config = AppConfig::new(app_config.layout().clone(), OutputConfig::new(true));
    }

    // Read input file
    let source = fs::read_to_string(&args.input)?;

    // Process scene using Placer API
    let placer = Placer::new(app_config);
    let scene = placer.parse(&source)?;
    let placed = placer.layout(&scene)?;
    let json = placer.to_json(&placed)?;

    // Write output file
    fs::write(&args.output, json)?;

    info!(output_file = args.output, boxes = placed.boxes.len(); "Scene exported successfully");

    Ok(())
}
