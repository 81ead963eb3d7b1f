//! CLI logic for the siteplan diagram tool.
//!
//! This module contains the core CLI logic for the siteplan diagram tool.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::info;

use siteplan::{DiagramBuilder, SiteplanError};

/// Run the siteplan CLI application
///
/// This function processes the input file through the siteplan pipeline
/// and writes the resulting SVG to the output file.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `SiteplanError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Parsing errors
/// - Rendering errors
pub fn run(args: &Args) -> Result<(), SiteplanError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing diagram"
    );

    // Load configuration
    let mut app_config = config::load_config(args.config.as_ref())?;

    // The --theme flag wins over the configuration file
    if let Some(theme) = &args.theme {
        app_config.style_mut().select_theme(theme);
    }

    // Read input file
    let source = fs::read_to_string(&args.input)?;

    // Process diagram using DiagramBuilder API
    let builder = DiagramBuilder::new(app_config);
    let diagram = builder.parse(&source)?;
    let svg = builder.render_svg(&diagram)?;

    // Write output file
    fs::write(&args.output, svg)?;

    info!(output_file = args.output; "SVG exported successfully");

    Ok(())
}
