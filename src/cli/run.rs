// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use std::io::{self, Write};
use std::path::Path;

use clap::Parser;
use clap::error::ErrorKind;
use serde_json::{Value, json};

use crate::bridge::Bridge;
use crate::cli::args::Cli;
use crate::cli::logging::set_verbose;
use crate::client::HttpWorkflowClient;
use crate::config::WorkflowConfig;
use crate::error::Result;
use crate::overlay::{NoOverlay, OverlayRenderer};
use crate::{VERSION, verbose};

/// Exit status for every failure path.
pub const EXIT_FAILURE: i32 = 1;

/// Parse the process arguments, run the bridge, and return the exit status.
///
/// Usage and missing-file errors are reported as plain text on stderr. Any
/// later failure is printed to stdout as `{"error": "..."}`.
#[must_use]
pub fn main() -> i32 {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => EXIT_FAILURE,
            };
        }
    };

    set_verbose(cli.verbose);
    verbose!("docscan-bridge {VERSION}");

    if !cli.image.is_file() {
        eprintln!("File not found: {}", cli.image.display());
        return EXIT_FAILURE;
    }

    let config = WorkflowConfig::from_env();
    let renderer = select_renderer(&config, cli.no_overlay);

    let (document, status) = match run_image(config, renderer, &cli.image) {
        Ok(document) => (document, 0),
        Err(e) => {
            verbose!("Workflow call failed: {e}");
            (error_document(&e.to_string()), EXIT_FAILURE)
        }
    };

    if let Err(e) = emit(&document) {
        crate::error!("Failed to write output: {e}");
        return EXIT_FAILURE;
    }
    status
}

/// Pick the drawing capability for this run.
fn select_renderer(config: &WorkflowConfig, disabled: bool) -> Box<dyn OverlayRenderer> {
    if disabled {
        Box::new(NoOverlay)
    } else {
        drawing_renderer(config)
    }
}

#[cfg(feature = "annotate")]
fn drawing_renderer(config: &WorkflowConfig) -> Box<dyn OverlayRenderer> {
    Box::new(crate::annotate::ImageOverlay::from_config(config))
}

#[cfg(not(feature = "annotate"))]
fn drawing_renderer(_config: &WorkflowConfig) -> Box<dyn OverlayRenderer> {
    verbose!("Overlay rendering requires the 'annotate' feature");
    Box::new(NoOverlay)
}

fn run_image(
    config: WorkflowConfig,
    renderer: Box<dyn OverlayRenderer>,
    image: &Path,
) -> Result<Value> {
    let client = HttpWorkflowClient::new(&config);
    Bridge::new(config, client, renderer).run(image)
}

/// Build the `{"error": ...}` document.
#[must_use]
pub fn error_document(message: &str) -> Value {
    json!({ "error": message })
}

/// Write `document` as a single JSON line.
fn emit(document: &Value) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, document)?;
    writeln!(stdout)?;
    stdout.flush()
}
