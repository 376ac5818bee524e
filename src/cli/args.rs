// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments parser.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"Environment:
    ROBOFLOW_API_URL       Inference service endpoint [default: https://serverless.roboflow.com]
    ROBOFLOW_API_KEY       API key sent with the request
    ROBOFLOW_WORKSPACE     Workspace owning the workflow [default: ansar-rnlir]
    ROBOFLOW_WORKFLOW_ID   Workflow to execute [default: detect-count-and-visualize]
    DOCSCAN_FONT           TrueType font for overlay labels [default: a system font]

Output:
    One line of JSON on stdout: the workflow response, with the overlay JPEG
    (base64) under `docscan_visualization` when one was drawn, or
    {"error": "..."} if the call failed.

Examples:
    docscan-bridge scan.jpg
    docscan-bridge --verbose scan.jpg
    ROBOFLOW_WORKFLOW_ID=my-flow docscan-bridge --no-overlay scan.png"#)]
pub struct Cli {
    /// Image to send to the workflow
    pub image: PathBuf,

    /// Print diagnostics to stderr
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Skip rendering the bounding-box overlay
    #[arg(long, default_value_t = false)]
    pub no_overlay: bool,
}
