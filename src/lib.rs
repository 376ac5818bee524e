// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

#![allow(clippy::multiple_crate_versions)]

//! # docscan-bridge
//!
//! Command-line bridge to a hosted object-detection workflow. One image goes
//! in; one line of JSON comes out on stdout: the workflow's response, plus a
//! base64 JPEG with the detections drawn on it when there is anything to draw.
//!
//! ## CLI Usage
//!
//! ```bash
//! # Run the default workflow on an image
//! docscan-bridge scan.jpg
//!
//! # Point at another workflow and print diagnostics to stderr
//! ROBOFLOW_WORKSPACE=acme ROBOFLOW_WORKFLOW_ID=count-parts docscan-bridge --verbose scan.jpg
//!
//! # Response only, no overlay
//! docscan-bridge --no-overlay scan.jpg
//! ```
//!
//! Exit status is `0` on success and `1` otherwise. A failed workflow call
//! prints `{"error": "<message>"}`; a missing argument or file prints plain
//! text on stderr and nothing on stdout.
//!
//! ## Node.js
//!
//! ```javascript
//! const { execFile } = require('child_process');
//!
//! execFile('docscan-bridge', ['upload.jpg'], (err, stdout) => {
//!     const result = JSON.parse(stdout);
//!     if (result.docscan_visualization) {
//!         img.src = `data:image/jpeg;base64,${result.docscan_visualization}`;
//!     }
//! });
//! ```
//!
//! ## Library
//!
//! ```no_run
//! use std::path::Path;
//! use docscan_bridge::{Bridge, HttpWorkflowClient, NoOverlay, WorkflowConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = WorkflowConfig::from_env();
//!     let client = HttpWorkflowClient::new(&config);
//!     let bridge = Bridge::new(config, client, NoOverlay);
//!
//!     let document = bridge.run(Path::new("scan.jpg"))?;
//!     println!("{document}");
//!     Ok(())
//! }
//! ```
//!
//! Predictions can be pulled out of any workflow response:
//!
//! ```rust
//! use docscan_bridge::flatten_predictions;
//! use serde_json::json;
//!
//! let result = json!({
//!     "a": {"predictions": [{"class": "cat"}, {"class": "dog"}]},
//!     "b": [{"predictions": [{"class": "bird"}]}],
//! });
//! assert_eq!(flatten_predictions(&result).len(), 3);
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | [`WorkflowConfig`] endpoint, credential and workflow selection |
//! | [`client`] | [`WorkflowClient`] trait and the HTTP implementation |
//! | [`predictions`] | Prediction flattening and parsing |
//! | [`overlay`] | [`OverlayRenderer`] capability and JPEG encoding |
//! | `annotate` | `ImageOverlay` box and label drawing (`annotate` feature) |
//! | [`bridge`] | [`Bridge`], the invoke/flatten/render sequence |
//! | [`error`] | Error types ([`BridgeError`], [`Result`]) |
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `annotate` | Overlay drawing support (default) |

// Modules
#[cfg(feature = "annotate")]
pub mod annotate;
pub mod bridge;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod overlay;
pub mod predictions;
pub mod utils;

// Re-export main types for convenience
#[cfg(feature = "annotate")]
pub use annotate::{FontSource, ImageOverlay};
pub use bridge::{Bridge, OVERLAY_KEY};
pub use client::{HttpWorkflowClient, WorkflowClient, WorkflowRequest};
pub use config::WorkflowConfig;
pub use error::{BridgeError, Result};
pub use overlay::{NoOverlay, OverlayRenderer};
pub use predictions::{Prediction, flatten_predictions, response_predictions};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
