// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! The invoke, flatten, render sequence for one image.

use std::path::Path;

use serde_json::Value;

use crate::client::{WorkflowClient, WorkflowRequest};
use crate::config::WorkflowConfig;
use crate::error::Result;
use crate::overlay::OverlayRenderer;
use crate::predictions::{response_predictions, summarize};
use crate::verbose;

/// Response key the overlay is attached under.
pub const OVERLAY_KEY: &str = "docscan_visualization";

/// Runs one image through a remote workflow and decorates the response.
pub struct Bridge<C, R> {
    config: WorkflowConfig,
    client: C,
    renderer: R,
}

impl<C: WorkflowClient, R: OverlayRenderer> Bridge<C, R> {
    /// Create a bridge from its collaborators.
    pub const fn new(config: WorkflowConfig, client: C, renderer: R) -> Self {
        Self {
            config,
            client,
            renderer,
        }
    }

    /// Execute the workflow for `image_path` and return the result document.
    ///
    /// The overlay step is best effort: if flattening or rendering fails, the
    /// response is returned exactly as the service sent it.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the remote call
    /// fails.
    pub fn run(&self, image_path: &Path) -> Result<Value> {
        self.config.validate()?;
        let request = WorkflowRequest::new(&self.config, image_path);
        verbose!(
            "Running workflow {}/{} on {}",
            request.workspace,
            request.workflow_id,
            image_path.display()
        );

        let mut response = self.client.run_workflow(&request)?;

        match self.overlay(image_path, &response) {
            Ok(Some(overlay)) => {
                attach_overlay(&mut response, overlay);
            }
            Ok(None) => verbose!("No overlay produced"),
            Err(e) => verbose!("Overlay skipped: {e}"),
        }

        Ok(response)
    }

    fn overlay(&self, image_path: &Path, response: &Value) -> Result<Option<String>> {
        let predictions = response_predictions(response);
        verbose!(
            "{} predictions{}",
            predictions.len(),
            if predictions.is_empty() {
                String::new()
            } else {
                format!(": {}", summarize(&predictions))
            }
        );
        if predictions.is_empty() {
            return Ok(None);
        }
        self.renderer.render(image_path, &predictions)
    }
}

/// Insert `overlay` under [`OVERLAY_KEY`].
///
/// Returns `false` and leaves the document untouched if it is not an object.
pub fn attach_overlay(document: &mut Value, overlay: String) -> bool {
    match document {
        Value::Object(map) => {
            map.insert(OVERLAY_KEY.to_string(), Value::String(overlay));
            true
        }
        _ => false,
    }
}
