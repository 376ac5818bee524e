// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Remote workflow invocation.
//!
//! The hosted inference service is reached through the [`WorkflowClient`]
//! trait so the rest of the crate never depends on the transport. The default
//! implementation, [`HttpWorkflowClient`], posts the image to the workflow
//! execution endpoint with `ureq` and hands back the decoded JSON body.

use std::fs;
use std::path::Path;

use base64::{Engine, prelude::BASE64_STANDARD};
use serde::Serialize;
use serde_json::Value;

use crate::config::WorkflowConfig;
use crate::error::{BridgeError, Result};

/// Input key the image is passed under.
pub const IMAGE_INPUT_KEY: &str = "image";

/// Upper bound on the response body; workflows may return rendered images.
const MAX_RESPONSE_BYTES: u64 = 100 * 1024 * 1024;

/// Read `path` into the `{"type": "base64", "value": ...}` form the service
/// expects.
fn image_payload(path: &Path) -> Result<InputPayload> {
    let bytes = fs::read(path)
        .map_err(|e| BridgeError::IoError(format!("Failed to read {}: {e}", path.display())))?;
    Ok(InputPayload {
        kind: "base64",
        value: BASE64_STANDARD.encode(bytes),
    })
}

/// One workflow execution request.
#[derive(Debug, Clone)]
pub struct WorkflowRequest<'a> {
    /// Workspace owning the workflow.
    pub workspace: &'a str,
    /// Workflow identifier.
    pub workflow_id: &'a str,
    /// Local image sent base64-encoded under [`IMAGE_INPUT_KEY`].
    pub image: &'a Path,
    /// Ask the service to cache repeated inputs.
    pub use_cache: bool,
}

impl<'a> WorkflowRequest<'a> {
    /// Build a cached request for `image` against the configured workflow.
    pub fn new(config: &'a WorkflowConfig, image: &'a Path) -> Self {
        Self {
            workspace: &config.workspace,
            workflow_id: &config.workflow_id,
            image,
            use_cache: true,
        }
    }
}

/// Minimal interface over the hosted inference service.
pub trait WorkflowClient {
    /// Execute a workflow and return its raw JSON response.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status, or a body
    /// that is not valid JSON. No retries are attempted.
    fn run_workflow(&self, request: &WorkflowRequest<'_>) -> Result<Value>;
}

#[derive(Debug, Serialize)]
struct InputPayload {
    #[serde(rename = "type")]
    kind: &'static str,
    value: String,
}

#[derive(Debug, Serialize)]
struct RunPayload<'a> {
    api_key: &'a str,
    use_cache: bool,
    inputs: serde_json::Map<String, Value>,
}

/// `ureq`-backed [`WorkflowClient`].
pub struct HttpWorkflowClient {
    agent: ureq::Agent,
    config: WorkflowConfig,
}

impl HttpWorkflowClient {
    /// Create a client for the endpoint and credential in `config`.
    ///
    /// No timeout is set; the transport defaults apply.
    #[must_use]
    pub fn new(config: &WorkflowConfig) -> Self {
        let agent_config = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build();
        Self {
            agent: ureq::Agent::new_with_config(agent_config),
            config: config.clone(),
        }
    }

    fn endpoint(&self, request: &WorkflowRequest<'_>) -> String {
        self.config.workflow_url(request.workspace, request.workflow_id)
    }

    fn payload(&self, request: &WorkflowRequest<'_>) -> Result<RunPayload<'_>> {
        let mut inputs = serde_json::Map::new();
        inputs.insert(
            IMAGE_INPUT_KEY.to_string(),
            serde_json::to_value(image_payload(request.image)?)?,
        );
        Ok(RunPayload {
            api_key: &self.config.api_key,
            use_cache: request.use_cache,
            inputs,
        })
    }
}

impl WorkflowClient for HttpWorkflowClient {
    fn run_workflow(&self, request: &WorkflowRequest<'_>) -> Result<Value> {
        let url = self.endpoint(request);
        let payload = self.payload(request)?;

        let mut response = self.agent.post(&url).send_json(&payload)?;
        let status = response.status();
        let body = response
            .body_mut()
            .with_config()
            .limit(MAX_RESPONSE_BYTES)
            .read_to_string()?;

        if !status.is_success() {
            return Err(BridgeError::ServiceError {
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}
