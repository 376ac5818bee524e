// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Workflow service configuration.
//!
//! This module defines the [`WorkflowConfig`] struct, which names the hosted
//! service endpoint, the credential sent with each call, and the workspace and
//! workflow to execute. Every value has a built-in default and can be
//! overridden through the environment.

use std::env;
use std::path::PathBuf;

use crate::error::{BridgeError, Result};

/// Environment variable overriding the service endpoint.
pub const ENV_API_URL: &str = "ROBOFLOW_API_URL";
/// Environment variable overriding the API key.
pub const ENV_API_KEY: &str = "ROBOFLOW_API_KEY";
/// Environment variable overriding the workspace.
pub const ENV_WORKSPACE: &str = "ROBOFLOW_WORKSPACE";
/// Environment variable overriding the workflow id.
pub const ENV_WORKFLOW_ID: &str = "ROBOFLOW_WORKFLOW_ID";
/// Environment variable pointing at a TrueType font for overlay labels.
pub const ENV_FONT: &str = "DOCSCAN_FONT";

/// Default hosted inference endpoint.
pub const DEFAULT_API_URL: &str = "https://serverless.roboflow.com";
/// Default publishable API key.
pub const DEFAULT_API_KEY: &str = "owWk9BAAmS9SHcNUGfxy";
/// Default workspace.
pub const DEFAULT_WORKSPACE: &str = "ansar-rnlir";
/// Default workflow id.
pub const DEFAULT_WORKFLOW_ID: &str = "detect-count-and-visualize";

/// Configuration for the remote workflow call.
///
/// Uses a builder pattern for convenient construction.
///
/// # Example
///
/// ```rust
/// use docscan_bridge::WorkflowConfig;
///
/// let config = WorkflowConfig::new()
///     .with_api_url("http://localhost:9001/")
///     .with_workspace("my-workspace")
///     .with_workflow_id("my-workflow");
/// assert_eq!(
///     config.workflow_url(&config.workspace, &config.workflow_id),
///     "http://localhost:9001/my-workspace/workflows/my-workflow"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowConfig {
    /// Base URL of the inference service.
    pub api_url: String,
    /// Static credential passed in the request body.
    pub api_key: String,
    /// Workspace owning the workflow.
    pub workspace: String,
    /// Workflow identifier within the workspace.
    pub workflow_id: String,
    /// Explicit font for overlay labels. `None` uses the cached default font.
    pub font_path: Option<PathBuf>,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
            workspace: DEFAULT_WORKSPACE.to_string(),
            workflow_id: DEFAULT_WORKFLOW_ID.to_string(),
            font_path: None,
        }
    }
}

impl WorkflowConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a configuration from the process environment.
    ///
    /// Unset or empty variables fall back to the defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();
        if let Some(url) = get(ENV_API_URL) {
            config.api_url = url;
        }
        if let Some(key) = get(ENV_API_KEY) {
            config.api_key = key;
        }
        if let Some(workspace) = get(ENV_WORKSPACE) {
            config.workspace = workspace;
        }
        if let Some(id) = get(ENV_WORKFLOW_ID) {
            config.workflow_id = id;
        }
        config.font_path = get(ENV_FONT).map(PathBuf::from);
        config
    }

    /// Set the service endpoint.
    #[must_use]
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Set the API key.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = key.into();
        self
    }

    /// Set the workspace.
    #[must_use]
    pub fn with_workspace(mut self, workspace: impl Into<String>) -> Self {
        self.workspace = workspace.into();
        self
    }

    /// Set the workflow id.
    #[must_use]
    pub fn with_workflow_id(mut self, id: impl Into<String>) -> Self {
        self.workflow_id = id.into();
        self
    }

    /// Set the font used for overlay labels.
    #[must_use]
    pub fn with_font_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.font_path = Some(path.into());
        self
    }

    /// Check that the endpoint is an HTTP(S) URL and the workflow is named.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::ConfigError`] describing the first bad value.
    pub fn validate(&self) -> Result<()> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(BridgeError::ConfigError(format!(
                "{ENV_API_URL} must be an http(s) URL, got '{}'",
                self.api_url
            )));
        }
        if self.workspace.trim().is_empty() {
            return Err(BridgeError::ConfigError(format!("{ENV_WORKSPACE} is empty")));
        }
        if self.workflow_id.trim().is_empty() {
            return Err(BridgeError::ConfigError(format!(
                "{ENV_WORKFLOW_ID} is empty"
            )));
        }
        Ok(())
    }

    /// URL executing `workflow_id` of `workspace` on the configured endpoint.
    #[must_use]
    pub fn workflow_url(&self, workspace: &str, workflow_id: &str) -> String {
        format!(
            "{}/{workspace}/workflows/{workflow_id}",
            self.api_url.trim_end_matches('/')
        )
    }
}
