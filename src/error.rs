// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Error types for the bridge.

use std::fmt;

/// Result type alias for bridge operations.
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Main error type for the bridge.
#[derive(Debug)]
pub enum BridgeError {
    /// Invalid configuration provided.
    ConfigError(String),
    /// IO error (file not found, permission denied, etc.).
    IoError(String),
    /// Wrapped `std::io::Error`
    Io(std::io::Error),
    /// Transport failure talking to the workflow service.
    RequestError(String),
    /// The workflow service answered with a non-success status.
    ServiceError {
        /// HTTP status code.
        status: u16,
        /// Response body text, possibly empty.
        body: String,
    },
    /// The workflow service answered with a body that is not JSON.
    ResponseError(String),
    /// Error decoding or processing images.
    ImageError(String),
    /// Error encoding the overlay.
    EncodeError(String),
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigError(msg) => write!(f, "Config error: {msg}"),
            Self::IoError(msg) => write!(f, "IO error: {msg}"),
            Self::Io(err) => write!(f, "IO error: {err}"),
            Self::RequestError(msg) => write!(f, "Request error: {msg}"),
            Self::ServiceError { status, body } if body.is_empty() => {
                write!(f, "Remote service returned status {status}")
            }
            Self::ServiceError { status, body } => {
                write!(f, "Remote service returned status {status}: {body}")
            }
            Self::ResponseError(msg) => write!(f, "Malformed response: {msg}"),
            Self::ImageError(msg) => write!(f, "Image error: {msg}"),
            Self::EncodeError(msg) => write!(f, "Encode error: {msg}"),
        }
    }
}

impl std::error::Error for BridgeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for BridgeError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<image::ImageError> for BridgeError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageError(err.to_string())
    }
}

impl From<serde_json::Error> for BridgeError {
    fn from(err: serde_json::Error) -> Self {
        Self::ResponseError(err.to_string())
    }
}

impl From<ureq::Error> for BridgeError {
    fn from(err: ureq::Error) -> Self {
        let msg = match &err {
            ureq::Error::Timeout(_) => "Connection timed out".to_string(),
            ureq::Error::Io(io_err) => format!("Network error: {io_err}"),
            _ => err.to_string(),
        };
        Self::RequestError(msg)
    }
}
