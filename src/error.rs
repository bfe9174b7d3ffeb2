//! Error types for indigoctl
//!
//! One error enum covers the whole command run; components construct their
//! variant through the helper constructors and propagate with `?`.

use thiserror::Error;

/// Result type alias for indigoctl operations
pub type Result<T> = std::result::Result<T, IndigoError>;

/// Error taxonomy for device API, template, and completion failures
#[derive(Error, Debug)]
pub enum IndigoError {
    /// Transport/connection failures against the device API
    #[error("Network error: {0}")]
    Network(String),

    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Unexpected JSON shape from the device API
    #[error("Decode error: {0}")]
    Decode(String),

    /// JSON parsing errors
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Digest challenge/response failures
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Non-2xx on a state-change call (the tolerated 401 excepted)
    #[error("Device state change failed: {0}")]
    DeviceState(String),

    /// Missing template file or bad template syntax
    #[error("Template error: {0}")]
    Template(String),

    /// Completion API failures
    #[error("Completion error: {0}")]
    Completion(String),

    /// Model reply missing required structure after the repair attempt
    #[error("Interpretation error: {0}")]
    Interpretation(String),

    /// Startup configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors
    #[error("Generic error: {0}")]
    Generic(#[from] anyhow::Error),
}

impl IndigoError {
    /// Create a network error
    pub fn network<S: Into<String>>(msg: S) -> Self {
        Self::Network(msg.into())
    }

    /// Create a decode error
    pub fn decode<S: Into<String>>(msg: S) -> Self {
        Self::Decode(msg.into())
    }

    /// Create an authentication error
    pub fn authentication<S: Into<String>>(msg: S) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a device state error
    pub fn device_state<S: Into<String>>(msg: S) -> Self {
        Self::DeviceState(msg.into())
    }

    /// Create a template error
    pub fn template<S: Into<String>>(msg: S) -> Self {
        Self::Template(msg.into())
    }

    /// Create a completion error
    pub fn completion<S: Into<String>>(msg: S) -> Self {
        Self::Completion(msg.into())
    }

    /// Create an interpretation error
    pub fn interpretation<S: Into<String>>(msg: S) -> Self {
        Self::Interpretation(msg.into())
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }
}
