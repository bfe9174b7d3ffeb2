//! Runtime configuration assembled once at startup
//!
//! Credentials and endpoints are parsed before any network call and passed
//! explicitly into each component; nothing here is ambient global state.

use crate::error::{IndigoError, Result};
use std::env;
use std::time::Duration;
use url::Url;

/// Environment variable holding `username:password` for the device API
pub const AUTH_ENV_VAR: &str = "INDIGO_AUTH";

/// Device API credentials
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Username for digest authentication
    pub username: String,

    /// Password for digest authentication
    pub password: String,
}

impl Credentials {
    /// Read credentials from the `INDIGO_AUTH` environment variable.
    ///
    /// Absence or a malformed value is fatal; callers surface the error before
    /// issuing any request.
    pub fn from_env() -> Result<Self> {
        let raw = env::var(AUTH_ENV_VAR).map_err(|_| {
            IndigoError::config(format!("{AUTH_ENV_VAR} environment variable not set"))
        })?;
        Self::parse(&raw)
    }

    /// Parse a `username:password` pair.
    pub fn parse(raw: &str) -> Result<Self> {
        let (username, password) = raw.split_once(':').ok_or_else(|| {
            IndigoError::config(format!("{AUTH_ENV_VAR} must be in username:password form"))
        })?;
        Ok(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}

/// Device API endpoint configuration
#[derive(Debug, Clone)]
pub struct DeviceApiConfig {
    /// API host
    pub host: String,

    /// API port
    pub port: String,

    /// Request timeout
    pub timeout: Duration,
}

impl DeviceApiConfig {
    /// Base URL for the device API, e.g. `http://10.10.0.140:8176/`.
    pub fn base_url(&self) -> Result<Url> {
        format!("http://{}:{}/", self.host, self.port)
            .parse()
            .map_err(|e| IndigoError::config(format!("Invalid device API address: {e}")))
    }
}

/// Chat-completion endpoint configuration
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Completion API base URL
    pub endpoint: String,

    /// Model identifier
    pub model: String,

    /// Optional bearer token
    pub api_key: Option<String>,

    /// Request timeout
    pub timeout: Duration,
}
