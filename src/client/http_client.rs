//! HTTP client for the Indigo REST API
//!
//! Issues digest-authenticated GET/PUT requests and decodes JSON bodies into
//! device summaries or open-ended detail maps. Every operation is a single
//! request plus at most one challenge round trip; there are no retries and no
//! caching across calls.

use crate::client::digest::{self, DigestChallenge};
use crate::client::{DesiredState, DeviceDetail, DeviceSummary};
use crate::config::{Credentials, DeviceApiConfig};
use crate::error::{IndigoError, Result};
use reqwest::header::{AUTHORIZATION, WWW_AUTHENTICATE};
use reqwest::{Client, ClientBuilder, Method, Response, StatusCode};
use tracing::debug;
use url::Url;

/// HTTP client for the device API
pub struct IndigoHttpClient {
    /// HTTP client instance
    client: Client,

    /// Base URL for the device API
    base_url: Url,

    /// Digest authentication credentials
    credentials: Credentials,
}

impl IndigoHttpClient {
    /// Create a new client for the configured host and port.
    pub fn new(config: &DeviceApiConfig, credentials: Credentials) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(config.timeout)
            .user_agent(format!("indigoctl/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| IndigoError::network(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url()?,
            credentials,
        })
    }

    /// List all devices known to the API.
    pub async fn list_devices(&self) -> Result<Vec<DeviceSummary>> {
        let url = self.build_url("devices.json")?;
        let response = ensure_get_success(self.execute(Method::GET, url).await?)?;
        let text = response
            .text()
            .await
            .map_err(|e| IndigoError::network(format!("Failed to read device listing: {e}")))?;
        let devices: Vec<DeviceSummary> = serde_json::from_str(&text).map_err(|e| {
            IndigoError::decode(format!("Device listing is not the expected JSON array: {e}"))
        })?;
        debug!("Listed {} devices", devices.len());
        Ok(devices)
    }

    /// Fetch the attribute map for one device by its REST path.
    pub async fn get_device(&self, path: &str) -> Result<DeviceDetail> {
        let url = self.build_url(path)?;
        let response = ensure_get_success(self.execute(Method::GET, url).await?)?;
        let text = response
            .text()
            .await
            .map_err(|e| IndigoError::network(format!("Failed to read device detail: {e}")))?;
        serde_json::from_str(&text)
            .map_err(|e| IndigoError::decode(format!("Device detail is not a JSON object: {e}")))
    }

    /// Change a device's state.
    ///
    /// A final 401 is tolerated as a soft success: the API answers some
    /// idempotent state changes that way even though the change is applied.
    /// Callers must not rely on the returned detail in that case.
    pub async fn set_device_state(
        &self,
        path: &str,
        state: DesiredState,
        param: &str,
    ) -> Result<DeviceDetail> {
        let url = self.build_url(&format!("{path}?{}", state.query(param)))?;
        debug!("Setting {path} to {state}");
        let response = self
            .execute(Method::PUT, url)
            .await
            .map_err(|e| IndigoError::device_state(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            debug!("State change for {path} answered 401; treating as applied");
            let mut sentinel = DeviceDetail::new();
            sentinel.insert("status".to_string(), serde_json::Value::String("ok".to_string()));
            return Ok(sentinel);
        }
        if !status.is_success() {
            return Err(IndigoError::device_state(format!(
                "Device API returned {status} for {path}"
            )));
        }

        let text = response.text().await.map_err(|e| {
            IndigoError::device_state(format!("Failed to read state-change response: {e}"))
        })?;
        serde_json::from_str(&text).map_err(|e| {
            IndigoError::decode(format!("State-change response is not a JSON object: {e}"))
        })
    }

    /// Build an absolute URL for an API path (optionally with a query string).
    fn build_url(&self, path_and_query: &str) -> Result<Url> {
        self.base_url.join(path_and_query).map_err(|e| {
            IndigoError::network(format!("Invalid URL path {path_and_query}: {e}"))
        })
    }

    /// Send a request, answering a digest challenge on one second round trip.
    async fn execute(&self, method: Method, url: Url) -> Result<Response> {
        debug!("{method} {url}");
        let first = self
            .client
            .request(method.clone(), url.clone())
            .send()
            .await
            .map_err(map_transport_error)?;

        if first.status() != StatusCode::UNAUTHORIZED {
            return Ok(first);
        }
        let Some(challenge_header) = first
            .headers()
            .get(WWW_AUTHENTICATE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
        else {
            // 401 without a challenge: nothing to answer, hand it to the caller.
            return Ok(first);
        };

        let challenge = DigestChallenge::parse(&challenge_header)?;
        debug!("Answering digest challenge from realm {:?}", challenge.realm);
        let authorization = digest::authorization_header(
            &challenge,
            &self.credentials.username,
            &self.credentials.password,
            method.as_str(),
            &digest_uri(&url),
        )?;
        self.client
            .request(method, url)
            .header(AUTHORIZATION, authorization)
            .send()
            .await
            .map_err(map_transport_error)
    }
}

/// The request-URI the digest response is computed over: path plus query.
fn digest_uri(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{query}", url.path()),
        None => url.path().to_string(),
    }
}

fn ensure_get_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::UNAUTHORIZED {
        return Err(IndigoError::authentication(format!(
            "Device API rejected credentials ({status})"
        )));
    }
    Err(IndigoError::network(format!("Device API returned {status}")))
}

fn map_transport_error(e: reqwest::Error) -> IndigoError {
    if e.is_timeout() {
        IndigoError::network(format!("Request timed out: {e}"))
    } else if e.is_connect() {
        IndigoError::network(format!("Connection failed: {e}"))
    } else {
        IndigoError::Http(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_uri_includes_the_query() {
        let url: Url = "http://10.10.0.140:8176/devices/lamp?isOn=1".parse().unwrap();
        assert_eq!(digest_uri(&url), "/devices/lamp?isOn=1");

        let url: Url = "http://10.10.0.140:8176/devices.json".parse().unwrap();
        assert_eq!(digest_uri(&url), "/devices.json");
    }
}
