#![allow(dead_code)]
//! WireMock-based Indigo API mocking infrastructure
//!
//! Simulates the device REST API and the chat-completion endpoint so commands
//! can be exercised without hardware or a live model.

use indigoctl::client::IndigoHttpClient;
use indigoctl::config::{Credentials, DeviceApiConfig, LlmConfig};
use indigoctl::llm::CompletionClient;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mock device API server
pub struct MockIndigoServer {
    pub server: MockServer,
}

impl MockIndigoServer {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Client wired to this mock with test credentials.
    pub fn client(&self) -> IndigoHttpClient {
        let url: url::Url = self.server.uri().parse().expect("mock URI is valid");
        let config = DeviceApiConfig {
            host: url.host_str().expect("mock URI has a host").to_string(),
            port: url.port().expect("mock URI has a port").to_string(),
            timeout: Duration::from_secs(5),
        };
        IndigoHttpClient::new(&config, test_credentials()).expect("client builds")
    }

    /// Mount the standard two-device listing.
    pub async fn with_device_listing(&self) {
        Mock::given(method("GET"))
            .and(path("/devices.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(device_listing()))
            .mount(&self.server)
            .await;
    }

    /// Mount a device detail endpoint.
    pub async fn with_device_detail(&self, device_path: &str, detail: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path(device_path))
            .respond_with(ResponseTemplate::new(200).set_body_json(detail))
            .mount(&self.server)
            .await;
    }
}

pub fn test_credentials() -> Credentials {
    Credentials {
        username: "tester".to_string(),
        password: "secret".to_string(),
    }
}

pub fn device_listing() -> serde_json::Value {
    json!([
        {
            "restParent": "devices",
            "restURL": "/devices/office-lamp",
            "nameURLEncoded": "office-lamp",
            "name": "Office Lamp"
        },
        {
            "restParent": "devices",
            "restURL": "/devices/kitchen-light",
            "nameURLEncoded": "kitchen-light",
            "name": "Kitchen Light"
        }
    ])
}

/// Completion client pointed at a mock server.
pub fn completion_client(server: &MockServer) -> CompletionClient {
    CompletionClient::new(LlmConfig {
        endpoint: server.uri(),
        model: "gpt-3.5-turbo".to_string(),
        api_key: None,
        timeout: Duration::from_secs(5),
    })
    .expect("completion client builds")
}

/// Mount an OpenAI-style completion reply for prompts containing `marker`.
pub async fn mount_completion_reply(server: &MockServer, marker: &str, content: &str) {
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains(marker))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": content}}]
        })))
        .mount(server)
        .await;
}
