//! Device API models and HTTP client

pub mod digest;
pub mod http_client;

pub use http_client::IndigoHttpClient;

use crate::error::IndigoError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One row of the `/devices.json` listing.
///
/// The API omits fields for some device classes; missing fields decode as
/// empty strings and unknown extra fields are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceSummary {
    /// Collection the device belongs to
    #[serde(rename = "restParent", default)]
    pub rest_parent: String,

    /// REST path for the device's detail endpoint
    #[serde(rename = "restURL", default)]
    pub rest_url: String,

    /// URL-encoded device name
    #[serde(rename = "nameURLEncoded", default)]
    pub name_url_encoded: String,

    /// Human-readable device name
    #[serde(default)]
    pub name: String,
}

impl DeviceSummary {
    /// Listing line shown to the user and fed into the assistant inventory.
    pub fn listing_line(&self) -> String {
        format!("- {} ({})", self.name, self.rest_url)
    }
}

/// Open-ended attribute map from a single-device endpoint.
///
/// No fixed schema; consumers access known keys defensively.
pub type DeviceDetail = serde_json::Map<String, serde_json::Value>;

/// Target state for a device state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesiredState {
    On,
    Off,
    Dim,
}

impl DesiredState {
    /// Query string for the state-change PUT: `isOn=1`, `isOn=0`, or
    /// `brightness={param}`.
    pub fn query(&self, param: &str) -> String {
        match self {
            Self::On => "isOn=1".to_string(),
            Self::Off => "isOn=0".to_string(),
            Self::Dim => format!("brightness={}", urlencoding::encode(param)),
        }
    }
}

impl FromStr for DesiredState {
    type Err = IndigoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "on" => Ok(Self::On),
            "off" => Ok(Self::Off),
            "dim" => Ok(Self::Dim),
            other => Err(IndigoError::device_state(format!(
                "Unknown device state {other:?} (expected on, off, or dim)"
            ))),
        }
    }
}

impl fmt::Display for DesiredState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::On => "on",
            Self::Off => "off",
            Self::Dim => "dim",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn listing_decodes_wire_field_names() {
        let raw = r#"[{"restParent":"devices","restURL":"/devices/office-lamp","nameURLEncoded":"office-lamp","name":"Office Lamp"}]"#;
        let devices: Vec<DeviceSummary> = serde_json::from_str(raw).unwrap();
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].rest_parent, "devices");
        assert_eq!(devices[0].rest_url, "/devices/office-lamp");
        assert_eq!(devices[0].name_url_encoded, "office-lamp");
        assert_eq!(devices[0].name, "Office Lamp");
    }

    #[test]
    fn listing_tolerates_missing_fields() {
        let raw = r#"[{"name":"Lamp","restURL":"/devices/lamp"}]"#;
        let devices: Vec<DeviceSummary> = serde_json::from_str(raw).unwrap();
        assert_eq!(devices[0].name, "Lamp");
        assert_eq!(devices[0].rest_url, "/devices/lamp");
        assert_eq!(devices[0].rest_parent, "");
    }

    #[test]
    fn listing_line_names_device_and_path() {
        let device = DeviceSummary {
            rest_parent: String::new(),
            rest_url: "/devices/lamp".to_string(),
            name_url_encoded: String::new(),
            name: "Lamp".to_string(),
        };
        let line = device.listing_line();
        assert!(line.contains("Lamp"));
        assert!(line.contains("/devices/lamp"));
    }

    #[test]
    fn query_strings_are_exact() {
        assert_eq!(DesiredState::Off.query(""), "isOn=0");
        assert_eq!(DesiredState::On.query(""), "isOn=1");
        assert_eq!(DesiredState::Dim.query("75"), "brightness=75");
    }

    #[test]
    fn parses_known_states_only() {
        assert_eq!("on".parse::<DesiredState>().unwrap(), DesiredState::On);
        assert_eq!("off".parse::<DesiredState>().unwrap(), DesiredState::Off);
        assert_eq!("dim".parse::<DesiredState>().unwrap(), DesiredState::Dim);
        assert!("bright".parse::<DesiredState>().is_err());
    }
}
