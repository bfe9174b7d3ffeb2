//! Parsing of model replies
//!
//! The completion endpoint returns free text that is expected to be JSON but
//! may be truncated near the token limit. Decoding appends exactly one closing
//! brace and retries exactly once; anything still malformed after that is an
//! interpretation failure. The repair is deliberately this narrow — it matches
//! the observed truncation, not general malformed JSON.
//!
//! The two reply shapes are surfaced as distinct typed results rather than raw
//! JSON maps; unknown extra fields in the replies are ignored.

use crate::error::{IndigoError, Result};
use serde_json::Value;
use tracing::warn;

/// One entry of a desired-state reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredStateEntry {
    /// REST path of the device to change
    pub device_path: String,

    /// Requested end state, e.g. `on` or `off`; not validated here
    pub desired_state: String,
}

/// Parse a first-round reply into the selected device paths.
///
/// Fails when `devicePaths` is absent or not an array. Non-string elements are
/// skipped with a warning.
pub fn parse_device_selection(reply: &str) -> Result<Vec<String>> {
    let value = decode_with_brace_repair(reply)?;
    let paths = value
        .get("devicePaths")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            IndigoError::interpretation("'devicePaths' key not found or has an invalid type")
        })?;

    let mut selected = Vec::with_capacity(paths.len());
    for entry in paths {
        match entry.as_str() {
            Some(path) => selected.push(path.to_string()),
            None => warn!("Skipping non-string device path entry: {entry}"),
        }
    }
    Ok(selected)
}

/// Parse a second-round reply into desired-state entries.
///
/// Fails when `devices` is absent or not an array (no partial application).
/// Entries that are not objects, or that lack `devicePath`/`desiredState`
/// strings, are skipped with a warning rather than aborting the batch.
pub fn parse_desired_states(reply: &str) -> Result<Vec<DesiredStateEntry>> {
    let value = decode_with_brace_repair(reply)?;
    let devices = value
        .get("devices")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            IndigoError::interpretation("'devices' key not found or has an invalid type")
        })?;

    let mut entries = Vec::with_capacity(devices.len());
    for entry in devices {
        let Some(map) = entry.as_object() else {
            warn!("Skipping desired-state entry that is not an object: {entry}");
            continue;
        };
        let (Some(device_path), Some(desired_state)) = (
            map.get("devicePath").and_then(Value::as_str),
            map.get("desiredState").and_then(Value::as_str),
        ) else {
            warn!("Skipping desired-state entry without devicePath/desiredState strings: {entry}");
            continue;
        };
        entries.push(DesiredStateEntry {
            device_path: device_path.to_string(),
            desired_state: desired_state.to_string(),
        });
    }
    Ok(entries)
}

/// Decode reply text, repairing a single missing closing brace.
fn decode_with_brace_repair(reply: &str) -> Result<Value> {
    match serde_json::from_str(reply) {
        Ok(value) => Ok(value),
        Err(e) if e.is_eof() => {
            let repaired = format!("{reply}}}");
            serde_json::from_str(&repaired).map_err(|e| {
                IndigoError::interpretation(format!(
                    "Model reply is not valid JSON after brace repair: {e}"
                ))
            })
        }
        Err(e) => Err(IndigoError::interpretation(format!(
            "Model reply is not valid JSON: {e}"
        ))),
    }
}
