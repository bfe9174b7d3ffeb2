//! The AI-query flow
//!
//! Two completion rounds bracketing device API calls: ask the model which
//! devices matter for the user's question, feed their current state back, then
//! apply the desired end states it returns. Everything runs sequentially; a
//! failed lookup or state change for one device never aborts the rest of the
//! batch.

use crate::client::{DesiredState, DeviceSummary, IndigoHttpClient};
use crate::error::Result;
use crate::llm::interpreter::DesiredStateEntry;
use crate::llm::prompt::PromptContext;
use crate::llm::{interpreter, prompt, CompletionClient};
use std::path::Path;
use tracing::{debug, info, warn};

/// Inputs for one assistant run.
pub struct AssistSettings<'a> {
    /// The user's natural-language question
    pub query_text: &'a str,

    /// Template for the device-selection round
    pub selection_template: &'a Path,

    /// Template for the desired-state round
    pub state_template: &'a Path,
}

/// Run the two-round assistant flow.
pub async fn run(
    devices: &IndigoHttpClient,
    completions: &CompletionClient,
    settings: &AssistSettings<'_>,
) -> Result<()> {
    let inventory = build_inventory(&devices.list_devices().await?);

    let selection_prompt = prompt::render_file(
        settings.selection_template,
        &PromptContext {
            user_prompt: settings.query_text,
            input: &inventory,
        },
    )?;
    log_outgoing_prompt(&selection_prompt);
    let selection_reply = completions.complete(&selection_prompt).await?;
    info!("Response from LLM: {}", flatten(&selection_reply));
    let selected_paths = interpreter::parse_device_selection(&selection_reply)?;

    let state_dump = collect_state_dump(devices, &selected_paths).await;

    let state_prompt = prompt::render_file(
        settings.state_template,
        &PromptContext {
            user_prompt: settings.query_text,
            input: &state_dump,
        },
    )?;
    log_outgoing_prompt(&state_prompt);
    let state_reply = completions.complete(&state_prompt).await?;
    info!("Response from LLM: {}", flatten(&state_reply));

    info!("Interpreting the desired state");
    let entries = interpreter::parse_desired_states(&state_reply)?;
    debug!("Model returned {} desired-state entries", entries.len());
    apply_desired_states(devices, &entries).await;
    Ok(())
}

/// Human-readable inventory handed to the selection round.
fn build_inventory(devices: &[DeviceSummary]) -> String {
    devices
        .iter()
        .map(DeviceSummary::listing_line)
        .collect::<Vec<_>>()
        .join(",")
}

/// Fetch detail for each selected device, one at a time.
///
/// Lookup failures are logged and skipped; one bad device path should not
/// block acting on the others.
async fn collect_state_dump(devices: &IndigoHttpClient, paths: &[String]) -> String {
    let mut dump = String::new();
    for path in paths {
        match devices.get_device(path).await {
            Ok(detail) => {
                let rendered = serde_json::Value::Object(detail).to_string();
                dump.push_str(&format!("{path} {rendered}\n\n"));
            }
            Err(e) => warn!("Couldn't inspect device {path}: {e}"),
        }
    }
    dump
}

/// Apply recognized `on`/`off` entries in reply order.
///
/// Entries with any other desired state issue no state change; a failed
/// change is logged and the batch continues.
async fn apply_desired_states(devices: &IndigoHttpClient, entries: &[DesiredStateEntry]) {
    for entry in entries {
        let state = match entry.desired_state.as_str() {
            "on" => DesiredState::On,
            "off" => DesiredState::Off,
            other => {
                debug!(
                    "Leaving {} unmodified (desired state {other:?} is not actionable)",
                    entry.device_path
                );
                continue;
            }
        };
        info!("The device {} is turning {state}", entry.device_path);
        if let Err(e) = devices.set_device_state(&entry.device_path, state, "").await {
            warn!("State change for {} failed: {e}", entry.device_path);
        }
    }
}

/// Log the full prompt at debug level, its tail at info level.
fn log_outgoing_prompt(prompt: &str) {
    if tracing::enabled!(tracing::Level::DEBUG) {
        debug!("Prompt sent to LLM: ``` {prompt} ```");
    } else {
        let words: Vec<&str> = prompt.split_whitespace().collect();
        let tail = words[words.len().saturating_sub(10)..].join(" ");
        info!("Truncated prompt sent to LLM: ``` {tail} ```");
    }
}

/// Strip newlines for single-line reply logging.
fn flatten(reply: &str) -> String {
    reply.replace('\n', "")
}
