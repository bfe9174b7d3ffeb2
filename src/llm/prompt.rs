//! Prompt template rendering
//!
//! Templates are operator-authored text files with two named placeholders,
//! `{{user_prompt}}` and `{{input}}`. Files are read fresh on every call; no
//! caching.

use crate::error::{IndigoError, Result};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;

/// Substitution values for one rendering.
#[derive(Debug, Clone)]
pub struct PromptContext<'a> {
    /// The user's natural-language question
    pub user_prompt: &'a str,

    /// Contextual input: device inventory or device state dump
    pub input: &'a str,
}

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("placeholder pattern is valid")
    })
}

/// Read the template at `path` and substitute the placeholders from `ctx`.
pub fn render_file(path: &Path, ctx: &PromptContext<'_>) -> Result<String> {
    let template = std::fs::read_to_string(path).map_err(|e| {
        IndigoError::template(format!("Failed to read template {}: {e}", path.display()))
    })?;
    let rendered = render(&template, ctx)?;
    debug!("Rendered template {} ({} bytes)", path.display(), rendered.len());
    Ok(rendered)
}

/// Substitute placeholders in template text.
///
/// A `{{name}}` placeholder that is not one of the two known names is a
/// template syntax error. Braces in any other arrangement pass through
/// untouched, so templates may contain literal JSON examples.
pub fn render(template: &str, ctx: &PromptContext<'_>) -> Result<String> {
    let mut rendered = String::with_capacity(template.len());
    let mut last = 0;
    for captures in placeholder_pattern().captures_iter(template) {
        let whole = captures.get(0).expect("capture 0 is the whole match");
        rendered.push_str(&template[last..whole.start()]);
        match &captures[1] {
            "user_prompt" => rendered.push_str(ctx.user_prompt),
            "input" => rendered.push_str(ctx.input),
            unknown => {
                return Err(IndigoError::template(format!(
                    "Unknown placeholder {{{{{unknown}}}}} in template"
                )))
            }
        }
        last = whole.end();
    }
    rendered.push_str(&template[last..]);
    Ok(rendered)
}
