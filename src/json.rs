//! Helpers for reading JSON with comments (JSONC) into Rust types.
//!
//! Copy profiles are hand-edited, so comments and trailing commas are
//! accepted. Everything else is read with plain `serde_json`.

use anyhow::Context as _;
use serde::de::DeserializeOwned;

/// Parses JSONC text into a `serde_json::Value`. `context` names the source
/// of the text in error messages, usually a file path.
pub fn parse_value_with_context(
    text: &str,
    context: impl Fn() -> String,
) -> anyhow::Result<serde_json::Value> {
    jsonc_parser::parse_to_serde_value(text, &Default::default())
        .with_context(|| format!("{}: JSONC parse error", context()))?
        .ok_or_else(|| anyhow::anyhow!("{}: File contains no JSON value", context()))
}

/// Parses JSONC bytes and deserializes them into `T`.
pub fn from_slice_with_context<T: DeserializeOwned>(
    slice: &[u8],
    context: impl Fn() -> String,
) -> anyhow::Result<T> {
    let text = std::str::from_utf8(slice)
        .with_context(|| format!("{}: File is not valid UTF-8", context()))?;

    let value = parse_value_with_context(text, &context)?;
    serde_json::from_value(value).with_context(|| format!("{}: Invalid JSON structure", context()))
}
