//! Structured-response parser
//!
//! Models rarely return the clean JSON they are asked for: output arrives
//! wrapped in markdown fences, with doubled braces from template echoes, or
//! buried in surrounding prose. `extract_json` recovers the first JSON object
//! from such text and is total - every input yields an object or `None`,
//! never a panic or a propagated error.

use regex::Regex;
use serde_json::Value;
use tracing::debug;

/// Extract the first JSON object from arbitrary model output
///
/// Attempts, in order:
/// 1. strict parse of the whole text
/// 2. strip surrounding backticks/whitespace and a leading fence language tag
/// 3. collapse a doubled outer brace `{{...}}` to `{...}`
/// 4. greedy multiline extraction of the first `{...}` span
///
/// Only objects are returned; a bare array, string, or `null` that parses
/// cleanly still yields `None`.
pub fn extract_json(text: &str) -> Option<Value> {
    if let Some(value) = parse_object(text) {
        return Some(value);
    }

    // Remove markdown code fences and surrounding whitespace, including the
    // "json" language tag that usually follows the opening fence
    let cleaned = text.trim_matches(|c: char| c == '`' || c.is_whitespace());
    let cleaned = cleaned.strip_prefix("json").map(str::trim_start).unwrap_or(cleaned);

    if let Some(value) = parse_object(cleaned) {
        return Some(value);
    }

    // Fix double braces {{...}} -> {...}
    let double_brace = Regex::new(r"(?s)^\{\{(.+)\}\}$").ok()?;
    if let Some(captures) = double_brace.captures(cleaned) {
        let collapsed = format!("{{{}}}", &captures[1]);
        if let Some(value) = parse_object(&collapsed) {
            return Some(value);
        }
    }

    // Find the first { ... } block and try parsing that
    let first_object = Regex::new(r"(?s)\{.*\}").ok()?;
    if let Some(found) = first_object.find(cleaned) {
        if let Some(value) = parse_object(found.as_str()) {
            return Some(value);
        }
    }

    debug!(text_len = text.len(), "extract_json: no JSON object recovered");
    None
}

fn parse_object(text: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(text) {
        Ok(value) if value.is_object() => Some(value),
        _ => None,
    }
}

/// Read a field as f64, tolerating numeric strings
///
/// Model output mixes `"lat": 39.3186` and `"lat": "39.3186"` freely; both
/// forms are accepted everywhere a number is expected.
pub fn flexible_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
