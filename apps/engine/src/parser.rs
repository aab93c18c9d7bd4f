//! Noisy-response JSON coercion — the uniform failure funnel for every
//! generative call in the pipeline.
//!
//! The completion service is not guaranteed to emit pure JSON: models wrap
//! payloads in prose, apologies, or markdown fences. Downstream stages treat
//! "no data" as the one failure shape, so nothing in this module returns an
//! error — an unusable response collapses to an empty JSON object and a
//! logged diagnostic.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};
use tracing::warn;

use crate::llm_client::TextCompletionService;

/// Greedy bracket-delimited span: first `{` to the last `}`, or first `[` to
/// the last `]`. Leftmost alternative wins, so prose before the payload is
/// skipped and trailing commentary after it is cut off.
fn json_span_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\{.*\}|\[.*\]").expect("valid JSON span regex"))
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

/// Extracts and decodes the JSON payload embedded in free-form model output.
///
/// Pure function over strings; never panics, never errors. A response with no
/// bracket-delimited span, or whose span fails to decode, yields an empty
/// object.
pub fn extract_json(raw: &str) -> Value {
    let Some(span) = json_span_re().find(raw) else {
        warn!("no JSON span found in model response ({} bytes)", raw.len());
        return empty_object();
    };
    match serde_json::from_str(span.as_str()) {
        Ok(value) => value,
        Err(e) => {
            warn!("model response JSON failed to decode: {e}");
            empty_object()
        }
    }
}

/// Issues one best-effort completion call and coerces the reply through
/// [`extract_json`].
///
/// Transport and service failures are logged and collapse to the empty
/// object — they never propagate to the orchestrator.
pub async fn request_json(
    service: &dyn TextCompletionService,
    prompt: &str,
    system: &str,
) -> Value {
    match service.complete(prompt, system).await {
        Ok(text) => extract_json(&text),
        Err(e) => {
            warn!("completion call failed: {e}");
            empty_object()
        }
    }
}

/// Reads `value[key]` as a list of strings, defaulting to empty on a missing
/// or mistyped field.
///
/// Models occasionally emit numbers, booleans, or whole objects inside what
/// should be a string list; scalars are stringified and objects kept as
/// compact JSON rather than dropped.
pub fn string_list(value: &Value, key: &str) -> Vec<String> {
    match value.get(key) {
        Some(Value::Array(items)) => items.iter().filter_map(as_text).collect(),
        _ => Vec::new(),
    }
}

fn as_text(item: &Value) -> Option<String> {
    match item {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(_) | Value::Bool(_) => Some(item.to_string()),
        Value::Object(_) => serde_json::to_string(item).ok(),
        _ => None,
    }
}
