//! Answer extraction from arbitrarily shaped upstream bodies.
//!
//! Upstream responses are searched tier by tier: the candidate's content
//! parts, the candidate's own text fields, well-known top-level keys, and
//! finally the longest string anywhere in the document.

use serde_json::{Map, Value};

const CANDIDATE_LIST_KEYS: [&str; 3] = ["candidates", "outputs", "choices"];
const CANDIDATE_TEXT_KEYS: [&str; 4] = ["text", "output", "message", "content"];
const PART_TEXT_KEYS: [&str; 2] = ["text", "content"];
const TOP_LEVEL_TEXT_KEYS: [&str; 4] = ["output_text", "response", "result", "output"];

/// Turn a successful upstream body into an answer.
///
/// Non-JSON bodies are returned trimmed; JSON without any recognizable
/// text is returned serialized. `None` only when there is nothing to return.
pub fn answer_from_body(body: &str) -> Option<String> {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => extract_text(&value).or_else(|| serde_json::to_string(&value).ok()),
        Err(_) => {
            let text = body.trim();
            (!text.is_empty()).then(|| text.to_string())
        }
    }
}

/// Locate answer text in a decoded upstream JSON document.
pub fn extract_text(value: &Value) -> Option<String> {
    let root = value.as_object()?;

    if let Some(first) = first_candidate(root) {
        if let Some(text) = joined_parts(first) {
            return Some(text);
        }
        if let Some(text) = first_trimmed_string(first, &CANDIDATE_TEXT_KEYS) {
            return Some(text);
        }
    }

    if let Some(text) = first_trimmed_string(root, &TOP_LEVEL_TEXT_KEYS) {
        return Some(text);
    }

    longest_string(value)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn first_candidate(root: &Map<String, Value>) -> Option<&Map<String, Value>> {
    let candidates = CANDIDATE_LIST_KEYS
        .iter()
        .filter_map(|key| root.get(*key))
        .find(|v| is_truthy(v))?;

    candidates.as_array()?.first()?.as_object()
}

fn joined_parts(candidate: &Map<String, Value>) -> Option<String> {
    let parts = candidate
        .get("content")
        .and_then(Value::as_object)
        .and_then(|content| content.get("parts"))
        .and_then(Value::as_array)
        .filter(|parts| !parts.is_empty())?;

    let joined: String = parts.iter().map(part_text).collect();
    let joined = joined.trim();
    (!joined.is_empty()).then(|| joined.to_string())
}

fn part_text(part: &Value) -> String {
    match part {
        Value::Object(fields) => PART_TEXT_KEYS
            .iter()
            .filter_map(|key| fields.get(*key))
            .find(|v| is_truthy(v))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn first_trimmed_string(fields: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| fields.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// Depth-first search for the longest string; ties keep the first seen.
fn longest_string(value: &Value) -> Option<&str> {
    fn walk<'a>(value: &'a Value, longest: &mut Option<(usize, &'a str)>) {
        match value {
            Value::String(s) => {
                let len = s.chars().count();
                if longest.map_or(len > 0, |(best, _)| len > best) {
                    *longest = Some((len, s));
                }
            }
            Value::Object(fields) => fields.values().for_each(|v| walk(v, longest)),
            Value::Array(items) => items.iter().for_each(|v| walk(v, longest)),
            _ => {}
        }
    }

    let mut longest = None;
    walk(value, &mut longest);
    longest.map(|(_, s)| s)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}
