//! Pulling JSON out of free-form model replies.

use super::types::{ExtractedMatch, HistoryEntry};
use super::AdvisorError;
use regex::Regex;
use serde::de::DeserializeOwned;
use std::sync::OnceLock;

fn fence_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```").unwrap())
}

fn span_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\{.*\}|\[.*\]").unwrap())
}

/// Best-effort JSON payload from a model reply.
///
/// Tries, in order: the body of the first fenced code block; the widest
/// `{...}` or `[...]` span starting at whichever bracket comes first; the
/// trimmed reply.
pub fn extract_json(text: &str) -> &str {
    if let Some(body) = fence_re()
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
    {
        return body;
    }
    if let Some(m) = span_re().find(text) {
        return m.as_str();
    }
    text.trim()
}

/// Decode a typed reply.
pub fn parse_reply<T: DeserializeOwned>(raw: &str) -> Result<T, AdvisorError> {
    if raw.trim().is_empty() {
        return Err(AdvisorError::EmptyReply);
    }
    serde_json::from_str(extract_json(raw)).map_err(|e| AdvisorError::MalformedReply(e.to_string()))
}

fn parse_array(raw: &str) -> Result<Vec<serde_json::Value>, AdvisorError> {
    let value: serde_json::Value = parse_reply(raw)?;
    match value {
        serde_json::Value::Array(items) => Ok(items),
        _ => Err(AdvisorError::NotAnArray),
    }
}

/// Decode a screenshot-extraction reply: null fields are dropped and
/// entries without an opponent are discarded.
pub fn parse_extracted_matches(raw: &str) -> Result<Vec<ExtractedMatch>, AdvisorError> {
    let items = parse_array(raw)?;
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        let serde_json::Value::Object(mut obj) = item else {
            continue;
        };
        obj.retain(|_, v| !v.is_null());
        let has_opponent = obj
            .get("opponent")
            .and_then(|v| v.as_str())
            .is_some_and(|s| !s.trim().is_empty());
        if !has_opponent {
            continue;
        }
        let entry: ExtractedMatch = serde_json::from_value(serde_json::Value::Object(obj))
            .map_err(|e| AdvisorError::MalformedReply(e.to_string()))?;
        out.push(entry);
    }
    Ok(out)
}

/// Decode a match-history screenshot reply.
pub fn parse_history_entries(raw: &str) -> Result<Vec<HistoryEntry>, AdvisorError> {
    let items = parse_array(raw)?;
    serde_json::from_value(serde_json::Value::Array(items))
        .map_err(|e| AdvisorError::MalformedReply(e.to_string()))
}

/// Knowledge synthesis replies are plain text.
pub fn parse_knowledge(raw: &str) -> Result<String, AdvisorError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(AdvisorError::EmptyReply);
    }
    Ok(text.to_string())
}
