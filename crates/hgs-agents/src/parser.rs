use hgs_models::{ConciergeDecision, GiftCandidate, GiftIdea, RecipientBrief};
use serde::de::DeserializeOwned;

use crate::error::AgentError;

/// Extract the first JSON object or array from a string that may contain surrounding text.
///
/// Handles common model response formats:
/// - Clean JSON: `[{"key": "value"}]`
/// - Markdown-wrapped: ```json\n{"key": "value"}\n```
/// - Prefix text: `Here are the briefs:\n[{"key": "value"}]`
pub fn extract_json(text: &str) -> Result<String, AgentError> {
    let trimmed = text.trim();

    // Try parsing the whole thing as JSON first
    if (trimmed.starts_with('{') || trimmed.starts_with('['))
        && serde_json::from_str::<serde_json::Value>(trimmed).is_ok()
    {
        return Ok(trimmed.to_string());
    }

    if let Some(json_str) = extract_from_markdown_block(trimmed) {
        if serde_json::from_str::<serde_json::Value>(&json_str).is_ok() {
            return Ok(json_str);
        }
    }

    // Try each opening bracket in turn until one yields valid JSON
    for (start, ch) in trimmed.char_indices() {
        if ch != '{' && ch != '[' {
            continue;
        }
        if let Some(json_str) = balanced_from(&trimmed[start..]) {
            if serde_json::from_str::<serde_json::Value>(json_str).is_ok() {
                return Ok(json_str.to_string());
            }
        }
    }

    Err(AgentError::Parse(format!(
        "No valid JSON found in response (length={})",
        text.len()
    )))
}

/// Extract JSON from a markdown code block (```json ... ``` or ``` ... ```)
fn extract_from_markdown_block(text: &str) -> Option<String> {
    let start_markers = ["```json\n", "```json\r\n", "```\n", "```\r\n"];

    for marker in &start_markers {
        if let Some(start) = text.find(marker) {
            let json_start = start + marker.len();
            if let Some(end) = text[json_start..].find("```") {
                let extracted = text[json_start..json_start + end].trim();
                return Some(extracted.to_string());
            }
        }
    }

    None
}

/// Return the balanced `{ ... }` or `[ ... ]` that opens at the start of `text`.
fn balanced_from(text: &str) -> Option<&str> {
    let mut stack: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in text.char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match ch {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            '{' if !in_string => stack.push('}'),
            '[' if !in_string => stack.push(']'),
            '}' | ']' if !in_string => {
                if stack.pop() != Some(ch) {
                    return None;
                }
                if stack.is_empty() {
                    return Some(&text[..=i]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Extract and deserialize a JSON value; a single object is accepted where a
/// list is expected.
fn parse_list<T: DeserializeOwned>(raw: &str, what: &str) -> Result<Vec<T>, AgentError> {
    let json_str = extract_json(raw)?;
    let value: serde_json::Value = serde_json::from_str(&json_str)?;
    let parse_error =
        |e: serde_json::Error| AgentError::Parse(format!("Failed to parse {what}: {e}\nJSON: {json_str}"));

    let map = match value {
        serde_json::Value::Object(map) => map,
        other => return serde_json::from_value(other).map_err(parse_error),
    };

    let single_error = match serde_json::from_value::<T>(serde_json::Value::Object(map.clone())) {
        Ok(item) => return Ok(vec![item]),
        Err(e) => e,
    };

    // Some replies wrap the list under a single key: {"briefs": [...]}
    let mut values = map.into_iter().map(|(_, v)| v);
    match (values.next(), values.next()) {
        (Some(list @ serde_json::Value::Array(_)), None) => {
            serde_json::from_value(list).map_err(parse_error)
        }
        _ => Err(parse_error(single_error)),
    }
}

/// Parse the collector's recipient briefs.
pub fn parse_briefs(raw: &str) -> Result<Vec<RecipientBrief>, AgentError> {
    parse_list(raw, "recipient briefs")
}

/// Parse a researcher's gift list. Every idea starts out `Pending`.
pub fn parse_gift_ideas(raw: &str) -> Result<Vec<GiftIdea>, AgentError> {
    let candidates: Vec<GiftCandidate> = parse_list(raw, "gift ideas")?;
    Ok(candidates.into_iter().map(GiftCandidate::into_idea).collect())
}

/// Parse the concierge routing decision.
pub fn parse_concierge_decision(raw: &str) -> Result<ConciergeDecision, AgentError> {
    let json_str = extract_json(raw)?;
    serde_json::from_str(&json_str).map_err(|e| {
        AgentError::Parse(format!(
            "Failed to parse ConciergeDecision: {e}\nJSON: {json_str}"
        ))
    })
}
