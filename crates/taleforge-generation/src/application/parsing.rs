//! Extraction of structured data from free-form model replies.
//!
//! Models wrap JSON in Markdown fences or surround it with commentary, so
//! the parsers look for the outermost object or array instead of parsing
//! the reply verbatim.

use serde_json::Value;
use taleforge_task_queue::HandlerError;

/// Removes a leading Markdown code fence (with optional language tag) and
/// its closing fence.
fn strip_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

fn extract_between(reply: &str, open: char, close: char) -> Option<Value> {
    let text = strip_fence(reply);
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    if end < start {
        return None;
    }
    serde_json::from_str(&text[start..=end]).ok()
}

/// Parses the outermost JSON object in `reply`.
///
/// # Errors
///
/// Returns `HandlerError::InvalidModelOutput` if no object can be parsed.
pub fn extract_object(reply: &str) -> Result<Value, HandlerError> {
    match extract_between(reply, '{', '}') {
        Some(value @ Value::Object(_)) => Ok(value),
        _ => Err(HandlerError::InvalidModelOutput(
            "expected a JSON object in the model reply".into(),
        )),
    }
}

/// Parses a JSON list from `reply`. Accepts a bare array or an object with
/// an array under `key`.
///
/// # Errors
///
/// Returns `HandlerError::InvalidModelOutput` if neither shape is found.
pub fn extract_list(reply: &str, key: &str) -> Result<Vec<Value>, HandlerError> {
    let text = strip_fence(reply);
    let array_first = match (text.find('['), text.find('{')) {
        (Some(array), Some(object)) => array < object,
        (Some(_), None) => true,
        _ => false,
    };
    if array_first {
        if let Some(Value::Array(items)) = extract_between(reply, '[', ']') {
            return Ok(items);
        }
    }
    if let Some(Value::Object(mut object)) = extract_between(reply, '{', '}') {
        if let Some(Value::Array(items)) = object.remove(key) {
            return Ok(items);
        }
    }
    Err(HandlerError::InvalidModelOutput(format!(
        "expected a JSON array or an object with a `{key}` array in the model reply"
    )))
}
