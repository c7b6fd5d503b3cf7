//! Best-effort structured decode of free-text model replies.
//!
//! Replies are prose with a JSON object somewhere inside. The contract is
//! narrow: text in, parsed object or `None` out. Callers treat `None` the
//! same as a failed completion call.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

/// Pull the first JSON object out of reply text. A greedy first-`{`-to-
/// last-`}` slice is tried first (the common case of one object wrapped in
/// prose), then a balanced scan that respects string literals.
pub fn extract_json(text: &str) -> Option<Value> {
    let text = strip_code_fences(text);

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end > start {
        if let Ok(v) = serde_json::from_str::<Value>(&text[start..=end]) {
            if v.is_object() {
                return Some(v);
            }
        }
    }

    let candidate = balanced_object(&text[start..])?;
    serde_json::from_str(candidate).ok().filter(Value::is_object)
}

/// Typed variant; a shape mismatch is reported as `None`.
pub fn extract_as<T: DeserializeOwned>(text: &str) -> Option<T> {
    let value = extract_json(text)?;
    match serde_json::from_value(value) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            debug!(error = %e, "reply json did not match expected shape");
            None
        }
    }
}

/// Return the body of the first fenced block, or the input unchanged.
fn strip_code_fences(text: &str) -> &str {
    let Some(open) = text.find("```") else {
        return text;
    };
    let after = &text[open + 3..];
    // skip a language tag on the fence line
    let body_start = after.find('\n').map(|i| i + 1).unwrap_or(0);
    let body = &after[body_start..];
    match body.find("```") {
        Some(close) => &body[..close],
        None => body,
    }
}

/// `text` must start at a `{`; returns the slice up to its matching brace.
fn balanced_object(text: &str) -> Option<&str> {
    let mut depth: usize = 0;
    let mut in_string = false;
    let mut escaped = false;
    for (i, b) in text.bytes().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(&text[..=i]);
                }
            }
            _ => {}
        }
    }
    None
}
