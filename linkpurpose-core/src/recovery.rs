//! Best-effort structured-text recovery for model responses.
//!
//! Responses are untrusted text that should contain one JSON object
//! somewhere, possibly wrapped in prose or code fences, and sometimes
//! written with single quotes or escaped newlines instead of strict JSON.
//!
//! Known gap: the quote repair turns every `'` into `"`, which corrupts
//! text containing apostrophes ("it's"). Strict parsing is therefore tried
//! first and the repair only runs when it fails.
//!
//! Compatibility note: trying strict parsing first widens acceptance. A
//! response that is already valid JSON but contains apostrophes or literal
//! `\n` escapes is accepted here, where repairing first would have mangled
//! it and dropped the batch.

use crate::error::{CheckError, Result};
use serde_json::Value;
use tracing::debug;

/// Slice from the first `{` to the last `}`, inclusive.
pub fn braced_span(raw: &str) -> Result<&str> {
    let start = raw
        .find('{')
        .ok_or_else(|| CheckError::ResponseFormat("response contains no '{'".to_string()))?;
    let end = raw
        .rfind('}')
        .ok_or_else(|| CheckError::ResponseFormat("response contains no '}'".to_string()))?;

    if end < start {
        return Err(CheckError::ResponseFormat(
            "closing '}' appears before the first '{'".to_string(),
        ));
    }
    Ok(&raw[start..=end])
}

/// Turn near-JSON into JSON: single quotes become double quotes and the
/// two-character sequence `\n` becomes a real newline.
pub fn repair_near_json(text: &str) -> String {
    text.replace('\'', "\"").replace("\\n", "\n").trim().to_string()
}

pub fn recover_json(raw: &str) -> Result<Value> {
    let span = braced_span(raw)?;

    match serde_json::from_str(span) {
        Ok(value) => Ok(value),
        Err(strict_err) => {
            debug!("Strict parse failed ({}), attempting repair", strict_err);
            let repaired = repair_near_json(span);
            debug!("Repaired JSON text:\n{}", repaired);
            serde_json::from_str(&repaired).map_err(|e| {
                CheckError::ResponseFormat(format!("not valid JSON after repair: {}", e))
            })
        }
    }
}
