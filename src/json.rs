//! Lenient JSON parsing for assessment payloads.
//!
//! The assessment service builds its response with an AI pipeline, and the
//! payload occasionally arrives wrapped in a Markdown code fence, prefixed
//! with prose, or with minor syntax damage. This module provides a drop-in
//! replacement for `serde_json::from_str` that tolerates those shapes:
//!
//! 1. Fast path: parse as-is. Valid JSON never pays for repair.
//! 2. Strip a surrounding Markdown fence (with or without a language tag).
//! 3. Extract the first balanced top-level JSON object from mixed text.
//! 4. With the `json-repair` feature, a final `jsonrepair` pass that fixes
//!    unquoted keys, single quotes, trailing commas and similar damage.
//!
//! On total failure the original parse error is returned, not the error from
//! the last repair attempt, so diagnostics point at the payload as received.

/// Strip a surrounding Markdown code fence from a payload.
///
/// Handles ```` ```json ````, bare ```` ``` ````, and leading/trailing
/// whitespace. Returns the input unchanged (minus outer whitespace) when no
/// fence is present.
pub fn strip_code_fences(input: &str) -> &str {
    let trimmed = input.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the language tag line ("json", "JSON", ...), if any.
    let body = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    let body = body.trim_end();
    let body = body.strip_suffix("```").unwrap_or(body);
    body.trim()
}

/// Extract the first balanced top-level JSON object from mixed text.
///
/// Scans for the first `{` and returns the slice up to its matching brace,
/// honoring string literals and escapes. Returns `None` when no balanced
/// object exists.
pub fn extract_json_object(input: &str) -> Option<&str> {
    let start = input.find('{')?;
    let bytes = input.as_bytes();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
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
                depth -= 1;
                if depth == 0 {
                    return Some(&input[start..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parse JSON with automatic repair.
///
/// This is the entry point used for every assessment response body. The fast
/// path is a plain `serde_json::from_str`; repair stages only run on failure.
pub fn parse_lenient<T: serde::de::DeserializeOwned>(input: &str) -> Result<T, serde_json::Error> {
    let original_err = match serde_json::from_str::<T>(input) {
        Ok(val) => return Ok(val),
        Err(err) => err,
    };

    let stripped = strip_code_fences(input);
    if stripped != input.trim() {
        if let Ok(val) = serde_json::from_str::<T>(stripped) {
            tracing::debug!("assessment payload parsed after stripping code fence");
            return Ok(val);
        }
    }

    if let Some(object) = extract_json_object(stripped) {
        if object.len() != stripped.len() {
            if let Ok(val) = serde_json::from_str::<T>(object) {
                tracing::debug!("assessment payload parsed after extracting embedded object");
                return Ok(val);
            }
        }
    }

    #[cfg(feature = "json-repair")]
    {
        use jsonrepair::{Options, repair_json};

        let opts = Options::default();
        match repair_json(stripped, &opts) {
            Ok(repaired) => match serde_json::from_str::<T>(&repaired) {
                Ok(val) => {
                    tracing::debug!(
                        "assessment payload repaired:\noriginal: {}\nrepaired: {}",
                        input,
                        repaired
                    );
                    return Ok(val);
                }
                Err(_) => {
                    tracing::warn!(
                        "JSON repair succeeded but parsing still failed:\noriginal: {}\nrepaired: {}",
                        input,
                        repaired
                    );
                }
            },
            Err(repair_err) => {
                tracing::debug!("JSON repair failed: {repair_err}");
            }
        }
    }

    Err(original_err)
}
