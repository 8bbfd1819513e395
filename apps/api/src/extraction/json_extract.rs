//! Resilient JSON Extractor — recovers the first balanced JSON object from noisy text.

/// Returned when no object can be located at all.
pub const EMPTY_OBJECT: &str = "{}";

/// Returns the JSON text embedded in `text`.
///
/// - Input that already parses as JSON is returned unchanged.
/// - Otherwise the first `{` starts a scan that counts brace depth, ignoring
///   braces inside string literals. Backslash escapes are honoured so `\"`
///   never toggles the string state.
/// - The substring up to the brace that closes the first object is returned.
/// - An unterminated object yields everything from the first `{` to the end;
///   callers are expected to fail the subsequent parse.
/// - No `{` at all yields `"{}"`.
pub fn extract_json(text: &str) -> String {
    if text.is_empty() {
        return EMPTY_OBJECT.to_string();
    }

    if serde_json::from_str::<serde_json::Value>(text).is_ok() {
        return text.to_string();
    }

    let Some(start) = text.find('{') else {
        return EMPTY_OBJECT.to_string();
    };

    match balanced_object_end(&text[start..]) {
        Some(end) => text[start..start + end].to_string(),
        None => text[start..].to_string(),
    }
}

/// Byte length of the balanced object at the start of `slice`, if it closes.
/// `slice` must begin with `{`.
fn balanced_object_end(slice: &str) -> Option<usize> {
    let mut depth: u32 = 0;
    let mut in_string = false;
    let mut escape_next = false;

    for (idx, ch) in slice.char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match ch {
            '\\' => escape_next = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(idx + ch.len_utf8());
                }
            }
            _ => {}
        }
    }

    None
}
