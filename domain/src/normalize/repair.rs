//! Lenient recovery of JSON from model text.
//!
//! Models wrap JSON in markdown fences, surround it with prose, leave
//! trailing commas and stop mid-object when they hit their token limit.
//! [`recover_json`] undoes each of those in turn before giving up.

use serde_json::Value;

/// Parse model text into JSON, repairing common defects.
///
/// Returns the strict parse error message when no repair succeeds.
pub fn recover_json(text: &str) -> Result<Value, String> {
    let strict_error = match serde_json::from_str::<Value>(text.trim()) {
        Ok(value) => return Ok(value),
        Err(e) => e.to_string(),
    };

    let unfenced = strip_code_fences(text);
    let Some(candidate) = extract_object(unfenced) else {
        return Err(format!("no JSON object found ({})", strict_error));
    };

    let mut attempts = vec![remove_trailing_commas(candidate)];
    attempts.push(remove_trailing_commas(&close_open(candidate)));
    if let Some(cut) = scan(candidate).last_comma {
        attempts.push(remove_trailing_commas(&close_open(&candidate[..cut])));
    }

    attempts
        .iter()
        .find_map(|attempt| serde_json::from_str::<Value>(attempt).ok())
        .ok_or(strict_error)
}

/// Take the body of the first markdown code fence, if any.
///
/// A fence left open by a truncated response yields everything after it.
pub fn strip_code_fences(text: &str) -> &str {
    let body = if let Some((_, rest)) = text.split_once("```json") {
        rest
    } else if let Some((_, rest)) = text.split_once("```") {
        rest
    } else {
        return text;
    };
    body.split("```").next().unwrap_or(body)
}

/// Cut everything before the first `{` and after the last `}`.
///
/// With no closing brace after the opening one, the tail is kept whole so
/// truncated objects can still be closed.
pub fn extract_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    match text.rfind('}') {
        Some(end) if end > start => Some(&text[start..=end]),
        _ => Some(&text[start..]),
    }
}

/// Remove commas directly followed by `}` or `]` (outside strings).
pub fn remove_trailing_commas(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
        } else if c == '"' {
            in_string = true;
        } else if c == ',' {
            let next = chars[i + 1..].iter().find(|c| !c.is_whitespace());
            if matches!(next, Some('}') | Some(']')) {
                continue;
            }
        }
        out.push(c);
    }
    out
}

/// Close an unterminated string and any unbalanced braces or brackets.
pub fn close_open(text: &str) -> String {
    let state = scan(text);
    let mut out = text.trim_end().to_string();

    if state.in_string {
        out.push('"');
    }
    if out.ends_with(':') {
        out.push_str(" null");
    }
    if out.ends_with(',') {
        out.pop();
    }
    for closer in state.stack.iter().rev() {
        out.push(*closer);
    }
    out
}

struct ScanState {
    stack: Vec<char>,
    in_string: bool,
    last_comma: Option<usize>,
}

fn scan(text: &str) -> ScanState {
    let mut state = ScanState {
        stack: Vec::new(),
        in_string: false,
        last_comma: None,
    };
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if state.in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                state.in_string = false;
            }
            continue;
        }
        match c {
            '"' => state.in_string = true,
            '{' => state.stack.push('}'),
            '[' => state.stack.push(']'),
            '}' | ']' => {
                state.stack.pop();
            }
            ',' => state.last_comma = Some(i),
            _ => {}
        }
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strict_json_passes_through() {
        let value = recover_json(r#"{"a": 1}"#).unwrap();
        assert_eq!(value, json!({"a": 1}));
    }

    #[test]
    fn test_fenced_json() {
        let text = "Here is the audit:\n```json\n{\"a\": {\"b\": 2}}\n```\nDone.";
        assert_eq!(recover_json(text).unwrap(), json!({"a": {"b": 2}}));
    }

    #[test]
    fn test_plain_fence_and_prose() {
        let text = "```\n{\"x\": true}\n```";
        assert_eq!(recover_json(text).unwrap(), json!({"x": true}));
        let text = "Result follows {\"x\": [1, 2]} hope this helps";
        assert_eq!(recover_json(text).unwrap(), json!({"x": [1, 2]}));
    }

    #[test]
    fn test_trailing_commas() {
        let text = r#"{"a": [1, 2,], "b": {"c": 3,},}"#;
        assert_eq!(recover_json(text).unwrap(), json!({"a": [1, 2], "b": {"c": 3}}));
    }

    #[test]
    fn test_commas_inside_strings_are_kept() {
        assert_eq!(remove_trailing_commas(r#"{"a": "x,}"}"#), r#"{"a": "x,}"}"#);
    }

    #[test]
    fn test_truncated_mid_string() {
        let text = r#"{"aset": {"kas": {"nilai_tercatat": 100, "nama_akun": "Kas dan set"#;
        let value = recover_json(text).unwrap();
        assert_eq!(value["aset"]["kas"]["nilai_tercatat"], json!(100));
    }

    #[test]
    fn test_truncated_after_colon() {
        let text = r#"{"kas": {"nilai_tercatat": 100, "nilai_perhitungan":"#;
        let value = recover_json(text).unwrap();
        assert_eq!(value["kas"]["nilai_perhitungan"], json!(null));
    }

    #[test]
    fn test_truncated_inside_key() {
        let text = r#"{"kas": {"nilai_tercatat": 100}, "piut"#;
        let value = recover_json(text).unwrap();
        assert_eq!(value, json!({"kas": {"nilai_tercatat": 100}}));
    }

    #[test]
    fn test_truncated_fence_without_close() {
        let text = "```json\n{\"a\": [1, 2";
        assert_eq!(recover_json(text).unwrap(), json!({"a": [1, 2]}));
    }

    #[test]
    fn test_braces_in_strings_do_not_count() {
        assert_eq!(close_open(r#"{"a": "}{""#), r#"{"a": "}{"}"#);
    }

    #[test]
    fn test_garbage_fails() {
        assert!(recover_json("I cannot help with that.").is_err());
        assert!(recover_json("").is_err());
    }
}
