//! Coercion of raw form values into numbers.
//!
//! Nothing here fails: absent, empty or unparseable input degrades to `0.0`.
//! That default-filling policy hides data-entry mistakes (a typo in a
//! cholesterol field scores as zero cholesterol), so callers that care about
//! data quality should inspect the raw input themselves.

use serde_json::Value;

const TRUE_WORDS: [&str; 3] = ["true", "yes", "y"];
const FALSE_WORDS: [&str; 3] = ["false", "no", "n"];

/// Normalise a possibly-absent form string.
pub fn normalize_field(raw: Option<&str>) -> f64 {
    match raw {
        Some(s) => normalize_str(s),
        None => 0.0,
    }
}

/// Normalise a form string.
///
/// Order of rules: empty -> 0, boolean words (case-insensitive), integer or
/// float depending on the presence of a `.`, then a float retry, then 0.
/// Single `_` separators between digits are accepted.
pub fn normalize_str(raw: &str) -> f64 {
    let s = raw.trim();
    if s.is_empty() {
        return 0.0;
    }

    let lower = s.to_lowercase();
    if TRUE_WORDS.contains(&lower.as_str()) {
        return 1.0;
    }
    if FALSE_WORDS.contains(&lower.as_str()) {
        return 0.0;
    }

    let digits = match strip_digit_separators(s) {
        Some(digits) => digits,
        None => return 0.0,
    };
    if digits.contains('.') {
        return digits.parse::<f64>().unwrap_or(0.0);
    }
    match digits.parse::<i64>() {
        Ok(v) => v as f64,
        Err(_) => digits.parse::<f64>().unwrap_or(0.0),
    }
}

/// Drop `_` separators that sit between two digits (`1_000`). Any other
/// underscore makes the number invalid.
fn strip_digit_separators(s: &str) -> Option<String> {
    if !s.contains('_') {
        return Some(s.to_string());
    }
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len());
    for (idx, c) in chars.iter().enumerate() {
        if *c == '_' {
            let before = idx.checked_sub(1).and_then(|i| chars.get(i));
            let after = chars.get(idx + 1);
            match (before, after) {
                (Some(b), Some(a)) if b.is_ascii_digit() && a.is_ascii_digit() => continue,
                _ => return None,
            }
        }
        out.push(*c);
    }
    Some(out)
}

/// Normalise a JSON value from an incremental-update payload.
///
/// Numbers pass through, booleans count as 1/0, strings follow
/// [`normalize_str`]; null, arrays and objects become 0.
pub fn normalize_json(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => normalize_str(s),
        Value::Array(_) | Value::Object(_) => 0.0,
    }
}
