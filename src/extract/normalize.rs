//! Text cleanup for issue field values.

use serde_json::Value;

/// Normalize a raw field value into a canonical string.
///
/// Absent and null values become `""`. Strings are trimmed and every line
/// break variant becomes `\n`. Anything else uses its JSON text.
pub fn normalize(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => normalize_str(s),
        Some(other) => normalize_str(&other.to_string()),
    }
}

/// Normalize a string: trim, then fold `\r\n` and bare `\r` into `\n`.
pub fn normalize_str(text: &str) -> String {
    text.trim().replace("\r\n", "\n").replace('\r', "\n")
}
