//! JSON helpers for gateway payloads.

use serde_json::Value;

/// Recursively convert every integer-valued `*_id` field to a string.
///
/// Snowflakes exceed the 53-bit integer range that JavaScript clients can
/// represent, so any identifier that slipped through as a number is
/// rewritten. Nulls and non-integer values are left as they are.
pub fn stringify_ids(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, v)| {
                    let converted = match v {
                        Value::Number(ref n) if key.ends_with("_id") && (n.is_i64() || n.is_u64()) => {
                            Value::String(n.to_string())
                        }
                        other => stringify_ids(other),
                    };
                    (key, converted)
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(stringify_ids).collect()),
        other => other,
    }
}
