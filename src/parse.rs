//! Best-effort recovery of a JSON object from raw model output.

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Strict parse of the whole text, then a retry on the slice between the
/// first `{` and the last `}`. Empty objects, `null` and `false` count as
/// failures.
pub fn parse_response(raw: &str) -> Option<Value> {
    let value = serde_json::from_str::<Value>(raw).ok().or_else(|| {
        let start = raw.find('{')?;
        let end = raw.rfind('}')?;
        if end < start {
            return None;
        }
        serde_json::from_str::<Value>(&raw[start..=end]).ok()
    })?;
    is_meaningful(&value).then_some(value)
}

fn is_meaningful(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Object(m) => !m.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::String(s) => !s.is_empty(),
        Value::Number(_) => true,
    }
}

/// [`parse_response`] followed by a typed conversion; shape mismatches are `None`.
pub fn parse_record<T: DeserializeOwned>(raw: &str) -> Option<T> {
    parse_response(raw).and_then(|v| serde_json::from_value(v).ok())
}
