//! Lenient field readers over raw upstream JSON.

use serde_json::Value;

/// String value of `key`, accepting numbers; empty strings count as absent.
pub fn text(raw: &Value, key: &str) -> Option<String> {
    match raw.get(key)? {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// First present key in preference order.
pub fn first_text(raw: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| text(raw, k))
}

/// Numeric value of the first present key, accepting numeric strings.
pub fn number(raw: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|k| match raw.get(*k)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

pub fn boolean(raw: &Value, key: &str) -> Option<bool> {
    match raw.get(key)? {
        Value::Bool(b) => Some(*b),
        _ => None,
    }
}
