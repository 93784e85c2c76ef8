//! Dotted-path lookup and string coercion over JSON data snapshots.
//!
//! The condition evaluator, the template substitutor and the display
//! projector all resolve `a.b.c` paths against the caller's data object and
//! need a consistent stringification; both live here so the three agree.

use serde_json::Value;

/// Walk a dotted path (`a.b.c`) into a JSON value.
///
/// Returns `None` when any step is missing or the intermediate value is not
/// an object. A single bare key is the common case.
pub fn lookup_path<'a>(data: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = data;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// String form used for rendering: template substitution, text projection,
/// card values.
///
/// Null renders as the empty string (never `"null"`); integral numbers drop
/// the trailing `.0`; arrays and objects fall back to compact JSON.
pub fn display_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_string(n),
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}

/// String form used for `==` / `!=` comparison in conditions.
///
/// Matches JavaScript `String()` semantics: null stringifies to `"null"`
/// (comparison and display intentionally differ on this point).
pub fn comparison_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        other => display_string(other),
    }
}

fn number_string(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(f) = n.as_f64() {
        if f.fract() == 0.0 && f.is_finite() && f.abs() < 9.007_199_254_740_992e15 {
            return format!("{}", f as i64);
        }
        return f.to_string();
    }
    n.to_string()
}

/// Truthiness of a resolved value, used when a condition is a bare
/// identifier or literal: null, `false`, `0`, and the empty string are
/// falsy; everything else (including empty arrays/objects) is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
