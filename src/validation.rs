//! Field- and form-level validation.
//!
//! Rules run in declaration order and the first failure wins, so a field
//! surfaces at most one error. Absence passes every rule except `required`:
//! a non-required field must not fail format rules while empty.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use schema_types::{FormField, ValidationRule};

/// Permissive `local@domain.tld` shape; not an RFC 5322 validator.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap()
});

/// Whether a value counts as absent: missing, null, empty string, or empty
/// array. Absent values pass every rule except `required`.
pub fn is_absent(value: Option<&Value>) -> bool {
    value.map_or(true, value_is_empty)
}

fn value_is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Validate one value against an ordered rule list.
///
/// Returns the message of the first failing rule, or `None` when all rules
/// pass (including the zero-rule case).
pub fn validate_field(value: Option<&Value>, rules: &[ValidationRule]) -> Option<String> {
    for rule in rules {
        if !rule_passes(value, rule) {
            return Some(rule.message().to_string());
        }
    }
    None
}

fn rule_passes(value: Option<&Value>, rule: &ValidationRule) -> bool {
    // Only `required` rejects absence.
    let Some(value) = value.filter(|v| !value_is_empty(v)) else {
        return !rule.is_required();
    };
    match rule {
        ValidationRule::Required { .. } => true,
        ValidationRule::MinLength { value: n, .. } => string_length(value) >= *n,
        ValidationRule::MaxLength { value: n, .. } => string_length(value) <= *n,
        ValidationRule::Pattern { value: pattern, .. } => match Regex::new(pattern) {
            Ok(re) => re.is_match(&string_form(value)),
            Err(err) => {
                // Malformed pattern is an authoring bug; degrade to pass.
                tracing::warn!(pattern, %err, "malformed pattern rule, skipping");
                true
            }
        },
        ValidationRule::Email { .. } => EMAIL_RE.is_match(&string_form(value)),
        ValidationRule::Min { value: n, .. } => numeric_form(value).map(|v| v >= *n).unwrap_or(false),
        ValidationRule::Max { value: n, .. } => numeric_form(value).map(|v| v <= *n).unwrap_or(false),
    }
}

fn string_form(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => crate::value_path::display_string(other),
    }
}

fn string_length(value: &Value) -> usize {
    string_form(value).chars().count()
}

/// Numeric coercion for `min`/`max`: numbers directly, numeric strings
/// parsed. A present non-numeric value fails the bound.
fn numeric_form(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Run [`validate_field`] over every currently visible field.
///
/// The caller supplies the visible subset (fields hidden by `visibleIf` are
/// exempt even when marked required). The value validated for each field is
/// its effective raw value: `data[fieldKey]` if present, else the field's
/// declared default — a defaulted field validates the way it renders.
/// Submission is blocked iff the returned map is non-empty.
pub fn validate_form<'a>(
    visible_fields: impl IntoIterator<Item = &'a FormField>,
    data: &Value,
) -> BTreeMap<String, String> {
    let mut errors = BTreeMap::new();
    for field in visible_fields {
        let value = effective_raw_value(field, data);
        if let Some(message) = validate_field(value, &field.validation_rules) {
            errors.insert(field.field_key.clone(), message);
        }
    }
    errors
}

/// `data[fieldKey]` if present, else the declared default.
pub(crate) fn effective_raw_value<'a>(field: &'a FormField, data: &'a Value) -> Option<&'a Value> {
    data.as_object()
        .and_then(|obj| obj.get(&field.field_key))
        .or(field.default_value.as_ref())
}
