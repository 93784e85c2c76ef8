//! Field and action resolution: schema declarations projected into
//! render-ready descriptors for the current data snapshot.
//!
//! Descriptors are ephemeral: recomputed on every interpretation pass, with
//! no identity beyond the field/action keys the caller already holds.
//! Resolution is a pure projection with no side effects.

use serde::Serialize;
use serde_json::Value;

use schema_types::{ActionButton, ActionStyle, FieldType, FormField, SelectOption};

use crate::condition;
use crate::validation::effective_raw_value;

/// Render-ready projection of one schema field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub field_key: String,
    /// Normalized variant: unknown schema tags have already fallen back to
    /// [`FieldType::Text`].
    pub field_type: FieldType,
    pub label: String,
    /// Effective value: data value, else declared default, else the
    /// type-appropriate empty value.
    pub value: Value,
    pub required: bool,
    pub disabled: bool,
    pub warning: bool,
    pub highlighted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
    /// Populated only after a validation pass, via
    /// [`crate::interpreter::apply_validation`]; resolution itself never
    /// validates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Render-ready projection of one schema action.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionDescriptor {
    pub action_key: String,
    pub label: String,
    pub style: ActionStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub requires_confirmation: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmation_text: Option<String>,
}

/// Resolve one field against the data snapshot.
///
/// Returns `None` when the field's `visibleIf` evaluates false: the field is
/// excluded from rendering, validation and submission alike.
pub fn resolve_field(field: &FormField, data: &Value) -> Option<FieldDescriptor> {
    if let Some(expr) = &field.visible_if {
        if !condition::evaluate(expr, data) {
            return None;
        }
    }

    let field_type = normalized_type(field);
    let value = effective_raw_value(field, data)
        .cloned()
        .unwrap_or_else(|| empty_value(field_type));
    let required = field.required || field.has_required_rule();

    Some(FieldDescriptor {
        field_key: field.field_key.clone(),
        field_type,
        label: field.label.clone(),
        value,
        required,
        disabled: custom_flag(field, "disabled"),
        warning: custom_flag(field, "warning"),
        highlighted: custom_flag(field, "highlighted"),
        placeholder: field.placeholder.clone(),
        help_text: field.help_text.clone(),
        options: field.options.clone(),
        error: None,
    })
}

/// Resolve one action against the data snapshot. Absent `visibleIf` means
/// visible.
pub fn resolve_action(action: &ActionButton, data: &Value) -> Option<ActionDescriptor> {
    if let Some(expr) = &action.visible_if {
        if !condition::evaluate(expr, data) {
            return None;
        }
    }
    Some(ActionDescriptor {
        action_key: action.action_key.clone(),
        label: action.label.clone(),
        style: action.style,
        icon: action.icon.clone(),
        requires_confirmation: action.confirmation.is_some(),
        confirmation_text: action.confirmation.clone(),
    })
}

/// Dispatch a resolved action through its confirmation gate.
///
/// When the descriptor requires confirmation, `confirm` is asked first with
/// the prompt text; a declined confirmation aborts silently — `sink` is not
/// called and nothing changes. Returns whether the action fired.
pub fn dispatch_action(
    descriptor: &ActionDescriptor,
    data: &Value,
    confirm: &mut dyn FnMut(&str) -> bool,
    sink: &mut dyn FnMut(&str, &Value),
) -> bool {
    if descriptor.requires_confirmation {
        let prompt = descriptor.confirmation_text.as_deref().unwrap_or_default();
        if !confirm(prompt) {
            return false;
        }
    }
    sink(&descriptor.action_key, data);
    true
}

/// Unknown schema tags render as text; schema forward-compatibility is
/// favored over hard failure.
fn normalized_type(field: &FormField) -> FieldType {
    if field.field_type == FieldType::Unknown {
        tracing::warn!(
            field_key = %field.field_key,
            "unknown field type, falling back to text"
        );
        FieldType::Text
    } else {
        field.field_type
    }
}

/// Type-appropriate empty value: empty string for text-like variants,
/// `false` for boolean, empty list for multi-select, null for file.
fn empty_value(field_type: FieldType) -> Value {
    match field_type {
        FieldType::Boolean => Value::Bool(false),
        FieldType::MultiSelect => Value::Array(Vec::new()),
        FieldType::File => Value::Null,
        _ => Value::String(String::new()),
    }
}

fn custom_flag(field: &FormField, key: &str) -> bool {
    field
        .custom_props
        .get(key)
        .and_then(Value::as_bool)
        .unwrap_or(false)
}
