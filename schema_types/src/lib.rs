//! Schema Types - Foundation data structures for the UI schema system
//!
//! This crate contains the pure data structures that describe a declarative
//! UI component: fields, validation rules, actions, layout, and the opaque
//! customization bags that Display-type schemas consume.
//!
//! ## Architecture Level: Foundation
//!
//! This is the bottom layer of the workspace dependency hierarchy. The
//! engine crate depends on this crate; this crate depends on nothing in the
//! workspace.
//!
//! ## Critical Rules
//!
//! 1. **NO BUSINESS LOGIC** - Only data structures and basic accessors
//! 2. **SERIALIZABLE** - All types support serde (camelCase wire names)
//! 3. **LENIENT TAGS** - Unknown `type`/`componentType` strings deserialize
//!    into explicit `Unknown` variants instead of failing; interpretation of
//!    those variants (text fallback, unsupported marker) lives in the engine
//!
//! Schemas are immutable inputs to the engine: nothing here is mutated
//! during an interpretation pass.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// COMPONENT IDENTITY AND KIND
// ============================================================================

/// Top-level kind of a UI component schema.
///
/// Unknown strings deserialize to [`ComponentType::Unknown`]; the interpreter
/// renders those (and `Modal`/`Custom`) as an "unsupported" placeholder
/// rather than failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ComponentType {
    Form,
    Display,
    Modal,
    Custom,
    #[serde(other)]
    #[default]
    Unknown,
}

impl ComponentType {
    /// Get the wire-format name of this component type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentType::Form => "Form",
            ComponentType::Display => "Display",
            ComponentType::Modal => "Modal",
            ComponentType::Custom => "Custom",
            ComponentType::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for ComponentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// FIELD TYPES
// ============================================================================

/// Closed set of field input variants.
///
/// The tag set is closed on the wire but forward-compatible: an unrecognized
/// tag deserializes to [`FieldType::Unknown`], which the resolver renders as
/// `text` with a warning instead of rejecting the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FieldType {
    #[default]
    Text,
    Email,
    Number,
    Select,
    Combobox,
    MultiSelect,
    Textarea,
    Boolean,
    Date,
    File,
    #[serde(other)]
    Unknown,
}

impl FieldType {
    /// Whether this variant renders a choice widget backed by `options`.
    pub fn is_choice(&self) -> bool {
        matches!(
            self,
            FieldType::Select | FieldType::Combobox | FieldType::MultiSelect
        )
    }

    /// Get the wire-format tag of this field type.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Email => "email",
            FieldType::Number => "number",
            FieldType::Select => "select",
            FieldType::Combobox => "combobox",
            FieldType::MultiSelect => "multi-select",
            FieldType::Textarea => "textarea",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::File => "file",
            FieldType::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One entry of a choice field's `options` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    /// Stored value. Authors write strings, numbers or booleans here, so
    /// this stays a raw JSON value.
    pub value: Value,
    /// Human-readable label.
    pub label: String,
    /// Whether the option is selectable. Absent means enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
}

// ============================================================================
// VALIDATION RULES
// ============================================================================

/// A single named validation check with its user-facing message.
///
/// Rules are evaluated in declaration order; the first failing rule's
/// message is surfaced and evaluation stops (at most one error per field).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ValidationRule {
    Required {
        message: String,
    },
    MinLength {
        value: usize,
        message: String,
    },
    MaxLength {
        value: usize,
        message: String,
    },
    Pattern {
        value: String,
        message: String,
    },
    Email {
        message: String,
    },
    Min {
        value: f64,
        message: String,
    },
    Max {
        value: f64,
        message: String,
    },
}

impl ValidationRule {
    /// The user-facing message attached to this rule.
    pub fn message(&self) -> &str {
        match self {
            ValidationRule::Required { message }
            | ValidationRule::MinLength { message, .. }
            | ValidationRule::MaxLength { message, .. }
            | ValidationRule::Pattern { message, .. }
            | ValidationRule::Email { message }
            | ValidationRule::Min { message, .. }
            | ValidationRule::Max { message, .. } => message,
        }
    }

    /// Whether this is the `required` rule (the only rule that rejects an
    /// absent value).
    pub fn is_required(&self) -> bool {
        matches!(self, ValidationRule::Required { .. })
    }
}

// ============================================================================
// FORM FIELDS
// ============================================================================

/// One declared field of a schema.
///
/// `field_key` is the stable identity: unique within the schema and used as
/// the lookup key into the runtime data object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    pub field_key: String,
    pub label: String,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    /// Explicit required flag. A `required` validation rule also marks the
    /// field required; the resolver ORs the two.
    #[serde(default)]
    pub required: bool,
    /// Default value applied when the data object has no entry for this key.
    #[serde(rename = "default", default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    /// Ordered choice options, for choice-type fields.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
    /// Ordered validation rules; evaluation stops at the first failure.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validation_rules: Vec<ValidationRule>,
    /// Visibility condition in the mini expression grammar. Absent means
    /// always visible.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible_if: Option<String>,
    /// Opaque bag: `disabled`, `warning`, `highlighted`, widget tuning.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub custom_props: Map<String, Value>,
}

impl FormField {
    /// Whether any declared rule is a `required` rule.
    pub fn has_required_rule(&self) -> bool {
        self.validation_rules.iter().any(|r| r.is_required())
    }
}

// ============================================================================
// ACTIONS
// ============================================================================

/// Visual weight of an action button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ActionStyle {
    Primary,
    #[default]
    Secondary,
    Danger,
}

/// One declared action of a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionButton {
    pub action_key: String,
    pub label: String,
    #[serde(default)]
    pub style: ActionStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Confirmation prompt. Presence means the caller must obtain a user
    /// affirmation before dispatching the action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible_if: Option<String>,
}

// ============================================================================
// LAYOUT
// ============================================================================

/// One collapsible grouping of fields, referencing them by `field_key`.
///
/// Referencing a key that does not exist among the schema's fields is not a
/// runtime error (the reference resolves to nothing); the authoring
/// validator flags it as a warning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSection {
    pub title: String,
    #[serde(default)]
    pub field_keys: Vec<String>,
    #[serde(default)]
    pub collapsible: bool,
}

/// Optional layout hints for a form schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LayoutConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spacing: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<LayoutSection>,
}

// ============================================================================
// TOP-LEVEL SCHEMA
// ============================================================================

/// A complete declarative UI component schema.
///
/// Field and action order is significant: it is the tab/visual order and the
/// engine preserves it in every output it produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UIComponentSchema {
    pub component_id: String,
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub component_type: ComponentType,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Template string with `{{field}}` placeholders. When set and non-empty
    /// it takes priority over `customProps.displayType` for Display schemas.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_template: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FormField>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<ActionButton>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<LayoutConfig>,
    /// Opaque bag consumed by Display-type schemas (table/card/text/actions
    /// configuration).
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub custom_props: Map<String, Value>,
}

impl UIComponentSchema {
    /// Look up a field by its key.
    pub fn field(&self, field_key: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.field_key == field_key)
    }

    /// Look up an action by its key.
    pub fn action(&self, action_key: &str) -> Option<&ActionButton> {
        self.actions.iter().find(|a| a.action_key == action_key)
    }

    /// Whether a field with this key is declared.
    pub fn has_field(&self, field_key: &str) -> bool {
        self.field(field_key).is_some()
    }
}
