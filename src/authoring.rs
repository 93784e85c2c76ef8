//! Authoring-time schema validation.
//!
//! Strictness is asymmetric by design: this entry point runs before a
//! schema is persisted and rejects structural problems outright, while the
//! render-time interpreter stays lenient and never crashes on an
//! already-saved schema. Non-fatal authoring smells (unparsable conditions,
//! unknown type tags, dangling layout references) are collected as warnings
//! so an editor can surface them without blocking a save.

use thiserror::Error;

use schema_types::{ComponentType, FieldType, UIComponentSchema};

use crate::condition;

/// Structural errors: hard failures that block persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StructuralError {
    #[error("schema is missing componentId")]
    MissingComponentId,
    #[error("schema is missing name")]
    MissingName,
    #[error("schema is missing title")]
    MissingTitle,
    #[error("field #{index} is missing fieldKey")]
    FieldMissingKey { index: usize },
    #[error("field '{field_key}' is missing label")]
    FieldMissingLabel { field_key: String },
    #[error("duplicate fieldKey '{field_key}'")]
    DuplicateFieldKey { field_key: String },
    #[error("action #{index} is missing actionKey")]
    ActionMissingKey { index: usize },
    #[error("action '{action_key}' is missing label")]
    ActionMissingLabel { action_key: String },
    #[error("duplicate actionKey '{action_key}'")]
    DuplicateActionKey { action_key: String },
}

impl StructuralError {
    /// Stable error code for API surfaces.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingComponentId => "MISSING_COMPONENT_ID",
            Self::MissingName => "MISSING_NAME",
            Self::MissingTitle => "MISSING_TITLE",
            Self::FieldMissingKey { .. } => "FIELD_MISSING_KEY",
            Self::FieldMissingLabel { .. } => "FIELD_MISSING_LABEL",
            Self::DuplicateFieldKey { .. } => "DUPLICATE_FIELD_KEY",
            Self::ActionMissingKey { .. } => "ACTION_MISSING_KEY",
            Self::ActionMissingLabel { .. } => "ACTION_MISSING_LABEL",
            Self::DuplicateActionKey { .. } => "DUPLICATE_ACTION_KEY",
        }
    }
}

/// Authoring warnings: degraded-at-runtime constructs that do not block a
/// save. The interpreter handles each of these leniently.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthoringWarning {
    #[error("'{owner}' has an unparsable visibleIf '{expression}' (will evaluate to false)")]
    UnparsableCondition { owner: String, expression: String },
    #[error("field '{field_key}' has an unknown type (will render as text)")]
    UnknownFieldType { field_key: String },
    #[error("componentType is not supported (will render a placeholder)")]
    UnsupportedComponentType,
    #[error("layout section '{section}' references unknown field '{field_key}'")]
    DanglingLayoutRef { section: String, field_key: String },
}

/// One-pass validation result: blocking errors plus non-blocking warnings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<StructuralError>,
    pub warnings: Vec<AuthoringWarning>,
}

impl ValidationReport {
    /// Whether the schema may be persisted.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validate a schema before create/update persistence.
///
/// Empty-string identity fields count as missing (serde defaults absent
/// strings to `""`).
pub fn validate_schema(schema: &UIComponentSchema) -> ValidationReport {
    let mut report = ValidationReport::default();

    if schema.component_id.trim().is_empty() {
        report.errors.push(StructuralError::MissingComponentId);
    }
    if schema.name.trim().is_empty() {
        report.errors.push(StructuralError::MissingName);
    }
    if schema.title.trim().is_empty() {
        report.errors.push(StructuralError::MissingTitle);
    }
    if matches!(schema.component_type, ComponentType::Unknown) {
        report.warnings.push(AuthoringWarning::UnsupportedComponentType);
    }

    let mut seen_fields = Vec::new();
    for (index, field) in schema.fields.iter().enumerate() {
        if field.field_key.trim().is_empty() {
            report.errors.push(StructuralError::FieldMissingKey { index });
            continue;
        }
        if field.label.trim().is_empty() {
            report.errors.push(StructuralError::FieldMissingLabel {
                field_key: field.field_key.clone(),
            });
        }
        if seen_fields.contains(&field.field_key) {
            report.errors.push(StructuralError::DuplicateFieldKey {
                field_key: field.field_key.clone(),
            });
        } else {
            seen_fields.push(field.field_key.clone());
        }
        if field.field_type == FieldType::Unknown {
            report.warnings.push(AuthoringWarning::UnknownFieldType {
                field_key: field.field_key.clone(),
            });
        }
        check_condition(&field.visible_if, &field.field_key, &mut report);
    }

    let mut seen_actions = Vec::new();
    for (index, action) in schema.actions.iter().enumerate() {
        if action.action_key.trim().is_empty() {
            report.errors.push(StructuralError::ActionMissingKey { index });
            continue;
        }
        if action.label.trim().is_empty() {
            report.errors.push(StructuralError::ActionMissingLabel {
                action_key: action.action_key.clone(),
            });
        }
        if seen_actions.contains(&action.action_key) {
            report.errors.push(StructuralError::DuplicateActionKey {
                action_key: action.action_key.clone(),
            });
        } else {
            seen_actions.push(action.action_key.clone());
        }
        check_condition(&action.visible_if, &action.action_key, &mut report);
    }

    if let Some(layout) = &schema.layout {
        for section in &layout.sections {
            for key in &section.field_keys {
                if !schema.has_field(key) {
                    report.warnings.push(AuthoringWarning::DanglingLayoutRef {
                        section: section.title.clone(),
                        field_key: key.clone(),
                    });
                }
            }
        }
    }

    report
}

fn check_condition(expr: &Option<String>, owner: &str, report: &mut ValidationReport) {
    if let Some(expr) = expr {
        if condition::parse_condition(expr).is_err() {
            report.warnings.push(AuthoringWarning::UnparsableCondition {
                owner: owner.to_string(),
                expression: expr.clone(),
            });
        }
    }
}
