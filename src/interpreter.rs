//! Schema interpretation: one pass over (schema, data) producing a
//! render-ready plan.
//!
//! The pass is a pure function of its inputs — the engine holds no state
//! between calls, which is what keeps visibility and validation consistent
//! without manual invalidation. Fields and actions are resolved in schema
//! declaration order and that order is preserved in the output (it is the
//! tab/visual order).

use std::collections::BTreeMap;

use serde_json::Value;

use schema_types::{ComponentType, FormField, UIComponentSchema};

use crate::condition;
use crate::projection::{self, DisplayDescriptor};
use crate::resolver::{self, ActionDescriptor, FieldDescriptor};
use crate::validation;

/// Outcome of one interpretation pass.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderPlan {
    Form {
        fields: Vec<FieldDescriptor>,
        actions: Vec<ActionDescriptor>,
    },
    Display(DisplayDescriptor),
    /// Modal, Custom or unknown component types: callers render a
    /// "not implemented" placeholder. A malformed schema is a configuration
    /// error surfaced once per pass, never a crash.
    Unsupported { component_type: ComponentType },
}

/// Interpret a schema against the current data snapshot.
///
/// Validation is not run here: re-validating on every keystroke versus only
/// on submit/blur is a caller policy choice, so [`validate`] is a separate,
/// explicitly invoked operation.
pub fn interpret(schema: &UIComponentSchema, data: &Value) -> RenderPlan {
    match schema.component_type {
        ComponentType::Form => RenderPlan::Form {
            fields: schema
                .fields
                .iter()
                .filter_map(|f| resolver::resolve_field(f, data))
                .collect(),
            actions: schema
                .actions
                .iter()
                .filter_map(|a| resolver::resolve_action(a, data))
                .collect(),
        },
        ComponentType::Display => RenderPlan::Display(projection::project(schema, data)),
        component_type => {
            tracing::warn!(
                component_id = %schema.component_id,
                %component_type,
                "unsupported component type, rendering placeholder"
            );
            RenderPlan::Unsupported { component_type }
        }
    }
}

/// The fields currently visible for this data snapshot, in declaration
/// order.
pub fn visible_fields<'a>(schema: &'a UIComponentSchema, data: &Value) -> Vec<&'a FormField> {
    schema
        .fields
        .iter()
        .filter(|f| match &f.visible_if {
            Some(expr) => condition::evaluate(expr, data),
            None => true,
        })
        .collect()
}

/// Validate every currently visible field; hidden fields are exempt even
/// when marked required. Submission is blocked iff the map is non-empty.
pub fn validate(schema: &UIComponentSchema, data: &Value) -> BTreeMap<String, String> {
    validation::validate_form(visible_fields(schema, data).into_iter(), data)
}

/// Merge a [`validate`] result into resolved descriptors, setting each
/// field's `error` slot (clearing it for fields with no entry). Callers
/// that validate on submit/blur run this before re-painting.
pub fn apply_validation(fields: &mut [FieldDescriptor], errors: &BTreeMap<String, String>) {
    for field in fields {
        field.error = errors.get(&field.field_key).cloned();
    }
}
