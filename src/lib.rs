//! Schema-UI - Declarative UI schema interpretation engine
//!
//! This crate interprets declarative JSON/YAML component schemas against a
//! runtime data object: it decides which fields and actions are visible,
//! which validation errors to surface, and which display projection applies.
//! The view layer (widgets, layout, styling) lives elsewhere and only paints
//! the descriptors produced here.
//!
//! ## Interpretation cycle
//!
//! ```text
//! (schema, data snapshot)
//!     -> interpreter::interpret        render plan (fields/actions/display)
//!     -> caller paints, user edits data
//!     -> interpreter::validate         fieldKey -> message (on submit/blur)
//!     -> resolver::dispatch_action     confirmation-gated side effects
//! ```
//!
//! Every core operation is a pure, synchronous function of its arguments —
//! the engine keeps no state between passes. The one async boundary is the
//! [`store`] collaborator (fetch-by-id with a TTL cache).
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use schema_ui::{interpreter, loader};
//!
//! let schema = loader::load_schema_json(r#"{
//!     "componentId": "tickets",
//!     "name": "ticket-form",
//!     "componentType": "Form",
//!     "title": "Tickets",
//!     "fields": [
//!         {"fieldKey": "ticketType", "label": "Ticket type", "type": "select"},
//!         {"fieldKey": "studentId", "label": "Student ID", "type": "text",
//!          "visibleIf": "ticketType == \"student\"",
//!          "validationRules": [{"type": "required", "message": "Required"}]}
//!     ]
//! }"#).unwrap();
//!
//! let data = json!({"ticketType": "general"});
//! let plan = interpreter::interpret(&schema, &data);
//! assert!(interpreter::validate(&schema, &data).is_empty());
//! # let _ = plan;
//! ```

// Core error handling
pub mod error;

// Visibility-condition mini-language
pub mod condition;

// Shared dotted-path lookup and string coercion
pub mod value_path;

// Field-level and form-level validation rules
pub mod validation;

// Field/action descriptor resolution and action dispatch
pub mod resolver;

// Interpretation orchestrator
pub mod interpreter;

// Display-type projections (table / card / text / actions / template)
pub mod projection;
pub mod template;

// Strict authoring-time schema validation
pub mod authoring;

// Schema persistence collaborator with TTL cache
pub mod store;

// JSON/YAML schema loading
pub mod loader;

pub use error::SchemaUiError;
pub use interpreter::{apply_validation, interpret, validate, RenderPlan};
pub use projection::DisplayDescriptor;
pub use resolver::{ActionDescriptor, FieldDescriptor};

// Re-export the foundation types so callers need a single dependency.
pub use schema_types::{
    ActionButton, ActionStyle, ComponentType, FieldType, FormField, LayoutConfig, LayoutSection,
    SelectOption, UIComponentSchema, ValidationRule,
};
