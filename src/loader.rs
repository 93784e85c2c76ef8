//! Schema loading from authored JSON/YAML documents.

use schema_types::UIComponentSchema;

use crate::error::SchemaUiError;

/// Deserialize a schema from a JSON document.
pub fn load_schema_json(text: &str) -> Result<UIComponentSchema, SchemaUiError> {
    Ok(serde_json::from_str(text)?)
}

/// Deserialize a schema from a YAML document.
pub fn load_schema_yaml(text: &str) -> Result<UIComponentSchema, SchemaUiError> {
    Ok(serde_yaml::from_str(text)?)
}
