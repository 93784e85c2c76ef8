//! Top-level error taxonomy.
//!
//! The interpretation hot path never returns these: authoring errors degrade
//! to safe defaults there, and validation failures are data. What remains is
//! schema loading and the persistence collaborator.

use thiserror::Error;

use crate::store::StoreError;

/// Main error type for the schema UI system.
#[derive(Debug, Error)]
pub enum SchemaUiError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
