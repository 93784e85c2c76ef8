//! Display projections: the table / card / text / action-bar interpretation
//! of a Display-type schema against a data object.
//!
//! Dispatch is driven by `customProps.displayType`, except that a non-empty
//! `displayTemplate` takes priority and short-circuits to flat `{{path}}`
//! substitution. All projection is lenient: malformed configuration warns
//! and degrades, it never fails the render.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use schema_types::{ActionButton, UIComponentSchema};

use crate::resolver::{resolve_action, ActionDescriptor};
use crate::template;
use crate::value_path::{display_string, lookup_path};

/// Sentinel rendered literally by the view layer for a missing card value.
/// The text projection intentionally renders the empty string instead.
pub const MISSING_VALUE: &str = "N/A";

/// Resolved projection of a Display-type schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DisplayDescriptor {
    /// `displayTemplate` substitution output.
    Template(String),
    Table(TableProjection),
    Card(CardProjection),
    Text(String),
    Actions(Vec<ActionDescriptor>),
    /// Unknown or missing `displayType`; callers render a placeholder.
    Unsupported { display_type: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableProjection {
    pub columns: Vec<TableColumn>,
    pub rows: Vec<TableRow>,
    /// Set when the resolved data array is empty; the view renders a
    /// "no rows" marker instead of an empty table.
    pub no_rows: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableColumn {
    pub key: String,
    pub label: String,
}

/// One projected row. `cells` carries raw values in column order and
/// `source` the raw row object, so caller-side render hooks are guaranteed
/// to receive `(value, row)` untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    pub cells: Vec<Value>,
    /// Per-row class from `flagConfig.styles`; empty string is the neutral
    /// fallback for unmapped values.
    pub row_class: String,
    /// Per-row badge from `flagConfig.badgeConfigs`, when configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<TableBadge>,
    pub source: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableBadge {
    pub label: String,
    pub class: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardProjection {
    pub entries: Vec<CardEntry>,
    pub layout: CardLayout,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardEntry {
    pub key: String,
    pub label: String,
    /// Stringified value; [`MISSING_VALUE`] when the key is missing or null.
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CardLayout {
    #[default]
    Grid,
    List,
}

// ---------------------------------------------------------------------------
// customProps configuration (lenient, parsed out of the opaque bag)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct DisplayConfig {
    display_type: Option<String>,
    /// Inline row array, overriding `dataKey` lookup.
    data: Option<Value>,
    data_key: Option<String>,
    columns: Vec<ColumnConfig>,
    flag_config: Option<FlagConfig>,
    fields: Vec<CardFieldConfig>,
    layout: Option<String>,
    /// Explicit value override for the text projection.
    value: Option<Value>,
    field_key: Option<String>,
    actions: Vec<ActionButton>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ColumnConfig {
    key: String,
    label: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct FlagConfig {
    field: String,
    styles: Option<HashMap<String, String>>,
    badge_configs: Option<HashMap<String, BadgeConfig>>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct BadgeConfig {
    label: Option<String>,
    class: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CardFieldConfig {
    key: String,
    label: String,
}

fn parse_config(custom_props: &Map<String, Value>) -> DisplayConfig {
    match serde_json::from_value(Value::Object(custom_props.clone())) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(%err, "malformed display customProps, ignoring");
            DisplayConfig::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

/// Project a Display-type schema against a data object.
///
/// Pure and total: malformed configuration degrades to
/// [`DisplayDescriptor::Unsupported`] with a warning, it never errors.
pub fn project(schema: &UIComponentSchema, data: &Value) -> DisplayDescriptor {
    if let Some(tpl) = &schema.display_template {
        if !tpl.trim().is_empty() {
            return DisplayDescriptor::Template(template::substitute(tpl, data));
        }
    }

    let config = parse_config(&schema.custom_props);
    match config.display_type.as_deref() {
        Some("table") => DisplayDescriptor::Table(project_table(&config, data)),
        Some("card") => DisplayDescriptor::Card(project_card(&config, data)),
        Some("text") => DisplayDescriptor::Text(project_text(&config, data)),
        Some("actions") => DisplayDescriptor::Actions(
            config
                .actions
                .iter()
                .filter_map(|a| resolve_action(a, data))
                .collect(),
        ),
        other => {
            let display_type = other.unwrap_or("").to_string();
            tracing::warn!(
                component_id = %schema.component_id,
                display_type,
                "unsupported displayType, rendering placeholder"
            );
            DisplayDescriptor::Unsupported { display_type }
        }
    }
}

fn project_table(config: &DisplayConfig, data: &Value) -> TableProjection {
    let rows_value = config
        .data
        .clone()
        .or_else(|| {
            config
                .data_key
                .as_deref()
                .and_then(|key| lookup_path(data, key).cloned())
        })
        .or_else(|| data.is_array().then(|| data.clone()));
    let raw_rows = rows_value
        .and_then(|v| v.as_array().cloned())
        .unwrap_or_default();

    let columns: Vec<TableColumn> = config
        .columns
        .iter()
        .map(|c| TableColumn {
            key: c.key.clone(),
            label: c.label.clone(),
        })
        .collect();

    let rows: Vec<TableRow> = raw_rows
        .iter()
        .map(|row| {
            let cells = columns
                .iter()
                .map(|col| lookup_path(row, &col.key).cloned().unwrap_or(Value::Null))
                .collect();
            let (row_class, badge) = resolve_flags(config.flag_config.as_ref(), row);
            TableRow {
                cells,
                row_class,
                badge,
                source: row.clone(),
            }
        })
        .collect();

    TableProjection {
        no_rows: rows.is_empty(),
        columns,
        rows,
    }
}

/// Per-row class/badge lookup with a neutral fallback for unmapped values;
/// an unmapped flag value is never an error.
fn resolve_flags(flag_config: Option<&FlagConfig>, row: &Value) -> (String, Option<TableBadge>) {
    let Some(config) = flag_config else {
        return (String::new(), None);
    };
    let flag_value = lookup_path(row, &config.field)
        .map(display_string)
        .unwrap_or_default();

    let row_class = config
        .styles
        .as_ref()
        .and_then(|styles| styles.get(&flag_value).cloned())
        .unwrap_or_default();

    let badge = config.badge_configs.as_ref().map(|badges| {
        match badges.get(&flag_value) {
            Some(badge) => TableBadge {
                label: badge.label.clone().unwrap_or_else(|| flag_value.clone()),
                class: badge.class.clone().unwrap_or_default(),
            },
            // Neutral badge for unmapped values.
            None => TableBadge {
                label: flag_value.clone(),
                class: String::new(),
            },
        }
    });

    (row_class, badge)
}

fn project_card(config: &DisplayConfig, data: &Value) -> CardProjection {
    let entries = config
        .fields
        .iter()
        .map(|f| {
            let value = match lookup_path(data, &f.key) {
                Some(Value::Null) | None => MISSING_VALUE.to_string(),
                Some(v) => display_string(v),
            };
            CardEntry {
                key: f.key.clone(),
                label: f.label.clone(),
                value,
            }
        })
        .collect();
    let layout = match config.layout.as_deref() {
        Some("list") => CardLayout::List,
        _ => CardLayout::Grid,
    };
    CardProjection { entries, layout }
}

/// Text resolves one value and stringifies it; empty/null is the empty
/// string, never [`MISSING_VALUE`] — text and card intentionally differ.
fn project_text(config: &DisplayConfig, data: &Value) -> String {
    if let Some(value) = &config.value {
        return display_string(value);
    }
    config
        .field_key
        .as_deref()
        .and_then(|key| lookup_path(data, key))
        .map(display_string)
        .unwrap_or_default()
}
