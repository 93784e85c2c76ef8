//! Display-type schema projection scenarios: table flags, card sentinels,
//! text stringification, action bars and template substitution.

use anyhow::Result;
use serde_json::json;

use schema_ui::projection::{CardLayout, DisplayDescriptor, MISSING_VALUE};
use schema_ui::{interpreter, loader, RenderPlan};

#[test]
fn member_table_with_status_flags() -> Result<()> {
    let schema = loader::load_schema_yaml(
        r#"
componentId: member-table
name: member-table
componentType: Display
title: Members
customProps:
  displayType: table
  dataKey: members
  columns:
    - key: name
      label: Name
    - key: status
      label: Status
  flagConfig:
    field: status
    styles:
      Active: bg-green-50
      Suspended: bg-red-50
"#,
    )?;
    let data = json!({"members": [
        {"name": "Ada", "status": "Active"},
        {"name": "Grace", "status": "Suspended"},
        {"name": "Edsger", "status": "Unknown"}
    ]});

    let RenderPlan::Display(DisplayDescriptor::Table(table)) =
        interpreter::interpret(&schema, &data)
    else {
        panic!("expected table display");
    };
    assert_eq!(table.rows.len(), 3);
    assert_eq!(table.rows[0].row_class, "bg-green-50");
    assert_eq!(table.rows[1].row_class, "bg-red-50");
    // Unmapped flag value falls back to neutral, never errors.
    assert_eq!(table.rows[2].row_class, "");
    // Render hooks receive (value, row): raw cell values and source rows
    // pass through untouched.
    assert_eq!(table.rows[2].cells[0], json!("Edsger"));
    assert_eq!(table.rows[2].source, data["members"][2]);
    Ok(())
}

#[test]
fn empty_member_list_signals_no_rows() -> Result<()> {
    let schema = loader::load_schema_json(
        r#"{
            "componentId": "t", "name": "t", "componentType": "Display", "title": "T",
            "customProps": {
                "displayType": "table",
                "dataKey": "members",
                "columns": [{"key": "name", "label": "Name"}]
            }
        }"#,
    )?;
    let RenderPlan::Display(DisplayDescriptor::Table(table)) =
        interpreter::interpret(&schema, &json!({"members": []}))
    else {
        panic!("expected table display");
    };
    assert!(table.no_rows);
    Ok(())
}

#[test]
fn profile_card_uses_na_for_missing_values() -> Result<()> {
    let schema = loader::load_schema_json(
        r#"{
            "componentId": "profile-card", "name": "profile-card",
            "componentType": "Display", "title": "Profile",
            "customProps": {
                "displayType": "card",
                "fields": [
                    {"key": "name", "label": "Name"},
                    {"key": "department", "label": "Department"}
                ]
            }
        }"#,
    )?;
    let RenderPlan::Display(DisplayDescriptor::Card(card)) =
        interpreter::interpret(&schema, &json!({"name": "Ada"}))
    else {
        panic!("expected card display");
    };
    assert_eq!(card.layout, CardLayout::Grid);
    assert_eq!(card.entries[0].value, "Ada");
    assert_eq!(card.entries[1].value, MISSING_VALUE);
    Ok(())
}

#[test]
fn text_projection_renders_empty_not_na() -> Result<()> {
    let schema = loader::load_schema_json(
        r#"{
            "componentId": "note", "name": "note",
            "componentType": "Display", "title": "Note",
            "customProps": {"displayType": "text", "fieldKey": "note"}
        }"#,
    )?;
    let RenderPlan::Display(DisplayDescriptor::Text(text)) =
        interpreter::interpret(&schema, &json!({}))
    else {
        panic!("expected text display");
    };
    assert_eq!(text, "");
    Ok(())
}

#[test]
fn action_bar_respects_visibility_and_confirmation() -> Result<()> {
    let schema = loader::load_schema_json(
        r#"{
            "componentId": "toolbar", "name": "toolbar",
            "componentType": "Display", "title": "Toolbar",
            "customProps": {
                "displayType": "actions",
                "actions": [
                    {"actionKey": "refresh", "label": "Refresh", "style": "secondary"},
                    {"actionKey": "purgeAll", "label": "Purge all", "style": "danger",
                     "confirmation": "Purge everything?",
                     "visibleIf": "role == \"admin\""}
                ]
            }
        }"#,
    )?;

    let RenderPlan::Display(DisplayDescriptor::Actions(actions)) =
        interpreter::interpret(&schema, &json!({"role": "admin"}))
    else {
        panic!("expected actions display");
    };
    assert_eq!(actions.len(), 2);
    assert!(actions[1].requires_confirmation);

    let RenderPlan::Display(DisplayDescriptor::Actions(actions)) =
        interpreter::interpret(&schema, &json!({"role": "viewer"}))
    else {
        panic!("expected actions display");
    };
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].action_key, "refresh");
    Ok(())
}

#[test]
fn template_substitution_wins_over_display_type() -> Result<()> {
    let schema = loader::load_schema_json(
        r#"{
            "componentId": "summary", "name": "summary",
            "componentType": "Display", "title": "Summary",
            "displayTemplate": "{{user.name}} has {{count}} open items ({{missing}})",
            "customProps": {"displayType": "card", "fields": []}
        }"#,
    )?;
    let data = json!({"user": {"name": "Ada"}, "count": 3});
    let RenderPlan::Display(DisplayDescriptor::Template(text)) =
        interpreter::interpret(&schema, &data)
    else {
        panic!("expected template display");
    };
    assert_eq!(text, "Ada has 3 open items ()");
    Ok(())
}

#[test]
fn unknown_display_type_renders_placeholder() -> Result<()> {
    let schema = loader::load_schema_json(
        r#"{
            "componentId": "g", "name": "g",
            "componentType": "Display", "title": "G",
            "customProps": {"displayType": "gantt"}
        }"#,
    )?;
    assert_eq!(
        interpreter::interpret(&schema, &json!({})),
        RenderPlan::Display(DisplayDescriptor::Unsupported {
            display_type: "gantt".into()
        })
    );
    Ok(())
}
