//! Cell formatting for server rows.
//!
//! Rows arrive as JSON documents; each visible column pulls its field out of
//! the document and formats it according to its [`ColumnKind`].

use chrono::{DateTime, NaiveDate};
use serde_json::Value;

use super::column::{ColumnKind, RowActions};

/// Stable identifier of a row: `_id`, falling back to `id`.
pub fn row_id(row: &Value) -> Option<String> {
    ["_id", "id"]
        .iter()
        .filter_map(|key| row.get(*key))
        .find_map(|value| match value {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
}

/// Look up a possibly dotted field path (`category.name`).
pub fn field_value<'a>(row: &'a Value, field: &str) -> Option<&'a Value> {
    field
        .split('.')
        .try_fold(row, |value, segment| value.get(segment))
}

/// Format a cell for display.
pub fn format_cell(row: &Value, field: &str, kind: ColumnKind, actions: RowActions) -> String {
    if kind == ColumnKind::Actions {
        return format_actions(actions);
    }
    match field_value(row, field) {
        Some(value) => format_value(value, kind),
        None => String::new(),
    }
}

fn format_actions(actions: RowActions) -> String {
    let mut labels = Vec::new();
    if actions.view {
        labels.push("view");
    }
    if actions.edit {
        labels.push("edit");
    }
    if actions.delete {
        labels.push("delete");
    }
    labels.join(" | ")
}

/// Format a single JSON value for a column kind.
pub fn format_value(value: &Value, kind: ColumnKind) -> String {
    match (kind, value) {
        (_, Value::Null) => String::new(),
        (ColumnKind::Boolean, Value::Bool(b)) => String::from(if *b { "Yes" } else { "No" }),
        (ColumnKind::Date, Value::String(s)) => format_date(s),
        (_, Value::Number(n)) => format_number(n),
        (_, Value::String(s)) => s.clone(),
        (_, Value::Bool(b)) => b.to_string(),
        (_, Value::Array(items)) => items
            .iter()
            .map(|item| format_value(item, kind))
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        // Populated references: show their name.
        (_, Value::Object(map)) => match map.get("name") {
            Some(name) => format_value(name, ColumnKind::Text),
            None => Value::Object(map.clone()).to_string(),
        },
    }
}

fn format_number(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        _ => n.to_string(),
    }
}

fn format_date(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%Y-%m-%d").to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%Y-%m-%d").to_string();
    }
    raw.to_string()
}
