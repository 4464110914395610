//! Field values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The value of a single form field.
///
/// Serialized untagged, so a set of values round-trips through plain JSON
/// (drafts, request bodies).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    /// Anything structured: image lists, nested references, custom widgets.
    Json(serde_json::Value),
}

impl FieldValue {
    /// Empty for its kind: null, blank text, zero, false, or an empty
    /// collection.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Bool(b) => !b,
            Self::Number(n) => *n == 0.0 || n.is_nan(),
            Self::Text(s) => s.trim().is_empty(),
            Self::Json(value) => match value {
                serde_json::Value::Null => true,
                serde_json::Value::Bool(b) => !b,
                serde_json::Value::Number(n) => n.as_f64().is_none_or(|f| f == 0.0),
                serde_json::Value::String(s) => s.trim().is_empty(),
                serde_json::Value::Array(items) => items.is_empty(),
                serde_json::Value::Object(map) => map.is_empty(),
            },
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Json(serde_json::Value::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Json(value) => value.as_f64(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Json(value) => value.as_bool(),
            _ => None,
        }
    }

    /// Text shown in an input bound to this value.
    pub fn display(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(b) => b.to_string(),
            Self::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.clone(),
            Self::Json(serde_json::Value::String(s)) => s.clone(),
            Self::Json(value) => value.to_string(),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => n.as_f64().map_or(Self::Null, Self::Number),
            serde_json::Value::String(s) => Self::Text(s),
            other => Self::Json(other),
        }
    }
}

/// Field name -> value for a whole form.
pub type FieldValues = BTreeMap<String, FieldValue>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emptiness_by_kind() {
        assert!(FieldValue::Null.is_empty());
        assert!(FieldValue::from("   ").is_empty());
        assert!(!FieldValue::from("x").is_empty());
        assert!(FieldValue::from(0).is_empty());
        assert!(!FieldValue::from(3).is_empty());
        assert!(FieldValue::from(false).is_empty());
        assert!(FieldValue::from(serde_json::json!([])).is_empty());
        assert!(!FieldValue::from(serde_json::json!(["a.png"])).is_empty());
    }

    #[test]
    fn test_values_round_trip_as_plain_json() {
        let values: FieldValues = [
            ("name".to_string(), FieldValue::from("Sneaker")),
            ("price".to_string(), FieldValue::from(49.5)),
            ("isActive".to_string(), FieldValue::from(true)),
            ("images".to_string(), FieldValue::from(serde_json::json!(["a.png"]))),
        ]
        .into_iter()
        .collect();

        let json = serde_json::to_value(&values).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "images": ["a.png"],
                "isActive": true,
                "name": "Sneaker",
                "price": 49.5
            })
        );
        let back: FieldValues = serde_json::from_value(json).unwrap();
        assert_eq!(back, values);
    }
}
