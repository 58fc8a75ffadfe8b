//! Parsed invoice records.
//!
//! A record is a flat-ish key-value entity produced by the out-of-scope
//! upload/parsing layer. Values are `serde_json::Value`, which keeps the
//! occasional nested object addressable by dot path without a dedicated
//! tree type.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One parsed row: a buyer, an invoice header, or an invoice line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(pub Map<String, Value>);

/// Key field carried by buyer records.
pub const BUYER_ID: &str = "buyer_id";
/// Key field carried by invoice header records; lines reference it too.
pub const INVOICE_ID: &str = "invoice_id";
/// Key field carried by invoice line records.
pub const LINE_ID: &str = "line_id";

impl Record {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Build a record from a JSON object. Non-object values yield an
    /// empty record rather than an error; a malformed upstream row must
    /// not abort a validation run.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    /// Top-level field as a trimmed string, `None` when absent, null,
    /// or blank.
    pub fn get_str(&self, key: &str) -> Option<String> {
        let value = self.0.get(key)?;
        let text = value_to_display(value);
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

/// Render a field value the way it appears in messages and duplicate keys.
/// Strings render unquoted; null renders empty.
pub fn value_to_display(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// A value counts as blank when it is null or trims to the empty string.
pub fn value_is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Numeric view of a field value. Numeric strings parse; anything else
/// is `None`.
pub fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn get_str_treats_blank_as_absent() {
        let record = Record::from_value(json!({
            "invoice_number": "  INV-1 ",
            "currency": "   ",
            "vat_total": null
        }));
        assert_eq!(record.get_str("invoice_number").as_deref(), Some("INV-1"));
        assert_eq!(record.get_str("currency"), None);
        assert_eq!(record.get_str("vat_total"), None);
        assert_eq!(record.get_str("missing"), None);
    }

    #[test]
    fn numeric_strings_parse() {
        assert_eq!(value_as_f64(&json!("10.50")), Some(10.5));
        assert_eq!(value_as_f64(&json!(42)), Some(42.0));
        assert_eq!(value_as_f64(&json!("AED")), None);
        assert_eq!(value_as_f64(&json!(null)), None);
    }

    #[test]
    fn from_value_tolerates_non_objects() {
        assert_eq!(Record::from_value(json!([1, 2])), Record::new());
    }
}
