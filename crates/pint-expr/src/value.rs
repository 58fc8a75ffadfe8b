//! Typed values flowing through expression evaluation.

use serde_json::Value;

use crate::error::ExprError;

#[derive(Debug, Clone, PartialEq)]
pub enum ExprValue {
    Number(f64),
    Str(String),
    Bool(bool),
    Null,
}

impl ExprValue {
    /// Convert a record field value. Arrays/objects render through their
    /// JSON text; rules rarely touch them but a lookup must not fail.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => ExprValue::Null,
            Value::Bool(b) => ExprValue::Bool(*b),
            Value::Number(n) => n
                .as_f64()
                .map(ExprValue::Number)
                .unwrap_or(ExprValue::Null),
            Value::String(s) => ExprValue::Str(s.clone()),
            other => ExprValue::Str(other.to_string()),
        }
    }

    /// Numeric view. Numeric strings coerce; uploads routinely carry
    /// amounts as text.
    pub fn as_number(&self) -> Result<f64, ExprError> {
        match self {
            ExprValue::Number(n) => Ok(*n),
            ExprValue::Str(s) => s.trim().parse::<f64>().map_err(|_| {
                ExprError::Type(format!("'{s}' is not numeric"))
            }),
            ExprValue::Bool(_) => Err(ExprError::Type("boolean used as number".to_string())),
            ExprValue::Null => Err(ExprError::Type("null used as number".to_string())),
        }
    }

    /// Truthiness for conditions and custom formulas: false, null, zero,
    /// and the empty string are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            ExprValue::Bool(b) => *b,
            ExprValue::Null => false,
            ExprValue::Number(n) => *n != 0.0,
            ExprValue::Str(s) => !s.is_empty(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ExprValue::Null)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            ExprValue::Number(_) => "number",
            ExprValue::Str(_) => "string",
            ExprValue::Bool(_) => "boolean",
            ExprValue::Null => "null",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_strings_coerce() {
        assert_eq!(ExprValue::Str(" 10.5 ".to_string()).as_number(), Ok(10.5));
        assert!(ExprValue::Str("AED".to_string()).as_number().is_err());
        assert!(ExprValue::Null.as_number().is_err());
    }

    #[test]
    fn truthiness() {
        assert!(ExprValue::Number(1.0).is_truthy());
        assert!(!ExprValue::Number(0.0).is_truthy());
        assert!(!ExprValue::Str(String::new()).is_truthy());
        assert!(!ExprValue::Null.is_truthy());
        assert!(ExprValue::Bool(true).is_truthy());
    }

    #[test]
    fn json_conversion_never_fails() {
        assert_eq!(ExprValue::from_json(&json!(null)), ExprValue::Null);
        assert_eq!(
            ExprValue::from_json(&json!([1, 2])),
            ExprValue::Str("[1,2]".to_string())
        );
    }
}
