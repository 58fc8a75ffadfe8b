//! Validation findings.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// A single validation finding.
///
/// Value object; the engine does not deduplicate. Overlapping rules may
/// emit duplicates, resolved downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exception {
    pub check_id: String,
    pub check_name: String,
    pub severity: Severity,
    /// Human-readable message with `{field}` placeholders substituted.
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller_trn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buyer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_id: Option<String>,
    /// Field the finding is about, when the rule targets one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
}

impl Exception {
    pub fn new(
        check_id: impl Into<String>,
        check_name: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            check_id: check_id.into(),
            check_name: check_name.into(),
            severity,
            message: message.into(),
            invoice_id: None,
            invoice_number: None,
            seller_trn: None,
            buyer_id: None,
            line_id: None,
            field: None,
            expected: None,
            actual: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Severity::Error).expect("serialize"),
            "\"error\""
        );
        let parsed: Severity = serde_json::from_str("\"warning\"").expect("parse");
        assert_eq!(parsed, Severity::Warning);
    }

    #[test]
    fn optional_coordinates_are_omitted() {
        let exception = Exception::new("CHK-1", "trn format", Severity::Error, "bad TRN");
        let json = serde_json::to_string(&exception).expect("serialize");
        assert!(!json.contains("line_id"));
    }
}
