//! Structural checks: TRN format, buyer references, mandatory fields.

use pint_model::record::BUYER_ID;
use pint_model::{DataContext, DatasetScope, Exception, Severity};

use crate::checks::{CheckResult, ids};
use crate::context::attach_record_context;

/// UAE TRNs are nominally 15 digits.
fn is_valid_trn(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.len() == 15 && trimmed.chars().all(|c| c.is_ascii_digit())
}

/// Seller and buyer TRN format on headers. Absent TRNs are the
/// mandatory-field check's concern; only present, malformed values
/// are flagged here.
pub(crate) fn trn_format(ctx: &DataContext) -> CheckResult {
    let mut exceptions = Vec::new();
    for header in ctx.headers() {
        for field in ["seller_trn", "buyer_trn"] {
            let Some(value) = header.get_str(field) else {
                continue;
            };
            if is_valid_trn(&value) {
                continue;
            }
            let mut exception = Exception::new(
                ids::TRN_FORMAT,
                "TRN format",
                Severity::Error,
                format!("{field} '{value}' is not a 15-digit TRN"),
            );
            attach_record_context(&mut exception, header, DatasetScope::Headers, ctx);
            exception.field = Some(field.to_string());
            exception.expected = Some("15 digits".to_string());
            exception.actual = Some(value);
            exceptions.push(exception);
        }
    }
    CheckResult::from_exceptions(
        ids::TRN_FORMAT,
        "TRN format",
        Severity::Error,
        ctx.headers().len(),
        exceptions,
    )
}

/// Every header's `buyer_id` must resolve in the buyer dataset. A
/// dangling reference is the finding; a header without a `buyer_id` is
/// covered by the mandatory-field check.
pub(crate) fn buyer_reference(ctx: &DataContext) -> CheckResult {
    let mut exceptions = Vec::new();
    for header in ctx.headers() {
        let Some(buyer_id) = header.get_str(BUYER_ID) else {
            continue;
        };
        if ctx.buyer(&buyer_id).is_some() {
            continue;
        }
        let mut exception = Exception::new(
            ids::BUYER_REFERENCE,
            "Buyer exists",
            Severity::Error,
            format!("buyer '{buyer_id}' is not present in the buyer dataset"),
        );
        attach_record_context(&mut exception, header, DatasetScope::Headers, ctx);
        exception.field = Some(BUYER_ID.to_string());
        exception.actual = Some(buyer_id);
        exceptions.push(exception);
    }
    CheckResult::from_exceptions(
        ids::BUYER_REFERENCE,
        "Buyer exists",
        Severity::Error,
        ctx.headers().len(),
        exceptions,
    )
}

const MANDATORY_HEADER_FIELDS: &[&str] = &[
    "invoice_number",
    "issue_date",
    "currency",
    "seller_trn",
    BUYER_ID,
];

/// Mandatory header field presence.
pub(crate) fn header_mandatory_fields(ctx: &DataContext) -> CheckResult {
    let mut exceptions = Vec::new();
    for header in ctx.headers() {
        for field in MANDATORY_HEADER_FIELDS {
            if header.get_str(field).is_some() {
                continue;
            }
            let mut exception = Exception::new(
                ids::HEADER_MANDATORY,
                "Mandatory header fields",
                Severity::Error,
                format!("mandatory field {field} is missing or blank"),
            );
            attach_record_context(&mut exception, header, DatasetScope::Headers, ctx);
            exception.field = Some((*field).to_string());
            exception.expected = Some("non-empty value".to_string());
            exceptions.push(exception);
        }
    }
    CheckResult::from_exceptions(
        ids::HEADER_MANDATORY,
        "Mandatory header fields",
        Severity::Error,
        ctx.headers().len(),
        exceptions,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pint_model::Record;
    use serde_json::json;

    fn header(value: serde_json::Value) -> Record {
        Record::from_value(value)
    }

    #[test]
    fn trn_check_flags_malformed_only() {
        let ctx = DataContext::new(
            vec![],
            vec![
                header(json!({"invoice_id": "I1", "seller_trn": "100200300123456"})),
                header(json!({"invoice_id": "I2", "seller_trn": "100-200-300"})),
                header(json!({"invoice_id": "I3"})),
            ],
            vec![],
        );
        let result = trn_format(&ctx);
        assert_eq!(result.failed, 1);
        assert_eq!(result.exceptions[0].invoice_id.as_deref(), Some("I2"));
        assert_eq!(result.passed, 2);
    }

    #[test]
    fn buyer_reference_flags_dangling_only() {
        let ctx = DataContext::new(
            vec![Record::from_value(json!({"buyer_id": "B1"}))],
            vec![
                header(json!({"invoice_id": "I1", "buyer_id": "B1"})),
                header(json!({"invoice_id": "I2", "buyer_id": "B-ghost"})),
                header(json!({"invoice_id": "I3"})),
            ],
            vec![],
        );
        let result = buyer_reference(&ctx);
        assert_eq!(result.failed, 1);
        assert_eq!(result.exceptions[0].invoice_id.as_deref(), Some("I2"));
    }

    #[test]
    fn mandatory_fields_flag_each_gap() {
        let ctx = DataContext::new(
            vec![],
            vec![header(json!({
                "invoice_id": "I1",
                "invoice_number": "INV-1",
                "currency": "  "
            }))],
            vec![],
        );
        let result = header_mandatory_fields(&ctx);
        // issue_date, currency (blank), seller_trn, buyer_id.
        assert_eq!(result.failed, 4);
        let fields: Vec<_> = result
            .exceptions
            .iter()
            .filter_map(|e| e.field.as_deref())
            .collect();
        assert!(fields.contains(&"currency"));
        assert!(!fields.contains(&"invoice_number"));
    }
}
