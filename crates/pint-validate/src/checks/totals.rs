//! Arithmetic identity checks over header and line amounts.
//!
//! Records where an operand is missing or non-numeric are skipped, not
//! flagged; presence is the mandatory-field and configurable checks'
//! concern.

use std::collections::BTreeSet;

use pint_model::record::{INVOICE_ID, value_as_f64};
use pint_model::{DataContext, DatasetScope, Exception, Record, Severity};

use crate::checks::{AMOUNT_TOLERANCE, CheckResult, ids};
use crate::context::attach_record_context;

fn amount(record: &Record, field: &str) -> Option<f64> {
    record.get(field).and_then(value_as_f64)
}

fn identity_holds(left: f64, right: f64) -> bool {
    (left - right).abs() <= AMOUNT_TOLERANCE
}

/// `total_incl_vat == total_excl_vat + vat_total` within 0.01.
pub(crate) fn header_total_identity(ctx: &DataContext) -> CheckResult {
    let mut exceptions = Vec::new();
    for header in ctx.headers() {
        let (Some(excl), Some(vat), Some(incl)) = (
            amount(header, "total_excl_vat"),
            amount(header, "vat_total"),
            amount(header, "total_incl_vat"),
        ) else {
            continue;
        };
        if identity_holds(excl + vat, incl) {
            continue;
        }
        let mut exception = Exception::new(
            ids::HEADER_TOTAL,
            "Header total identity",
            Severity::Error,
            format!("total_incl_vat {incl} does not equal total_excl_vat {excl} + vat_total {vat}"),
        );
        attach_record_context(&mut exception, header, DatasetScope::Headers, ctx);
        exception.field = Some("total_incl_vat".to_string());
        exception.expected = Some(format!("{}", excl + vat));
        exception.actual = Some(format!("{incl}"));
        exceptions.push(exception);
    }
    CheckResult::from_exceptions(
        ids::HEADER_TOTAL,
        "Header total identity",
        Severity::Error,
        ctx.headers().len(),
        exceptions,
    )
}

/// `line_total == quantity * unit_price` within 0.01.
pub(crate) fn line_total_identity(ctx: &DataContext) -> CheckResult {
    let mut exceptions = Vec::new();
    for line in ctx.lines() {
        let (Some(quantity), Some(unit_price), Some(line_total)) = (
            amount(line, "quantity"),
            amount(line, "unit_price"),
            amount(line, "line_total"),
        ) else {
            continue;
        };
        if identity_holds(quantity * unit_price, line_total) {
            continue;
        }
        let mut exception = Exception::new(
            ids::LINE_TOTAL,
            "Line total identity",
            Severity::Error,
            format!("line_total {line_total} does not equal quantity {quantity} x unit_price {unit_price}"),
        );
        attach_record_context(&mut exception, line, DatasetScope::Lines, ctx);
        exception.field = Some("line_total".to_string());
        exception.expected = Some(format!("{}", quantity * unit_price));
        exception.actual = Some(format!("{line_total}"));
        exceptions.push(exception);
    }
    CheckResult::from_exceptions(
        ids::LINE_TOTAL,
        "Line total identity",
        Severity::Error,
        ctx.lines().len(),
        exceptions,
    )
}

/// `vat_amount == line_net * vat_rate / 100` within 0.01.
pub(crate) fn vat_amount_identity(ctx: &DataContext) -> CheckResult {
    let mut exceptions = Vec::new();
    for line in ctx.lines() {
        let (Some(net), Some(rate), Some(vat)) = (
            amount(line, "line_net"),
            amount(line, "vat_rate"),
            amount(line, "vat_amount"),
        ) else {
            continue;
        };
        let expected = net * rate / 100.0;
        if identity_holds(expected, vat) {
            continue;
        }
        let mut exception = Exception::new(
            ids::VAT_AMOUNT,
            "VAT amount identity",
            Severity::Error,
            format!("vat_amount {vat} does not equal line_net {net} x vat_rate {rate} / 100"),
        );
        attach_record_context(&mut exception, line, DatasetScope::Lines, ctx);
        exception.field = Some("vat_amount".to_string());
        exception.expected = Some(format!("{expected}"));
        exception.actual = Some(format!("{vat}"));
        exceptions.push(exception);
    }
    CheckResult::from_exceptions(
        ids::VAT_AMOUNT,
        "VAT amount identity",
        Severity::Error,
        ctx.lines().len(),
        exceptions,
    )
}

/// Credit-note document type codes and labels accepted on headers.
fn is_credit_note(header: &Record) -> bool {
    header
        .get_str("document_type")
        .map(|value| {
            let lowered = value.to_lowercase().replace([' ', '-'], "_");
            lowered == "credit_note" || lowered == "381"
        })
        .unwrap_or(false)
}

/// Negative line amounts are only valid on credit notes. A line whose
/// header is unknown cannot justify its sign and is flagged too.
pub(crate) fn negative_line_without_credit_note(ctx: &DataContext) -> CheckResult {
    let mut exceptions = Vec::new();
    for line in ctx.lines() {
        let Some(line_total) = amount(line, "line_total") else {
            continue;
        };
        if line_total >= 0.0 {
            continue;
        }
        let credit_note = line
            .get_str(INVOICE_ID)
            .and_then(|id| ctx.header(&id))
            .map(is_credit_note)
            .unwrap_or(false);
        if credit_note {
            continue;
        }
        let mut exception = Exception::new(
            ids::NEGATIVE_LINE,
            "Negative line without credit note",
            Severity::Warning,
            format!("line_total {line_total} is negative on a non-credit-note document"),
        );
        attach_record_context(&mut exception, line, DatasetScope::Lines, ctx);
        exception.field = Some("line_total".to_string());
        exception.actual = Some(format!("{line_total}"));
        exceptions.push(exception);
    }
    CheckResult::from_exceptions(
        ids::NEGATIVE_LINE,
        "Negative line without credit note",
        Severity::Warning,
        ctx.lines().len(),
        exceptions,
    )
}

/// Invoices whose lines carry more than one VAT rate must present a
/// per-rate breakdown total on the header.
pub(crate) fn mixed_vat_without_breakdown(ctx: &DataContext) -> CheckResult {
    let mut exceptions = Vec::new();
    for header in ctx.headers() {
        let Some(invoice_id) = header.get_str(INVOICE_ID) else {
            continue;
        };
        let rates: BTreeSet<String> = ctx
            .lines_for_invoice(&invoice_id)
            .iter()
            .filter_map(|line| line.get_str("vat_rate"))
            .collect();
        if rates.len() <= 1 || header.get_str("vat_breakdown_total").is_some() {
            continue;
        }
        let mut exception = Exception::new(
            ids::MIXED_VAT,
            "Mixed VAT rates without breakdown",
            Severity::Warning,
            format!(
                "invoice carries {} VAT rates but no vat_breakdown_total",
                rates.len()
            ),
        );
        attach_record_context(&mut exception, header, DatasetScope::Headers, ctx);
        exception.field = Some("vat_breakdown_total".to_string());
        exception.expected = Some("per-rate VAT breakdown".to_string());
        exception.actual = Some(format!("{} distinct rates", rates.len()));
        exceptions.push(exception);
    }
    CheckResult::from_exceptions(
        ids::MIXED_VAT,
        "Mixed VAT rates without breakdown",
        Severity::Warning,
        ctx.headers().len(),
        exceptions,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        Record::from_value(value)
    }

    #[test]
    fn header_total_passes_within_tolerance() {
        let ctx = DataContext::new(
            vec![],
            vec![
                record(json!({
                    "invoice_id": "I1",
                    "total_excl_vat": "1000.00",
                    "vat_total": "50.00",
                    "total_incl_vat": "1050.00"
                })),
                record(json!({
                    "invoice_id": "I2",
                    "total_excl_vat": 1000.0,
                    "vat_total": 50.0,
                    "total_incl_vat": 1050.02
                })),
                record(json!({"invoice_id": "I3", "total_incl_vat": 99.0})),
            ],
            vec![],
        );
        let result = header_total_identity(&ctx);
        assert_eq!(result.failed, 1);
        assert_eq!(result.exceptions[0].invoice_id.as_deref(), Some("I2"));
    }

    #[test]
    fn negative_line_allows_credit_notes() {
        let ctx = DataContext::new(
            vec![],
            vec![
                record(json!({"invoice_id": "I1", "document_type": "credit_note"})),
                record(json!({"invoice_id": "I2", "document_type": "invoice"})),
            ],
            vec![
                record(json!({"line_id": "L1", "invoice_id": "I1", "line_total": -10.0})),
                record(json!({"line_id": "L2", "invoice_id": "I2", "line_total": -10.0})),
                record(json!({"line_id": "L3", "invoice_id": "I-ghost", "line_total": -1.0})),
            ],
        );
        let result = negative_line_without_credit_note(&ctx);
        assert_eq!(result.failed, 2);
        let flagged: Vec<_> = result
            .exceptions
            .iter()
            .filter_map(|e| e.line_id.as_deref())
            .collect();
        assert_eq!(flagged, vec!["L2", "L3"]);
    }

    #[test]
    fn mixed_vat_needs_breakdown() {
        let ctx = DataContext::new(
            vec![],
            vec![
                record(json!({"invoice_id": "I1"})),
                record(json!({"invoice_id": "I2", "vat_breakdown_total": 12.5})),
                record(json!({"invoice_id": "I3"})),
            ],
            vec![
                record(json!({"invoice_id": "I1", "vat_rate": "5"})),
                record(json!({"invoice_id": "I1", "vat_rate": "0"})),
                record(json!({"invoice_id": "I2", "vat_rate": "5"})),
                record(json!({"invoice_id": "I2", "vat_rate": "0"})),
                record(json!({"invoice_id": "I3", "vat_rate": "5"})),
            ],
        );
        let result = mixed_vat_without_breakdown(&ctx);
        assert_eq!(result.failed, 1);
        assert_eq!(result.exceptions[0].invoice_id.as_deref(), Some("I1"));
    }

    #[test]
    fn vat_amount_identity_skips_unresolved() {
        let ctx = DataContext::new(
            vec![],
            vec![],
            vec![
                record(json!({"line_id": "L1", "line_net": 100.0, "vat_rate": 5.0, "vat_amount": 5.0})),
                record(json!({"line_id": "L2", "line_net": 100.0, "vat_rate": 5.0, "vat_amount": 9.0})),
                record(json!({"line_id": "L3", "line_net": "n/a", "vat_rate": 5.0, "vat_amount": 5.0})),
            ],
        );
        let result = vat_amount_identity(&ctx);
        assert_eq!(result.failed, 1);
        assert_eq!(result.exceptions[0].line_id.as_deref(), Some("L2"));
    }
}
