//! Cross-reference enrichment for exceptions.

use pint_model::{DataContext, DatasetScope, Exception, Record};
use pint_model::record::{BUYER_ID, INVOICE_ID, LINE_ID};

/// Header fields surfaced on every finding that can reach them.
pub const INVOICE_NUMBER: &str = "invoice_number";
pub const SELLER_TRN: &str = "seller_trn";

/// Fill invoice/seller/buyer coordinates on an exception from the
/// current record, resolving `invoice_id` against the header index when
/// the record is not itself a header. A dangling reference leaves the
/// coordinates unset; it never fails the finding.
pub fn attach_record_context(
    exception: &mut Exception,
    record: &Record,
    scope: DatasetScope,
    ctx: &DataContext,
) {
    match scope {
        DatasetScope::Buyers => {
            exception.buyer_id = record.get_str(BUYER_ID);
        }
        DatasetScope::Headers => {
            exception.invoice_id = record.get_str(INVOICE_ID);
            exception.invoice_number = record.get_str(INVOICE_NUMBER);
            exception.seller_trn = record.get_str(SELLER_TRN);
            exception.buyer_id = record.get_str(BUYER_ID);
        }
        DatasetScope::Lines => {
            exception.line_id = record.get_str(LINE_ID);
            exception.invoice_id = record.get_str(INVOICE_ID);
            if let Some(header) = exception
                .invoice_id
                .as_deref()
                .and_then(|id| ctx.header(id))
            {
                exception.invoice_number = header.get_str(INVOICE_NUMBER);
                exception.seller_trn = header.get_str(SELLER_TRN);
                exception.buyer_id = header.get_str(BUYER_ID);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pint_model::Severity;
    use serde_json::json;

    #[test]
    fn line_findings_inherit_header_context() {
        let ctx = DataContext::new(
            vec![],
            vec![Record::from_value(json!({
                "invoice_id": "I1",
                "invoice_number": "INV-1",
                "seller_trn": "100200300123456",
                "buyer_id": "B1"
            }))],
            vec![Record::from_value(json!({"line_id": "L1", "invoice_id": "I1"}))],
        );
        let line = &ctx.lines()[0];
        let mut exception = Exception::new("C1", "check", Severity::Error, "msg");
        attach_record_context(&mut exception, line, DatasetScope::Lines, &ctx);
        assert_eq!(exception.line_id.as_deref(), Some("L1"));
        assert_eq!(exception.invoice_number.as_deref(), Some("INV-1"));
        assert_eq!(exception.seller_trn.as_deref(), Some("100200300123456"));
        assert_eq!(exception.buyer_id.as_deref(), Some("B1"));
    }

    #[test]
    fn dangling_invoice_reference_leaves_coordinates_unset() {
        let ctx = DataContext::new(vec![], vec![], vec![Record::from_value(json!({
            "line_id": "L1",
            "invoice_id": "I-unknown"
        }))]);
        let line = &ctx.lines()[0];
        let mut exception = Exception::new("C1", "check", Severity::Error, "msg");
        attach_record_context(&mut exception, line, DatasetScope::Lines, &ctx);
        assert_eq!(exception.invoice_id.as_deref(), Some("I-unknown"));
        assert!(exception.invoice_number.is_none());
    }
}
