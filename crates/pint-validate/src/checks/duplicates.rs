//! Duplicate invoice detection per seller.

use std::collections::BTreeMap;

use pint_model::{DataContext, DatasetScope, Exception, Severity};

use crate::checks::{CheckResult, ids};
use crate::context::{INVOICE_NUMBER, SELLER_TRN, attach_record_context};

/// The same seller TRN must not issue the same invoice number twice.
/// Every member of a duplicate group is flagged, including groups of
/// three or more. Headers missing either key field are not grouped.
pub(crate) fn duplicate_invoice_per_seller(ctx: &DataContext) -> CheckResult {
    let mut groups: BTreeMap<(String, String), Vec<usize>> = BTreeMap::new();
    for (idx, header) in ctx.headers().iter().enumerate() {
        let (Some(trn), Some(number)) = (
            header.get_str(SELLER_TRN),
            header.get_str(INVOICE_NUMBER),
        ) else {
            continue;
        };
        groups
            .entry((trn, number.to_lowercase()))
            .or_default()
            .push(idx);
    }

    let mut group_size: BTreeMap<usize, usize> = BTreeMap::new();
    for members in groups.values() {
        if members.len() > 1 {
            for idx in members {
                group_size.insert(*idx, members.len());
            }
        }
    }

    let mut exceptions = Vec::new();
    for (idx, header) in ctx.headers().iter().enumerate() {
        let Some(size) = group_size.get(&idx) else {
            continue;
        };
        let mut exception = Exception::new(
            ids::DUPLICATE_INVOICE,
            "Duplicate invoice number per seller",
            Severity::Error,
            format!("invoice number appears {size} times for this seller TRN"),
        );
        attach_record_context(&mut exception, header, DatasetScope::Headers, ctx);
        exception.field = Some(format!("{SELLER_TRN}|{INVOICE_NUMBER}"));
        exception.expected = Some("unique invoice number per seller".to_string());
        exception.actual = Some(format!("{size} occurrences"));
        exceptions.push(exception);
    }
    CheckResult::from_exceptions(
        ids::DUPLICATE_INVOICE,
        "Duplicate invoice number per seller",
        Severity::Error,
        ctx.headers().len(),
        exceptions,
    )
}
