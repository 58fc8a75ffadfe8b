//! Built-in PINT-AE check registry.
//!
//! A fixed pack of arithmetic and structural checks executed over the
//! same dataset shape as the configurable runner, hard-coded rather
//! than configuration-driven. Each check contributes a pass/fail tally
//! alongside its exceptions.

mod duplicates;
mod structural;
mod totals;

use serde::{Deserialize, Serialize};

use pint_model::{DataContext, Exception, Severity};

/// Stable identifiers for the built-in pack; the traceability catalogs
/// reference these.
pub mod ids {
    pub const TRN_FORMAT: &str = "AE-TRN-FORMAT";
    pub const DUPLICATE_INVOICE: &str = "AE-DUP-INV";
    pub const HEADER_TOTAL: &str = "AE-HDR-TOTAL";
    pub const LINE_TOTAL: &str = "AE-LINE-TOTAL";
    pub const VAT_AMOUNT: &str = "AE-VAT-AMOUNT";
    pub const NEGATIVE_LINE: &str = "AE-NEG-LINE";
    pub const BUYER_REFERENCE: &str = "AE-BUYER-REF";
    pub const HEADER_MANDATORY: &str = "AE-HDR-MANDATORY";
    pub const MIXED_VAT: &str = "AE-MIXED-VAT";
}

/// Absolute tolerance for the arithmetic identities.
pub(crate) const AMOUNT_TOLERANCE: f64 = 0.01;

/// Per-check outcome tally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    pub check_id: String,
    pub name: String,
    pub severity: Severity,
    /// Records in the check's scope.
    pub total: u64,
    pub passed: u64,
    pub failed: u64,
    pub exceptions: Vec<Exception>,
}

impl CheckResult {
    /// `failed` is the exception count; `passed` is the remainder of
    /// the scope. A record with several findings can push `passed`
    /// below a per-record count, which downstream reporting accepts.
    pub(crate) fn from_exceptions(
        check_id: &str,
        name: &str,
        severity: Severity,
        total: usize,
        exceptions: Vec<Exception>,
    ) -> Self {
        let total = total as u64;
        let failed = exceptions.len() as u64;
        Self {
            check_id: check_id.to_string(),
            name: name.to_string(),
            severity,
            total,
            passed: total.saturating_sub(failed),
            failed,
            exceptions,
        }
    }
}

/// Run the whole built-in pack in registry order.
pub fn run_builtin_checks(ctx: &DataContext) -> Vec<CheckResult> {
    vec![
        structural::trn_format(ctx),
        duplicates::duplicate_invoice_per_seller(ctx),
        totals::header_total_identity(ctx),
        totals::line_total_identity(ctx),
        totals::vat_amount_identity(ctx),
        totals::negative_line_without_credit_note(ctx),
        structural::buyer_reference(ctx),
        structural::header_mandatory_fields(ctx),
        totals::mixed_vat_without_breakdown(ctx),
    ]
}
