//! Runner for configurable checks.
//!
//! Dispatches a `CheckConfig` to its rule-type evaluator over the
//! selected dataset slice. Error policy, in order of precedence:
//!
//! - configuration errors (missing parameters, invalid regex) skip the
//!   whole check with a warning and produce no exceptions;
//! - per-record evaluation errors fail open (conditions) or fail skip
//!   (math, custom formulas) — a bad record is never flagged because of
//!   an engine error, and never aborts the run;
//! - missing cross-references are findings, not errors.

use std::collections::BTreeMap;

use regex::Regex;
use tracing::{debug, warn};

use pint_expr::{evaluate_arithmetic, evaluate_condition, evaluate_formula, resolve_field, substitute};
use pint_model::record::{value_is_blank, value_to_display};
use pint_model::{CheckConfig, DataContext, Exception, Record, RuleKind};

use crate::context::attach_record_context;

/// Execute checks in input order, concatenating exceptions. Disabled
/// checks are skipped silently; invalid ones are skipped with a warning.
pub fn run_checks(checks: &[CheckConfig], ctx: &DataContext) -> Vec<Exception> {
    let mut exceptions = Vec::new();
    for check in checks {
        exceptions.extend(run_check(check, ctx));
    }
    exceptions
}

/// Execute a single check against the dataset.
pub fn run_check(check: &CheckConfig, ctx: &DataContext) -> Vec<Exception> {
    if !check.is_enabled {
        return Vec::new();
    }
    if let Err(error) = check.validate() {
        warn!(check_id = %check.id, %error, "skipping invalid check");
        return Vec::new();
    }

    let records = ctx.records(check.dataset_scope);
    let exceptions = match &check.rule {
        RuleKind::Missing { field } => run_missing(check, ctx, records, field),
        RuleKind::Duplicate { fields, separator } => {
            run_duplicate(check, ctx, records, fields, separator)
        }
        RuleKind::Math {
            left,
            right,
            operator,
            tolerance,
        } => run_math(check, ctx, records, left, right, *operator, *tolerance),
        RuleKind::Regex { field, pattern } => run_regex(check, ctx, records, field, pattern),
        RuleKind::CustomFormula { formula } => run_formula(check, ctx, records, formula),
    };

    debug!(
        check_id = %check.id,
        scope = %check.dataset_scope,
        records = records.len(),
        exceptions = exceptions.len(),
        "check executed"
    );
    exceptions
}

fn condition_holds(check: &CheckConfig, record: &Record) -> bool {
    match &check.condition {
        Some(condition) => evaluate_condition(condition, record),
        None => true,
    }
}

fn run_missing(
    check: &CheckConfig,
    ctx: &DataContext,
    records: &[Record],
    field: &str,
) -> Vec<Exception> {
    let mut exceptions = Vec::new();
    for record in records {
        if !condition_holds(check, record) {
            continue;
        }
        let blank = match resolve_field(record, field) {
            Some(value) => value_is_blank(value),
            None => true,
        };
        if blank {
            let mut exception = emit(check, record, ctx, None);
            exception.field = Some(field.to_string());
            exception.expected = Some("non-empty value".to_string());
            exceptions.push(exception);
        }
    }
    exceptions
}

fn run_duplicate(
    check: &CheckConfig,
    ctx: &DataContext,
    records: &[Record],
    fields: &[String],
    separator: &str,
) -> Vec<Exception> {
    // First pass: group condition-passing records by their joined key.
    // Missing fields contribute an empty segment; an exact duplicate key
    // is an exact duplicate key, including three-or-more-way groups.
    let mut groups: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (idx, record) in records.iter().enumerate() {
        if !condition_holds(check, record) {
            continue;
        }
        let key = fields
            .iter()
            .map(|field| {
                resolve_field(record, field)
                    .map(value_to_display)
                    .unwrap_or_default()
            })
            .collect::<Vec<_>>()
            .join(separator);
        groups.entry(key).or_default().push(idx);
    }

    let mut group_size: BTreeMap<usize, usize> = BTreeMap::new();
    for members in groups.values() {
        if members.len() > 1 {
            for idx in members {
                group_size.insert(*idx, members.len());
            }
        }
    }

    // Second pass in dataset order so output follows input ordering.
    let mut exceptions = Vec::new();
    for (idx, record) in records.iter().enumerate() {
        let Some(size) = group_size.get(&idx) else {
            continue;
        };
        let mut extra = BTreeMap::new();
        extra.insert("group_size".to_string(), size.to_string());
        let mut exception = emit(check, record, ctx, Some(&extra));
        exception.field = Some(fields.join(separator));
        exception.expected = Some("unique key".to_string());
        exception.actual = Some(format!("{size} records share this key"));
        exceptions.push(exception);
    }
    exceptions
}

fn run_math(
    check: &CheckConfig,
    ctx: &DataContext,
    records: &[Record],
    left: &str,
    right: &str,
    operator: pint_model::ComparisonOp,
    tolerance: f64,
) -> Vec<Exception> {
    let mut exceptions = Vec::new();
    for record in records {
        if !condition_holds(check, record) {
            continue;
        }
        // Unresolved side: skip silently, never flag.
        let (Some(left_value), Some(right_value)) = (
            evaluate_arithmetic(left, record),
            evaluate_arithmetic(right, record),
        ) else {
            continue;
        };
        if !operator.compare(left_value, right_value, tolerance) {
            let mut exception = emit(check, record, ctx, None);
            exception.expected = Some(format!("{left} {operator} {right}"));
            exception.actual = Some(format!("{left_value} {operator} {right_value} is false"));
            exceptions.push(exception);
        }
    }
    exceptions
}

fn run_regex(
    check: &CheckConfig,
    ctx: &DataContext,
    records: &[Record],
    field: &str,
    pattern: &str,
) -> Vec<Exception> {
    let regex = match Regex::new(pattern) {
        Ok(regex) => regex,
        Err(error) => {
            warn!(check_id = %check.id, %error, "skipping check with invalid pattern");
            return Vec::new();
        }
    };

    let mut exceptions = Vec::new();
    for record in records {
        if !condition_holds(check, record) {
            continue;
        }
        // Empty values are the missing rule's concern.
        let Some(value) = resolve_field(record, field) else {
            continue;
        };
        let text = value_to_display(value);
        let trimmed = text.trim();
        if trimmed.is_empty() || regex.is_match(trimmed) {
            continue;
        }
        let mut exception = emit(check, record, ctx, None);
        exception.field = Some(field.to_string());
        exception.expected = Some(format!("match for /{pattern}/"));
        exception.actual = Some(trimmed.to_string());
        exceptions.push(exception);
    }
    exceptions
}

fn run_formula(
    check: &CheckConfig,
    ctx: &DataContext,
    records: &[Record],
    formula: &str,
) -> Vec<Exception> {
    let mut exceptions = Vec::new();
    for record in records {
        if !condition_holds(check, record) {
            continue;
        }
        // None means the formula errored for this record: skip, do not
        // flag.
        match evaluate_formula(formula, record) {
            Some(false) => {
                let mut exception = emit(check, record, ctx, None);
                exception.expected = Some(formula.to_string());
                exceptions.push(exception);
            }
            Some(true) | None => {}
        }
    }
    exceptions
}

fn emit(
    check: &CheckConfig,
    record: &Record,
    ctx: &DataContext,
    extra: Option<&BTreeMap<String, String>>,
) -> Exception {
    let message = substitute(&check.message_template, record, extra);
    let mut exception = Exception::new(&check.id, &check.name, check.severity, message);
    attach_record_context(&mut exception, record, check.dataset_scope, ctx);
    exception
}
