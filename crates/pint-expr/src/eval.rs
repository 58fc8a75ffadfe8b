//! Expression evaluation against a record.

use pint_model::Record;

use crate::error::ExprError;
use crate::parser::{BinaryOp, Expr, UnaryOp, parse};
use crate::resolve::resolve_field;
use crate::value::ExprValue;

/// Evaluate a parsed expression. Missing fields resolve to null; type
/// errors surface as `Err` and the caller decides the policy.
pub fn evaluate(expr: &Expr, record: &Record) -> Result<ExprValue, ExprError> {
    match expr {
        Expr::Number(n) => Ok(ExprValue::Number(*n)),
        Expr::Str(s) => Ok(ExprValue::Str(s.clone())),
        Expr::Bool(b) => Ok(ExprValue::Bool(*b)),
        Expr::Null => Ok(ExprValue::Null),
        Expr::Field(path) => Ok(resolve_field(record, path)
            .map(ExprValue::from_json)
            .unwrap_or(ExprValue::Null)),
        Expr::Unary(op, inner) => {
            let value = evaluate(inner, record)?;
            match op {
                UnaryOp::Neg => Ok(ExprValue::Number(-value.as_number()?)),
                UnaryOp::Not => Ok(ExprValue::Bool(!value.is_truthy())),
            }
        }
        Expr::Binary(op, lhs, rhs) => {
            // Short-circuit the boolean connectives.
            match op {
                BinaryOp::And => {
                    let left = evaluate(lhs, record)?;
                    if !left.is_truthy() {
                        return Ok(ExprValue::Bool(false));
                    }
                    return Ok(ExprValue::Bool(evaluate(rhs, record)?.is_truthy()));
                }
                BinaryOp::Or => {
                    let left = evaluate(lhs, record)?;
                    if left.is_truthy() {
                        return Ok(ExprValue::Bool(true));
                    }
                    return Ok(ExprValue::Bool(evaluate(rhs, record)?.is_truthy()));
                }
                _ => {}
            }

            let left = evaluate(lhs, record)?;
            let right = evaluate(rhs, record)?;
            match op {
                BinaryOp::Add => Ok(ExprValue::Number(left.as_number()? + right.as_number()?)),
                BinaryOp::Sub => Ok(ExprValue::Number(left.as_number()? - right.as_number()?)),
                BinaryOp::Mul => Ok(ExprValue::Number(left.as_number()? * right.as_number()?)),
                BinaryOp::Div => {
                    let divisor = right.as_number()?;
                    if divisor == 0.0 {
                        return Err(ExprError::Type("division by zero".to_string()));
                    }
                    Ok(ExprValue::Number(left.as_number()? / divisor))
                }
                BinaryOp::Eq => Ok(ExprValue::Bool(values_equal(&left, &right)?)),
                BinaryOp::Ne => Ok(ExprValue::Bool(!values_equal(&left, &right)?)),
                BinaryOp::Gt => ordered(&left, &right, |o| o == std::cmp::Ordering::Greater),
                BinaryOp::Lt => ordered(&left, &right, |o| o == std::cmp::Ordering::Less),
                BinaryOp::Ge => ordered(&left, &right, |o| o != std::cmp::Ordering::Less),
                BinaryOp::Le => ordered(&left, &right, |o| o != std::cmp::Ordering::Greater),
                BinaryOp::And | BinaryOp::Or => unreachable!("handled above"),
            }
        }
    }
}

/// Equality supports null on either side; otherwise values compare
/// within a common type, with numeric-string coercion.
fn values_equal(left: &ExprValue, right: &ExprValue) -> Result<bool, ExprError> {
    match (left, right) {
        (ExprValue::Null, ExprValue::Null) => Ok(true),
        (ExprValue::Null, _) | (_, ExprValue::Null) => Ok(false),
        (ExprValue::Bool(a), ExprValue::Bool(b)) => Ok(a == b),
        (ExprValue::Number(_), _) | (_, ExprValue::Number(_)) => {
            Ok(left.as_number()? == right.as_number()?)
        }
        (ExprValue::Str(a), ExprValue::Str(b)) => Ok(a == b),
        _ => Err(ExprError::Type(format!(
            "cannot compare {} with {}",
            left.type_name(),
            right.type_name()
        ))),
    }
}

fn ordered(
    left: &ExprValue,
    right: &ExprValue,
    accept: impl Fn(std::cmp::Ordering) -> bool,
) -> Result<ExprValue, ExprError> {
    let ordering = match (left, right) {
        (ExprValue::Str(a), ExprValue::Str(b))
            if a.trim().parse::<f64>().is_err() || b.trim().parse::<f64>().is_err() =>
        {
            a.cmp(b)
        }
        _ => {
            let (a, b) = (left.as_number()?, right.as_number()?);
            a.partial_cmp(&b)
                .ok_or_else(|| ExprError::Type("unordered comparison".to_string()))?
        }
    };
    Ok(ExprValue::Bool(accept(ordering)))
}

/// Evaluate a boolean condition template. Fail-open: any parse or
/// evaluation error counts as satisfied.
pub fn evaluate_condition(template: &str, record: &Record) -> bool {
    let trimmed = template.trim();
    if trimmed.is_empty() {
        return true;
    }
    match parse(trimmed).and_then(|expr| evaluate(&expr, record)) {
        Ok(value) => value.is_truthy(),
        Err(_) => true,
    }
}

/// Evaluate an arithmetic expression template. Fail-skip: any missing
/// field or error yields `None` and the caller skips the record.
pub fn evaluate_arithmetic(template: &str, record: &Record) -> Option<f64> {
    let expr = parse(template.trim()).ok()?;
    let value = evaluate(&expr, record).ok()?;
    value.as_number().ok()
}

/// Evaluate a custom boolean formula. `Some(false)` means "flag the
/// record"; `None` means the formula errored and the record is skipped.
pub fn evaluate_formula(template: &str, record: &Record) -> Option<bool> {
    let expr = parse(template.trim()).ok()?;
    evaluate(&expr, record).ok().map(|value| value.is_truthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        Record::from_value(value)
    }

    #[test]
    fn arithmetic_with_field_substitution() {
        let rec = record(json!({"total_excl_vat": "1000.00", "vat_total": 50.0}));
        assert_eq!(
            evaluate_arithmetic("{total_excl_vat} + {vat_total}", &rec),
            Some(1050.0)
        );
        assert_eq!(evaluate_arithmetic("1 + 2 * 3", &rec), Some(7.0));
    }

    #[test]
    fn arithmetic_skips_on_missing_field() {
        let rec = record(json!({"vat_total": 50.0}));
        assert_eq!(evaluate_arithmetic("{total_excl_vat} + {vat_total}", &rec), None);
        assert_eq!(evaluate_arithmetic("{vat_total} / 0", &rec), None);
        assert_eq!(evaluate_arithmetic("{vat_total} +", &rec), None);
    }

    #[test]
    fn condition_fails_open_on_errors() {
        let rec = record(json!({"doc_type": "invoice"}));
        assert!(evaluate_condition("{doc_type} == 'invoice'", &rec));
        assert!(!evaluate_condition("{doc_type} == 'credit_note'", &rec));
        // Malformed condition must never suppress a check.
        assert!(evaluate_condition("{doc_type} ==", &rec));
        assert!(evaluate_condition("{doc_type} > 5 <", &rec));
        assert!(evaluate_condition("", &rec));
    }

    #[test]
    fn missing_fields_compare_as_null() {
        let rec = record(json!({"a": 1}));
        assert!(evaluate_condition("{b} == null", &rec));
        assert!(!evaluate_condition("{b} == 'x'", &rec));
        assert!(evaluate_condition("{a} != null", &rec));
    }

    #[test]
    fn boolean_connectives_short_circuit() {
        let rec = record(json!({"qty": 2, "price": 10}));
        assert!(evaluate_condition("{qty} > 1 && {price} <= 10", &rec));
        assert!(evaluate_condition("{qty} > 5 || {price} == 10", &rec));
        assert!(evaluate_condition("not ({qty} > 5)", &rec));
    }

    #[test]
    fn formula_distinguishes_falsy_from_error() {
        let rec = record(json!({"line_total": 20.0, "quantity": 2, "unit_price": 10.0}));
        assert_eq!(
            evaluate_formula("{line_total} == {quantity} * {unit_price}", &rec),
            Some(true)
        );
        assert_eq!(evaluate_formula("{line_total} == 999", &rec), Some(false));
        // Non-numeric operand is an error, not a flag.
        let bad = record(json!({"line_total": "n/a", "quantity": 2}));
        assert_eq!(evaluate_formula("{line_total} * {quantity} > 0", &bad), None);
    }

    #[test]
    fn string_ordering_is_lexicographic() {
        let rec = record(json!({"a": "apple", "b": "banana"}));
        assert!(evaluate_condition("{a} < {b}", &rec));
    }
}
