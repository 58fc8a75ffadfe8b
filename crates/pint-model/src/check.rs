//! Configurable check definitions.
//!
//! Checks arrive from an external configuration store as JSON with a
//! `rule_type` discriminator and a rule-specific `parameters` object.
//! The engine sees them as a tagged union with an exhaustive match in
//! the runner.

use serde::{Deserialize, Serialize};

use crate::context::DatasetScope;
use crate::error::ModelError;
use crate::exception::Severity;

/// Absolute tolerance applied to `=` / `!=` math comparisons when the
/// check does not override it.
pub const DEFAULT_MATH_TOLERANCE: f64 = 0.01;

/// Separator joining duplicate-key segments when the check does not
/// override it.
pub const DEFAULT_DUPLICATE_SEPARATOR: &str = "|";

/// One configurable validation rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckConfig {
    pub id: String,
    pub name: String,
    pub dataset_scope: DatasetScope,
    /// Optional boolean gate evaluated per record before the rule runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(flatten)]
    pub rule: RuleKind,
    pub message_template: String,
    pub severity: Severity,
    #[serde(default = "default_enabled")]
    pub is_enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// Rule-type discriminated parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "rule_type", content = "parameters", rename_all = "snake_case")]
pub enum RuleKind {
    /// Flag records whose field is absent, null, or blank after trimming.
    Missing { field: String },
    /// Group records by the joined resolved values of `fields`; flag
    /// every member of any group with more than one member.
    Duplicate {
        fields: Vec<String>,
        #[serde(default = "default_separator")]
        separator: String,
    },
    /// Compare two arithmetic expressions under an operator.
    Math {
        left: String,
        right: String,
        operator: ComparisonOp,
        #[serde(default = "default_tolerance")]
        tolerance: f64,
    },
    /// Flag records whose resolved, non-empty field fails the pattern.
    Regex { field: String, pattern: String },
    /// Flag records where the boolean formula evaluates falsy.
    CustomFormula { formula: String },
}

fn default_separator() -> String {
    DEFAULT_DUPLICATE_SEPARATOR.to_string()
}

fn default_tolerance() -> f64 {
    DEFAULT_MATH_TOLERANCE
}

/// Comparison operators for the math rule, spelled the way the
/// configuration store spells them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComparisonOp {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "<=")]
    Le,
}

impl ComparisonOp {
    /// Evaluate `left op right`. Tolerance applies to equality and
    /// inequality only; ordering comparisons are exact.
    pub fn compare(self, left: f64, right: f64, tolerance: f64) -> bool {
        match self {
            ComparisonOp::Eq => (left - right).abs() <= tolerance,
            ComparisonOp::Ne => (left - right).abs() > tolerance,
            ComparisonOp::Gt => left > right,
            ComparisonOp::Lt => left < right,
            ComparisonOp::Ge => left >= right,
            ComparisonOp::Le => left <= right,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            ComparisonOp::Eq => "=",
            ComparisonOp::Ne => "!=",
            ComparisonOp::Gt => ">",
            ComparisonOp::Lt => "<",
            ComparisonOp::Ge => ">=",
            ComparisonOp::Le => "<=",
        }
    }
}

impl std::fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

impl CheckConfig {
    /// Reject checks with missing required parameters. The runner skips
    /// invalid checks entirely (no exceptions, no crash).
    pub fn validate(&self) -> Result<(), ModelError> {
        let invalid = |message: &str| ModelError::InvalidCheck {
            check_id: self.id.clone(),
            message: message.to_string(),
        };
        match &self.rule {
            RuleKind::Missing { field } if field.trim().is_empty() => {
                Err(invalid("missing rule requires a field"))
            }
            RuleKind::Duplicate { fields, .. }
                if fields.is_empty() || fields.iter().all(|f| f.trim().is_empty()) =>
            {
                Err(invalid("duplicate rule requires at least one key field"))
            }
            RuleKind::Math { left, right, .. }
                if left.trim().is_empty() || right.trim().is_empty() =>
            {
                Err(invalid("math rule requires left and right expressions"))
            }
            RuleKind::Regex { field, pattern } => {
                if field.trim().is_empty() {
                    return Err(invalid("regex rule requires a field"));
                }
                if pattern.trim().is_empty() {
                    return Err(invalid("regex rule requires a pattern"));
                }
                Ok(())
            }
            RuleKind::CustomFormula { formula } if formula.trim().is_empty() => {
                Err(invalid("custom_formula rule requires a formula"))
            }
            _ => Ok(()),
        }
    }
}
