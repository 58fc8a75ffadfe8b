//! Expression and field resolution for configurable checks.
//!
//! Check conditions, math expressions, and custom formulas are small
//! string templates with `{field.path}` references. They are parsed by a
//! recursive-descent parser into a typed AST and evaluated against a
//! record; there is no dynamic code execution anywhere.
//!
//! Evaluation policy (load-bearing, see the runner):
//! - `evaluate_condition` fails open: any parse or evaluation error
//!   counts as "condition satisfied" so a malformed condition never
//!   silently suppresses a check.
//! - `evaluate_arithmetic` fails skip: any missing field or error yields
//!   `None` and the caller must skip the record, never flag it.

mod error;
mod eval;
mod lexer;
mod parser;
mod resolve;
mod value;

pub use error::ExprError;
pub use eval::{evaluate, evaluate_arithmetic, evaluate_condition, evaluate_formula};
pub use parser::{BinaryOp, Expr, UnaryOp, parse};
pub use resolve::{resolve_field, substitute};
pub use value::ExprValue;
