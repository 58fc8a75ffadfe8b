//! Validation engines for PINT-AE datasets.
//!
//! Two entry points share the same dataset shape and exception output:
//! [`run_checks`] executes configurable checks from the external
//! configuration store, and [`run_builtin_checks`] executes the fixed
//! PINT-AE check pack with per-check pass/fail tallies.

mod context;
mod runner;

pub mod checks;

pub use checks::{CheckResult, run_builtin_checks};
pub use runner::{run_check, run_checks};
