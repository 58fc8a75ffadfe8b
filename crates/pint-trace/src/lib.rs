//! Compliance traceability for UAE PINT-AE data requirements.
//!
//! Three joinable catalogs (data requirements, rule traces, controls)
//! feed a conformance engine that classifies each DR's validation
//! coverage and rolls gap counters up for the evidence pack. A
//! companion readiness check gates downstream execution on mapping and
//! population thresholds.

mod controls;
mod engine;
mod readiness;
mod registry;
mod rules;

pub use controls::{ControlCatalog, ControlEntry};
pub use engine::{
    CoverageStatus, GapsSummary, TraceabilityEngine, TraceabilityInput, TraceabilityMatrix,
    TraceabilityReportPayload, TraceabilityRow, build_report_payload,
};
pub use readiness::{
    ReadinessInput, ReadinessReason, ReadinessReport, ReadinessThresholds, evaluate_readiness,
};
pub use registry::{DrRegistry, DrRegistryEntry};
pub use rules::{RuleTraceCatalog, RuleTraceEntry, builtin_rule_catalog};
