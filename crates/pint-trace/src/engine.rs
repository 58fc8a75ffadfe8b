//! Conformance/traceability engine.
//!
//! Joins the DR registry, rule catalog, and controls catalog with
//! per-column population statistics to produce one row per data
//! requirement plus rollup gap counters. Pure computation: identical
//! inputs yield identical rows.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::warn;

use pint_model::{CaseInsensitiveSet, DatasetScope, PopulationStats};

use crate::controls::ControlCatalog;
use crate::registry::{DrRegistry, DrRegistryEntry};
use crate::rules::RuleTraceCatalog;

/// Classification of a DR's validation coverage.
///
/// The priority order is strict and total: a DR that is in the template
/// but has neither rules nor controls reports `NoRule`, never
/// `NoControl`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CoverageStatus {
    NotInTemplate,
    NoRule,
    NoControl,
    Covered,
}

/// One computed row per data requirement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceabilityRow {
    pub dr_id: String,
    pub name: String,
    pub mandatory: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset: Option<DatasetScope>,
    pub columns: Vec<String>,
    pub in_template: bool,
    pub ingestible: bool,
    /// Mean population across bound columns; `None` when the DR is not
    /// in the template or no population data was supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub population_pct: Option<f64>,
    pub rule_ids: Vec<String>,
    pub control_ids: Vec<String>,
    pub exception_count: u64,
    pub status: CoverageStatus,
}

/// Rollup gap counters over the whole matrix.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GapsSummary {
    pub mandatory_missing_from_template: u64,
    pub mandatory_not_ingestible: u64,
    pub mandatory_below_population_threshold: u64,
    pub no_rule: u64,
    pub no_control: u64,
    pub covered: u64,
}

/// Inputs computed by out-of-scope collaborators for one run.
#[derive(Debug, Clone)]
pub struct TraceabilityInput {
    pub population: PopulationStats,
    /// Columns the parser recognized, per dataset.
    pub known_columns: BTreeMap<DatasetScope, CaseInsensitiveSet>,
    /// Exception totals per rule id from the latest validation run.
    pub exception_counts: BTreeMap<String, u64>,
    /// Mandatory DRs at or above this population fraction do not count
    /// as a gap.
    pub population_threshold: f64,
}

impl Default for TraceabilityInput {
    fn default() -> Self {
        Self {
            population: PopulationStats::new(),
            known_columns: BTreeMap::new(),
            exception_counts: BTreeMap::new(),
            population_threshold: DEFAULT_POPULATION_THRESHOLD,
        }
    }
}

impl TraceabilityInput {
    pub fn new() -> Self {
        Self::default()
    }
}

pub(crate) const DEFAULT_POPULATION_THRESHOLD: f64 = 0.90;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceabilityMatrix {
    pub rows: Vec<TraceabilityRow>,
    pub gaps: GapsSummary,
}

/// Joins the three catalogs. Catalogs are injected; the engine holds no
/// global state.
#[derive(Debug, Clone)]
pub struct TraceabilityEngine<'a> {
    dr_registry: &'a DrRegistry,
    rules: &'a RuleTraceCatalog,
    controls: &'a ControlCatalog,
}

impl<'a> TraceabilityEngine<'a> {
    pub fn new(
        dr_registry: &'a DrRegistry,
        rules: &'a RuleTraceCatalog,
        controls: &'a ControlCatalog,
    ) -> Self {
        for entry in rules.entries() {
            for dr_id in &entry.dr_ids {
                if !dr_registry.contains(dr_id) {
                    warn!(rule_id = %entry.rule_id, %dr_id, "rule references unknown DR");
                }
            }
        }
        Self {
            dr_registry,
            rules,
            controls,
        }
    }

    /// One row per registry entry, in registry order.
    pub fn compute(&self, input: &TraceabilityInput) -> TraceabilityMatrix {
        let mut rows = Vec::with_capacity(self.dr_registry.len());
        let mut gaps = GapsSummary::default();

        for entry in self.dr_registry.entries() {
            let row = self.compute_row(entry, input);

            if entry.mandatory {
                if !row.in_template {
                    gaps.mandatory_missing_from_template += 1;
                } else if !row.ingestible {
                    gaps.mandatory_not_ingestible += 1;
                }
                if row
                    .population_pct
                    .is_some_and(|pct| pct < input.population_threshold)
                {
                    gaps.mandatory_below_population_threshold += 1;
                }
            }
            match row.status {
                CoverageStatus::NoRule => gaps.no_rule += 1,
                CoverageStatus::NoControl => gaps.no_control += 1,
                CoverageStatus::Covered => gaps.covered += 1,
                CoverageStatus::NotInTemplate => {}
            }

            rows.push(row);
        }

        TraceabilityMatrix { rows, gaps }
    }

    fn compute_row(
        &self,
        entry: &DrRegistryEntry,
        input: &TraceabilityInput,
    ) -> TraceabilityRow {
        let in_template = !entry.columns.is_empty();

        let ingestible = in_template
            && entry.dataset.is_some_and(|dataset| {
                input
                    .known_columns
                    .get(&dataset)
                    .is_some_and(|known| entry.columns.iter().all(|col| known.contains(col)))
            });

        let population_pct = if in_template {
            entry.dataset.and_then(|dataset| {
                let pcts: Vec<f64> = entry
                    .columns
                    .iter()
                    .filter_map(|col| input.population.pct_for(dataset, col))
                    .collect();
                if pcts.is_empty() {
                    None
                } else {
                    Some(pcts.iter().sum::<f64>() / pcts.len() as f64)
                }
            })
        } else {
            None
        };

        let rule_ids = self.rules.rules_for_dr(&entry.dr_id).to_vec();
        let control_ids = self.controls.controls_for(&entry.dr_id, &rule_ids);
        let exception_count = rule_ids
            .iter()
            .map(|rule_id| input.exception_counts.get(rule_id).copied().unwrap_or(0))
            .sum();

        // Strict priority order; rule absence outranks control absence.
        let status = if !in_template {
            CoverageStatus::NotInTemplate
        } else if rule_ids.is_empty() {
            CoverageStatus::NoRule
        } else if control_ids.is_empty() {
            CoverageStatus::NoControl
        } else {
            CoverageStatus::Covered
        };

        TraceabilityRow {
            dr_id: entry.dr_id.clone(),
            name: entry.name.clone(),
            mandatory: entry.mandatory,
            dataset: entry.dataset,
            columns: entry.columns.clone(),
            in_template,
            ingestible,
            population_pct,
            rule_ids,
            control_ids,
            exception_count,
            status,
        }
    }
}

const REPORT_SCHEMA: &str = "pint-ae-readiness.traceability-report";
const REPORT_SCHEMA_VERSION: u32 = 1;

/// Serializable payload for the downstream evidence-pack renderer.
#[derive(Debug, Serialize)]
pub struct TraceabilityReportPayload {
    pub schema: &'static str,
    pub schema_version: u32,
    pub generated_at: String,
    pub rows: Vec<TraceabilityRow>,
    pub gaps: GapsSummary,
}

pub fn build_report_payload(matrix: &TraceabilityMatrix) -> TraceabilityReportPayload {
    TraceabilityReportPayload {
        schema: REPORT_SCHEMA,
        schema_version: REPORT_SCHEMA_VERSION,
        generated_at: Utc::now().to_rfc3339(),
        rows: matrix.rows.clone(),
        gaps: matrix.gaps.clone(),
    }
}
