//! Per-column population statistics.
//!
//! Computed by the out-of-scope population analyzer from raw upload
//! rows; the traceability engine only averages them per data
//! requirement.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::context::DatasetScope;

/// Non-blank/well-typed population for one dataset column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnPopulation {
    pub column: String,
    pub total_rows: u64,
    pub populated_count: u64,
    /// Fraction in [0, 1].
    pub population_pct: f64,
}

/// Population statistics grouped by dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PopulationStats {
    pub by_dataset: BTreeMap<DatasetScope, Vec<ColumnPopulation>>,
}

impl PopulationStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, scope: DatasetScope, columns: Vec<ColumnPopulation>) {
        self.by_dataset.insert(scope, columns);
    }

    pub fn columns(&self, scope: DatasetScope) -> &[ColumnPopulation] {
        self.by_dataset
            .get(&scope)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Population fraction for one column, matched case-insensitively.
    pub fn pct_for(&self, scope: DatasetScope, column: &str) -> Option<f64> {
        self.columns(scope)
            .iter()
            .find(|c| c.column.eq_ignore_ascii_case(column.trim()))
            .map(|c| c.population_pct)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pct_lookup_is_case_insensitive() {
        let mut stats = PopulationStats::new();
        stats.insert(
            DatasetScope::Headers,
            vec![ColumnPopulation {
                column: "Invoice_Number".to_string(),
                total_rows: 100,
                populated_count: 97,
                population_pct: 0.97,
            }],
        );
        assert_eq!(
            stats.pct_for(DatasetScope::Headers, "invoice_number"),
            Some(0.97)
        );
        assert_eq!(stats.pct_for(DatasetScope::Headers, "currency"), None);
        assert_eq!(stats.pct_for(DatasetScope::Lines, "invoice_number"), None);
    }
}
