//! Controls catalog: which audit controls cover which rules and DRs.

use std::collections::BTreeSet;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// One audit control with the rules and data requirements it covers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlEntry {
    pub control_id: String,
    pub name: String,
    #[serde(default)]
    pub covered_rule_ids: BTreeSet<String>,
    #[serde(default)]
    pub covered_dr_ids: BTreeSet<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ControlCatalog {
    entries: Vec<ControlEntry>,
}

impl ControlCatalog {
    pub fn from_entries(entries: Vec<ControlEntry>) -> Self {
        Self { entries }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let entries: Vec<ControlEntry> =
            serde_json::from_str(json).context("parse controls document")?;
        Ok(Self::from_entries(entries))
    }

    pub fn entries(&self) -> &[ControlEntry] {
        &self.entries
    }

    /// Controls covering a DR, either directly or through one of the
    /// DR's linked rules. Catalog order, no duplicates.
    pub fn controls_for(&self, dr_id: &str, rule_ids: &[String]) -> Vec<String> {
        let dr_key = dr_id.to_uppercase();
        self.entries
            .iter()
            .filter(|control| {
                control
                    .covered_dr_ids
                    .iter()
                    .any(|id| id.to_uppercase() == dr_key)
                    || rule_ids.iter().any(|rule_id| {
                        control
                            .covered_rule_ids
                            .iter()
                            .any(|id| id.eq_ignore_ascii_case(rule_id))
                    })
            })
            .map(|control| control.control_id.clone())
            .collect()
    }
}
