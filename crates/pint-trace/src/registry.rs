//! The PINT-AE data requirement registry.
//!
//! Static reference data for one spec version, loaded once from the
//! out-of-scope spec-registry JSON document and treated as immutable.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use pint_model::DatasetScope;

/// One UAE PINT-AE data requirement (e.g. `IBT-031`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrRegistryEntry {
    pub dr_id: String,
    pub name: String,
    pub mandatory: bool,
    /// Dataset file the requirement binds to, when customer-ingestible.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset: Option<DatasetScope>,
    /// Bound column names. Empty means not customer-ingestible.
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Responsibility owner (customer, platform, tax authority).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

/// DR registry with document order preserved and an id index.
#[derive(Debug, Clone, Default)]
pub struct DrRegistry {
    entries: Vec<DrRegistryEntry>,
    by_id: BTreeMap<String, usize>,
}

impl DrRegistry {
    pub fn from_entries(entries: Vec<DrRegistryEntry>) -> Self {
        let mut by_id = BTreeMap::new();
        for (idx, entry) in entries.iter().enumerate() {
            by_id.entry(entry.dr_id.to_uppercase()).or_insert(idx);
        }
        Self { entries, by_id }
    }

    /// Load from the spec-registry JSON document (an array of entries).
    pub fn from_json_str(json: &str) -> Result<Self> {
        let entries: Vec<DrRegistryEntry> =
            serde_json::from_str(json).context("parse DR registry document")?;
        Ok(Self::from_entries(entries))
    }

    pub fn entries(&self) -> &[DrRegistryEntry] {
        &self.entries
    }

    pub fn get(&self, dr_id: &str) -> Option<&DrRegistryEntry> {
        self.by_id
            .get(&dr_id.to_uppercase())
            .map(|idx| &self.entries[*idx])
    }

    pub fn contains(&self, dr_id: &str) -> bool {
        self.by_id.contains_key(&dr_id.to_uppercase())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_from_json_and_indexes_case_insensitively() {
        let registry = DrRegistry::from_json_str(
            r#"[
                {
                    "dr_id": "IBT-031",
                    "name": "Seller TRN",
                    "mandatory": true,
                    "dataset": "headers",
                    "columns": ["seller_trn"],
                    "category": "Party",
                    "owner": "customer"
                },
                {
                    "dr_id": "IBT-024",
                    "name": "Specification identifier",
                    "mandatory": true
                }
            ]"#,
        )
        .expect("load registry");

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("ibt-031"));
        let entry = registry.get("IBT-024").expect("entry");
        // No bound columns: not customer-ingestible.
        assert!(entry.columns.is_empty());
        assert_eq!(entry.dataset, None);
    }

    #[test]
    fn malformed_document_is_an_error() {
        assert!(DrRegistry::from_json_str("{not json").is_err());
    }
}
