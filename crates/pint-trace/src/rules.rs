//! Rule-to-DR traceability catalog.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use pint_model::{DatasetScope, Severity};
use pint_validate::checks::ids;

/// One rule's traceability annotation: which data requirements it
/// exercises.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleTraceEntry {
    pub rule_id: String,
    pub dr_ids: Vec<String>,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<DatasetScope>,
}

/// Immutable rule catalog with a DR reverse index. Constructed once and
/// injected into the traceability engine; the engine never reads
/// globals.
#[derive(Debug, Clone, Default)]
pub struct RuleTraceCatalog {
    entries: Vec<RuleTraceEntry>,
    rules_by_dr: BTreeMap<String, Vec<String>>,
}

impl RuleTraceCatalog {
    pub fn from_entries(entries: Vec<RuleTraceEntry>) -> Self {
        let mut rules_by_dr: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for entry in &entries {
            for dr_id in &entry.dr_ids {
                let rules = rules_by_dr.entry(dr_id.to_uppercase()).or_default();
                if !rules.contains(&entry.rule_id) {
                    rules.push(entry.rule_id.clone());
                }
            }
        }
        Self {
            entries,
            rules_by_dr,
        }
    }

    pub fn entries(&self) -> &[RuleTraceEntry] {
        &self.entries
    }

    pub fn get(&self, rule_id: &str) -> Option<&RuleTraceEntry> {
        self.entries
            .iter()
            .find(|entry| entry.rule_id.eq_ignore_ascii_case(rule_id))
    }

    /// Rule ids exercising a DR, in catalog order.
    pub fn rules_for_dr(&self, dr_id: &str) -> &[String] {
        self.rules_by_dr
            .get(&dr_id.to_uppercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

fn entry(
    rule_id: &str,
    severity: Severity,
    scope: DatasetScope,
    dr_ids: &[&str],
) -> RuleTraceEntry {
    RuleTraceEntry {
        rule_id: rule_id.to_string(),
        dr_ids: dr_ids.iter().map(|id| (*id).to_string()).collect(),
        severity,
        scope: Some(scope),
    }
}

/// Traceability annotations for the built-in check pack, derived from
/// the PINT-AE business terms each check exercises.
///
/// Built lazily on first access and cached for the process lifetime;
/// initialization is idempotent so call order does not matter.
pub fn builtin_rule_catalog() -> &'static RuleTraceCatalog {
    static CATALOG: OnceLock<RuleTraceCatalog> = OnceLock::new();
    CATALOG.get_or_init(|| {
        RuleTraceCatalog::from_entries(vec![
            entry(
                ids::TRN_FORMAT,
                Severity::Error,
                DatasetScope::Headers,
                &["IBT-031", "IBT-048"],
            ),
            entry(
                ids::DUPLICATE_INVOICE,
                Severity::Error,
                DatasetScope::Headers,
                &["IBT-001"],
            ),
            entry(
                ids::HEADER_TOTAL,
                Severity::Error,
                DatasetScope::Headers,
                &["IBT-109", "IBT-110", "IBT-112"],
            ),
            entry(
                ids::LINE_TOTAL,
                Severity::Error,
                DatasetScope::Lines,
                &["IBT-131"],
            ),
            entry(
                ids::VAT_AMOUNT,
                Severity::Error,
                DatasetScope::Lines,
                &["IBT-131", "IBT-151"],
            ),
            entry(
                ids::NEGATIVE_LINE,
                Severity::Warning,
                DatasetScope::Lines,
                &["IBT-131"],
            ),
            entry(
                ids::BUYER_REFERENCE,
                Severity::Error,
                DatasetScope::Headers,
                &["IBT-046"],
            ),
            entry(
                ids::HEADER_MANDATORY,
                Severity::Error,
                DatasetScope::Headers,
                &["IBT-001", "IBT-002", "IBT-005", "IBT-031", "IBT-046"],
            ),
            entry(
                ids::MIXED_VAT,
                Severity::Warning,
                DatasetScope::Headers,
                &["IBT-110", "IBT-118"],
            ),
        ])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reverse_index_deduplicates_rules() {
        let catalog = RuleTraceCatalog::from_entries(vec![
            entry("R1", Severity::Error, DatasetScope::Headers, &["IBT-001"]),
            entry(
                "R2",
                Severity::Warning,
                DatasetScope::Headers,
                &["IBT-001", "ibt-001"],
            ),
        ]);
        assert_eq!(catalog.rules_for_dr("ibt-001"), ["R1", "R2"]);
        assert!(catalog.rules_for_dr("IBT-999").is_empty());
    }

    #[test]
    fn builtin_catalog_is_cached_and_stable() {
        let first = builtin_rule_catalog();
        let second = builtin_rule_catalog();
        assert!(std::ptr::eq(first, second));
        assert!(!first.rules_for_dr("IBT-031").is_empty());
        assert!(first.get(ids::HEADER_TOTAL).is_some());
    }
}
